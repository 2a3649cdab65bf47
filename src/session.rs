//! Remote session capability.
//!
//! The platform client is an external collaborator: one session per run,
//! opened with a token, consumed page by page. [`ScrapeSession`] is the
//! seam; [`HttpSession`] is the live implementation,
//! [`crate::mock::MockSession`] the offline one.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use serde::Deserialize;
use url::Url;

use crate::config::TARGET_DOMAIN;
use crate::error::{Result, TokscrapeError};
use crate::models::{Comment, Follower, UserProfile, Video};

/// Items requested per remote page.
const PAGE_SIZE: usize = 30;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// A paginated video feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    UserVideos(String),
    Trending,
    Hashtag(String),
}

/// One fetched page plus the next cursor, or `None` at end of stream
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<u64>,
}

/// Capability interface over the remote platform client
#[async_trait]
pub trait ScrapeSession: Send + Sync {
    async fn user_info(&self, username: &str) -> Result<UserProfile>;
    async fn video_info(&self, video_id: &str) -> Result<Video>;
    async fn video_page(&self, feed: &Feed, cursor: u64) -> Result<Page<Video>>;
    async fn comment_page(&self, video_id: &str, cursor: u64) -> Result<Page<Comment>>;
    async fn follower_page(&self, username: &str, cursor: u64) -> Result<Page<Follower>>;
}

/// Pull a video id out of a raw id or a pasted tiktok.com URL.
pub fn video_id_from_target(target: &str) -> Result<String> {
    if !target.contains(TARGET_DOMAIN) {
        return Ok(target.to_string());
    }
    let url = Url::parse(target)
        .map_err(|e| TokscrapeError::InvalidTarget(format!("invalid video URL '{}': {}", target, e)))?;
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .map(|id| id.to_string())
        .ok_or_else(|| {
            TokscrapeError::InvalidTarget(format!("no video id in URL '{}'", target))
        })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ItemListResponse {
    item_list: Vec<Video>,
    has_more: bool,
    cursor: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CommentListResponse {
    comments: Vec<Comment>,
    has_more: bool,
    cursor: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDetailResponse {
    user_info: UserInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDetailResponse {
    item_info: ItemInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemInfo {
    item_struct: Video,
}

/// Live session over the platform's web API
#[derive(Debug)]
pub struct HttpSession {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSession {
    /// Establish the single session for this run. Fails fast on an empty
    /// token or a client that cannot be constructed; there is no retry.
    pub fn open(token: &str) -> Result<Self> {
        Self::open_with_base_url(token, &format!("https://www.{}", TARGET_DOMAIN))
    }

    /// Session against an explicit endpoint, used by tests.
    pub fn open_with_base_url(token: &str, base_url: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokscrapeError::Session(
                "empty msToken; run mstoken or pass a token value".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        let cookie = HeaderValue::from_str(&format!("msToken={}", token))
            .map_err(|e| TokscrapeError::Session(format!("token not header-safe: {}", e)))?;
        headers.insert(COOKIE, cookie);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TokscrapeError::Session(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("msToken", self.token.as_str())])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ScrapeSession for HttpSession {
    async fn user_info(&self, username: &str) -> Result<UserProfile> {
        let response: UserDetailResponse = self
            .get_json("/api/user/detail/", &[("uniqueId", username)])
            .await?;
        Ok(response.user_info.user)
    }

    async fn video_info(&self, video_id: &str) -> Result<Video> {
        let response: ItemDetailResponse = self
            .get_json("/api/item/detail/", &[("itemId", video_id)])
            .await?;
        Ok(response.item_info.item_struct)
    }

    async fn video_page(&self, feed: &Feed, cursor: u64) -> Result<Page<Video>> {
        let count = PAGE_SIZE.to_string();
        let cursor_param = cursor.to_string();
        let mut params: Vec<(&str, &str)> = vec![("count", &count), ("cursor", &cursor_param)];
        let path = match feed {
            Feed::UserVideos(username) => {
                params.push(("uniqueId", username));
                "/api/post/item_list/"
            }
            Feed::Trending => "/api/recommend/item_list/",
            Feed::Hashtag(name) => {
                params.push(("challengeName", name));
                "/api/challenge/item_list/"
            }
        };
        let response: ItemListResponse = self.get_json(path, &params).await?;
        Ok(Page {
            items: response.item_list,
            next: response.has_more.then_some(response.cursor),
        })
    }

    async fn comment_page(&self, video_id: &str, cursor: u64) -> Result<Page<Comment>> {
        let count = PAGE_SIZE.to_string();
        let cursor_param = cursor.to_string();
        let response: CommentListResponse = self
            .get_json(
                "/api/comment/list/",
                &[
                    ("aweme_id", video_id),
                    ("count", &count),
                    ("cursor", &cursor_param),
                ],
            )
            .await?;
        Ok(Page {
            items: response.comments,
            next: response.has_more.then_some(response.cursor),
        })
    }

    async fn follower_page(&self, _username: &str, _cursor: u64) -> Result<Page<Follower>> {
        Err(TokscrapeError::Unsupported(
            "follower listing is only available in mock mode".to_string(),
        ))
    }
}

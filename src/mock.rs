//! Offline session that fabricates structurally identical data.
//!
//! Used by the `tokscrape-mock` binary and by tests: same capability trait
//! as the live session, no network, feeds are unbounded and the caller's
//! limit decides how much is generated.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

use crate::error::Result;
use crate::models::{Author, Comment, Follower, Music, UserProfile, Video, VideoMedia, VideoStats};
use crate::session::{Feed, Page, ScrapeSession};

const MOCK_PAGE_SIZE: usize = 10;

/// Default item volumes when the caller gives no limit, matching what a
/// plausible small profile would return.
pub const DEFAULT_MOCK_VIDEO_LIMIT: usize = 50;
pub const DEFAULT_MOCK_FEED_LIMIT: usize = 30;
pub const DEFAULT_MOCK_FOLLOWER_LIMIT: usize = 100;

const TRENDING_USERS: &[&str] = &["user1", "creator2", "tiktoker3", "viral4", "famous5"];

pub struct MockSession;

impl MockSession {
    pub fn new() -> Self {
        MockSession
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn recent_timestamp(window_secs: i64) -> i64 {
    let mut rng = rand::rng();
    Utc::now().timestamp() - rng.random_range(0..window_secs)
}

pub fn mock_user(username: &str) -> UserProfile {
    let mut rng = rand::rng();
    UserProfile {
        unique_id: username.to_string(),
        nickname: format!("{} User", capitalize(username)),
        follower_count: rng.random_range(1_000..50_000_000),
        following_count: rng.random_range(50..5_000),
        video_count: rng.random_range(10..5_000),
        verified: rng.random_bool(0.5),
        private_account: rng.random_bool(0.5),
        bio_description: format!("Mock bio for {}", username),
        avatar_larger: Some(format!("https://example.com/avatars/{}.jpg", username)),
        avatar_medium: Some(format!("https://example.com/avatars/{}_medium.jpg", username)),
        avatar_thumb: Some(format!("https://example.com/avatars/{}_thumb.jpg", username)),
        extra: Default::default(),
    }
}

pub fn mock_video(index: usize, username: &str) -> Video {
    let mut rng = rand::rng();
    let video_id: u64 = rng.random_range(7_000_000_000_000_000_000..8_000_000_000_000_000_000);
    Video {
        id: video_id.to_string(),
        desc: format!(
            "Mock video description {} - This is a test video for {}",
            index + 1,
            username
        ),
        create_time: recent_timestamp(86_400 * 365),
        author: Author {
            unique_id: username.to_string(),
            nickname: format!("{} User", capitalize(username)),
        },
        stats: VideoStats {
            digg_count: rng.random_range(100..10_000_000),
            share_count: rng.random_range(10..1_000_000),
            comment_count: rng.random_range(5..500_000),
            play_count: rng.random_range(1_000..100_000_000),
        },
        video: Some(VideoMedia {
            download_addr: format!("https://example.com/videos/{}.mp4", video_id),
            cover: format!("https://example.com/covers/{}.jpg", video_id),
            duration: rng.random_range(5..60),
        }),
        music: Some(Music {
            title: format!("Mock Music {}", index + 1),
            author_name: "Mock Artist".to_string(),
        }),
        extra: Default::default(),
    }
}

pub fn mock_comment(index: usize) -> Comment {
    let mut rng = rand::rng();
    let commenter: u32 = rng.random_range(1..1_000);
    Comment {
        id: rng
            .random_range(7_000_000_000_000_000_000u64..8_000_000_000_000_000_000)
            .to_string(),
        text: format!("Mock comment {} - This is a test comment", index + 1),
        create_time: recent_timestamp(86_400 * 30),
        digg_count: rng.random_range(0..10_000),
        user: Author {
            unique_id: format!("user{}", commenter),
            nickname: format!("Commenter {}", index + 1),
        },
    }
}

pub fn mock_follower() -> Follower {
    let mut rng = rand::rng();
    let stems = ["user", "creator", "tiktoker", "fan", "viewer"];
    let stem = stems[rng.random_range(0..stems.len())];
    let username = format!("{}{}", stem, rng.random_range(1..1_000u32));
    Follower {
        id: rng
            .random_range(1_000_000_000_000_000_000u64..10_000_000_000_000_000_000)
            .to_string(),
        unique_id: username.clone(),
        nickname: format!("{} User", capitalize(&username)),
        follower_count: rng.random_range(10..500_000),
        following_count: rng.random_range(5..2_000),
        video_count: rng.random_range(0..1_000),
        verified: rng.random_bool(0.5),
        private_account: rng.random_bool(0.5),
        bio_description: format!("Mock bio for {}", username),
        avatar_larger: Some(format!("https://example.com/avatars/{}.jpg", username)),
    }
}

fn page_of<T>(cursor: u64, build: impl Fn(usize) -> T) -> Page<T> {
    let start = cursor as usize;
    let items = (start..start + MOCK_PAGE_SIZE).map(build).collect();
    Page {
        items,
        next: Some(cursor + MOCK_PAGE_SIZE as u64),
    }
}

#[async_trait]
impl ScrapeSession for MockSession {
    async fn user_info(&self, username: &str) -> Result<UserProfile> {
        Ok(mock_user(username))
    }

    async fn video_info(&self, video_id: &str) -> Result<Video> {
        let mut video = mock_video(0, "mockuser");
        video.id = video_id.to_string();
        video.desc = format!("Mock video description for {}", video_id);
        Ok(video)
    }

    async fn video_page(&self, feed: &Feed, cursor: u64) -> Result<Page<Video>> {
        let page = match feed {
            Feed::UserVideos(username) => page_of(cursor, |i| mock_video(i, username)),
            Feed::Trending => page_of(cursor, |i| {
                let mut rng = rand::rng();
                let username = TRENDING_USERS[rng.random_range(0..TRENDING_USERS.len())];
                mock_video(i, username)
            }),
            Feed::Hashtag(name) => page_of(cursor, |i| {
                let mut rng = rand::rng();
                let username = format!("user{}", rng.random_range(1..10));
                let mut video = mock_video(i, &username);
                video.desc = format!("#{} {}", name, video.desc);
                video
            }),
        };
        Ok(page)
    }

    async fn comment_page(&self, _video_id: &str, cursor: u64) -> Result<Page<Comment>> {
        Ok(page_of(cursor, mock_comment))
    }

    async fn follower_page(&self, _username: &str, cursor: u64) -> Result<Page<Follower>> {
        Ok(page_of(cursor, |_| mock_follower()))
    }
}

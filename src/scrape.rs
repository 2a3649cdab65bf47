//! Scrape dispatcher: one bounded fetch against an open session.
//!
//! Each invocation walks `Idle -> SessionOpen -> Fetching -> Done | Failed`.
//! The paginated stream is consumed eagerly to the bound or to the end,
//! never restarted; any session or fetch error is fatal to the run.

use log::info;
use std::future::Future;

use crate::config::{Mode, ScrapeJob};
use crate::error::{Result, TokscrapeError};
use crate::models::{Comment, Follower, UserProfile, Video};
use crate::session::{video_id_from_target, Feed, Page, ScrapeSession};

/// The accumulated result set of one dispatcher run
#[derive(Debug, Clone)]
pub enum ScrapeOutput {
    User {
        user: UserProfile,
        videos: Vec<Video>,
    },
    Trending {
        videos: Vec<Video>,
    },
    Hashtag {
        name: String,
        videos: Vec<Video>,
    },
    Video {
        video: Video,
        comments: Option<Vec<Comment>>,
    },
    Followers {
        user: UserProfile,
        followers: Vec<Follower>,
    },
}

fn require_target(job: &ScrapeJob) -> Result<&str> {
    job.target.as_deref().ok_or_else(|| {
        TokscrapeError::Config(format!("--target is required for {} mode", job.mode))
    })
}

/// Consume a paginated stream up to `limit` items; a zero limit fetches
/// nothing. An empty page ends the stream even if the server claims more;
/// otherwise a stale cursor would loop forever.
async fn drain_pages<T, F, Fut>(mut fetch: F, limit: usize, noun: &str) -> Result<Vec<T>>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut collected: Vec<T> = Vec::new();
    let mut cursor = 0u64;
    while collected.len() < limit {
        let page = fetch(cursor).await?;
        if page.items.is_empty() {
            break;
        }
        for item in page.items {
            if collected.len() >= limit {
                break;
            }
            collected.push(item);
            if collected.len() % 10 == 0 {
                info!("Extracted {} {} so far...", collected.len(), noun);
            }
        }
        if collected.len() >= limit {
            info!("Reached limit of {} {}. Stopping extraction.", limit, noun);
            break;
        }
        match page.next {
            Some(next) => cursor = next,
            None => break,
        }
    }
    Ok(collected)
}

/// Drive one scrape job against an open session.
pub async fn run<S: ScrapeSession + ?Sized>(session: &S, job: &ScrapeJob) -> Result<ScrapeOutput> {
    match job.mode {
        Mode::User => {
            let username = require_target(job)?;
            info!("Loading user profile: @{}...", username);
            let user = session.user_info(username).await?;
            info!("Profile loaded: {} (@{})", user.nickname, user.unique_id);
            info!("Followers: {}", user.follower_count);
            info!("Following: {}", user.following_count);
            info!("Videos: {}", user.video_count);

            info!("Extracting videos...");
            let feed = Feed::UserVideos(username.to_string());
            let videos = drain_pages(
                |cursor| session.video_page(&feed, cursor),
                job.video_limit(),
                "videos",
            )
            .await?;
            Ok(ScrapeOutput::User { user, videos })
        }
        Mode::Trending => {
            info!("Extracting trending videos...");
            let videos = drain_pages(
                |cursor| session.video_page(&Feed::Trending, cursor),
                job.video_limit(),
                "videos",
            )
            .await?;
            Ok(ScrapeOutput::Trending { videos })
        }
        Mode::Hashtag => {
            let name = require_target(job)?.trim_start_matches('#').to_string();
            info!("Loading hashtag: #{}...", name);
            let feed = Feed::Hashtag(name.clone());
            let videos = drain_pages(
                |cursor| session.video_page(&feed, cursor),
                job.video_limit(),
                "videos",
            )
            .await?;
            Ok(ScrapeOutput::Hashtag { name, videos })
        }
        Mode::Video => {
            let target = require_target(job)?;
            let video_id = video_id_from_target(target)?;
            info!("Loading video: {}...", video_id);
            let video = session.video_info(&video_id).await?;

            let comments = if job.include_comments {
                info!("Extracting comments...");
                let comments = drain_pages(
                    |cursor| session.comment_page(&video_id, cursor),
                    job.comment_limit,
                    "comments",
                )
                .await?;
                info!("Total comments extracted: {}", comments.len());
                Some(comments)
            } else {
                None
            };
            Ok(ScrapeOutput::Video { video, comments })
        }
    }
}

/// Mock-generator entry: list a user's followers instead of their videos.
pub async fn run_followers<S: ScrapeSession + ?Sized>(
    session: &S,
    username: &str,
    limit: usize,
) -> Result<ScrapeOutput> {
    info!("Loading user profile: @{}...", username);
    let user = session.user_info(username).await?;
    info!("Extracting followers...");
    let followers = drain_pages(
        |cursor| session.follower_page(username, cursor),
        limit,
        "followers",
    )
    .await?;
    Ok(ScrapeOutput::Followers { user, followers })
}

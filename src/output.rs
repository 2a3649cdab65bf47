//! Result serialization: JSON documents and mode-specific CSV tables.

use chrono::Local;
use log::info;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::models::{Comment, Follower, Video};
use crate::scrape::ScrapeOutput;

/// Free-text CSV fields are cut to this many characters.
const TEXT_FIELD_LIMIT: usize = 100;

const MOCK_NOTE: &str = "This is mock/test data generated for testing purposes";

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
    /// Adds `mock_mode`/`note` fields and a `_mock` filename suffix.
    /// The mock CLI turns this off under `--quiet` so the output passes
    /// as genuine.
    pub mock_banner: bool,
}

/// Serialize one result set, returning the path written.
pub fn write_output(output: &ScrapeOutput, opts: &OutputOptions) -> Result<PathBuf> {
    let path = match &opts.path {
        Some(path) => path.clone(),
        None => auto_filename(output, opts),
    };
    match opts.format {
        OutputFormat::Json => {
            let value = to_json(output, opts.mock_banner);
            fs::write(&path, serde_json::to_string_pretty(&value)?)?;
        }
        OutputFormat::Csv => write_csv(output, &path)?,
    }
    info!("Data saved to: {}", path.display());
    Ok(path)
}

fn auto_filename(output: &ScrapeOutput, opts: &OutputOptions) -> PathBuf {
    let (mode, target) = match output {
        ScrapeOutput::User { user, .. } | ScrapeOutput::Followers { user, .. } => {
            ("user", Some(user.unique_id.clone()))
        }
        ScrapeOutput::Trending { .. } => ("trending", None),
        ScrapeOutput::Hashtag { name, .. } => ("hashtag", Some(name.clone())),
        ScrapeOutput::Video { video, .. } => ("video", Some(video.id.clone())),
    };
    let mut stem = format!("tiktok_{}", mode);
    if let Some(target) = target {
        stem.push('_');
        stem.push_str(&target);
    }
    if opts.mock_banner {
        stem.push_str("_mock");
    }
    PathBuf::from(format!(
        "{}_{}.{}",
        stem,
        Local::now().format("%Y%m%d_%H%M%S"),
        opts.format.extension()
    ))
}

fn to_json(output: &ScrapeOutput, mock_banner: bool) -> Value {
    let mut doc = match output {
        ScrapeOutput::User { user, videos } => json!({
            "user": user,
            "videos": videos,
            "total_videos": videos.len(),
        }),
        ScrapeOutput::Trending { videos } => json!({
            "videos": videos,
            "total_videos": videos.len(),
        }),
        ScrapeOutput::Hashtag { name, videos } => json!({
            "hashtag": name,
            "videos": videos,
            "total_videos": videos.len(),
        }),
        ScrapeOutput::Video { video, comments } => {
            let mut doc = json!({ "video": video });
            if let Some(comments) = comments {
                doc["comments"] = json!(comments);
                doc["total_comments"] = json!(comments.len());
            }
            doc
        }
        ScrapeOutput::Followers { user, followers } => json!({
            "user": user,
            "followers": followers,
            "total_followers": followers.len(),
        }),
    };
    doc["extracted_at"] = json!(Local::now().to_rfc3339());
    if mock_banner {
        doc["mock_mode"] = json!(true);
        doc["note"] = json!(MOCK_NOTE);
    }
    doc
}

fn truncate_text(text: &str) -> String {
    text.chars().take(TEXT_FIELD_LIMIT).collect()
}

const VIDEO_HEADER: &[&str] = &[
    "Video ID",
    "Description",
    "Likes",
    "Shares",
    "Comments",
    "Views",
    "Created",
];

const FEED_VIDEO_HEADER: &[&str] = &[
    "Video ID",
    "Author",
    "Description",
    "Likes",
    "Shares",
    "Comments",
    "Views",
    "Created",
];

const COMMENT_HEADER: &[&str] = &["Comment ID", "Author", "Text", "Likes", "Created"];

const FOLLOWER_HEADER: &[&str] = &[
    "Follower ID",
    "Username",
    "Nickname",
    "Followers",
    "Following",
    "Videos",
    "Verified",
];

fn video_row(video: &Video, with_author: bool) -> Vec<String> {
    let mut row = vec![video.id.clone()];
    if with_author {
        row.push(video.author.unique_id.clone());
    }
    row.extend([
        truncate_text(&video.desc),
        video.stats.digg_count.to_string(),
        video.stats.share_count.to_string(),
        video.stats.comment_count.to_string(),
        video.stats.play_count.to_string(),
        video.create_time.to_string(),
    ]);
    row
}

fn comment_row(comment: &Comment) -> Vec<String> {
    vec![
        comment.id.clone(),
        comment.user.unique_id.clone(),
        truncate_text(&comment.text),
        comment.digg_count.to_string(),
        comment.create_time.to_string(),
    ]
}

fn follower_row(follower: &Follower) -> Vec<String> {
    vec![
        follower.id.clone(),
        follower.unique_id.clone(),
        follower.nickname.clone(),
        follower.follower_count.to_string(),
        follower.following_count.to_string(),
        follower.video_count.to_string(),
        follower.verified.to_string(),
    ]
}

fn write_csv(output: &ScrapeOutput, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    match output {
        ScrapeOutput::User { user, videos } => {
            writer.write_record(["Type", "Field", "Value"])?;
            writer.write_record(["User", "username", &user.unique_id])?;
            writer.write_record(["User", "nickname", &user.nickname])?;
            writer.write_record(["User", "followers", &user.follower_count.to_string()])?;
            writer.write_record(["User", "following", &user.following_count.to_string()])?;
            writer.write_record(["User", "videos", &user.video_count.to_string()])?;
            writer.write_record([""])?;
            writer.write_record(VIDEO_HEADER)?;
            for video in videos {
                writer.write_record(video_row(video, false))?;
            }
        }
        ScrapeOutput::Trending { videos } | ScrapeOutput::Hashtag { videos, .. } => {
            writer.write_record(FEED_VIDEO_HEADER)?;
            for video in videos {
                writer.write_record(video_row(video, true))?;
            }
        }
        ScrapeOutput::Video { video, comments } => {
            writer.write_record(["Type", "Field", "Value"])?;
            writer.write_record(["Video", "id", &video.id])?;
            writer.write_record(["Video", "description", &video.desc])?;
            writer.write_record(["Video", "author", &video.author.unique_id])?;
            writer.write_record(["Video", "likes", &video.stats.digg_count.to_string()])?;
            writer.write_record(["Video", "shares", &video.stats.share_count.to_string()])?;
            writer.write_record(["Video", "comments", &video.stats.comment_count.to_string()])?;
            writer.write_record(["Video", "views", &video.stats.play_count.to_string()])?;
            if let Some(comments) = comments {
                if !comments.is_empty() {
                    writer.write_record([""])?;
                    writer.write_record(COMMENT_HEADER)?;
                    for comment in comments {
                        writer.write_record(comment_row(comment))?;
                    }
                }
            }
        }
        ScrapeOutput::Followers { user, followers } => {
            writer.write_record(["Type", "Field", "Value"])?;
            writer.write_record(["User", "username", &user.unique_id])?;
            writer.write_record(["User", "nickname", &user.nickname])?;
            writer.write_record(["User", "followers", &user.follower_count.to_string()])?;
            writer.write_record(["User", "following", &user.following_count.to_string()])?;
            writer.write_record(["User", "videos", &user.video_count.to_string()])?;
            writer.write_record([""])?;
            writer.write_record(FOLLOWER_HEADER)?;
            for follower in followers {
                writer.write_record(follower_row(follower))?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// One-line summary for the CLI layer after a successful save.
pub fn item_summary(output: &ScrapeOutput) -> String {
    match output {
        ScrapeOutput::User { videos, .. }
        | ScrapeOutput::Trending { videos }
        | ScrapeOutput::Hashtag { videos, .. } => {
            format!("Total videos extracted: {}", videos.len())
        }
        ScrapeOutput::Video { comments, .. } => match comments {
            Some(comments) => format!("Total comments extracted: {}", comments.len()),
            None => "Video extracted".to_string(),
        },
        ScrapeOutput::Followers { followers, .. } => {
            format!("Total followers extracted: {}", followers.len())
        }
    }
}

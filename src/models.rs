//! Typed records for the platform's wire format.
//!
//! Field names follow the platform's camelCase JSON. Profiles and videos
//! carry a flattened extras map so fields this crate does not model survive
//! a fetch-and-save round trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A user profile as returned by the user detail endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub unique_id: String,
    pub nickname: String,
    pub follower_count: u64,
    pub following_count: u64,
    pub video_count: u64,
    pub verified: bool,
    pub private_account: bool,
    pub bio_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_larger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_thumb: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Minimal author reference embedded in videos and comments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub unique_id: String,
    pub nickname: String,
}

/// Engagement counters attached to a video
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStats {
    pub digg_count: u64,
    pub share_count: u64,
    pub comment_count: u64,
    pub play_count: u64,
}

/// Media pointers for a video
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoMedia {
    pub download_addr: String,
    pub cover: String,
    pub duration: u64,
}

/// Sound attached to a video
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Music {
    pub title: String,
    pub author_name: String,
}

/// One video record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    pub id: String,
    pub desc: String,
    pub create_time: i64,
    pub author: Author,
    pub stats: VideoStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<Music>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One comment on a video
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub create_time: i64,
    pub digg_count: u64,
    pub user: Author,
}

/// One entry of a user's follower listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Follower {
    pub id: String,
    pub unique_id: String,
    pub nickname: String,
    pub follower_count: u64,
    pub following_count: u64,
    pub video_count: u64,
    pub verified: bool,
    pub private_account: bool,
    pub bio_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_larger: Option<String>,
}

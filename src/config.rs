//! Configuration types shared by the locator and the scraper

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Cookie name the platform uses for its session token, with the
/// snake_case spelling some older clients wrote as a fallback.
pub const TOKEN_COOKIE_NAMES: &[&str] = &["msToken", "ms_token"];

/// Domain whose cookies carry the token.
pub const TARGET_DOMAIN: &str = "tiktok.com";

/// Default item caps applied when the caller gives no limit.
pub const DEFAULT_USER_VIDEO_LIMIT: usize = 1000;
pub const DEFAULT_FEED_VIDEO_LIMIT: usize = 100;
pub const DEFAULT_COMMENT_LIMIT: usize = 30;

/// Browser families supported for cookie extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Firefox,
    Chrome,
    Edge,
}

impl Browser {
    /// Default search order: Firefox first (values are never encrypted),
    /// then Chrome, then Edge.
    pub const SEARCH_ORDER: [Browser; 3] = [Browser::Firefox, Browser::Chrome, Browser::Edge];
}

impl FromStr for Browser {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(Browser::Firefox),
            "chrome" | "chromium" => Ok(Browser::Chrome),
            "edge" => Ok(Browser::Edge),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Browser::Firefox => "Firefox",
            Browser::Chrome => "Chrome",
            Browser::Edge => "Edge",
        };
        write!(f, "{}", name)
    }
}

/// Operating system families with distinct browser profile layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Windows,
    MacOs,
    Linux,
}

impl OsKind {
    /// The OS this binary is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsKind::Windows
        } else if cfg!(target_os = "macos") {
            OsKind::MacOs
        } else {
            OsKind::Linux
        }
    }
}

/// Scrape modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    User,
    Trending,
    Hashtag,
    Video,
}

impl Mode {
    /// Trending is the only mode that does not name a target.
    pub fn requires_target(self) -> bool {
        !matches!(self, Mode::Trending)
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Mode::User),
            "trending" => Ok(Mode::Trending),
            "hashtag" => Ok(Mode::Hashtag),
            "video" => Ok(Mode::Video),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::User => "user",
            Mode::Trending => "trending",
            Mode::Hashtag => "hashtag",
            Mode::Video => "video",
        };
        write!(f, "{}", name)
    }
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(()),
        }
    }
}

/// One scrape invocation, fully described
#[derive(Debug, Clone)]
pub struct ScrapeJob {
    pub mode: Mode,
    pub target: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub limit: Option<usize>,
    pub include_comments: bool,
    pub comment_limit: usize,
}

impl ScrapeJob {
    /// Item cap for the paginated fetch: the caller's limit, or the
    /// per-mode default.
    pub fn video_limit(&self) -> usize {
        self.limit.unwrap_or(match self.mode {
            Mode::User => DEFAULT_USER_VIDEO_LIMIT,
            _ => DEFAULT_FEED_VIDEO_LIMIT,
        })
    }
}

//! tokscrape - TikTok data toolkit
//!
//! Two independent pieces that compose only through a token value: a cookie
//! locator that pulls the msToken authentication cookie out of local browser
//! profiles, and a scrape dispatcher that uses the token to fetch
//! user/trending/hashtag/video data and write it to JSON or CSV. A mock
//! session fabricates output with the same shape for offline testing.

pub mod cli;
pub mod config;
pub mod error;
pub mod locator;
pub mod logging;
pub mod mock;
pub mod models;
pub mod output;
pub mod scrape;
pub mod session;

pub use error::{Result, TokscrapeError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

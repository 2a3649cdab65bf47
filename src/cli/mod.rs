//! CLI argument parsing and entry points for the three binaries.

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Browser, Mode, OutputFormat, ScrapeJob, DEFAULT_COMMENT_LIMIT};
use crate::error::{Result, TokscrapeError};
use crate::locator;
use crate::mock::{
    MockSession, DEFAULT_MOCK_FEED_LIMIT, DEFAULT_MOCK_FOLLOWER_LIMIT, DEFAULT_MOCK_VIDEO_LIMIT,
};
use crate::output::{self, OutputOptions};
use crate::scrape;
use crate::session::HttpSession;

/// Entry point for the `mstoken` binary. Returns the process exit code.
pub fn run_locator() -> i32 {
    crate::logging::init();
    let matches = locator_app().get_matches();

    let preferred = match matches.get_one::<String>("browser") {
        Some(name) => match name.parse::<Browser>() {
            Ok(browser) => Some(browser),
            Err(()) => {
                eprintln!("mstoken: error: unsupported browser '{}'", name);
                return 1;
            }
        },
        None => None,
    };

    info!("Extracting msToken from browser cookies...");
    let Some(token) = locator::extract_token(preferred) else {
        eprintln!("mstoken: error: could not find msToken in any browser");
        warn!("make sure you are logged into TikTok in your browser");
        warn!("if using Chrome/Edge, close the browser first, or use Firefox");
        return 1;
    };

    if matches.get_flag("stdout") {
        println!("{}", token);
        return 0;
    }
    let path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ms_token.txt"));
    if let Err(err) = locator::save_token(&token, &path) {
        eprintln!("mstoken: error: saving token to {}: {}", path.display(), err);
        return 1;
    }
    info!("msToken saved to: {}", path.display());
    0
}

/// Entry point for the `tokscrape` binary.
pub fn run_scraper() -> i32 {
    crate::logging::init();
    let matches = scraper_app().get_matches();
    match scraper_main(&matches) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("tokscrape: error: {}", err);
            1
        }
    }
}

/// Entry point for the `tokscrape-mock` binary.
pub fn run_mock() -> i32 {
    crate::logging::init();
    let matches = mock_app().get_matches();
    match mock_main(&matches) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("tokscrape-mock: error: {}", err);
            1
        }
    }
}

fn locator_app() -> Command {
    Command::new("mstoken")
        .version(crate::VERSION)
        .about("Extract the TikTok msToken cookie from browser cookie databases")
        .arg(
            Arg::new("browser")
                .short('b')
                .long("browser")
                .value_name("BROWSER")
                .value_parser(["firefox", "chrome", "edge"])
                .help("Preferred browser to extract from (default: try all in order)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .default_value("ms_token.txt")
                .help("Output file path"),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .action(ArgAction::SetTrue)
                .help("Print the token to stdout instead of writing a file"),
        )
}

fn scrape_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .value_parser(["user", "trending", "hashtag", "video"])
                .required(true)
                .help("Scraping mode: user, trending, hashtag, or video"),
        )
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .value_name("TARGET")
                .help("Username, hashtag name, or video ID/URL; ignored for trending"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .value_parser(["json", "csv"])
                .default_value("json")
                .help("Output format"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file path (auto-generated if not provided)"),
        )
        .arg(
            Arg::new("limit")
                .short('l')
                .long("limit")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Maximum number of items to collect"),
        )
        .arg(
            Arg::new("comments")
                .long("comments")
                .action(ArgAction::SetTrue)
                .help("Include comments when scraping a video (video mode only)"),
        )
        .arg(
            Arg::new("comment-limit")
                .long("comment-limit")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .default_value("30")
                .help("Maximum number of comments to collect"),
        )
}

fn scraper_app() -> Command {
    scrape_args(
        Command::new("tokscrape")
            .version(crate::VERSION)
            .about("Scrape TikTok user/trending/hashtag/video data to JSON or CSV"),
    )
    .arg(
        Arg::new("session")
            .short('s')
            .long("session")
            .value_name("TOKEN|FILE")
            .required(true)
            .help("msToken value, or path to a file containing it"),
    )
}

fn mock_app() -> Command {
    scrape_args(
        Command::new("tokscrape-mock")
            .version(crate::VERSION)
            .about("Generate mock TikTok data with the same shape, without any network access"),
    )
    .arg(
        Arg::new("session")
            .short('s')
            .long("session")
            .value_name("TOKEN|FILE")
            .help("Ignored in mock mode (kept for CLI compatibility)"),
    )
    .arg(
        Arg::new("followers")
            .long("followers")
            .action(ArgAction::SetTrue)
            .help("List followers instead of videos (user mode only)"),
    )
    .arg(
        Arg::new("follower-limit")
            .long("follower-limit")
            .value_name("N")
            .value_parser(clap::value_parser!(usize))
            .help("Maximum number of followers to generate (default: 100)"),
    )
    .arg(
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .help("Suppress mock banners so output passes as genuine"),
    )
}

/// Build the job from parsed flags. The target requirement is checked here,
/// before any token or network handling.
fn build_job(matches: &ArgMatches) -> Result<ScrapeJob> {
    let mode: Mode = matches
        .get_one::<String>("mode")
        .and_then(|m| m.parse().ok())
        .ok_or_else(|| TokscrapeError::Config("missing mode".to_string()))?;
    let target = matches.get_one::<String>("target").cloned();
    if mode.requires_target() && target.is_none() {
        return Err(TokscrapeError::Config(format!(
            "--target is required for {} mode",
            mode
        )));
    }
    let format: OutputFormat = matches
        .get_one::<String>("format")
        .and_then(|f| f.parse().ok())
        .unwrap_or(OutputFormat::Json);
    Ok(ScrapeJob {
        mode,
        target,
        format,
        output: matches.get_one::<String>("output").map(PathBuf::from),
        limit: matches.get_one::<usize>("limit").copied(),
        include_comments: matches.get_flag("comments"),
        comment_limit: matches
            .get_one::<usize>("comment-limit")
            .copied()
            .unwrap_or(DEFAULT_COMMENT_LIMIT),
    })
}

/// The session flag takes a token value or a path to a token file.
fn resolve_token(value: &str) -> Result<String> {
    if Path::new(value).exists() {
        Ok(fs::read_to_string(value)?.trim().to_string())
    } else {
        Ok(value.trim().to_string())
    }
}

fn scraper_main(matches: &ArgMatches) -> Result<()> {
    let job = build_job(matches)?;
    let token = matches
        .get_one::<String>("session")
        .map(|s| resolve_token(s))
        .transpose()?
        .ok_or_else(|| TokscrapeError::Config("missing --session".to_string()))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| TokscrapeError::Config(format!("failed to create async runtime: {}", e)))?;
    rt.block_on(async {
        info!("Creating session with msToken...");
        let session = HttpSession::open(&token)?;
        let output = scrape::run(&session, &job).await?;
        let opts = OutputOptions {
            format: job.format,
            path: job.output.clone(),
            mock_banner: false,
        };
        output::write_output(&output, &opts)?;
        info!("{}", output::item_summary(&output));
        Ok(())
    })
}

fn mock_main(matches: &ArgMatches) -> Result<()> {
    let quiet = matches.get_flag("quiet");
    if !quiet {
        warn!("[MOCK/TEST MODE] generating fake data; no real network calls will be made");
    }

    let mut job = build_job(matches)?;
    // Mock volumes stay small when no limit is given.
    job.limit = Some(job.limit.unwrap_or(match job.mode {
        Mode::User => DEFAULT_MOCK_VIDEO_LIMIT,
        _ => DEFAULT_MOCK_FEED_LIMIT,
    }));

    let followers = matches.get_flag("followers");
    if followers && job.mode != Mode::User {
        return Err(TokscrapeError::Config(
            "--followers is only valid in user mode".to_string(),
        ));
    }
    let follower_limit = matches
        .get_one::<usize>("follower-limit")
        .copied()
        .unwrap_or(DEFAULT_MOCK_FOLLOWER_LIMIT);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| TokscrapeError::Config(format!("failed to create async runtime: {}", e)))?;
    rt.block_on(async {
        let session = MockSession::new();
        let output = if followers {
            let username = job
                .target
                .as_deref()
                .ok_or_else(|| TokscrapeError::Config("--target is required".to_string()))?;
            scrape::run_followers(&session, username, follower_limit).await?
        } else {
            scrape::run(&session, &job).await?
        };
        let opts = OutputOptions {
            format: job.format,
            path: job.output.clone(),
            mock_banner: !quiet,
        };
        output::write_output(&output, &opts)?;
        info!("{}", output::item_summary(&output));
        if !quiet {
            warn!("this is test/mock data, not real TikTok data");
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::{build_job, mock_app, resolve_token, scraper_app};
    use crate::config::Mode;
    use crate::error::TokscrapeError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn build_job_requires_target_for_user_mode() {
        let matches = mock_app()
            .try_get_matches_from(["tokscrape-mock", "-m", "user"])
            .expect("parse");
        let err = build_job(&matches).expect_err("missing target");
        assert!(matches!(err, TokscrapeError::Config(_)));
    }

    #[test]
    fn build_job_allows_trending_without_target() {
        let matches = scraper_app()
            .try_get_matches_from(["tokscrape", "-m", "trending", "-s", "token"])
            .expect("parse");
        let job = build_job(&matches).expect("job");
        assert_eq!(job.mode, Mode::Trending);
        assert!(job.target.is_none());
    }

    #[test]
    fn resolve_token_reads_file_or_passes_value() {
        let dir = tempdir().expect("tempdir");
        let token_file = dir.path().join("ms_token.txt");
        fs::write(&token_file, "  abc123\n").expect("write token");

        let from_file = resolve_token(token_file.to_str().unwrap()).expect("token");
        assert_eq!(from_file, "abc123");

        let direct = resolve_token("raw-token-value").expect("token");
        assert_eq!(direct, "raw-token-value");
    }
}

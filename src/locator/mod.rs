//! Cookie locator: finds a usable msToken in local browser profiles.
//!
//! Discovery is best-effort and silent. A profile that is missing, locked,
//! or corrupt is skipped, never reported as an error; only a readable
//! database that should have yielded a token produces a warning.

use log::{info, warn};
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Browser, OsKind, TOKEN_COOKIE_NAMES};
use crate::error::Result;

mod chromium;
mod firefox;

/// A file system path suspected of holding a browser's cookie database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub browser: Browser,
}

/// Result of probing one candidate for target-domain cookies.
///
/// `Inconclusive` covers every file-level failure (locked, corrupt,
/// unreadable); callers treat it the same as `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found,
    NotFound,
    Inconclusive,
}

/// Expand the fixed per-browser pattern set against the user's home
/// directory. Pattern-declaration order first, then directory-read order;
/// the latter is OS-dependent and not stable across runs.
pub fn enumerate_candidates(browser: Browser, os: OsKind) -> Vec<Candidate> {
    match dirs::home_dir() {
        Some(home) => enumerate_candidates_in(&home, browser, os),
        None => Vec::new(),
    }
}

/// Same as [`enumerate_candidates`] with an explicit base directory.
pub fn enumerate_candidates_in(base: &Path, browser: Browser, os: OsKind) -> Vec<Candidate> {
    let patterns = match browser {
        Browser::Firefox => firefox::cookie_patterns(os),
        Browser::Chrome | Browser::Edge => chromium::cookie_patterns(browser, os),
    };
    patterns
        .iter()
        .flat_map(|pattern| expand_pattern(base, pattern))
        .map(|path| Candidate { path, browser })
        .collect()
}

/// Expand one `/`-separated pattern relative to `base`. A `*` inside a
/// component matches any run of characters in a directory entry name; only
/// existing regular files survive.
fn expand_pattern(base: &Path, pattern: &str) -> Vec<PathBuf> {
    let mut paths = vec![base.to_path_buf()];
    for part in pattern.split('/') {
        let mut next = Vec::new();
        if let Some((prefix, suffix)) = part.split_once('*') {
            for dir in &paths {
                let entries = match fs::read_dir(dir) {
                    Ok(entries) => entries,
                    Err(_) => continue,
                };
                for entry in entries.flatten() {
                    let name = entry.file_name();
                    let name = match name.to_str() {
                        Some(name) => name,
                        None => continue,
                    };
                    if name.len() >= prefix.len() + suffix.len()
                        && name.starts_with(prefix)
                        && name.ends_with(suffix)
                    {
                        next.push(entry.path());
                    }
                }
            }
        } else {
            for dir in &paths {
                let joined = dir.join(part);
                if joined.exists() {
                    next.push(joined);
                }
            }
        }
        paths = next;
    }
    paths.retain(|path| path.is_file());
    paths
}

/// Open a cookie database without touching it: read-only via the
/// `immutable=1` URI parameter, so a running browser's lock is ignored.
fn open_immutable(path: &Path) -> rusqlite::Result<Connection> {
    let uri = format!("file:{}?immutable=1", path.display());
    Connection::open_with_flags(
        uri,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
    )
}

/// Check whether a candidate database holds any target-domain cookies.
/// Never errors; any failure is `Inconclusive`.
pub fn probe(path: &Path, browser: Browser) -> ProbeOutcome {
    let conn = match open_immutable(path) {
        Ok(conn) => conn,
        Err(_) => return ProbeOutcome::Inconclusive,
    };
    match browser {
        Browser::Firefox => firefox::probe(&conn),
        Browser::Chrome | Browser::Edge => chromium::probe(&conn),
    }
}

/// Order candidates so that every profile already holding target-domain
/// cookies comes before every profile that does not, preserving relative
/// order within each group.
pub fn rank(candidates: Vec<Candidate>) -> Vec<Candidate> {
    rank_by(candidates, |candidate| {
        probe(&candidate.path, candidate.browser)
    })
}

/// Stable partition by probe outcome; `Inconclusive` sorts with `NotFound`.
pub fn rank_by<F>(candidates: Vec<Candidate>, probe: F) -> Vec<Candidate>
where
    F: Fn(&Candidate) -> ProbeOutcome,
{
    let (mut prioritized, others): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|candidate| probe(candidate) == ProbeOutcome::Found);
    prioritized.extend(others);
    prioritized
}

/// Pull the token value out of one cookie database. Soft-fails: file-level
/// errors are reported as warnings and yield `None`, so the overall search
/// can continue with the next candidate.
pub fn extract(path: &Path, browser: Browser) -> Option<String> {
    let conn = match open_immutable(path) {
        Ok(conn) => conn,
        Err(err) => {
            if err.to_string().to_lowercase().contains("locked") {
                warn!(
                    "{} is locked (browser may be running); close it and retry",
                    path.display()
                );
            } else {
                warn!("could not read {}: {}", path.display(), err);
            }
            return None;
        }
    };
    match browser {
        Browser::Firefox => firefox::extract(&conn, path),
        Browser::Chrome | Browser::Edge => chromium::extract(&conn, path),
    }
}

/// Search one or all browser families for a token. The default order is
/// Firefox, Chrome, Edge; the first extracted value wins.
pub fn extract_token(preferred: Option<Browser>) -> Option<String> {
    let browsers: &[Browser] = match preferred {
        Some(ref browser) => std::slice::from_ref(browser),
        None => &Browser::SEARCH_ORDER,
    };
    let os = OsKind::current();

    for &browser in browsers {
        info!("Trying {}...", browser);
        let candidates = enumerate_candidates(browser, os);
        if candidates.is_empty() {
            info!("No {} cookie databases found", browser);
            continue;
        }
        info!("Found {} {} profile(s)", candidates.len(), browser);

        for candidate in rank(candidates) {
            info!("Checking {}...", candidate.path.display());
            if let Some(token) = extract(&candidate.path, candidate.browser) {
                info!(
                    "Found {} in {}: {}",
                    TOKEN_COOKIE_NAMES[0],
                    browser,
                    candidate.path.display()
                );
                return Some(token);
            }
        }
    }
    None
}

/// Write the token as a single trimmed line.
pub fn save_token(token: &str, path: &Path) -> Result<()> {
    fs::write(path, token.trim())?;
    Ok(())
}

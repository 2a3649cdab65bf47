//! Chrome and Edge cookie database queries.
//!
//! Both browsers use the Chromium `cookies` table and differ only in where
//! their user data lives. On Windows and macOS the value column is usually
//! encrypted; encrypted values are detected and skipped, never decrypted.

use log::warn;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::path::Path;

use super::ProbeOutcome;
use crate::config::{Browser, OsKind, TOKEN_COOKIE_NAMES};

/// Chromium encrypted values start with "v10"/"v11". Checking the shared
/// "v1" prefix is a heuristic: a plaintext token that happens to start with
/// "v1" would be misread as encrypted.
const ENCRYPTION_MARKER: &str = "v1";

pub(super) fn cookie_patterns(browser: Browser, os: OsKind) -> &'static [&'static str] {
    match (browser, os) {
        (Browser::Chrome, OsKind::Windows) => &[
            "AppData/Local/Google/Chrome/User Data/Default/Cookies",
            "AppData/Local/Google/Chrome/User Data/Profile */Cookies",
        ],
        (Browser::Chrome, OsKind::MacOs) => &[
            "Library/Application Support/Google/Chrome/Default/Cookies",
            "Library/Application Support/Google/Chrome/Profile */Cookies",
        ],
        (Browser::Chrome, OsKind::Linux) => &[
            ".config/google-chrome/Default/Cookies",
            ".config/google-chrome/Profile */Cookies",
        ],
        (Browser::Edge, OsKind::Windows) => &[
            "AppData/Local/Microsoft/Edge/User Data/Default/Cookies",
            "AppData/Local/Microsoft/Edge/User Data/Profile */Cookies",
        ],
        (Browser::Edge, OsKind::MacOs) => &[
            "Library/Application Support/Microsoft Edge/Default/Cookies",
            "Library/Application Support/Microsoft Edge/Profile */Cookies",
        ],
        (Browser::Edge, OsKind::Linux) => &[
            ".config/microsoft-edge/Default/Cookies",
            ".config/microsoft-edge/Profile */Cookies",
        ],
        // Firefox has its own module.
        (Browser::Firefox, _) => &[],
    }
}

const PROBE_QUERIES: &[&str] = &[
    "SELECT COUNT(*) FROM cookies WHERE name IN ('msToken', 'ms_token') \
     AND host_key LIKE '%tiktok.com'",
    "SELECT COUNT(*) FROM cookies WHERE host_key LIKE '%tiktok.com'",
];

/// Value lookups from the most precise host match to the loosest.
/// `?1` is the cookie name.
const EXTRACT_QUERIES: &[&str] = &[
    "SELECT value FROM cookies WHERE name = ?1 AND host_key LIKE '%.tiktok.com'",
    "SELECT value FROM cookies WHERE name = ?1 AND host_key = 'www.tiktok.com'",
    "SELECT value FROM cookies WHERE name = ?1 AND host_key LIKE '%tiktok.com'",
    "SELECT value FROM cookies WHERE name = ?1 AND host_key LIKE '%tiktok%'",
];

pub(super) fn probe(conn: &Connection) -> ProbeOutcome {
    let mut ran_any = false;
    for sql in PROBE_QUERIES {
        match conn.query_row(sql, [], |row| row.get::<_, i64>(0)) {
            Ok(count) => {
                ran_any = true;
                if count > 0 {
                    return ProbeOutcome::Found;
                }
            }
            Err(_) => continue,
        }
    }
    if ran_any {
        ProbeOutcome::NotFound
    } else {
        ProbeOutcome::Inconclusive
    }
}

pub(super) fn extract(conn: &Connection, path: &Path) -> Option<String> {
    for cookie_name in TOKEN_COOKIE_NAMES {
        for sql in EXTRACT_QUERIES {
            let value: Value = match conn.query_row(sql, [cookie_name], |row| row.get(0)) {
                Ok(value) => value,
                Err(_) => continue,
            };
            match value {
                Value::Text(text) => {
                    if let Some(token) = plain_token(&text, path) {
                        return Some(token);
                    }
                }
                Value::Blob(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => {
                        if let Some(token) = plain_token(&text, path) {
                            return Some(token);
                        }
                    }
                    Err(_) => warn_encrypted(path),
                },
                _ => {}
            }
        }
    }
    None
}

fn plain_token(text: &str, path: &Path) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with(ENCRYPTION_MARKER) {
        warn_encrypted(path);
        return None;
    }
    Some(trimmed.to_string())
}

fn warn_encrypted(path: &Path) {
    warn!(
        "cookie value in {} appears encrypted; close Chrome/Edge and retry, \
         or use Firefox for automatic extraction",
        path.display()
    );
}

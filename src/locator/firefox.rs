//! Firefox cookie database queries.
//!
//! Modern Firefox keys cookies by `baseDomain`; older schema versions only
//! have `host`. Both query chains are tried in order, first hit wins.

use log::warn;
use rusqlite::Connection;
use std::path::Path;

use super::ProbeOutcome;
use crate::config::{OsKind, TOKEN_COOKIE_NAMES};

/// Profile locations relative to the user's home directory. Declaration
/// order is search order: regular Firefox before Developer Edition.
pub(super) fn cookie_patterns(os: OsKind) -> &'static [&'static str] {
    match os {
        OsKind::Windows => &[
            "AppData/Roaming/Mozilla/Firefox/Profiles/*/cookies.sqlite",
            "AppData/Roaming/Mozilla/Firefox Developer Edition/Profiles/*/cookies.sqlite",
        ],
        OsKind::MacOs => &[
            "Library/Application Support/Firefox/Profiles/*/cookies.sqlite",
            "Library/Application Support/Firefox Developer Edition/Profiles/*/cookies.sqlite",
        ],
        OsKind::Linux => &[
            ".mozilla/firefox/*/cookies.sqlite",
            ".mozilla/firefox-developer-edition/*/cookies.sqlite",
        ],
    }
}

const PROBE_QUERIES: &[&str] = &[
    "SELECT COUNT(*) FROM moz_cookies WHERE name IN ('msToken', 'ms_token') \
     AND baseDomain IN ('tiktok.com', '.tiktok.com')",
    "SELECT COUNT(*) FROM moz_cookies WHERE baseDomain IN ('tiktok.com', '.tiktok.com')",
    "SELECT COUNT(*) FROM moz_cookies WHERE name IN ('msToken', 'ms_token') \
     AND host LIKE '%tiktok.com'",
    "SELECT COUNT(*) FROM moz_cookies WHERE host LIKE '%tiktok.com'",
];

/// Cookie value lookups, ordered from the most precise domain match to the
/// loosest. `?1` is the cookie name.
const EXTRACT_QUERIES: &[&str] = &[
    "SELECT value FROM moz_cookies WHERE name = ?1 \
     AND baseDomain IN ('tiktok.com', '.tiktok.com')",
    "SELECT value FROM moz_cookies WHERE name = ?1 \
     AND (host = 'tiktok.com' OR host = '.tiktok.com' OR host = 'www.tiktok.com' \
          OR host LIKE '%.tiktok.com')",
    "SELECT value FROM moz_cookies WHERE name = ?1 AND host LIKE '%tiktok%'",
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
            // Schema mismatch: fall through to the next query.
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
            let value: String = match conn.query_row(sql, [cookie_name], |row| row.get(0)) {
                Ok(value) => value,
                Err(_) => continue,
            };
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    // No token row. If the profile holds other TikTok cookies, tell the
    // user how to generate one.
    let tiktok_cookies = conn
        .query_row(
            "SELECT COUNT(*) FROM moz_cookies WHERE host LIKE '%tiktok.com'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .unwrap_or(0);
    if tiktok_cookies > 0 {
        warn!(
            "{} has {} TikTok cookies but no msToken; visit https://www.tiktok.com \
             in Firefox and browse for a moment to generate it",
            path.display(),
            tiktok_cookies
        );
    }
    None
}

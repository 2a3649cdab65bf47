use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use tokscrape::config::{Browser, OsKind};
use tokscrape::locator::{
    enumerate_candidates_in, extract, probe, rank, Candidate, ProbeOutcome,
};

fn create_firefox_db(path: &Path, token: Option<&str>) {
    let conn = Connection::open(path).expect("open firefox db");
    conn.execute(
        "CREATE TABLE moz_cookies (
            baseDomain TEXT,
            host TEXT,
            name TEXT,
            value TEXT
        )",
        [],
    )
    .expect("create moz_cookies");
    if let Some(token) = token {
        conn.execute(
            "INSERT INTO moz_cookies (baseDomain, host, name, value) VALUES (?1, ?2, ?3, ?4)",
            ("tiktok.com", ".tiktok.com", "msToken", token),
        )
        .expect("insert token cookie");
    }
    // An unrelated cookie in every fixture.
    conn.execute(
        "INSERT INTO moz_cookies (baseDomain, host, name, value) VALUES (?1, ?2, ?3, ?4)",
        ("example.com", ".example.com", "session", "abc"),
    )
    .expect("insert cookie");
}

/// Old Firefox schema: no baseDomain column, host only.
fn create_legacy_firefox_db(path: &Path, token: &str) {
    let conn = Connection::open(path).expect("open firefox db");
    conn.execute(
        "CREATE TABLE moz_cookies (host TEXT, name TEXT, value TEXT)",
        [],
    )
    .expect("create moz_cookies");
    conn.execute(
        "INSERT INTO moz_cookies (host, name, value) VALUES ('www.tiktok.com', 'msToken', ?1)",
        [token],
    )
    .expect("insert token cookie");
}

fn create_chrome_db(path: &Path, value: rusqlite::types::Value) {
    let conn = Connection::open(path).expect("open chrome db");
    conn.execute(
        "CREATE TABLE cookies (host_key TEXT, name TEXT, value)",
        [],
    )
    .expect("create cookies");
    conn.execute(
        "INSERT INTO cookies (host_key, name, value) VALUES ('.tiktok.com', 'msToken', ?1)",
        [value],
    )
    .expect("insert token cookie");
}

#[test]
fn probe_finds_target_cookies() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("cookies.sqlite");
    create_firefox_db(&db, Some("tok-value"));
    assert_eq!(probe(&db, Browser::Firefox), ProbeOutcome::Found);
}

#[test]
fn probe_reports_absence() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("cookies.sqlite");
    create_firefox_db(&db, None);
    assert_eq!(probe(&db, Browser::Firefox), ProbeOutcome::NotFound);
}

#[test]
fn probe_is_inconclusive_for_garbage_files() {
    let dir = tempdir().expect("tempdir");
    let garbage = dir.path().join("cookies.sqlite");
    fs::write(&garbage, b"not a sqlite database").expect("write garbage");
    assert_eq!(probe(&garbage, Browser::Firefox), ProbeOutcome::Inconclusive);

    let missing = dir.path().join("does-not-exist");
    assert_eq!(probe(&missing, Browser::Chrome), ProbeOutcome::Inconclusive);
}

#[test]
fn extract_returns_trimmed_token() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("cookies.sqlite");
    create_firefox_db(&db, Some("  tok-value \n"));
    assert_eq!(
        extract(&db, Browser::Firefox),
        Some("tok-value".to_string())
    );
}

#[test]
fn extract_falls_back_to_legacy_schema() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("cookies.sqlite");
    create_legacy_firefox_db(&db, "legacy-token");
    assert_eq!(
        extract(&db, Browser::Firefox),
        Some("legacy-token".to_string())
    );
}

#[test]
fn extract_reads_chromium_plaintext() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("Cookies");
    create_chrome_db(&db, rusqlite::types::Value::Text("plain-token".to_string()));
    assert_eq!(
        extract(&db, Browser::Chrome),
        Some("plain-token".to_string())
    );
}

#[test]
fn extract_skips_encrypted_chromium_values() {
    let dir = tempdir().expect("tempdir");

    let marker = dir.path().join("Cookies");
    create_chrome_db(
        &marker,
        rusqlite::types::Value::Text("v10garbledciphertext".to_string()),
    );
    assert_eq!(extract(&marker, Browser::Edge), None);

    let blob = dir.path().join("Cookies2");
    create_chrome_db(
        &blob,
        rusqlite::types::Value::Blob(vec![0xff, 0xfe, 0x01, 0x02]),
    );
    assert_eq!(extract(&blob, Browser::Chrome), None);
}

#[test]
fn extract_soft_fails_on_unreadable_files() {
    let dir = tempdir().expect("tempdir");
    let garbage = dir.path().join("Cookies");
    fs::write(&garbage, b"\x00\x01binary junk").expect("write garbage");
    assert_eq!(extract(&garbage, Browser::Chrome), None);
    assert_eq!(extract(&dir.path().join("missing"), Browser::Firefox), None);
}

#[test]
fn enumeration_walks_profile_patterns() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();
    let profiles = home.join(".mozilla/firefox");
    fs::create_dir_all(profiles.join("one.default")).unwrap();
    fs::create_dir_all(profiles.join("two.default")).unwrap();
    create_firefox_db(&profiles.join("one.default/cookies.sqlite"), None);
    create_firefox_db(
        &profiles.join("two.default/cookies.sqlite"),
        Some("ranked-token"),
    );

    let candidates = enumerate_candidates_in(home, Browser::Firefox, OsKind::Linux);
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|c| c.browser == Browser::Firefox));

    // Ranking puts the profile that has TikTok cookies first.
    let ranked = rank(candidates);
    assert!(ranked[0].path.ends_with("two.default/cookies.sqlite"));
    assert_eq!(
        extract(&ranked[0].path, ranked[0].browser),
        Some("ranked-token".to_string())
    );
}

#[test]
fn enumeration_of_empty_home_is_empty() {
    let dir = tempdir().expect("tempdir");
    for browser in [Browser::Firefox, Browser::Chrome, Browser::Edge] {
        for os in [OsKind::Windows, OsKind::MacOs, OsKind::Linux] {
            let candidates: Vec<Candidate> = enumerate_candidates_in(dir.path(), browser, os);
            assert!(candidates.is_empty());
        }
    }
}

use std::fs;
use tempfile::tempdir;

use tokscrape::config::{Mode, OutputFormat, ScrapeJob};
use tokscrape::mock::MockSession;
use tokscrape::output::{write_output, OutputOptions};
use tokscrape::scrape::{self, ScrapeOutput};

fn job(mode: Mode, target: Option<&str>) -> ScrapeJob {
    ScrapeJob {
        mode,
        target: target.map(|t| t.to_string()),
        format: OutputFormat::Json,
        output: None,
        limit: None,
        include_comments: false,
        comment_limit: 30,
    }
}

#[tokio::test]
async fn user_json_output_has_five_videos() {
    let dir = tempdir().expect("tempdir");
    let out_path = dir.path().join("user.json");

    let mut job = job(Mode::User, Some("alice"));
    job.limit = Some(5);
    let output = scrape::run(&MockSession::new(), &job).await.expect("run");
    write_output(
        &output,
        &OutputOptions {
            format: OutputFormat::Json,
            path: Some(out_path.clone()),
            mock_banner: false,
        },
    )
    .expect("write");

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).expect("read")).expect("parse json");
    assert_eq!(doc["total_videos"], 5);
    let videos = doc["videos"].as_array().expect("videos array");
    assert_eq!(videos.len(), 5);
    for video in videos {
        assert!(video["id"].is_string());
        assert!(video["desc"].is_string());
        assert!(video["stats"]["diggCount"].is_u64());
    }
    assert!(doc["extracted_at"].is_string());
}

#[tokio::test]
async fn video_comments_respect_comment_limit() {
    let dir = tempdir().expect("tempdir");
    let out_path = dir.path().join("video.json");

    let mut job = job(Mode::Video, Some("7123456789012345678"));
    job.include_comments = true;
    job.comment_limit = 3;
    let output = scrape::run(&MockSession::new(), &job).await.expect("run");
    write_output(
        &output,
        &OutputOptions {
            format: OutputFormat::Json,
            path: Some(out_path.clone()),
            mock_banner: false,
        },
    )
    .expect("write");

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).expect("read")).expect("parse json");
    assert_eq!(doc["total_comments"], 3);
    assert_eq!(doc["comments"].as_array().unwrap().len(), 3);
    assert_eq!(doc["video"]["id"], "7123456789012345678");
}

#[tokio::test]
async fn trending_csv_has_header_and_one_row_per_item() {
    let dir = tempdir().expect("tempdir");
    let out_path = dir.path().join("trending.csv");

    let mut job = job(Mode::Trending, None);
    job.limit = Some(7);
    let output = scrape::run(&MockSession::new(), &job).await.expect("run");
    write_output(
        &output,
        &OutputOptions {
            format: OutputFormat::Csv,
            path: Some(out_path.clone()),
            mock_banner: false,
        },
    )
    .expect("write");

    let content = fs::read_to_string(&out_path).expect("read");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("Video ID,Author,Description,Likes,Shares,Comments,Views,Created")
    );
    assert_eq!(lines.count(), 7);

    let mut reader = csv::Reader::from_path(&out_path).expect("csv reader");
    for record in reader.records() {
        let record = record.expect("record");
        assert!(record[2].chars().count() <= 100);
    }
}

#[tokio::test]
async fn hashtag_run_tags_descriptions() {
    let mut job = job(Mode::Hashtag, Some("#dance"));
    job.limit = Some(4);
    let output = scrape::run(&MockSession::new(), &job).await.expect("run");
    match output {
        ScrapeOutput::Hashtag { name, videos } => {
            assert_eq!(name, "dance");
            assert_eq!(videos.len(), 4);
            assert!(videos.iter().all(|v| v.desc.starts_with("#dance ")));
        }
        other => panic!("unexpected output: {:?}", other),
    }
}

#[tokio::test]
async fn limit_of_zero_collects_no_videos() {
    let mut job = job(Mode::User, Some("alice"));
    job.limit = Some(0);
    let output = scrape::run(&MockSession::new(), &job).await.expect("run");
    match output {
        ScrapeOutput::User { videos, .. } => assert!(videos.is_empty()),
        other => panic!("unexpected output: {:?}", other),
    }
}

#[tokio::test]
async fn follower_listing_is_bounded() {
    let output = scrape::run_followers(&MockSession::new(), "alice", 12)
        .await
        .expect("run");
    match output {
        ScrapeOutput::Followers { user, followers } => {
            assert_eq!(user.unique_id, "alice");
            assert_eq!(followers.len(), 12);
        }
        other => panic!("unexpected output: {:?}", other),
    }
}

#[tokio::test]
async fn missing_target_fails_before_any_fetch() {
    let err = scrape::run(&MockSession::new(), &job(Mode::User, None))
        .await
        .expect_err("missing target");
    assert!(matches!(err, tokscrape::TokscrapeError::Config(_)));
}

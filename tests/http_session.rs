use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tokscrape::config::{Mode, OutputFormat, ScrapeJob};
use tokscrape::scrape::{self, ScrapeOutput};
use tokscrape::session::HttpSession;

fn job(mode: Mode, target: Option<&str>, limit: Option<usize>) -> ScrapeJob {
    ScrapeJob {
        mode,
        target: target.map(|t| t.to_string()),
        format: OutputFormat::Json,
        output: None,
        limit,
        include_comments: false,
        comment_limit: 30,
    }
}

fn item(id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id.to_string(),
        "desc": format!("video {}", id),
        "createTime": 1700000000,
        "author": {"uniqueId": "alice", "nickname": "Alice"},
        "stats": {"diggCount": 1, "shareCount": 2, "commentCount": 3, "playCount": 4},
    })
}

#[tokio::test]
async fn trending_fetch_follows_cursor_to_stream_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/item_list/"))
        .and(query_param("cursor", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "itemList": [item(1), item(2)],
            "hasMore": true,
            "cursor": 2,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/item_list/"))
        .and(query_param("cursor", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "itemList": [item(3)],
            "hasMore": false,
            "cursor": 3,
        })))
        .mount(&server)
        .await;

    let session = HttpSession::open_with_base_url("token-value", &server.uri()).expect("session");
    let output = scrape::run(&session, &job(Mode::Trending, None, None))
        .await
        .expect("scrape");
    match output {
        ScrapeOutput::Trending { videos } => {
            assert_eq!(videos.len(), 3);
            assert_eq!(videos[0].id, "1");
            assert_eq!(videos[2].stats.play_count, 4);
        }
        other => panic!("unexpected output: {:?}", other),
    }
}

#[tokio::test]
async fn user_fetch_stops_at_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/detail/"))
        .and(query_param("uniqueId", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "userInfo": {
                "user": {
                    "uniqueId": "alice",
                    "nickname": "Alice",
                    "followerCount": 10,
                    "followingCount": 2,
                    "videoCount": 4,
                }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/post/item_list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "itemList": [item(1), item(2), item(3), item(4)],
            "hasMore": true,
            "cursor": 4,
        })))
        .mount(&server)
        .await;

    let session = HttpSession::open_with_base_url("token-value", &server.uri()).expect("session");
    let output = scrape::run(&session, &job(Mode::User, Some("alice"), Some(2)))
        .await
        .expect("scrape");
    match output {
        ScrapeOutput::User { user, videos } => {
            assert_eq!(user.unique_id, "alice");
            assert_eq!(videos.len(), 2);
        }
        other => panic!("unexpected output: {:?}", other),
    }
}

#[tokio::test]
async fn fetch_error_is_fatal_to_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/item_list/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let session = HttpSession::open_with_base_url("token-value", &server.uri()).expect("session");
    let err = scrape::run(&session, &job(Mode::Trending, None, None))
        .await
        .expect_err("fetch should fail");
    assert!(matches!(err, tokscrape::TokscrapeError::Http(_)));
}

#[tokio::test]
async fn token_travels_as_query_param_and_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/item_list/"))
        .and(query_param("msToken", "token-value"))
        .and(wiremock::matchers::header("cookie", "msToken=token-value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "itemList": [],
            "hasMore": false,
            "cursor": 0,
        })))
        .mount(&server)
        .await;

    let session = HttpSession::open_with_base_url("token-value", &server.uri()).expect("session");
    let output = scrape::run(&session, &job(Mode::Trending, None, None))
        .await
        .expect("scrape");
    match output {
        ScrapeOutput::Trending { videos } => assert!(videos.is_empty()),
        other => panic!("unexpected output: {:?}", other),
    }
}

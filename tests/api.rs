use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use rankboard::{api::create_app, AppState, Config, Entity, RankingIndex, ScoreDomain};
use serde_json::Value;
use std::sync::Arc;
use tokio_test::assert_ok;
use tower::ServiceExt;

fn app_with(
    entities: &[(i64, &str, i32)],
    configure: impl FnOnce(&mut Config),
) -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    configure(&mut config);
    let index = Arc::new(RankingIndex::new(ScoreDomain::default()));
    for &(id, name, score) in entities {
        index.add(Entity::new(id, name, score));
    }
    let state = Arc::new(AppState::new(index, config));
    (create_app(Arc::clone(&state)), state)
}

fn app(entities: &[(i64, &str, i32)]) -> Router {
    app_with(entities, |_| {}).0
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = assert_ok!(to_bytes(response.into_body(), usize::MAX).await);
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

const PLAYERS: &[(i64, &str, i32)] = &[
    (1, "alice_1", 1200),
    (2, "alice_2", 1800),
    (3, "bob_3", 1800),
    (4, "Priya_4", 300),
];

#[tokio::test]
async fn leaderboard_returns_ranked_entries() {
    let (status, body) = get(app(PLAYERS), "/leaderboard?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!([
            {"rank": 1, "username": "alice_2", "rating": 1800},
            {"rank": 1, "username": "bob_3", "rating": 1800},
            {"rank": 3, "username": "alice_1", "rating": 1200},
        ])
    );
}

#[tokio::test]
async fn leaderboard_defaults_to_fifty() {
    let players: Vec<(i64, String, i32)> = (1..=80)
        .map(|id| (id, format!("aman_{}", id), 1000 + id as i32))
        .collect();
    let borrowed: Vec<(i64, &str, i32)> = players
        .iter()
        .map(|(id, n, s)| (*id, n.as_str(), *s))
        .collect();

    let (_, body) = get(app(&borrowed), "/leaderboard").await;
    assert_eq!(body.as_array().unwrap().len(), 50);

    let (_, body) = get(app(&borrowed), "/leaderboard?limit=abc").await;
    assert_eq!(body.as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn non_positive_limit_is_empty() {
    let (_, body) = get(app(PLAYERS), "/leaderboard?limit=0").await;
    assert_eq!(body, serde_json::json!([]));

    let (_, body) = get(app(PLAYERS), "/leaderboard?limit=-5").await;
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn search_matches_case_insensitive_prefix() {
    let (status, body) = get(app(PLAYERS), "/search?query=ALI").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["username"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["alice_1", "alice_2"]);

    let (_, body) = get(app(PLAYERS), "/search?query=priya").await;
    assert_eq!(body[0]["rank"], 4);
}

#[tokio::test]
async fn search_without_match_or_query_is_empty() {
    let (_, body) = get(app(PLAYERS), "/search?query=xyz").await;
    assert_eq!(body, serde_json::json!([]));

    let (_, body) = get(app(PLAYERS), "/search").await;
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn entry_lookup_and_not_found() {
    let (status, body) = get(app(PLAYERS), "/leaderboard/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rank"], 3);

    let (status, body) = get(app(PLAYERS), "/leaderboard/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn responses_carry_permissive_cors_header() {
    let response = app(PLAYERS)
        .oneshot(
            Request::builder()
                .uri("/leaderboard")
                .header(header::ORIGIN, "http://dashboard.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn health_and_info_report_index_size() {
    let (status, body) = get(app(PLAYERS), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["entities"], 4);

    let (_, body) = get(app(PLAYERS), "/info").await;
    assert_eq!(body["name"], "rankboard");
    assert_eq!(body["stats"]["entities"], 4);
    assert_eq!(body["domain"]["min"], 100);
    assert_eq!(body["domain"]["max"], 5000);
}

#[tokio::test]
async fn metrics_route_follows_config() {
    let (enabled, _) = app_with(PLAYERS, |c| c.metrics.enable_prometheus = true);
    get(enabled.clone(), "/leaderboard").await;
    let (status, body) = get(enabled, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("rankboard_top_queries_total"));

    let (disabled, _) = app_with(PLAYERS, |c| c.metrics.enable_prometheus = false);
    let (status, _) = get(disabled, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updates_are_visible_to_later_requests() {
    let (router, state) = app_with(PLAYERS, |_| {});
    state.index.update_score(4, 10_000);

    let (_, body) = get(router, "/leaderboard?limit=1").await;
    assert_eq!(body[0]["username"], "Priya_4");
    assert_eq!(body[0]["rating"], 5000);
}

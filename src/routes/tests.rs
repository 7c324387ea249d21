use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{
    dao::{kv_store::MemoryStore, query_engine::QueryEngine},
    state::AppState,
};

fn app() -> Router {
    let engine = Arc::new(QueryEngine::new(Arc::new(MemoryStore::new())));
    super::router(AppState::new(engine))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn healthcheck_reports_ok() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn team_roster_flow() {
    let app = app();

    let (status, team) =
        send(&app, Method::POST, "/teams", Some(json!({ "name": " Hawks " }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(team["name"], "Hawks");
    let team_id = team["id"].as_u64().unwrap();

    let (status, player) = send(
        &app,
        Method::POST,
        &format!("/teams/{team_id}/players"),
        Some(json!({ "name": "Ana", "number": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(player["team_id"], team_id);

    let (_, list) = send(&app, Method::GET, "/teams", None).await;
    assert_eq!(list, json!([{ "id": team_id, "name": "Hawks", "player_count": 1 }]));

    let player_id = player["id"].as_u64().unwrap();
    let (status, _) = send(&app, Method::DELETE, &format!("/players/{player_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, roster) = send(&app, Method::GET, &format!("/teams/{team_id}/players"), None).await;
    assert_eq!(roster, json!([]));

    let (_, report) = send(&app, Method::GET, "/integrity", None).await;
    assert_eq!(report["clean"], true);
}

#[tokio::test]
async fn blank_team_name_is_rejected() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/teams", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_records_are_404() {
    let app = app();
    for uri in ["/teams/4", "/players/4", "/games/4", "/teams/4/players"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn scoring_a_game() {
    let app = app();
    let (_, home) = send(&app, Method::POST, "/teams", Some(json!({ "name": "Home" }))).await;
    let (_, away) = send(&app, Method::POST, "/teams", Some(json!({ "name": "Away" }))).await;
    let home_id = home["id"].as_u64().unwrap();
    let away_id = away["id"].as_u64().unwrap();

    let (_, shooter) = send(
        &app,
        Method::POST,
        &format!("/teams/{home_id}/players"),
        Some(json!({ "name": "Ana" })),
    )
    .await;
    let shooter_id = shooter["id"].as_u64().unwrap();

    let (status, game) = send(
        &app,
        Method::POST,
        "/games",
        Some(json!({ "home_team_id": home_id, "away_team_id": away_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let game_id = game["id"].as_u64().unwrap();

    let (status, game) = send(
        &app,
        Method::POST,
        &format!("/games/{game_id}/home/actions"),
        Some(json!({ "kind": "three_point_made", "player_id": shooter_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["home_score"], 3);

    // The shooter does not play for the away side.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/games/{game_id}/away/actions"),
        Some(json!({ "kind": "two_point_made", "player_id": shooter_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, active) = send(&app, Method::GET, "/games?active=true", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    let (status, finished) =
        send(&app, Method::POST, &format!("/games/{game_id}/finish"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finished["active"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/games/{game_id}/away/actions"),
        Some(json!({ "kind": "foul" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, active) = send(&app, Method::GET, "/games?active=true", None).await;
    assert_eq!(active, json!([]));
    let (_, done) = send(&app, Method::GET, "/games?active=false", None).await;
    assert_eq!(done[0]["id"], game_id);
}

#[tokio::test]
async fn games_require_existing_distinct_teams() {
    let app = app();
    let (_, team) = send(&app, Method::POST, "/teams", Some(json!({ "name": "Solo" }))).await;
    let team_id = team["id"].as_u64().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/games",
        Some(json!({ "home_team_id": team_id, "away_team_id": team_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/games", Some(json!({ "home_team_id": 77 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/games", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_renames_and_signings_keep_the_roster() {
    let app = app();
    let (_, team) = send(&app, Method::POST, "/teams", Some(json!({ "name": "Hawks" }))).await;
    let team_id = team["id"].as_u64().unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let renamer = app.clone();
        handles.push(tokio::spawn(async move {
            let body = json!({ "name": format!("Hawks {i}") });
            send(&renamer, Method::PUT, &format!("/teams/{team_id}"), Some(body)).await.0
        }));
        let signer = app.clone();
        handles.push(tokio::spawn(async move {
            let body = json!({ "name": format!("P{i}") });
            let uri = format!("/teams/{team_id}/players");
            send(&signer, Method::POST, &uri, Some(body)).await.0
        }));
    }
    for handle in handles {
        let status = handle.await.unwrap();
        assert!(status == StatusCode::OK || status == StatusCode::CREATED, "{status}");
    }

    let (_, roster) = send(&app, Method::GET, &format!("/teams/{team_id}/players"), None).await;
    assert_eq!(roster.as_array().unwrap().len(), 20);
    let (_, report) = send(&app, Method::GET, "/integrity", None).await;
    assert_eq!(report["clean"], true);
}

#[tokio::test]
async fn deleting_a_team_unassigns_its_games() {
    let app = app();
    let (_, home) = send(&app, Method::POST, "/teams", Some(json!({ "name": "Home" }))).await;
    let (_, away) = send(&app, Method::POST, "/teams", Some(json!({ "name": "Away" }))).await;
    let home_id = home["id"].as_u64().unwrap();
    let away_id = away["id"].as_u64().unwrap();

    let (_, game) = send(
        &app,
        Method::POST,
        "/games",
        Some(json!({ "home_team_id": home_id, "away_team_id": away_id })),
    )
    .await;
    let game_id = game["id"].as_u64().unwrap();

    let (status, _) = send(&app, Method::DELETE, &format!("/teams/{home_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, game) = send(&app, Method::GET, &format!("/games/{game_id}"), None).await;
    assert_eq!(game["home_team_id"], Value::Null);
    assert_eq!(game["away_team_id"], away_id);

    let (_, report) = send(&app, Method::GET, "/integrity", None).await;
    assert_eq!(report["clean"], true);
    assert_eq!(report["unknown_game_teams"], json!([]));
}

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use tennis_league::config::settings::AppConfig;
use tennis_league::domain::UserId;
use tennis_league::services::server::ServerService;
use tennis_league::services::LeagueService;

struct Api {
    _dir: TempDir,
    service: LeagueService,
    router: Router,
    staff: UserId,
}

fn api() -> Api {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("api.db");
    let service = LeagueService::open(path.to_str().unwrap(), AppConfig::default()).unwrap();
    let staff = service.create_user("admin", true, None, "").unwrap().id;
    let router = ServerService::new(0, service.clone()).router();
    Api {
        _dir: dir,
        service,
        router,
        staff,
    }
}

async fn send(api: &Api, method: &str, uri: &str, user: Option<UserId>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user {
        builder = builder.header("X-User-Id", user_id.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = api.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn new_tournament() -> Value {
    json!({
        "name": "City Cup",
        "category": "MIXED",
        "start_date": "2025-10-04",
        "end_date": "2025-10-05"
    })
}

#[tokio::test]
async fn test_tournament_creation_requires_staff() {
    let api = api();
    let player = api.service.create_user("anna", false, None, "").unwrap().id;

    let (status, _) = send(&api, "POST", "/api/tournaments", None, Some(new_tournament())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&api, "POST", "/api/tournaments", Some(player), Some(new_tournament())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&api, "POST", "/api/tournaments", Some(api.staff), Some(new_tournament())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["max_participants"], 8);
    assert_eq!(body["status"], "UPCOMING");

    let (status, listed) = send(&api, "GET", "/api/tournaments?category=MIXED&status=UPCOMING", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, listed) = send(&api, "GET", "/api/tournaments?category=MEN", None, None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_full_match_flow_over_http() {
    let api = api();
    let (_, tournament) = send(&api, "POST", "/api/tournaments", Some(api.staff), Some(new_tournament())).await;
    let tournament_id = tournament["id"].as_i64().unwrap();

    for i in 0..8 {
        let user_id = api
            .service
            .create_user(&format!("p{}", i), false, None, "")
            .unwrap()
            .id;
        let (status, _) = send(
            &api,
            "POST",
            &format!("/api/tournaments/{}/register", tournament_id),
            Some(user_id),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, matches) = send(
        &api,
        "POST",
        &format!("/api/tournaments/{}/draw", tournament_id),
        Some(api.staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(matches.as_array().unwrap().len(), 4);

    let (status, _) = send(
        &api,
        "POST",
        &format!("/api/tournaments/{}/draw", tournament_id),
        Some(api.staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let m = &matches[0];
    let match_id = m["id"].as_i64().unwrap();
    let player1 = m["player1_id"].as_i64().unwrap();
    let player2 = m["player2_id"].as_i64().unwrap();
    let result = json!({ "sets": [
        { "player1_games": 6, "player2_games": 2 },
        { "player1_games": 7, "player2_games": 5 }
    ]});

    let uri = format!("/api/matches/{}/result", match_id);
    let (status, body) = send(&api, "POST", &uri, Some(player1), Some(result.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "IN_PROGRESS");

    let (status, body) = send(&api, "POST", &uri, Some(player2), Some(result.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "FINISHED");
    assert_eq!(body["winner_id"], player1);

    let (status, _) = send(&api, "POST", &uri, Some(player2), Some(result)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, rating) = send(&api, "GET", &format!("/api/ratings/{}", player1), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rating["points"], 1025);
    assert_eq!(rating["win_percentage"], 100.0);

    let (_, history) = send(&api, "GET", &format!("/api/ratings/{}/history", player2), None, None).await;
    assert_eq!(history[0]["change"], -10);

    let (status, leaderboard) = send(&api, "GET", "/api/ratings?min_matches=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(leaderboard.as_array().unwrap().len(), 2);
    assert_eq!(leaderboard[0]["rank_position"], 1);
}

#[tokio::test]
async fn test_invalid_score_is_unprocessable() {
    let api = api();
    let (_, tournament) = send(&api, "POST", "/api/tournaments", Some(api.staff), Some(new_tournament())).await;
    let tournament_id = tournament["id"].as_i64().unwrap();
    for i in 0..8 {
        let user_id = api.service.create_user(&format!("q{}", i), false, None, "").unwrap().id;
        api.service.register(tournament_id, user_id).unwrap();
    }
    let matches = api.service.generate_draw(tournament_id, api.staff).unwrap();
    let m = &matches[0];

    let tied = json!({ "sets": [
        { "player1_games": 6, "player2_games": 6 },
        { "player1_games": 6, "player2_games": 3 }
    ]});
    let (status, body) = send(
        &api,
        "POST",
        &format!("/api/matches/{}/result", m.id),
        Some(m.player1_id),
        Some(tied),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Invalid score"));

    let (status, _) = send(&api, "GET", "/api/tournaments/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_referral_summary_counts_paid_bonuses() {
    let api = api();
    let (_, tournament) = send(&api, "POST", "/api/tournaments", Some(api.staff), Some(new_tournament())).await;
    let tournament_id = tournament["id"].as_i64().unwrap();
    let referrer = api.service.create_user("host", false, None, "").unwrap().id;
    let friend = api.service.create_user("guest", false, None, "").unwrap().id;

    let (status, referral) = send(
        &api,
        "POST",
        "/api/referrals",
        Some(referrer),
        Some(json!({ "referred_id": friend, "tournament_id": tournament_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(referral["status"], "PENDING");

    let paid_uri = format!("/api/referrals/{}/paid", referral["id"]);
    let (status, _) = send(&api, "POST", &paid_uri, Some(referrer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&api, "POST", &paid_uri, Some(api.staff), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, summary) = send(
        &api,
        "GET",
        &format!("/api/referrals/summary/{}", referrer),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_paid"], 500);
    assert_eq!(summary["referrals"].as_array().unwrap().len(), 1);
}

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

use super::{caller_id, error_response, require_staff_caller, AppState};
use crate::api::models::RegisterRequest;
use crate::database::{NewTournament, TournamentFilter};
use crate::domain::TournamentId;

pub async fn create_tournament(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(new): Json<NewTournament>,
) -> Response {
    if let Err(rejection) = require_staff_caller(&state.service, &headers) {
        return rejection;
    }

    match state.service.create_tournament(&new) {
        Ok(tournament) => (StatusCode::CREATED, Json(tournament)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_tournaments(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TournamentFilter>,
) -> Response {
    match state.service.list_tournaments(&filter) {
        Ok(tournaments) => Json(tournaments).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_tournament(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
) -> Response {
    let tournament = match state.service.get_tournament(tournament_id) {
        Ok(tournament) => tournament,
        Err(e) => return error_response(e),
    };

    let participants = match state.service.list_participants(tournament_id) {
        Ok(participants) => participants,
        Err(e) => return error_response(e),
    };

    Json(json!({
        "tournament": tournament,
        "participants": participants,
    }))
    .into_response()
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Response {
    let user_id = match caller_id(&headers) {
        Ok(user_id) => user_id,
        Err(rejection) => return rejection,
    };

    let result = match request.referrer_id {
        Some(referrer_id) => state
            .service
            .register_with_referral(tournament_id, user_id, referrer_id)
            .map(|(participant, referral)| {
                json!({ "participant": participant, "referral": referral })
            }),
        None => state
            .service
            .register(tournament_id, user_id)
            .map(|participant| json!({ "participant": participant })),
    };

    match result {
        Ok(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn generate_draw(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
    headers: HeaderMap,
) -> Response {
    let user_id = match caller_id(&headers) {
        Ok(user_id) => user_id,
        Err(rejection) => return rejection,
    };

    match state.service.generate_draw(tournament_id, user_id) {
        Ok(matches) => (StatusCode::CREATED, Json(matches)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
) -> Response {
    match state.service.list_matches(tournament_id) {
        Ok(matches) => Json(matches).into_response(),
        Err(e) => error_response(e),
    }
}

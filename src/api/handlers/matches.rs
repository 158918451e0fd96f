use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{caller_id, error_response, AppState};
use crate::api::models::ResultRequest;
use crate::domain::MatchId;

pub async fn submit_result(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<MatchId>,
    headers: HeaderMap,
    Json(request): Json<ResultRequest>,
) -> Response {
    let user_id = match caller_id(&headers) {
        Ok(user_id) => user_id,
        Err(rejection) => return rejection,
    };

    match state.service.submit_result(match_id, user_id, &request.sets) {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn cancel_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<MatchId>,
    headers: HeaderMap,
) -> Response {
    let user_id = match caller_id(&headers) {
        Ok(user_id) => user_id,
        Err(rejection) => return rejection,
    };

    match state.service.cancel_match(match_id, user_id) {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => error_response(e),
    }
}

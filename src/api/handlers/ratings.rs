use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{error_response, AppState};
use crate::api::models::RatingResponse;
use crate::database::RatingFilter;
use crate::domain::UserId;

const MAX_PAGE_SIZE: usize = 500;

pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Query(mut filter): Query<RatingFilter>,
) -> Response {
    filter.limit = filter.limit.map(|limit| limit.clamp(1, MAX_PAGE_SIZE));

    match state.service.list_ratings(&filter) {
        Ok(rows) => {
            let items: Vec<RatingResponse> = rows.into_iter().map(RatingResponse::from).collect();
            Json(items).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Response {
    match state.service.get_rating(user_id) {
        Ok(rating) => Json(RatingResponse::from(rating)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn rating_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Response {
    match state.service.rating_history(user_id) {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => error_response(e),
    }
}

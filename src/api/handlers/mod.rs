use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::error;

use crate::api::models::ErrorBody;
use crate::domain::UserId;
use crate::errors::{ErrorKind, LeagueError};
use crate::services::LeagueService;

pub mod matches;
pub mod ratings;
pub mod referrals;
pub mod tournaments;

/// Header carrying the authenticated caller, set by the upstream auth layer
pub const USER_ID_HEADER: &str = "x-user-id";

pub struct AppState {
    pub service: LeagueService,
}

pub(crate) fn caller_id(headers: &HeaderMap) -> Result<UserId, Response> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.trim().parse::<UserId>().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    error: "missing or invalid X-User-Id header".to_string(),
                }),
            )
                .into_response()
        })
}

/// Rejects callers without a staff account
pub(crate) fn require_staff_caller(
    service: &LeagueService,
    headers: &HeaderMap,
) -> Result<UserId, Response> {
    let user_id = caller_id(headers)?;
    match service.get_user(user_id) {
        Ok(user) if user.is_staff => Ok(user_id),
        Ok(_) => Err(error_response(LeagueError::Unauthorized(user_id))),
        Err(e) => Err(error_response(e)),
    }
}

pub(crate) fn status_for(e: &LeagueError) -> StatusCode {
    match e {
        LeagueError::InvalidScore(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => match e.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

pub(crate) fn error_response(e: LeagueError) -> Response {
    let status = status_for(&e);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {:?}", e);
    }
    (status, Json(ErrorBody { error: e.to_string() })).into_response()
}

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{caller_id, error_response, require_staff_caller, AppState};
use crate::api::models::{CreateReferralRequest, ReferralSummary};
use crate::domain::{ReferralId, UserId};

pub async fn create_referral(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateReferralRequest>,
) -> Response {
    let referrer_id = match caller_id(&headers) {
        Ok(user_id) => user_id,
        Err(rejection) => return rejection,
    };

    match state
        .service
        .create_referral(referrer_id, request.referred_id, request.tournament_id)
    {
        Ok(referral) => (StatusCode::CREATED, Json(referral)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn mark_paid(
    State(state): State<Arc<AppState>>,
    Path(referral_id): Path<ReferralId>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = require_staff_caller(&state.service, &headers) {
        return rejection;
    }

    match state.service.mark_referral_paid(referral_id) {
        Ok(referral) => Json(referral).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Path(referrer_id): Path<UserId>,
) -> Response {
    let total_paid = match state.service.total_paid_bonus(referrer_id) {
        Ok(total) => total,
        Err(e) => return error_response(e),
    };

    match state.service.list_referrals(referrer_id) {
        Ok(referrals) => Json(ReferralSummary {
            referrer_id,
            total_paid,
            referrals,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

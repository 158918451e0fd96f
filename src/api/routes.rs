use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{matches, ratings, referrals, tournaments, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route("/api/tournaments/:id", get(tournaments::get_tournament))
        .route("/api/tournaments/:id/register", post(tournaments::register))
        .route("/api/tournaments/:id/draw", post(tournaments::generate_draw))
        .route("/api/tournaments/:id/matches", get(tournaments::list_matches))
        .route("/api/matches/:id/result", post(matches::submit_result))
        .route("/api/matches/:id/cancel", post(matches::cancel_match))
        .route("/api/ratings", get(ratings::list_ratings))
        .route("/api/ratings/:user_id", get(ratings::get_rating))
        .route("/api/ratings/:user_id/history", get(ratings::rating_history))
        .route("/api/referrals", post(referrals::create_referral))
        .route("/api/referrals/:id/paid", post(referrals::mark_paid))
        .route("/api/referrals/summary/:referrer_id", get(referrals::summary))
        .with_state(state)
}

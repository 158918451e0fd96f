use serde::{Deserialize, Serialize};

use crate::database::{Rating, Referral};
use crate::domain::{SetScores, TournamentId, UserId};

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub referrer_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
pub struct ResultRequest {
    pub sets: SetScores,
}

#[derive(Debug, Deserialize)]
pub struct CreateReferralRequest {
    pub referred_id: UserId,
    pub tournament_id: TournamentId,
}

#[derive(Serialize)]
pub struct RatingResponse {
    #[serde(flatten)]
    pub rating: Rating,
    pub win_percentage: f64,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        let win_percentage = rating.win_percentage();
        Self {
            rating,
            win_percentage,
        }
    }
}

#[derive(Serialize)]
pub struct ReferralSummary {
    pub referrer_id: UserId,
    pub total_paid: i64,
    pub referrals: Vec<Referral>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

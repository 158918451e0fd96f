use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Category, Gender, MatchId, MatchStatus, Points, ReferralId, ReferralStatus, Region,
    ScoringSystem, SetScores, Side, TournamentId, TournamentStatus, UserId,
};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub is_staff: bool,
    pub gender: Option<Gender>,
    pub city: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub level: String,
    pub region: Region,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TournamentStatus,
    pub scoring_system: ScoringSystem,
    pub max_participants: i32,
    pub entry_fee: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_region")]
    pub region: Region,
    #[serde(default)]
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_scoring_system")]
    pub scoring_system: ScoringSystem,
    #[serde(default = "default_max_participants")]
    pub max_participants: i32,
    #[serde(default = "default_entry_fee")]
    pub entry_fee: i64,
}

impl NewTournament {
    /// A tournament with the usual defaults, mostly useful for tooling and tests
    pub fn new(name: &str, category: Category, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            category,
            level: default_level(),
            region: default_region(),
            location: String::new(),
            start_date,
            end_date,
            scoring_system: default_scoring_system(),
            max_participants: default_max_participants(),
            entry_fee: default_entry_fee(),
        }
    }
}

fn default_level() -> String {
    "2.5-3.5".to_string()
}

fn default_region() -> Region {
    Region::All
}

fn default_scoring_system() -> ScoringSystem {
    ScoringSystem::Olympic
}

fn default_max_participants() -> i32 {
    8
}

fn default_entry_fee() -> i64 {
    800
}

#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    pub id: i64,
    pub tournament_id: TournamentId,
    pub user_id: UserId,
    pub seed: Option<i32>,
    pub registered_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub round: String,
    pub player1_id: UserId,
    pub player2_id: UserId,
    pub score: Option<SetScores>,
    pub confirmed_by_player1: bool,
    pub confirmed_by_player2: bool,
    pub status: MatchStatus,
    pub winner_id: Option<UserId>,
    pub rating_applied: bool,
    pub actual_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Match {
    pub fn side_of(&self, user_id: UserId) -> Option<Side> {
        if user_id == self.player1_id {
            Some(Side::Player1)
        } else if user_id == self.player2_id {
            Some(Side::Player2)
        } else {
            None
        }
    }

    pub fn player(&self, side: Side) -> UserId {
        match side {
            Side::Player1 => self.player1_id,
            Side::Player2 => self.player2_id,
        }
    }

    pub fn is_confirmed_by(&self, side: Side) -> bool {
        match side {
            Side::Player1 => self.confirmed_by_player1,
            Side::Player2 => self.confirmed_by_player2,
        }
    }

    pub fn is_score_confirmed(&self) -> bool {
        self.confirmed_by_player1 && self.confirmed_by_player2
    }

    /// Agreed score as "6:3 4:6 6:2", or a placeholder before agreement
    pub fn score_line(&self) -> String {
        match &self.score {
            Some(score) => score.to_string(),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub id: i64,
    pub match_id: MatchId,
    pub reporter_id: UserId,
    pub sets: SetScores,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rating {
    pub id: i64,
    pub user_id: UserId,
    pub ntrp_level: String,
    pub points: Points,
    pub matches_played: i32,
    pub matches_won: i32,
    pub tournament_wins: i32,
    pub rank_position: Option<i64>,
    pub updated_at: NaiveDateTime,
}

impl Rating {
    /// Share of matches won, in percent rounded to one decimal
    pub fn win_percentage(&self) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        let pct = self.matches_won as f64 / self.matches_played as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingHistoryEntry {
    pub id: i64,
    pub user_id: UserId,
    pub points: Points,
    pub match_id: Option<MatchId>,
    pub tournament_id: Option<TournamentId>,
    pub change: Points,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Referral {
    pub id: ReferralId,
    pub referrer_id: UserId,
    pub referred_id: UserId,
    pub tournament_id: TournamentId,
    pub bonus_amount: i64,
    pub status: ReferralStatus,
    pub created_at: NaiveDateTime,
    pub paid_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentFilter {
    pub category: Option<Category>,
    pub status: Option<TournamentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingFilter {
    pub ntrp_level: Option<String>,
    pub gender: Option<Gender>,
    pub city_contains: Option<String>,
    pub min_matches: Option<i32>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

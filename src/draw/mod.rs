pub mod pairing;

use rand::Rng;

use crate::config::settings::DrawSettings;
use crate::errors::{LeagueError, LeagueResult};
pub use pairing::{round_label, Entrant, Pairing};

#[derive(Debug, Clone)]
pub struct DrawPlan {
    pub round: &'static str,
    pub pairings: Vec<Pairing>,
}

/// Validates the field and computes the first-round pairings without touching storage
pub fn plan_draw<R: Rng + ?Sized>(
    entrants: &[Entrant],
    settings: &DrawSettings,
    rng: &mut R,
) -> LeagueResult<DrawPlan> {
    let count = entrants.len();
    if count < settings.min_participants {
        return Err(LeagueError::InsufficientParticipants {
            count,
            required: settings.min_participants,
        });
    }
    if count % 2 != 0 {
        return Err(LeagueError::OddParticipantCount(count));
    }

    let pairings = if settings.honor_seeds {
        pairing::seeded_pairings(entrants, rng)
    } else {
        pairing::random_pairings(entrants, rng)
    };

    Ok(DrawPlan {
        round: round_label(count),
        pairings,
    })
}

use log::info;
use rand::Rng;

use super::{registry::require_tournament, require_staff, LeagueService};
use crate::database::{begin_write, matches, participants, Match};
use crate::domain::{TournamentId, UserId};
use crate::draw::{plan_draw, Entrant};
use crate::errors::{LeagueError, LeagueResult};

impl LeagueService {
    /// Creates the first-round matches of a tournament.
    ///
    /// The "no matches yet" check and the inserts share one write
    /// transaction, so concurrent requests cannot both create a bracket.
    pub fn generate_draw(
        &self,
        tournament_id: TournamentId,
        requested_by: UserId,
    ) -> LeagueResult<Vec<Match>> {
        self.generate_draw_with_rng(tournament_id, requested_by, &mut rand::thread_rng())
    }

    pub fn generate_draw_with_rng<R: Rng + ?Sized>(
        &self,
        tournament_id: TournamentId,
        requested_by: UserId,
        rng: &mut R,
    ) -> LeagueResult<Vec<Match>> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;

        require_staff(&tx, requested_by)?;
        require_tournament(&tx, tournament_id)?;

        if matches::count_for_tournament(&tx, tournament_id)? > 0 {
            return Err(LeagueError::DrawAlreadyGenerated(tournament_id));
        }

        let entrants: Vec<Entrant> = participants::list_by_tournament(&tx, tournament_id)?
            .into_iter()
            .map(|p| Entrant {
                user_id: p.user_id,
                seed: p.seed,
            })
            .collect();

        let plan = plan_draw(&entrants, &self.config.draw, rng)?;

        let created = plan
            .pairings
            .iter()
            .map(|p| matches::insert_match(&tx, tournament_id, plan.round, p.player1_id, p.player2_id))
            .collect::<anyhow::Result<Vec<_>>>()?;

        tx.commit()?;

        info!(
            "Draw generated for tournament {}: {} matches ({}) requested by {}",
            tournament_id,
            created.len(),
            plan.round,
            requested_by
        );
        Ok(created)
    }
}

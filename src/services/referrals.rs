use chrono::Utc;
use log::info;
use rusqlite::Connection;

use super::{registry::require_tournament, require_user, LeagueService};
use crate::database::{begin_write, referrals, Referral};
use crate::domain::{ReferralId, ReferralStatus, TournamentId, UserId};
use crate::errors::{is_unique_violation, LeagueError, LeagueResult};

impl LeagueService {
    pub fn create_referral(
        &self,
        referrer_id: UserId,
        referred_id: UserId,
        tournament_id: TournamentId,
    ) -> LeagueResult<Referral> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        let referral = create_referral_in(
            &tx,
            referrer_id,
            referred_id,
            tournament_id,
            self.config.referral.default_bonus,
        )?;
        tx.commit()?;
        Ok(referral)
    }

    /// Administrative payout confirmation. Only PENDING referrals can be paid.
    pub fn mark_referral_paid(&self, referral_id: ReferralId) -> LeagueResult<Referral> {
        self.settle_referral(referral_id, ReferralStatus::Paid)
    }

    pub fn cancel_referral(&self, referral_id: ReferralId) -> LeagueResult<Referral> {
        self.settle_referral(referral_id, ReferralStatus::Cancelled)
    }

    /// Sum of bonuses actually paid out; pending and cancelled rows do not count
    pub fn total_paid_bonus(&self, referrer_id: UserId) -> LeagueResult<i64> {
        let conn = self.connection()?;
        Ok(referrals::sum_bonus_by_status(
            &conn,
            referrer_id,
            ReferralStatus::Paid,
        )?)
    }

    pub fn list_referrals(&self, referrer_id: UserId) -> LeagueResult<Vec<Referral>> {
        let conn = self.connection()?;
        Ok(referrals::list_by_referrer(&conn, referrer_id)?)
    }

    fn settle_referral(
        &self,
        referral_id: ReferralId,
        status: ReferralStatus,
    ) -> LeagueResult<Referral> {
        let paid_at = (status == ReferralStatus::Paid).then(|| Utc::now().naive_utc());

        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        let updated = referrals::settle(&tx, referral_id, status, paid_at)?;

        let referral = match updated {
            Some(referral) => referral,
            None => {
                let existing = referrals::find_by_id(&tx, referral_id)?
                    .ok_or(LeagueError::ReferralNotFound(referral_id))?;
                return Err(LeagueError::InvalidTransition(format!(
                    "referral {} is {}, cannot become {}",
                    referral_id, existing.status, status
                )));
            }
        };
        tx.commit()?;

        info!("Referral {} marked {}", referral_id, status);
        Ok(referral)
    }
}

pub(crate) fn create_referral_in(
    conn: &Connection,
    referrer_id: UserId,
    referred_id: UserId,
    tournament_id: TournamentId,
    bonus_amount: i64,
) -> LeagueResult<Referral> {
    if referrer_id == referred_id {
        return Err(LeagueError::InvalidReferral(
            "a player cannot refer themselves".to_string(),
        ));
    }
    require_user(conn, referrer_id)?;
    require_user(conn, referred_id)?;
    require_tournament(conn, tournament_id)?;

    let referral =
        referrals::insert_referral(conn, referrer_id, referred_id, tournament_id, bonus_amount)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    LeagueError::DuplicateReferral
                } else {
                    e.into()
                }
            })?;

    info!(
        "Referral {}: user {} invited user {} to tournament {} (bonus {})",
        referral.id, referrer_id, referred_id, tournament_id, bonus_amount
    );
    Ok(referral)
}

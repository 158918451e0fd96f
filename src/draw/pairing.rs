use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::UserId;

pub const QUARTER_FINALS: &str = "1/4 finals";
pub const EIGHTH_FINALS: &str = "1/8 finals";

/// A registered player as seen by the draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entrant {
    pub user_id: UserId,
    pub seed: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub player1_id: UserId,
    pub player2_id: UserId,
}

/// First-round label. Exactly eight players open with quarter finals, any
/// other field size is labelled as the round of sixteen.
pub fn round_label(entrants: usize) -> &'static str {
    if entrants == 8 {
        QUARTER_FINALS
    } else {
        EIGHTH_FINALS
    }
}

/// Shuffles everyone and pairs neighbours: (0,1), (2,3), ...
///
/// The caller guarantees an even number of entrants.
pub fn random_pairings<R: Rng + ?Sized>(entrants: &[Entrant], rng: &mut R) -> Vec<Pairing> {
    let mut order: Vec<UserId> = entrants.iter().map(|e| e.user_id).collect();
    order.shuffle(rng);
    pair_consecutive(&order)
}

/// Seeded players are ordered by seed and meet top against bottom
/// (1 vs lowest seed, 2 vs second lowest, ...). Unseeded players fill the
/// remaining slots in random order below the seeds.
///
/// The caller guarantees an even number of entrants.
pub fn seeded_pairings<R: Rng + ?Sized>(entrants: &[Entrant], rng: &mut R) -> Vec<Pairing> {
    let mut seeded: Vec<&Entrant> = entrants.iter().filter(|e| e.seed.is_some()).collect();
    seeded.sort_by_key(|e| (e.seed, e.user_id));

    let mut unseeded: Vec<UserId> = entrants
        .iter()
        .filter(|e| e.seed.is_none())
        .map(|e| e.user_id)
        .collect();
    unseeded.shuffle(rng);

    let ladder: Vec<UserId> = seeded
        .iter()
        .map(|e| e.user_id)
        .chain(unseeded)
        .collect();

    let half = ladder.len() / 2;
    (0..half)
        .map(|i| Pairing {
            player1_id: ladder[i],
            player2_id: ladder[ladder.len() - 1 - i],
        })
        .collect()
}

fn pair_consecutive(order: &[UserId]) -> Vec<Pairing> {
    order
        .chunks_exact(2)
        .map(|pair| Pairing {
            player1_id: pair[0],
            player2_id: pair[1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn entrants(n: i64) -> Vec<Entrant> {
        (1..=n)
            .map(|user_id| Entrant {
                user_id,
                seed: None,
            })
            .collect()
    }

    fn assert_everyone_plays_once(pairings: &[Pairing], n: i64) {
        assert_eq!(pairings.len() as i64, n / 2);
        let mut seen = HashSet::new();
        for p in pairings {
            assert_ne!(p.player1_id, p.player2_id);
            assert!(seen.insert(p.player1_id));
            assert!(seen.insert(p.player2_id));
        }
        assert_eq!(seen, (1..=n).collect::<HashSet<_>>());
    }

    #[test]
    fn test_random_pairings_use_every_player_once() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [8, 10, 16, 32] {
            let pairings = random_pairings(&entrants(n), &mut rng);
            assert_everyone_plays_once(&pairings, n);
        }
    }

    #[test]
    fn test_random_pairings_are_reproducible_with_same_seed() {
        let a = random_pairings(&entrants(16), &mut StdRng::seed_from_u64(42));
        let b = random_pairings(&entrants(16), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_pairings_put_top_seed_against_bottom_seed() {
        let mut field = entrants(8);
        for (idx, entrant) in field.iter_mut().enumerate() {
            entrant.seed = Some(idx as i32 + 1);
        }

        let pairings = seeded_pairings(&field, &mut StdRng::seed_from_u64(1));

        assert_everyone_plays_once(&pairings, 8);
        assert_eq!(
            pairings[0],
            Pairing {
                player1_id: 1,
                player2_id: 8
            }
        );
        assert_eq!(
            pairings[3],
            Pairing {
                player1_id: 4,
                player2_id: 5
            }
        );
    }

    #[test]
    fn test_seeded_pairings_keep_seeds_apart() {
        let mut field = entrants(8);
        field[5].seed = Some(1);
        field[2].seed = Some(2);

        let pairings = seeded_pairings(&field, &mut StdRng::seed_from_u64(3));

        assert_everyone_plays_once(&pairings, 8);
        assert_eq!(pairings[0].player1_id, 6);
        assert_eq!(pairings[1].player1_id, 3);
    }

    #[test]
    fn test_round_label() {
        assert_eq!(round_label(8), QUARTER_FINALS);
        assert_eq!(round_label(10), EIGHTH_FINALS);
        assert_eq!(round_label(16), EIGHTH_FINALS);
    }
}

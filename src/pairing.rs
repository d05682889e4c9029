//! Round engine: random pairing of the population and duel resolution.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::participant::Participant;

/// How a shuffled index permutation is cut into duelling pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingScheme {
    /// Positions `(2k, 2k+1)`: every index duels exactly once per round.
    #[default]
    Disjoint,
    /// Positions `(i, i+1)` for `i < n/2`: windows overlap, so early
    /// positions may duel twice and the tail of the permutation sits out.
    OverlappingWindow,
}

impl PairingScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingScheme::Disjoint => "disjoint",
            PairingScheme::OverlappingWindow => "overlapping_window",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelOutcome {
    Skipped,
    FirstWins,
    SecondWins,
}

/// Shuffle `[0, nb_players)` and cut the permutation into `nb_players / 2` pairs.
pub fn pair_indices<R: Rng + ?Sized>(
    rng: &mut R,
    nb_players: usize,
    scheme: PairingScheme,
) -> Vec<(usize, usize)> {
    let mut ids: Vec<usize> = (0..nb_players).collect();
    ids.shuffle(rng);

    let nb_pairs = nb_players / 2;
    match scheme {
        PairingScheme::Disjoint => ids.chunks_exact(2).map(|c| (c[0], c[1])).collect(),
        PairingScheme::OverlappingWindow => {
            (0..nb_pairs).map(|i| (ids[i], ids[i + 1])).collect()
        }
    }
}

/// Resolve one duel between `players[first]` and `players[second]`.
///
/// A fair coin moves `stake` from the loser to the winner. When negative
/// scores are not allowed, a duel touching a non-positive score is skipped.
/// A transfer that would leave the `i64` range fails with
/// [`GameError::ScoreOverflow`] and leaves both scores untouched.
pub fn resolve_duel<R: Rng + ?Sized>(
    rng: &mut R,
    players: &mut [Participant],
    first: usize,
    second: usize,
    stake: i64,
    allow_negative_scores: bool,
) -> Result<DuelOutcome, GameError> {
    if !allow_negative_scores && (players[first].score <= 0 || players[second].score <= 0) {
        return Ok(DuelOutcome::Skipped);
    }

    let (winner, loser, outcome) = if rng.gen_bool(0.5) {
        (first, second, DuelOutcome::FirstWins)
    } else {
        (second, first, DuelOutcome::SecondWins)
    };
    let won = players[winner]
        .score
        .checked_add(stake)
        .ok_or(GameError::ScoreOverflow { player: winner })?;
    let lost = players[loser]
        .score
        .checked_sub(stake)
        .ok_or(GameError::ScoreOverflow { player: loser })?;
    players[winner].score = won;
    players[loser].score = lost;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_disjoint_pairs_cover_population_once() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let pairs = pair_indices(&mut rng, 10, PairingScheme::Disjoint);
            assert_eq!(pairs.len(), 5);
            let mut seen: Vec<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_overlapping_window_chains_pairs() {
        let mut rng = StdRng::seed_from_u64(11);
        let pairs = pair_indices(&mut rng, 8, PairingScheme::OverlappingWindow);
        assert_eq!(pairs.len(), 4);
        for w in pairs.windows(2) {
            assert_eq!(w[0].1, w[1].0, "consecutive windows share an index");
        }
        for &(a, b) in &pairs {
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_duel_is_zero_sum() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut players = vec![Participant::new(0, 100), Participant::new(1, 100)];
        for _ in 0..50 {
            let outcome = resolve_duel(&mut rng, &mut players, 0, 1, 10, false).unwrap();
            if outcome == DuelOutcome::Skipped {
                assert!(players.iter().any(|p| p.score <= 0));
            }
            assert_eq!(players[0].score + players[1].score, 200);
        }
    }

    #[test]
    fn test_duel_moves_exact_stake() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut players = vec![Participant::new(0, 100), Participant::new(1, 100)];
        match resolve_duel(&mut rng, &mut players, 0, 1, 10, false).unwrap() {
            DuelOutcome::FirstWins => assert_eq!((players[0].score, players[1].score), (110, 90)),
            DuelOutcome::SecondWins => assert_eq!((players[0].score, players[1].score), (90, 110)),
            DuelOutcome::Skipped => panic!("live players must duel"),
        }
    }

    #[test]
    fn test_duel_skipped_for_dead_player() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut players = vec![Participant::new(0, 0), Participant::new(1, 50)];
        for _ in 0..10 {
            let outcome = resolve_duel(&mut rng, &mut players, 0, 1, 10, false).unwrap();
            assert_eq!(outcome, DuelOutcome::Skipped);
        }
        assert_eq!(players[0].score, 0);
        assert_eq!(players[1].score, 50);
    }

    #[test]
    fn test_duel_allowed_below_zero() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut players = vec![Participant::new(0, -20), Participant::new(1, 0)];
        let outcome = resolve_duel(&mut rng, &mut players, 0, 1, 10, true).unwrap();
        assert_ne!(outcome, DuelOutcome::Skipped);
        assert_eq!(players[0].score + players[1].score, -20);
    }

    #[test]
    fn test_duel_overflow_leaves_scores_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut players = vec![Participant::new(0, i64::MAX), Participant::new(1, i64::MAX)];
        let err = resolve_duel(&mut rng, &mut players, 0, 1, 10, false).unwrap_err();
        assert!(matches!(err, GameError::ScoreOverflow { .. }));
        assert_eq!(players[0].score, i64::MAX);
        assert_eq!(players[1].score, i64::MAX);

        let mut players = vec![Participant::new(0, i64::MIN + 5), Participant::new(1, i64::MIN + 5)];
        let err = resolve_duel(&mut rng, &mut players, 0, 1, 10, true).unwrap_err();
        assert!(matches!(err, GameError::ScoreOverflow { .. }));
        assert_eq!(players[0].score, i64::MIN + 5);
        assert_eq!(players[1].score, i64::MIN + 5);
    }
}

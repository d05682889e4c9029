//! Game state: the population, the round counter and the round loop.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use crate::error::GameError;
use crate::logging::{self, obj, v_str, Domain, Level, ProfileScope};
use crate::pairing::{pair_indices, resolve_duel, DuelOutcome};
use crate::params::GameParams;
use crate::participant::Participant;
use crate::recorder::Recorder;
use crate::stats::gini_of_scores;

/// What happened during one call to [`Game::advance_round`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    /// Number of the round just completed (1 for the first).
    pub round: u64,
    pub duels: usize,
    pub skipped: usize,
    pub nb_alive_players: usize,
    pub gini: f64,
}

#[derive(Debug, Clone)]
pub struct Game {
    players: Vec<Participant>,
    round: u64,
    params: GameParams,
    recorder: Recorder,
    rng: StdRng,
}

impl Game {
    /// Build a population of `params.nb_players` players at `params.starting_score`.
    ///
    /// An odd or empty population, or a non-positive stake or starting score,
    /// is rejected here and no game is built.
    pub fn new(params: GameParams) -> Result<Self, GameError> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let players = (0..params.nb_players)
            .map(|id| Participant::new(id, params.starting_score))
            .collect();

        logging::log(
            Level::Info,
            Domain::Game,
            "game_created",
            obj(&[
                ("nb_players", json!(params.nb_players)),
                ("starting_score", json!(params.starting_score)),
                ("betting_amount", json!(params.betting_amount)),
                ("allow_negative_scores", json!(params.allow_negative_scores)),
                ("pairing", v_str(params.pairing.as_str())),
            ]),
        );

        Ok(Self {
            players,
            round: 0,
            params,
            recorder: Recorder::new(),
            rng,
        })
    }

    /// Play one full round: pair, resolve every duel, measure, record.
    ///
    /// Duels conserve the total score, so the mean stays at the positive
    /// starting score and the Gini coefficient is always defined for a game
    /// built by [`Game::new`]. With debt allowed a single score is unbounded
    /// over many rounds; a duel that would overflow it fails with
    /// [`GameError::ScoreOverflow`]. On error nothing is recorded and the
    /// round counter is left unchanged.
    pub fn advance_round(&mut self) -> Result<RoundSummary, GameError> {
        let _profile = ProfileScope::new("advance_round");
        let next_round = self.round + 1;
        let pairs = pair_indices(&mut self.rng, self.players.len(), self.params.pairing);

        let mut skipped = 0;
        for &(first, second) in &pairs {
            let outcome = resolve_duel(
                &mut self.rng,
                &mut self.players,
                first,
                second,
                self.params.betting_amount,
                self.params.allow_negative_scores,
            )?;
            if outcome == DuelOutcome::Skipped {
                skipped += 1;
            }
            if logging::enabled(Level::Trace, Domain::Duel) {
                logging::log_duel(
                    next_round,
                    first,
                    second,
                    outcome_label(outcome),
                    self.params.betting_amount,
                );
            }
        }

        let scores = self.scores();
        let gini = gini_of_scores(&scores).map_err(|source| {
            logging::log(
                Level::Error,
                Domain::Stats,
                "gini_undefined",
                obj(&[
                    ("round", json!(next_round)),
                    ("reason", v_str(&source.to_string())),
                ]),
            );
            GameError::Gini {
                round: next_round,
                source,
            }
        })?;
        let alive = self.nb_alive_players();
        self.recorder.record(scores, alive, gini);
        self.round = next_round;

        logging::log_round(self.round, pairs.len() - skipped, skipped, alive, gini);
        Ok(RoundSummary {
            round: self.round,
            duels: pairs.len() - skipped,
            skipped,
            nb_alive_players: alive,
            gini,
        })
    }

    pub fn scores(&self) -> Vec<i64> {
        self.players.iter().map(|p| p.score).collect()
    }

    /// Summed in `i128` so that no population of `i64` scores can overflow it.
    pub fn total_score(&self) -> i128 {
        self.players.iter().map(|p| i128::from(p.score)).sum()
    }

    pub fn nb_players(&self) -> usize {
        self.players.len()
    }

    pub fn nb_alive_players(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    pub fn percent_alive_players(&self) -> f64 {
        100.0 * self.nb_alive_players() as f64 / self.nb_players() as f64
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn betting_amount(&self) -> i64 {
        self.params.betting_amount
    }

    pub fn allow_negative_scores(&self) -> bool {
        self.params.allow_negative_scores
    }

    pub fn participants(&self) -> &[Participant] {
        &self.players
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn params(&self) -> &GameParams {
        &self.params
    }
}

fn outcome_label(outcome: DuelOutcome) -> &'static str {
    match outcome {
        DuelOutcome::Skipped => "skipped",
        DuelOutcome::FirstWins => "first_wins",
        DuelOutcome::SecondWins => "second_wins",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(nb_players: usize) -> GameParams {
        GameParams {
            nb_players,
            seed: Some(1),
            ..GameParams::default()
        }
    }

    #[test]
    fn test_new_game_is_uniform() {
        let game = Game::new(params(6)).unwrap();
        assert_eq!(game.round(), 0);
        assert_eq!(game.nb_players(), 6);
        assert_eq!(game.scores(), vec![100; 6]);
        assert_eq!(game.nb_alive_players(), 6);
        assert_eq!(game.percent_alive_players(), 100.0);
        assert!(game.recorder().is_empty());
        let ids: Vec<usize> = game.participants().iter().map(|p| p.id).collect();
        assert_eq!(ids, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_odd_population_rejected() {
        assert_eq!(Game::new(params(7)).unwrap_err(), GameError::OddPopulation(7));
    }

    #[test]
    fn test_round_summary_counts() {
        let mut game = Game::new(params(10)).unwrap();
        let summary = game.advance_round().unwrap();
        assert_eq!(summary.round, 1);
        assert_eq!(summary.duels + summary.skipped, 5);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.nb_alive_players, 10);
        assert_eq!(game.recorder().ginis(), &[summary.gini]);
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut a = Game::new(params(20)).unwrap();
        let mut b = Game::new(params(20)).unwrap();
        for _ in 0..30 {
            a.advance_round().unwrap();
            b.advance_round().unwrap();
        }
        assert_eq!(a.scores(), b.scores());
        assert_eq!(a.recorder().ginis(), b.recorder().ginis());
    }

    #[test]
    fn test_percent_alive() {
        let mut game = Game::new(GameParams {
            nb_players: 4,
            starting_score: 10,
            betting_amount: 10,
            seed: Some(2),
            ..GameParams::default()
        })
        .unwrap();
        // every live duel with stake == score kills its loser
        game.advance_round().unwrap();
        assert_eq!(game.nb_alive_players(), 2);
        assert_eq!(game.percent_alive_players(), 50.0);
    }

    #[test]
    fn test_score_range_rejected_before_play() {
        let err = Game::new(GameParams {
            nb_players: 2,
            starting_score: i64::MAX,
            ..params(2)
        })
        .unwrap_err();
        assert!(matches!(err, GameError::ScoreRange { .. }));
    }

    #[test]
    fn test_total_score_of_extreme_scores() {
        let mut game = Game::new(params(4)).unwrap();
        for p in game.players.iter_mut() {
            p.score = i64::MAX;
        }
        assert_eq!(game.total_score(), 4 * i128::from(i64::MAX));
    }

    #[test]
    fn test_overflowing_duel_fails_round() {
        let mut game = Game::new(params(2)).unwrap();
        // whichever side wins, its score leaves the range
        game.players[0].score = i64::MAX;
        game.players[1].score = i64::MAX;
        let err = game.advance_round().unwrap_err();
        assert!(matches!(err, GameError::ScoreOverflow { .. }));
        assert_eq!(game.round(), 0);
        assert!(game.recorder().is_empty());
        assert_eq!(game.scores(), vec![i64::MAX, i64::MAX]);
    }
}

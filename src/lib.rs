//! Repeated fair coin-toss duels over a fixed population.
//!
//! Every round the population is shuffled into pairs, each pair flips a fair
//! coin and the loser hands a fixed stake to the winner. Although every duel
//! is fair, wealth concentrates over time; the [`recorder::Recorder`] keeps
//! the per-round scores, survivor counts and Gini coefficients to show it.
//!
//! ```no_run
//! use cointoss::{Game, GameParams};
//!
//! let mut game = Game::new(GameParams { seed: Some(7), ..GameParams::default() })?;
//! for _ in 0..100 {
//!     game.advance_round()?;
//! }
//! println!("gini after 100 rounds: {:?}", game.recorder().ginis().last());
//! # Ok::<(), cointoss::GameError>(())
//! ```

pub mod error;
pub mod game;
pub mod logging;
pub mod pairing;
pub mod params;
pub mod participant;
pub mod recorder;
pub mod stats;
pub mod verify;

pub use error::{GameError, StatsError};
pub use game::{Game, RoundSummary};
pub use pairing::{DuelOutcome, PairingScheme};
pub use params::GameParams;
pub use participant::Participant;
pub use recorder::{Recorder, Series};

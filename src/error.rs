use thiserror::Error;

/// Failures of the statistics helpers on degenerate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("cannot compute statistics of an empty sequence")]
    Empty,
    #[error("mean is zero, gini coefficient is undefined")]
    ZeroMean,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("population size must be even, got {0}")]
    OddPopulation(usize),
    #[error("population must contain at least two players")]
    EmptyPopulation,
    #[error("betting amount must be positive, got {0}")]
    NonPositiveStake(i64),
    #[error("starting score must be positive, got {0}")]
    NonPositiveStartingScore(i64),
    #[error(
        "{nb_players} players at score {starting_score} with stake {betting_amount} exceed the score range"
    )]
    ScoreRange {
        nb_players: usize,
        starting_score: i64,
        betting_amount: i64,
    },
    #[error("score of player {player} would overflow")]
    ScoreOverflow { player: usize },
    #[error("invalid value {value:?} for parameter {name}")]
    InvalidParam { name: String, value: String },
    #[error("round {round}: {source}")]
    Gini {
        round: u64,
        #[source]
        source: StatsError,
    },
}

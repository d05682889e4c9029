//! Game parameters and their static schema.
//!
//! Every tunable lives in [`PARAMS`]: one row per parameter giving its name,
//! command-line flag, environment variable, kind and default. The clap
//! command is generated from that table and values coming from either
//! source are applied through [`GameParams::set`], so adding a row is all
//! it takes to expose a new parameter.
//!
//! Precedence is command line, then environment, then table default. Flags
//! have a `--no-` negation so the command line can also switch off a flag
//! the environment turned on.

use std::fmt;

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::pairing::PairingScheme;
use crate::participant::DEFAULT_STARTING_SCORE;

pub const DESCRIPTION: &str = "cointoss: a game about the organic emergence of inequalities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    /// Boolean switch; `off` is the long flag that clears it.
    Flag { off: &'static str },
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    /// Long flag without the leading dashes.
    pub flag: &'static str,
    pub env: &'static str,
    pub kind: ParamKind,
    pub default: Option<&'static str>,
    pub help: &'static str,
}

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "nb_players",
        flag: "nb-players",
        env: "COINTOSS_NB_PLAYERS",
        kind: ParamKind::Integer,
        default: Some("100"),
        help: "Population size (must be even)",
    },
    ParamSpec {
        name: "nb_rounds",
        flag: "nb-rounds",
        env: "COINTOSS_NB_ROUNDS",
        kind: ParamKind::Integer,
        default: Some("10"),
        help: "Number of rounds to play",
    },
    ParamSpec {
        name: "starting_score",
        flag: "starting-score",
        env: "COINTOSS_STARTING_SCORE",
        kind: ParamKind::Integer,
        default: Some("100"),
        help: "Score every player starts with",
    },
    ParamSpec {
        name: "betting_amount",
        flag: "betting-amount",
        env: "COINTOSS_BETTING_AMOUNT",
        kind: ParamKind::Integer,
        default: Some("10"),
        help: "Stake transferred by each duel",
    },
    ParamSpec {
        name: "allow_negative_scores",
        flag: "allow-negative-scores",
        env: "COINTOSS_ALLOW_NEGATIVE_SCORES",
        kind: ParamKind::Flag {
            off: "no-allow-negative-scores",
        },
        default: Some("false"),
        help: "Let players with a non-positive score keep duelling",
    },
    ParamSpec {
        name: "overlapping_pairs",
        flag: "overlapping-pairs",
        env: "COINTOSS_OVERLAPPING_PAIRS",
        kind: ParamKind::Flag {
            off: "no-overlapping-pairs",
        },
        default: Some("false"),
        help: "Pair shuffled positions (i, i+1) with overlapping windows",
    },
    ParamSpec {
        name: "seed",
        flag: "seed",
        env: "COINTOSS_SEED",
        kind: ParamKind::Integer,
        default: None,
        help: "Random seed (OS entropy when absent)",
    },
    ParamSpec {
        name: "display_step",
        flag: "display-step",
        env: "COINTOSS_DISPLAY_STEP",
        kind: ParamKind::Integer,
        default: Some("1000"),
        help: "Print the population every N rounds",
    },
];

/// `nb_players` -> `--nb-players`
pub fn param_to_flag(name: &str) -> String {
    format!("--{}", name.replace('_', "-"))
}

/// `--nb-players` -> `nb_players`
pub fn flag_to_param(flag: &str) -> String {
    flag.trim_start_matches('-').replace('-', "_")
}

/// Configuration of one game, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameParams {
    pub nb_players: usize,
    pub nb_rounds: u64,
    pub starting_score: i64,
    pub betting_amount: i64,
    pub allow_negative_scores: bool,
    pub pairing: PairingScheme,
    pub seed: Option<u64>,
    pub display_step: u64,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            nb_players: 100,
            nb_rounds: 10,
            starting_score: DEFAULT_STARTING_SCORE,
            betting_amount: 10,
            allow_negative_scores: false,
            pairing: PairingScheme::Disjoint,
            seed: None,
            display_step: 1000,
        }
    }
}

impl GameParams {
    pub fn from_env() -> Result<Self, GameError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each env var name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GameError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut params = Self::default();
        for spec in PARAMS {
            if let Some(value) = lookup(spec.env) {
                params.set(spec.name, value.trim())?;
            }
        }
        Ok(params)
    }

    /// Apply the values given explicitly on the command line.
    pub fn apply_matches(mut self, matches: &ArgMatches) -> Result<Self, GameError> {
        for spec in PARAMS {
            match spec.kind {
                ParamKind::Integer => {
                    if let Some(v) = matches.get_one::<u64>(spec.name) {
                        self.set(spec.name, &v.to_string())?;
                    }
                }
                ParamKind::Flag { off } => {
                    if matches.get_flag(spec.name) {
                        self.set(spec.name, "true")?;
                    } else if matches.get_flag(off) {
                        self.set(spec.name, "false")?;
                    }
                }
            }
        }
        Ok(self)
    }

    /// Environment first, then command line on top.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, GameError> {
        Self::from_env()?.apply_matches(matches)
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), GameError> {
        match name {
            "nb_players" => self.nb_players = parse_int(name, value)?,
            "nb_rounds" => self.nb_rounds = parse_int(name, value)?,
            "starting_score" => self.starting_score = parse_int(name, value)?,
            "betting_amount" => self.betting_amount = parse_int(name, value)?,
            "allow_negative_scores" => self.allow_negative_scores = parse_flag(name, value)?,
            "overlapping_pairs" => {
                self.pairing = if parse_flag(name, value)? {
                    PairingScheme::OverlappingWindow
                } else {
                    PairingScheme::Disjoint
                }
            }
            "seed" => self.seed = Some(parse_int(name, value)?),
            "display_step" => self.display_step = parse_int(name, value)?,
            _ => return Err(invalid(name, value)),
        }
        Ok(())
    }

    /// Current value of a named parameter, rendered as text.
    pub fn value_of(&self, name: &str) -> Option<String> {
        let value = match name {
            "nb_players" => self.nb_players.to_string(),
            "nb_rounds" => self.nb_rounds.to_string(),
            "starting_score" => self.starting_score.to_string(),
            "betting_amount" => self.betting_amount.to_string(),
            "allow_negative_scores" => self.allow_negative_scores.to_string(),
            "overlapping_pairs" => (self.pairing == PairingScheme::OverlappingWindow).to_string(),
            "seed" => self.seed.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()),
            "display_step" => self.display_step.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Reject configurations the game cannot be built from.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.nb_players == 0 {
            return Err(GameError::EmptyPopulation);
        }
        if self.nb_players % 2 != 0 {
            return Err(GameError::OddPopulation(self.nb_players));
        }
        if self.betting_amount <= 0 {
            return Err(GameError::NonPositiveStake(self.betting_amount));
        }
        if self.starting_score <= 0 {
            return Err(GameError::NonPositiveStartingScore(self.starting_score));
        }
        // Without debt no score can exceed the total plus one stake per player.
        let n = i64::try_from(self.nb_players).ok();
        let bound = n.and_then(|n| {
            let total = n.checked_mul(self.starting_score)?;
            total.checked_add(n.checked_mul(self.betting_amount)?)
        });
        if bound.is_none() {
            return Err(GameError::ScoreRange {
                nb_players: self.nb_players,
                starting_score: self.starting_score,
                betting_amount: self.betting_amount,
            });
        }
        Ok(())
    }
}

impl fmt::Display for GameParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = PARAMS
            .iter()
            .filter_map(|spec| self.value_of(spec.name).map(|v| format!("- {} : {}", spec.name, v)))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

/// Build the command-line parser from [`PARAMS`].
///
/// No clap defaults are set so that an absent flag leaves the environment
/// value in place.
pub fn command() -> Command {
    let mut cmd = Command::new("cointoss")
        .version(env!("CARGO_PKG_VERSION"))
        .about(DESCRIPTION);
    for spec in PARAMS {
        let help = match (spec.kind, spec.default) {
            (ParamKind::Integer, Some(d)) => format!("{} [default: {}] [env: {}]", spec.help, d, spec.env),
            _ => format!("{} [env: {}]", spec.help, spec.env),
        };
        let arg = Arg::new(spec.name).long(spec.flag).help(help);
        cmd = match spec.kind {
            ParamKind::Integer => {
                cmd.arg(arg.value_name("N").value_parser(clap::value_parser!(u64)))
            }
            ParamKind::Flag { off } => cmd
                .arg(arg.action(ArgAction::SetTrue).overrides_with(off))
                .arg(
                    Arg::new(off)
                        .long(off)
                        .action(ArgAction::SetTrue)
                        .overrides_with(spec.name)
                        .help(format!("Turn off --{}", spec.flag)),
                ),
        };
    }
    cmd
}

fn parse_int<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, GameError> {
    value.parse().map_err(|_| invalid(name, value))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, GameError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(name, value)),
    }
}

fn invalid(name: &str, value: &str) -> GameError {
    GameError::InvalidParam {
        name: name.to_string(),
        value: value.to_string(),
    }
}

//! Parameter sweep: final inequality across stakes and scoring rules.
//!
//! Usage: cargo run --release --bin sweep -- [rounds] [seeds]
//!
//! `seeds` must be at least 1.

use anyhow::{ensure, Context, Result};

use cointoss::{Game, GameParams, PairingScheme};

#[derive(Debug, Clone)]
struct Scenario {
    name: &'static str,
    betting_amount: i64,
    allow_negative_scores: bool,
    pairing: PairingScheme,
}

impl Scenario {
    fn baseline() -> Self {
        Self {
            name: "baseline",
            betting_amount: 10,
            allow_negative_scores: false,
            pairing: PairingScheme::Disjoint,
        }
    }

    fn variants() -> Vec<Self> {
        vec![
            Self::baseline(),

            // === STAKE SIZE ===
            Self { name: "stake_1", betting_amount: 1, ..Self::baseline() },
            Self { name: "stake_5", betting_amount: 5, ..Self::baseline() },
            Self { name: "stake_25", betting_amount: 25, ..Self::baseline() },
            Self { name: "stake_50", betting_amount: 50, ..Self::baseline() },

            // === NEGATIVE SCORES ===
            Self { name: "debt", allow_negative_scores: true, ..Self::baseline() },
            Self { name: "debt_stake_50", betting_amount: 50, allow_negative_scores: true, ..Self::baseline() },

            // === PAIRING ===
            Self { name: "overlapping", pairing: PairingScheme::OverlappingWindow, ..Self::baseline() },
        ]
    }

    fn params(&self, rounds: u64, seed: u64) -> GameParams {
        GameParams {
            nb_rounds: rounds,
            betting_amount: self.betting_amount,
            allow_negative_scores: self.allow_negative_scores,
            pairing: self.pairing,
            seed: Some(seed),
            ..GameParams::default()
        }
    }
}

#[derive(Debug, Clone)]
struct SweepResult {
    scenario: &'static str,
    mean_gini: f64,
    min_gini: f64,
    max_gini: f64,
    mean_alive_pct: f64,
}

fn run_scenario(scenario: &Scenario, rounds: u64, seeds: u64) -> Result<SweepResult> {
    ensure!(seeds > 0, "scenario {} needs at least one seed", scenario.name);
    let mut ginis = Vec::with_capacity(seeds as usize);
    let mut alive_pct = 0.0;
    for seed in 0..seeds {
        let mut game = Game::new(scenario.params(rounds, seed))
            .with_context(|| format!("scenario {}", scenario.name))?;
        let mut last_gini = 0.0;
        for _ in 0..rounds {
            last_gini = game.advance_round()?.gini;
        }
        ginis.push(last_gini);
        alive_pct += game.percent_alive_players();
    }
    let n = seeds as f64;
    Ok(SweepResult {
        scenario: scenario.name,
        mean_gini: ginis.iter().sum::<f64>() / n,
        min_gini: ginis.iter().copied().fold(f64::INFINITY, f64::min),
        max_gini: ginis.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean_alive_pct: alive_pct / n,
    })
}

/// `[rounds] [seeds]`, defaulting to 1000 rounds over 20 seeds.
fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<(u64, u64)> {
    let rounds: u64 = match args.next() {
        Some(a) => a.parse().context("rounds must be an integer")?,
        None => 1000,
    };
    let seeds: u64 = match args.next() {
        Some(a) => a.parse().context("seeds must be an integer")?,
        None => 20,
    };
    ensure!(seeds > 0, "seeds must be at least 1");
    Ok((rounds, seeds))
}

fn main() -> Result<()> {
    let (rounds, seeds) = parse_args(std::env::args().skip(1))?;

    let scenarios = Scenario::variants();
    println!("Running {} scenarios x {} seeds, {} rounds each...", scenarios.len(), seeds, rounds);
    println!();

    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        results.push(run_scenario(scenario, rounds, seeds)?);
    }
    results.sort_by(|a, b| b.mean_gini.total_cmp(&a.mean_gini));

    println!("{:<16} {:>10} {:>10} {:>10} {:>10}", "scenario", "gini", "min", "max", "alive%");
    println!("{}", "-".repeat(60));
    for r in &results {
        println!(
            "{:<16} {:>10.4} {:>10.4} {:>10.4} {:>9.1}%",
            r.scenario, r.mean_gini, r.min_gini, r.max_gini, r.mean_alive_pct
        );
    }

    if let (Some(most), Some(least)) = (results.first(), results.last()) {
        println!();
        println!("Most unequal:  {} (gini {:.4})", most.scenario, most.mean_gini);
        println!("Least unequal: {} (gini {:.4})", least.scenario, least.mean_gini);
    }
    Ok(())
}

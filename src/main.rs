//! cointoss driver: reads parameters, plays the rounds and prints the
//! population and the recorded series.
//!
//! Usage: cargo run --release -- --nb-players 200 --nb-rounds 5000 --seed 1
//!
//! Set COINTOSS_VERIFY=1 to check wealth conservation and series alignment
//! after every round.

use anyhow::{Context, Result};

use cointoss::logging;
use cointoss::params::{self, GameParams};
use cointoss::stats::gini_of_scores;
use cointoss::verify::invariants::check_round;
use cointoss::Game;

/// Recorder series rendered in the end-of-run summary.
const SUMMARY_SERIES: [&str; 2] = ["ginis", "nb_alive_players"];

const SPARK_WIDTH: usize = 60;
const SPARK_TICKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn main() -> Result<()> {
    let matches = params::command().get_matches();
    let params = GameParams::from_matches(&matches).context("invalid parameters")?;
    println!("{}", params);

    logging::start_run(serde_json::to_value(&params)?);
    let verify = std::env::var("COINTOSS_VERIFY").as_deref() == Ok("1");

    let mut game = Game::new(params.clone()).context("cannot build population")?;
    let expected_total = game.total_score();

    display(&game, params.display_step);
    for _ in 0..params.nb_rounds {
        let before = verify.then(|| game.scores());
        game.advance_round()?;
        if let Some(before) = before {
            if let Err(violation) = check_round(&game, expected_total, &before) {
                logging::log_violation(game.round(), &violation.msg);
                logging::flush();
                return Err(violation.into());
            }
        }
        display(&game, params.display_step);
    }

    logging::log_run_summary(
        game.round(),
        game.recorder().ginis().last().copied(),
        game.nb_alive_players(),
        game.nb_players(),
    );
    print_summary(&game);
    logging::flush();
    Ok(())
}

/// Print the population at round 0, round 1 and every `step`-th round.
fn display(game: &Game, step: u64) {
    let round = game.round();
    let on_step = step > 0 && round % step == 0;
    if !(on_step || round <= 1) {
        return;
    }
    let scores = game.scores();
    println!("round {} : {:?}", round, scores);
    match gini_of_scores(&scores) {
        Ok(g) => println!("gini: {}", g),
        Err(err) => println!("gini: undefined ({})", err),
    }
    println!("nb alive: {}", game.nb_alive_players());
}

fn print_summary(game: &Game) {
    println!();
    println!(
        "== {} rounds, {}/{} players alive ({:.1}%) ==",
        game.round(),
        game.nb_alive_players(),
        game.nb_players(),
        game.percent_alive_players()
    );
    for name in SUMMARY_SERIES {
        let values = match game.recorder().get(name).and_then(|s| s.as_f64()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                println!("could not find variable {} in recordings", name);
                continue;
            }
        };
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        println!(
            "{:<18} first={:.4} last={:.4} min={:.4} max={:.4}",
            name,
            values[0],
            values[values.len() - 1],
            min,
            max
        );
        println!("{:<18} {}", "", sparkline(&values, min, max));
    }
}

fn sparkline(values: &[f64], min: f64, max: f64) -> String {
    let width = values.len().min(SPARK_WIDTH);
    let span = max - min;
    (0..width)
        .map(|col| {
            let v = values[col * values.len() / width];
            let level = if span > 0.0 {
                (((v - min) / span) * (SPARK_TICKS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            SPARK_TICKS[level.min(SPARK_TICKS.len() - 1)]
        })
        .collect()
}

use thiserror::Error;

use crate::game::Game;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violated: {msg}")]
pub struct InvariantViolation {
    pub msg: String,
}

fn violation(msg: String) -> InvariantViolation {
    InvariantViolation { msg }
}

/// Duels are pure transfers: the population total never moves.
pub fn check_wealth(game: &Game, expected_total: i128) -> Result<(), InvariantViolation> {
    let total = game.total_score();
    if total != expected_total {
        return Err(violation(format!(
            "total score {} != expected {} at round {}",
            total,
            expected_total,
            game.round()
        )));
    }
    Ok(())
}

/// One entry per completed round in every series.
pub fn check_series(game: &Game) -> Result<(), InvariantViolation> {
    let rec = game.recorder();
    let round = game.round() as usize;
    let lens = [rec.scores().len(), rec.nb_alive_players().len(), rec.ginis().len()];
    if lens.iter().any(|&len| len != round) {
        return Err(violation(format!(
            "series lengths {:?} do not match round {}",
            lens, round
        )));
    }
    if rec.ginis().iter().any(|g| !g.is_finite()) {
        return Err(violation("non-finite gini recorded".to_string()));
    }
    Ok(())
}

pub fn check_population(game: &Game) -> Result<(), InvariantViolation> {
    if game.nb_players() % 2 != 0 {
        return Err(violation(format!("odd population {}", game.nb_players())));
    }
    if game.nb_alive_players() > game.nb_players() {
        return Err(violation("more alive players than players".to_string()));
    }
    Ok(())
}

/// Without negative scores, a player at or below zero never moves again.
pub fn check_dead_stay_dead(
    before: &[i64],
    after: &[i64],
    allow_negative_scores: bool,
) -> Result<(), InvariantViolation> {
    if allow_negative_scores {
        return Ok(());
    }
    if before.len() != after.len() {
        return Err(violation("population size changed".to_string()));
    }
    for (id, (&b, &a)) in before.iter().zip(after).enumerate() {
        if b <= 0 && a != b {
            return Err(violation(format!("player {} moved from {} to {}", id, b, a)));
        }
    }
    Ok(())
}

/// Every check that holds after any completed round.
pub fn check_round(
    game: &Game,
    expected_total: i128,
    before: &[i64],
) -> Result<(), InvariantViolation> {
    check_wealth(game, expected_total)?;
    check_series(game)?;
    check_population(game)?;
    check_dead_stay_dead(before, &game.scores(), game.allow_negative_scores())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GameParams;

    fn game() -> Game {
        Game::new(GameParams {
            nb_players: 8,
            seed: Some(17),
            ..GameParams::default()
        })
        .unwrap()
    }

    #[test]
    fn test_checks_pass_on_live_game() {
        let mut g = game();
        let total = g.total_score();
        for _ in 0..25 {
            let before = g.scores();
            g.advance_round().unwrap();
            check_round(&g, total, &before).unwrap();
        }
    }

    #[test]
    fn test_wealth_mismatch_detected() {
        let g = game();
        let err = check_wealth(&g, 1).unwrap_err();
        assert!(err.msg.contains("expected 1"));
        assert!(err.to_string().starts_with("invariant violated: "));
    }

    #[test]
    fn test_dead_player_moving_detected() {
        assert!(check_dead_stay_dead(&[0, 20], &[10, 10], false).is_err());
        assert!(check_dead_stay_dead(&[0, 20], &[10, 10], true).is_ok());
        assert!(check_dead_stay_dead(&[0, 20], &[0, 20], false).is_ok());
        assert!(check_dead_stay_dead(&[0, 20], &[0], false).is_err());
    }
}

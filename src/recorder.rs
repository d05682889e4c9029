//! Per-round time series of a game.

/// Names accepted by [`Recorder::get`].
pub const SERIES_NAMES: [&str; 3] = ["scores", "nb_alive_players", "ginis"];

/// A borrowed view of one recorded series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Series<'a> {
    Scores(&'a [Vec<i64>]),
    Counts(&'a [usize]),
    Values(&'a [f64]),
}

impl Series<'_> {
    pub fn len(&self) -> usize {
        match self {
            Series::Scores(s) => s.len(),
            Series::Counts(s) => s.len(),
            Series::Values(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar series as floats; `None` for score snapshots.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            Series::Scores(_) => None,
            Series::Counts(s) => Some(s.iter().map(|&c| c as f64).collect()),
            Series::Values(s) => Some(s.to_vec()),
        }
    }
}

/// Three parallel series, one entry appended per completed round.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    scores: Vec<Vec<i64>>,
    nb_alive_players: Vec<usize>,
    ginis: Vec<f64>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, scores: Vec<i64>, alive: usize, gini: f64) {
        self.scores.push(scores);
        self.nb_alive_players.push(alive);
        self.ginis.push(gini);
    }

    pub fn get(&self, name: &str) -> Option<Series<'_>> {
        match name {
            "scores" => Some(Series::Scores(&self.scores)),
            "nb_alive_players" => Some(Series::Counts(&self.nb_alive_players)),
            "ginis" => Some(Series::Values(&self.ginis)),
            _ => None,
        }
    }

    pub fn scores(&self) -> &[Vec<i64>] {
        &self.scores
    }

    pub fn nb_alive_players(&self) -> &[usize] {
        &self.nb_alive_players
    }

    pub fn ginis(&self) -> &[f64] {
        &self.ginis
    }

    pub fn len(&self) -> usize {
        self.ginis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ginis.is_empty()
    }
}

pub const DEFAULT_STARTING_SCORE: i64 = 100;

/// One player of the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub id: usize,
    pub score: i64,
}

impl Participant {
    pub fn new(id: usize, score: i64) -> Self {
        Self { id, score }
    }

    pub fn with_starting_score(id: usize) -> Self {
        Self::new(id, DEFAULT_STARTING_SCORE)
    }

    /// Derived from the current score on every call.
    pub fn is_alive(&self) -> bool {
        self.score > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alive_tracks_score() {
        let mut p = Participant::with_starting_score(3);
        assert_eq!(p.score, DEFAULT_STARTING_SCORE);
        assert!(p.is_alive());
        p.score = 0;
        assert!(!p.is_alive());
        p.score = -10;
        assert!(!p.is_alive());
        p.score = 1;
        assert!(p.is_alive());
    }
}

//! High score bookkeeping
//!
//! Lives for the process only: the best score plus a top-10 board of
//! finished runs.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep on the board
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Merges scored
    pub score: u64,
    /// Highest token level reached
    pub top_level: u8,
    /// Frames the run lasted
    pub frames: u64,
}

/// Best score and run board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    best: u64,
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score seen so far. Never decreases.
    pub fn best(&self) -> u64 {
        self.best
    }

    /// Raise the best score if `score` beats it. Returns true on a new best.
    pub fn observe(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Check if a score earns a place on the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Put a finished run on the board (if it qualifies) and raise the best.
    /// Returns the rank achieved.
    pub fn add_run(&mut self, score: u64, top_level: u8, frames: u64) -> Option<usize> {
        self.observe(score);
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                top_level,
                frames,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Board entries, best first
    pub fn runs(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score on the board (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_is_monotonic() {
        let mut scores = HighScores::new();
        assert!(scores.observe(3));
        assert!(!scores.observe(2));
        assert!(!scores.observe(3));
        assert_eq!(scores.best(), 3);
        assert!(scores.observe(5));
        assert_eq!(scores.best(), 5);
    }

    #[test]
    fn test_zero_runs_are_not_recorded() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_run(0, 1, 100), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_board_sorted_and_trimmed() {
        let mut scores = HighScores::new();
        for score in 1..=12u64 {
            scores.add_run(score, 0, score * 10);
        }
        assert_eq!(scores.runs().len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(12));
        assert_eq!(scores.runs().last().map(|e| e.score), Some(3));
        assert!(!scores.qualifies(2));
        assert_eq!(scores.potential_rank(7), Some(7));

        // Ties rank after existing entries
        assert_eq!(scores.add_run(12, 4, 1), Some(2));
        assert_eq!(scores.runs()[1].top_level, 4);
        assert_eq!(scores.best(), 12);
    }
}

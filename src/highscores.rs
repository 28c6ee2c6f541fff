//! High score leaderboard
//!
//! One entry per player name, sorted by score (highest first), top 10 kept.
//! Storage lives in `persistence`; this module only knows the ranking rules.

use serde::{Deserialize, Serialize};

/// Maximum number of records to keep
pub const MAX_RECORDS: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Player name
    pub name: String,
    /// Final score of the player's best run
    pub score: u64,
    /// Distance flown in that run
    pub distance: u64,
}

/// Leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Records {
    pub entries: Vec<Record>,
}

impl Records {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary entries, restoring the ordering and size rules
    pub fn from_entries(entries: Vec<Record>) -> Self {
        let mut records = Self { entries };
        records.normalize();
        records
    }

    /// Insert or improve a player's record
    ///
    /// An existing name only changes if the new score is strictly higher.
    /// Returns the player's rank (1-indexed) afterwards, or None if the
    /// entry fell off the bottom of the board.
    pub fn upsert(&mut self, name: &str, score: u64, distance: u64) -> Option<usize> {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => {
                if score > existing.score {
                    existing.score = score;
                    existing.distance = distance;
                }
            }
            None => self.entries.push(Record {
                name: name.to_string(),
                score,
                distance,
            }),
        }

        self.normalize();
        self.rank_of(name)
    }

    /// Rank (1-indexed) of a player name
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Get the rank a new score would achieve (1-indexed, None if it doesn't make the board)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        (rank < MAX_RECORDS).then_some(rank + 1)
    }

    /// First `n` records
    pub fn top(&self, n: usize) -> &[Record] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Get the top record (if any)
    pub fn best(&self) -> Option<&Record> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sort descending by score (stable, so earlier entries win ties) and trim
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_RECORDS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_sorts_descending() {
        let mut records = Records::new();
        records.upsert("ana", 120, 600);
        records.upsert("bo", 300, 1500);
        records.upsert("cy", 50, 250);

        let scores: Vec<u64> = records.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 120, 50]);
        assert_eq!(records.best().map(|r| r.name.as_str()), Some("bo"));
        assert_eq!(records.rank_of("cy"), Some(3));
    }

    #[test]
    fn test_lower_score_does_not_overwrite() {
        let mut records = Records::new();
        records.upsert("ana", 500, 2500);
        let rank = records.upsert("ana", 100, 500);

        assert_eq!(rank, Some(1));
        assert_eq!(records.len(), 1);
        assert_eq!(records.entries[0].score, 500);
        assert_eq!(records.entries[0].distance, 2500);
    }

    #[test]
    fn test_higher_score_overwrites() {
        let mut records = Records::new();
        records.upsert("ana", 100, 500);
        records.upsert("bo", 200, 1000);
        let rank = records.upsert("ana", 900, 4000);

        assert_eq!(rank, Some(1));
        assert_eq!(records.len(), 2);
        assert_eq!(records.entries[0].name, "ana");
        assert_eq!(records.entries[0].distance, 4000);
    }

    #[test]
    fn test_capped_at_ten() {
        let mut records = Records::new();
        for i in 0..15u64 {
            records.upsert(&format!("p{i}"), i * 10, i * 50);
        }
        assert_eq!(records.len(), MAX_RECORDS);
        assert_eq!(records.entries[0].score, 140);
        assert_eq!(records.entries[9].score, 50);

        // Too low to make the board
        assert_eq!(records.upsert("late", 1, 5), None);
        assert_eq!(records.len(), MAX_RECORDS);
    }

    #[test]
    fn test_potential_rank() {
        let mut records = Records::new();
        assert_eq!(records.potential_rank(10), Some(1));
        records.upsert("a", 100, 0);
        records.upsert("b", 50, 0);
        assert_eq!(records.potential_rank(75), Some(2));
        assert_eq!(records.potential_rank(10), Some(3));

        for i in 0..10u64 {
            records.upsert(&format!("x{i}"), 200 + i, 0);
        }
        assert_eq!(records.potential_rank(1), None);
    }

    #[test]
    fn test_top_n() {
        let mut records = Records::new();
        records.upsert("a", 3, 0);
        records.upsert("b", 2, 0);
        assert_eq!(records.top(1).len(), 1);
        assert_eq!(records.top(50).len(), 2);
    }

    #[test]
    fn test_json_is_plain_list() {
        let records = Records::from_entries(vec![Record {
            name: "ana".into(),
            score: 10,
            distance: 50,
        }]);
        let json = serde_json::to_string(&records).unwrap();
        assert_eq!(json, r#"[{"name":"ana","score":10,"distance":50}]"#);
    }
}

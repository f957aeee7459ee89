use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::StoreError,
    round::{Outcome, Resolution},
};

/// One finished round, as appended to the record store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    #[serde(default)]
    pub round_id: u64,
    pub user: String,
    pub player_score: u32,
    pub dealer_score: u32,
    pub outcome: Outcome,
}

impl GameResult {
    pub fn new(round_id: u64, user: impl Into<String>, resolution: Resolution) -> Self {
        GameResult {
            round_id,
            user: user.into(),
            player_score: resolution.player_score,
            dealer_score: resolution.dealer_score,
            outcome: resolution.outcome,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
}

impl Summary {
    fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.ties + self.losses
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
}

/// Insert-only store of finished rounds, one result per round id.
pub trait RecordStore {
    /// Stores `result`. Returns `false` and stores nothing when a result for
    /// the same round is already present.
    fn append(&mut self, result: GameResult) -> Result<bool, StoreError>;

    fn summary(&self, user: &str) -> Result<Summary, StoreError>;

    /// Best `n` players by wins, then ties.
    fn top_n(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;
}

pub fn contains_round<'a, I>(results: I, round_id: u64) -> bool
where
    I: IntoIterator<Item = &'a GameResult>,
{
    results.into_iter().any(|r| r.round_id == round_id)
}

pub fn summarize<'a, I>(results: I, user: &str) -> Summary
where
    I: IntoIterator<Item = &'a GameResult>,
{
    let mut summary = Summary::default();
    for result in results.into_iter().filter(|r| r.user == user) {
        summary.count(result.outcome);
    }
    summary
}

/// Ranks players by wins desc, ties desc, then username for a stable order.
pub fn leaderboard<'a, I>(results: I, n: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a GameResult>,
{
    let mut per_user: BTreeMap<&str, Summary> = BTreeMap::new();
    for result in results {
        per_user
            .entry(result.user.as_str())
            .or_default()
            .count(result.outcome);
    }

    let mut entries: Vec<LeaderboardEntry> = per_user
        .into_iter()
        .map(|(username, s)| LeaderboardEntry {
            username: username.to_string(),
            wins: s.wins,
            ties: s.ties,
            losses: s.losses,
        })
        .collect();
    entries.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.ties.cmp(&a.ties))
            .then_with(|| a.username.cmp(&b.username))
    });
    entries.truncate(n);
    entries
}

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    results: Vec<GameResult>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        MemoryRecordStore::default()
    }

    pub fn results(&self) -> &[GameResult] {
        &self.results
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(&mut self, result: GameResult) -> Result<bool, StoreError> {
        if contains_round(&self.results, result.round_id) {
            return Ok(false);
        }
        self.results.push(result);
        Ok(true)
    }

    fn summary(&self, user: &str) -> Result<Summary, StoreError> {
        Ok(summarize(&self.results, user))
    }

    fn top_n(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(leaderboard(&self.results, n))
    }
}

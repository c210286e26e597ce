#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player record bookkeeping.
//!
//! Records are kept per level: which algorithm the level was played against,
//! how many games were played, won, and won without a single mistake, and
//! the fastest perfect-win time. The [`Records`] system folds session events
//! into a [`PlayerRecords`] set so adapters never update statistics by hand.

use std::collections::BTreeMap;
use std::time::Duration;

use pathx_core::{AlgorithmKind, Event};

/// Statistics stored for a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelRecord {
    algorithm: AlgorithmKind,
    games_played: u32,
    wins: u32,
    perfect_wins: u32,
    fastest_perfect_win: Option<Duration>,
}

impl LevelRecord {
    /// Creates an empty record for a level played against `algorithm`.
    #[must_use]
    pub const fn new(algorithm: AlgorithmKind) -> Self {
        Self {
            algorithm,
            games_played: 0,
            wins: 0,
            perfect_wins: 0,
            fastest_perfect_win: None,
        }
    }

    /// Restores a record from previously persisted statistics.
    #[must_use]
    pub const fn from_stats(
        algorithm: AlgorithmKind,
        games_played: u32,
        wins: u32,
        perfect_wins: u32,
        fastest_perfect_win: Option<Duration>,
    ) -> Self {
        Self {
            algorithm,
            games_played,
            wins,
            perfect_wins,
            fastest_perfect_win,
        }
    }

    /// Algorithm the level is played against.
    #[must_use]
    pub const fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// Total games started on the level.
    #[must_use]
    pub const fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Games finished successfully.
    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    /// Games finished without a single rejected swap.
    #[must_use]
    pub const fn perfect_wins(&self) -> u32 {
        self.perfect_wins
    }

    /// Fastest perfect-win time, if any perfect win exists.
    #[must_use]
    pub const fn fastest_perfect_win(&self) -> Option<Duration> {
        self.fastest_perfect_win
    }
}

/// The complete playing history, stored per level name.
///
/// Queries for unknown levels answer with zeroes rather than failing, which
/// matches how the menu screens treat levels that were never played.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerRecords {
    levels: BTreeMap<String, LevelRecord>,
}

impl PlayerRecords {
    /// Creates an empty record set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the level has a record.
    #[must_use]
    pub fn has_level(&self, level_name: &str) -> bool {
        self.levels.contains_key(level_name)
    }

    /// Retrieves the record for a level, if one exists.
    #[must_use]
    pub fn level(&self, level_name: &str) -> Option<&LevelRecord> {
        self.levels.get(level_name)
    }

    /// Algorithm recorded for the level, if the level was ever played.
    #[must_use]
    pub fn algorithm(&self, level_name: &str) -> Option<AlgorithmKind> {
        self.levels.get(level_name).map(LevelRecord::algorithm)
    }

    /// Games played on the level; zero when the level is unknown.
    #[must_use]
    pub fn games_played(&self, level_name: &str) -> u32 {
        self.levels
            .get(level_name)
            .map_or(0, LevelRecord::games_played)
    }

    /// Wins on the level; zero when the level is unknown.
    #[must_use]
    pub fn wins(&self, level_name: &str) -> u32 {
        self.levels.get(level_name).map_or(0, LevelRecord::wins)
    }

    /// Perfect wins on the level; zero when the level is unknown.
    #[must_use]
    pub fn perfect_wins(&self, level_name: &str) -> u32 {
        self.levels
            .get(level_name)
            .map_or(0, LevelRecord::perfect_wins)
    }

    /// Fastest perfect-win time on the level, if any.
    #[must_use]
    pub fn fastest_perfect_win(&self, level_name: &str) -> Option<Duration> {
        self.levels
            .get(level_name)
            .and_then(LevelRecord::fastest_perfect_win)
    }

    /// Iterates over all level records in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LevelRecord)> {
        self.levels
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Number of levels with a record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether no level has a record yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Ensures a record exists for the level, creating an empty one if not.
    pub fn ensure_level(&mut self, level_name: &str, algorithm: AlgorithmKind) {
        let _ = self
            .levels
            .entry(level_name.to_owned())
            .or_insert_with(|| LevelRecord::new(algorithm));
    }

    /// Inserts a fully-populated record, replacing any existing one.
    ///
    /// Used when loading records from a file.
    pub fn insert(&mut self, level_name: String, record: LevelRecord) {
        let _ = self.levels.insert(level_name, record);
    }

    /// Counts a game without counting a win. Losses are not tracked
    /// separately.
    pub fn record_loss(&mut self, level_name: &str) {
        if let Some(record) = self.levels.get_mut(level_name) {
            record.games_played += 1;
        }
    }

    /// Counts a won game.
    pub fn record_win(&mut self, level_name: &str) {
        if let Some(record) = self.levels.get_mut(level_name) {
            record.games_played += 1;
            record.wins += 1;
        }
    }

    /// Counts a perfect win, keeping the fastest time seen so far.
    pub fn record_perfect_win(&mut self, level_name: &str, elapsed: Duration) {
        if let Some(record) = self.levels.get_mut(level_name) {
            record.games_played += 1;
            record.wins += 1;
            record.perfect_wins += 1;
            let improved = record
                .fastest_perfect_win
                .map_or(true, |fastest| elapsed < fastest);
            if improved {
                record.fastest_perfect_win = Some(elapsed);
            }
        }
    }
}

/// Pure system folding session events into player records.
#[derive(Debug, Default)]
pub struct Records;

impl Records {
    /// Creates a new records system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes session events and updates the record for `level_name`.
    ///
    /// The record for the level is created on first contact so a completed
    /// session can never fall on the floor. Only [`Event::SortCompleted`]
    /// mutates statistics; everything else is progress reporting.
    pub fn handle(
        &self,
        events: &[Event],
        level_name: &str,
        algorithm: AlgorithmKind,
        records: &mut PlayerRecords,
    ) {
        for event in events {
            if let Event::SortCompleted { outcome } = event {
                records.ensure_level(level_name, algorithm);
                if outcome.is_perfect() {
                    records.record_perfect_win(level_name, outcome.elapsed);
                } else {
                    records.record_win(level_name);
                }
            }
        }
    }
}

//! Per-game ranked score history.

use crate::error::Result;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

const KEY_PREFIX: &str = "leaderboard.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction
{
    /// Lower is better.
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetail
{
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry
{
    /// Creation timestamp in ms; unique within a ledger and the tie-break.
    pub id: u64,
    pub value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<EntryDetail>,
}

impl ScoreEntry
{
    pub fn new(id: u64, value: i64) -> Self
    {
        Self {
            id,
            value,
            detail: None,
        }
    }
}

// Older saves hold bare numbers instead of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry
{
    Record(ScoreEntry),
    Bare(i64),
}

pub fn storage_key(game_id: &str) -> String
{
    format!("{KEY_PREFIX}{game_id}")
}

/// Parses a stored board. Bare numbers get their position as id.
fn decode(raw: &str) -> Result<Vec<ScoreEntry>>
{
    let stored: Vec<StoredEntry> = serde_json::from_str(raw)?;
    Ok(stored
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| match entry {
            StoredEntry::Record(entry) => entry,
            StoredEntry::Bare(value) => ScoreEntry::new(idx as u64, value),
        })
        .collect())
}

fn encode(entries: &[ScoreEntry]) -> Result<String>
{
    Ok(serde_json::to_string(entries)?)
}

pub struct Ledger
{
    game_id: String,
    direction: Direction,
    limit: Option<usize>,
    entries: Vec<ScoreEntry>,
    store: Box<dyn KeyValueStore>,
}

impl Ledger
{
    pub fn new(
        game_id: &str,
        direction: Direction,
        limit: Option<usize>,
        store: Box<dyn KeyValueStore>,
    ) -> Self
    {
        Self {
            game_id: game_id.to_string(),
            direction,
            limit,
            entries: Vec::new(),
            store,
        }
    }

    /// Creates a ledger and fills it from the store. A missing key, a read
    /// failure or an unparseable payload all yield an empty ranking.
    pub fn load(
        game_id: &str,
        direction: Direction,
        limit: Option<usize>,
        store: Box<dyn KeyValueStore>,
    ) -> Self
    {
        let mut ledger = Self::new(game_id, direction, limit, store);
        let key = storage_key(game_id);
        let raw = match ledger.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ledger,
            Err(err) => {
                warn!(game = game_id, error = %err, "Failed to load leaderboard");
                return ledger;
            }
        };

        match decode(&raw) {
            Ok(entries) => {
                ledger.entries = entries;
                ledger.rank();
                debug!(game = game_id, entries = ledger.entries.len(), "Leaderboard loaded");
            }
            Err(err) => {
                warn!(game = game_id, error = %err, "Ignoring malformed leaderboard");
            }
        }
        ledger
    }

    pub fn game_id(&self) -> &str
    {
        &self.game_id
    }

    /// Appends, re-ranks, truncates, then persists. Persisting is best
    /// effort: on failure the in-memory ranking is kept and the error logged.
    pub fn record(&mut self, entry: ScoreEntry)
    {
        self.entries.push(entry);
        self.rank();

        let key = storage_key(&self.game_id);
        let payload = match encode(&self.entries) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(game = %self.game_id, error = %err, "Failed to encode leaderboard");
                return;
            }
        };
        if let Err(err) = self.store.set(&key, &payload) {
            warn!(game = %self.game_id, error = %err, "Failed to save score");
        }
    }

    pub fn view(&self) -> &[ScoreEntry]
    {
        &self.entries
    }

    /// Rank (1-based) of the entry with this id, if it is still on the board.
    pub fn position(&self, id: u64) -> Option<usize>
    {
        self.entries.iter().position(|entry| entry.id == id).map(|idx| idx + 1)
    }

    /// Smallest id greater than every id already on the board, at least `stamp`.
    pub fn next_id(&self, stamp: u64) -> u64
    {
        let highest = self.entries.iter().map(|entry| entry.id).max();
        match highest {
            Some(highest) if highest >= stamp => highest + 1,
            _ => stamp,
        }
    }

    pub fn clear(&mut self)
    {
        self.entries.clear();
        if let Err(err) = self.store.remove(&storage_key(&self.game_id)) {
            warn!(game = %self.game_id, error = %err, "Failed to clear leaderboard");
        }
    }

    fn rank(&mut self)
    {
        let direction = self.direction;
        self.entries.sort_by(|a, b| compare(direction, a, b));
        if let Some(limit) = self.limit {
            self.entries.truncate(limit);
        }
    }
}

fn compare(direction: Direction, a: &ScoreEntry, b: &ScoreEntry) -> Ordering
{
    let by_value = match direction {
        Direction::Ascending => a.value.cmp(&b.value),
        Direction::Descending => b.value.cmp(&a.value),
    };
    by_value.then(a.id.cmp(&b.id))
}

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

/// Entries kept on the board unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 10;

/// One finished session's result. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    pub accuracy: u32,
    pub timestamp: DateTime<Local>,
}

/// Persistence capability for the score list.
pub trait ScoreStore {
    /// Absent or unreadable data loads as an empty list, never an error.
    fn load(&self) -> Vec<ScoreEntry>;
    fn save(&self, entries: &[ScoreEntry]) -> io::Result<()>;
}

/// JSON file under the platform state directory.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::leaderboard_path()
            .unwrap_or_else(|| PathBuf::from("plink_leaderboard.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Vec<ScoreEntry> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(entries) = serde_json::from_slice::<Vec<ScoreEntry>>(&bytes) {
                return entries;
            }
        }
        Vec::new()
    }

    fn save(&self, entries: &[ScoreEntry]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(entries).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// In-memory store for unit tests and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    entries: RefCell<Vec<ScoreEntry>>,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Vec<ScoreEntry> {
        self.entries.borrow().clone()
    }

    fn save(&self, entries: &[ScoreEntry]) -> io::Result<()> {
        *self.entries.borrow_mut() = entries.to_vec();
        Ok(())
    }
}

/// Capacity-bounded list of past session results, kept sorted by score
/// descending and written back to its store after every mutation.
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    capacity: usize,
    store: Box<dyn ScoreStore>,
}

impl Leaderboard {
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, store)
    }

    pub fn with_capacity(capacity: usize, store: Box<dyn ScoreStore>) -> Self {
        let mut entries = store.load();
        // A hand-edited file may be out of order or oversized; re-establish
        // the invariants on load.
        sort_entries(&mut entries);
        entries.truncate(capacity);
        Self {
            entries,
            capacity,
            store,
        }
    }

    /// Records a finished session and returns its entry. The write-back is
    /// best effort; a failing store never interrupts gameplay.
    pub fn add_score(&mut self, score: u32, accuracy: u32) -> ScoreEntry {
        let entry = ScoreEntry {
            score,
            accuracy,
            timestamp: Local::now(),
        };

        self.entries.push(entry.clone());
        sort_entries(&mut self.entries);
        self.entries.truncate(self.capacity);

        let _ = self.store.save(&self.entries);
        entry
    }

    /// Entries paired with their 1-based rank, best first.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &ScoreEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Best surviving score, or 0 for an empty board.
    pub fn high_score(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        let _ = self.store.save(&self.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Ties rank the earlier entry first; the secondary key is explicit so the
// order never depends on sort stability.
fn sort_entries(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.cmp(&b.timestamp)));
}

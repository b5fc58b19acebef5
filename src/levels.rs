//! Level book: the ordered mapping from level number to message and text
//!
//! Authored as JSON, e.g. `{"1": {"message": "cat", "text": "..."}}`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Levels shipped with the game
const BUILTIN_LEVELS: &str = include_str!("../assets/levels.json");

/// Errors raised while loading a level book
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level book contains no levels")]
    Empty,
    #[error("level {0} has an empty message")]
    EmptyMessage(u32),
}

/// One authored level as it appears in the level file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    /// Word the player has to collect
    pub message: String,
    /// Letters spread across the writable tiles
    pub text: String,
}

/// A level ready for play (lower-cased, immutable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub number: u32,
    pub message: Vec<char>,
    pub text: String,
}

impl Level {
    pub fn new(number: u32, message: &str, text: &str) -> Self {
        Self {
            number,
            message: message.to_lowercase().chars().collect(),
            text: text.to_lowercase(),
        }
    }

    /// The target word as a string
    pub fn message_string(&self) -> String {
        self.message.iter().collect()
    }
}

/// All levels, keyed by level number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelBook {
    levels: BTreeMap<u32, LevelEntry>,
}

impl LevelBook {
    /// Build a book from entries, validating it
    pub fn new(levels: BTreeMap<u32, LevelEntry>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        if let Some((&number, _)) = levels.iter().find(|(_, e)| e.message.is_empty()) {
            return Err(LevelError::EmptyMessage(number));
        }
        Ok(Self { levels })
    }

    /// Parse a book from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: BTreeMap<u32, LevelEntry> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// Load a book from a JSON file
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        let book = Self::from_json(&json)?;
        log::info!("Loaded {} levels from {}", book.len(), path.display());
        Ok(book)
    }

    /// Levels shipped with the game
    pub fn builtin() -> Self {
        // The embedded file is checked by `test_builtin_levels_parse`
        Self::from_json(BUILTIN_LEVELS).unwrap_or_else(|e| {
            log::error!("Built-in levels are broken: {}", e);
            Self::fallback()
        })
    }

    fn fallback() -> Self {
        let mut levels = BTreeMap::new();
        levels.insert(
            1,
            LevelEntry {
                message: "cat".into(),
                text: "the cat sat on the mat".into(),
            },
        );
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Exact lookup by authored level number
    pub fn entry(&self, number: u32) -> Option<&LevelEntry> {
        self.levels.get(&number)
    }

    /// Level for a counter value.
    ///
    /// Authored numbers are used as-is; past the last authored level the
    /// book cycles from the start while keeping the counter's number.
    pub fn level(&self, number: u32) -> Level {
        let entry = self.entry(number).or_else(|| {
            let index = (number.max(1) as usize - 1) % self.levels.len().max(1);
            self.levels.values().nth(index)
        });
        match entry {
            Some(entry) => Level::new(number, &entry.message, &entry.text),
            None => Level::new(number, "", ""),
        }
    }
}

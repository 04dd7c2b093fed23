//! Text splitters.
//!
//! Three strategies share one configuration and one contract
//! (`split_text(text) -> Vec<String>`):
//!
//! - [`CharacterSplitter`]: one separator, greedy merge, tail-overlap seeding and
//!   fixed windows for oversized segments
//! - [`RecursiveSplitter`]: a coarse-to-fine separator chain, descending only
//!   into segments that are still too large
//! - [`SentenceSplitter`]: whole sentences, never cut
//!
//! [`TextSplitter`] picks one of them from a [`SplitterKind`].

mod character;
mod overlap;
mod recursive;
mod sentence;

pub use character::CharacterSplitter;
pub use recursive::RecursiveSplitter;
pub use sentence::SentenceSplitter;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::Splitter;

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Coarse to fine: paragraph, line, sentence, word, character.
pub fn default_separators() -> Vec<String> {
    ["\n\n", "\n", ". ", " ", ""].into_iter().map(String::from).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    Character,
    #[default]
    Recursive,
    Sentence,
}

impl std::str::FromStr for SplitterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "character" => Ok(Self::Character),
            "recursive" => Ok(Self::Recursive),
            "sentence" => Ok(Self::Sentence),
            other => Err(Error::InvalidConfig(format!("unknown splitter kind '{other}'"))),
        }
    }
}

/// Size limits shared by every splitter. Sizes are counted in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitterConfig {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl SplitterConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::with_separators(chunk_size, chunk_overlap, default_separators())
    }

    /// Validates the limits up front so a bad configuration never reaches `split_text`.
    pub fn with_separators(chunk_size: usize, chunk_overlap: usize, separators: Vec<String>) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be greater than 0".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        if separators.is_empty() {
            return Err(Error::InvalidConfig("separator list must not be empty".into()));
        }
        Ok(Self { chunk_size, chunk_overlap, separators })
    }

    pub fn chunk_size(&self) -> usize { self.chunk_size }
    pub fn chunk_overlap(&self) -> usize { self.chunk_overlap }
    pub fn separators(&self) -> &[String] { &self.separators }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, chunk_overlap: DEFAULT_CHUNK_OVERLAP, separators: default_separators() }
    }
}

/// Splitter selected at runtime from a [`SplitterKind`].
#[derive(Debug, Clone)]
pub enum TextSplitter {
    Character(CharacterSplitter),
    Recursive(RecursiveSplitter),
    Sentence(SentenceSplitter),
}

impl TextSplitter {
    pub fn new(kind: SplitterKind, config: SplitterConfig) -> Result<Self> {
        Ok(match kind {
            SplitterKind::Character => Self::Character(CharacterSplitter::new(config)),
            SplitterKind::Recursive => Self::Recursive(RecursiveSplitter::new(config)),
            SplitterKind::Sentence => Self::Sentence(SentenceSplitter::new(config)?),
        })
    }

    pub fn kind(&self) -> SplitterKind {
        match self {
            Self::Character(_) => SplitterKind::Character,
            Self::Recursive(_) => SplitterKind::Recursive,
            Self::Sentence(_) => SplitterKind::Sentence,
        }
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        match self {
            Self::Character(s) => s.split_text(text),
            Self::Recursive(s) => s.split_text(text),
            Self::Sentence(s) => s.split_text(text),
        }
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::Recursive(RecursiveSplitter::new(SplitterConfig::default()))
    }
}

impl Splitter for TextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> { TextSplitter::split_text(self, text) }
}

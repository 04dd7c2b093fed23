use regex::Regex;

use super::overlap::{char_len, single_or_empty};
use super::SplitterConfig;
use crate::error::{Error, Result};
use crate::traits::Splitter;

/// Terminal punctuation followed by whitespace.
const SENTENCE_BOUNDARY: &str = r"[.!?]\s+";

/// Packs whole sentences into chunks. A sentence longer than `chunk_size` is
/// emitted on its own, oversized, rather than cut.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    chunk_size: usize,
    boundary: Regex,
}

impl SentenceSplitter {
    pub fn new(config: SplitterConfig) -> Result<Self> {
        let boundary = Regex::new(SENTENCE_BOUNDARY).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        Ok(Self { chunk_size: config.chunk_size(), boundary })
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return single_or_empty(text);
        }

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for sentence in self.sentences(text) {
            let sentence_len = char_len(sentence);
            if current.is_empty() {
                current.push_str(sentence);
                current_len = sentence_len;
            } else if current_len + 1 + sentence_len <= self.chunk_size {
                current.push(' ');
                current.push_str(sentence);
                current_len += 1 + sentence_len;
            } else {
                chunks.push(std::mem::replace(&mut current, sentence.to_string()));
                current_len = sentence_len;
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    /// Trimmed, non-blank sentences; the punctuation stays with its sentence.
    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for boundary in self.boundary.find_iter(text) {
            // The terminator is ASCII, so one byte past the match start is a char boundary.
            sentences.push(&text[start..boundary.start() + 1]);
            start = boundary.end();
        }
        sentences.push(&text[start..]);
        sentences.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect()
    }
}

impl Splitter for SentenceSplitter {
    fn split_text(&self, text: &str) -> Vec<String> { SentenceSplitter::split_text(self, text) }
}

use super::overlap::{apply_overlap, char_len, single_or_empty, split_on};
use super::SplitterConfig;
use crate::traits::Splitter;

/// Splits on the coarsest separator that occurs in the text and only reaches
/// for finer ones inside segments that are still larger than `chunk_size`.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    pub fn new(config: SplitterConfig) -> Self {
        Self {
            chunk_size: config.chunk_size(),
            chunk_overlap: config.chunk_overlap(),
            separators: config.separators().to_vec(),
        }
    }

    pub fn separators(&self) -> &[String] { &self.separators }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let Some((separator, finer)) = separators.split_first() else {
            return single_or_empty(text);
        };
        if char_len(text) <= self.chunk_size {
            return single_or_empty(text);
        }

        let segments = split_on(text, separator);
        if segments.len() == 1 {
            return self.split_with(text, finer);
        }

        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;
        let mut open = false;

        for segment in segments {
            let segment_len = char_len(segment);
            let joiner = if open { sep_len } else { 0 };

            if current_len + segment_len + joiner <= self.chunk_size {
                if open {
                    current.push_str(separator);
                }
                current.push_str(segment);
                current_len += segment_len + joiner;
                open = true;
                continue;
            }

            if open {
                push_chunk(&mut chunks, std::mem::take(&mut current));
            }
            if segment_len > self.chunk_size {
                chunks.extend(self.split_with(segment, finer));
                current_len = 0;
                open = false;
            } else {
                current = segment.to_string();
                current_len = segment_len;
                open = true;
            }
        }
        if open {
            push_chunk(&mut chunks, current);
        }

        if self.chunk_overlap > 0 && chunks.len() > 1 {
            chunks = apply_overlap(chunks, self.chunk_overlap);
        }
        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
    if !chunk.trim().is_empty() {
        chunks.push(chunk);
    }
}

impl Splitter for RecursiveSplitter {
    fn split_text(&self, text: &str) -> Vec<String> { RecursiveSplitter::split_text(self, text) }
}

use super::overlap::{apply_overlap, char_len, single_or_empty, split_on, tail_segments, window_split};
use super::SplitterConfig;
use crate::traits::Splitter;

/// Greedy splitter over a single separator (the head of the configured chain).
#[derive(Debug, Clone)]
pub struct CharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separator: String,
}

impl CharacterSplitter {
    pub fn new(config: SplitterConfig) -> Self {
        let separator = config.separators()[0].clone();
        Self { chunk_size: config.chunk_size(), chunk_overlap: config.chunk_overlap(), separator }
    }

    pub fn separator(&self) -> &str { &self.separator }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return single_or_empty(text);
        }

        let sep_len = char_len(&self.separator);
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_len = 0usize;

        for segment in split_on(text, &self.separator) {
            let segment_len = char_len(segment);
            let joiner = if current.is_empty() { 0 } else { sep_len };

            if segment_len > self.chunk_size {
                self.flush(&mut chunks, &current);
                let mut windows = window_split(segment, self.chunk_size, self.chunk_overlap);
                let last = windows.pop().unwrap_or_default();
                chunks.extend(windows.into_iter().filter(|w| !w.trim().is_empty()));
                current_len = char_len(&last);
                current = vec![last];
            } else if current_len + segment_len + joiner <= self.chunk_size {
                current.push(segment.to_string());
                current_len += segment_len + joiner;
            } else {
                self.flush(&mut chunks, &current);
                // Seed the next buffer with the tail of the one just emitted.
                let mut seeded = tail_segments(&current, self.chunk_overlap);
                seeded.push(segment.to_string());
                current_len = seeded.iter().map(|s| char_len(s)).sum::<usize>() + sep_len * (seeded.len() - 1);
                current = seeded;
            }
        }
        self.flush(&mut chunks, &current);

        apply_overlap(chunks, self.chunk_overlap)
    }

    fn flush(&self, chunks: &mut Vec<String>, buffer: &[String]) {
        if buffer.is_empty() { return; }
        let joined = buffer.join(&self.separator);
        if !joined.trim().is_empty() {
            chunks.push(joined);
        }
    }
}

impl Splitter for CharacterSplitter {
    fn split_text(&self, text: &str) -> Vec<String> { CharacterSplitter::split_text(self, text) }
}

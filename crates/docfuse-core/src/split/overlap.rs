//! Character-level helpers shared by the splitters.
//!
//! Every length here is a count of `char`s, and every slice is cut on a char
//! boundary, so multi-byte text never panics.

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Last `n` characters of `text`, or all of it when shorter.
pub(crate) fn tail(text: &str, n: usize) -> &str {
    let len = char_len(text);
    if n >= len {
        return text;
    }
    match text.char_indices().nth(len - n) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

/// `[text]` unless the text is blank.
pub(crate) fn single_or_empty(text: &str) -> Vec<String> {
    if text.trim().is_empty() { vec![] } else { vec![text.to_string()] }
}

/// Splits on `separator`; the empty separator yields one piece per character.
pub(crate) fn split_on<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect()
    } else {
        text.split(separator).collect()
    }
}

/// Fixed windows of `size` characters, each starting `size - overlap` after
/// the previous one, for as long as a start position remains. The last
/// window may be a short remainder already covered by its predecessor.
pub(crate) fn window_split(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let total = bounds.len() - 1;
    let step = size.saturating_sub(overlap).max(1);
    let mut windows = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + size).min(total);
        windows.push(text[bounds[start]..bounds[end]].to_string());
        start += step;
    }
    windows
}

/// Trailing segments of a buffer worth up to `overlap` characters. The first
/// segment that does not fit whole contributes its tail and ends the scan.
pub(crate) fn tail_segments(segments: &[String], overlap: usize) -> Vec<String> {
    let mut remaining = overlap;
    let mut picked = Vec::new();
    for segment in segments.iter().rev() {
        if remaining == 0 { break; }
        let len = char_len(segment);
        if len <= remaining {
            picked.push(segment.clone());
            remaining -= len;
        } else {
            picked.push(tail(segment, remaining).to_string());
            break;
        }
    }
    picked.reverse();
    picked
}

/// Prefixes every chunk after the first with the last `overlap` characters
/// of its un-prefixed predecessor.
pub(crate) fn apply_overlap(chunks: Vec<String>, overlap: usize) -> Vec<String> {
    if chunks.len() <= 1 || overlap == 0 {
        return chunks;
    }
    let mut overlapped = Vec::with_capacity(chunks.len());
    overlapped.push(chunks[0].clone());
    for pair in chunks.windows(2) {
        overlapped.push(format!("{}{}", tail(&pair[0], overlap), pair[1]));
    }
    overlapped
}

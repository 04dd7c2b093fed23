use docfuse_core::split::{CharacterSplitter, RecursiveSplitter, SentenceSplitter};
use docfuse_core::{Error, SplitterConfig, SplitterKind, TextSplitter};

fn config(size: usize, overlap: usize) -> SplitterConfig {
    SplitterConfig::new(size, overlap).expect("valid config")
}

fn separators(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn short_text_is_returned_whole_by_every_splitter() {
    let text = "Hello world.  Second sentence.";
    for kind in [SplitterKind::Character, SplitterKind::Recursive, SplitterKind::Sentence] {
        let splitter = TextSplitter::new(kind, config(100, 10)).expect("splitter");
        assert_eq!(splitter.split_text(text), vec![text], "{kind:?}");
        assert!(splitter.split_text("   \n\t ").is_empty(), "{kind:?} blank");
        assert!(splitter.split_text("").is_empty(), "{kind:?} empty");
    }
}

#[test]
fn overlap_not_below_chunk_size_fails_at_construction() {
    assert!(matches!(SplitterConfig::new(10, 10), Err(Error::InvalidConfig(_))));
    assert!(matches!(SplitterConfig::new(10, 25), Err(Error::InvalidConfig(_))));
    assert!(matches!(SplitterConfig::new(0, 0), Err(Error::InvalidConfig(_))));
    assert!(matches!(SplitterConfig::with_separators(10, 2, vec![]), Err(Error::InvalidConfig(_))));
    assert!(SplitterConfig::new(10, 9).is_ok());
}

#[test]
fn splitter_kind_parses_case_insensitively() {
    assert_eq!("Sentence".parse::<SplitterKind>().expect("kind"), SplitterKind::Sentence);
    assert_eq!("character".parse::<SplitterKind>().expect("kind"), SplitterKind::Character);
    assert!("token".parse::<SplitterKind>().is_err());
    assert_eq!(SplitterKind::default(), SplitterKind::Recursive);
}

#[test]
fn character_splitter_flushes_on_overflow() {
    let splitter = CharacterSplitter::new(config(20, 0));
    assert_eq!(splitter.separator(), "\n\n");
    let text = "aaaaaaaaaa\n\nbbbbbbbbbb\n\ncccccccccc";
    assert_eq!(splitter.split_text(text), vec!["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"]);
}

#[test]
fn character_splitter_seeds_overlap_then_prefixes_predecessor_tail() {
    let splitter = CharacterSplitter::new(config(20, 4));
    let text = "aaaaaaaaaa\n\nbbbbbbbbbb\n\ncccccccccc";
    let chunks = splitter.split_text(text);
    // Merge-time seeding carries "aaaa"/"bbbb" forward, the final pass adds them again.
    assert_eq!(
        chunks,
        vec!["aaaaaaaaaa", "aaaaaaaa\n\nbbbbbbbbbb", "bbbbbbbb\n\ncccccccccc"]
    );
}

#[test]
fn character_splitter_windows_oversized_segments() {
    let splitter = CharacterSplitter::new(config(10, 2));
    let chunks = splitter.split_text("abcdefghijklmnopqrstuvwxyz");
    // The short trailing window "yz" seeds the last buffer.
    assert_eq!(chunks, vec!["abcdefghij", "ijijklmnopqr", "qrqrstuvwxyz", "yzyz"]);
}

#[test]
fn character_splitter_handles_multibyte_text() {
    let splitter = CharacterSplitter::new(config(5, 1));
    let chunks = splitter.split_text("ééééééééé");
    let lens: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
    assert_eq!(lens, vec![5, 6, 2]);
    assert!(chunks.iter().all(|c| c.chars().all(|ch| ch == 'é')));
}

#[test]
fn character_splitter_never_emits_blank_windows() {
    let text = "ééé ü. ß! x?  y\n\nzzzzz";
    for (size, overlap) in [(1, 0), (2, 1), (3, 0)] {
        let chunks = CharacterSplitter::new(config(size, overlap)).split_text(text);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| !c.trim().is_empty()), "size {size}: {chunks:?}");
    }
}

fn paragraphs() -> Vec<String> {
    (0..30).map(|i| format!("paragraph {i}{}", " filler".repeat(i % 6))).collect()
}

#[test]
fn character_splitter_drops_and_reorders_nothing() {
    let pieces = paragraphs();
    let text = pieces.join("\n\n");
    let chunks = CharacterSplitter::new(config(80, 0)).split_text(&text);
    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.chars().count() <= 80));
    assert_eq!(chunks.join("\n\n"), text);

    // With overlap every paragraph still shows up, in order.
    let chunks = CharacterSplitter::new(config(80, 10)).split_text(&text);
    let mut last_chunk = 0;
    for piece in &pieces {
        let found = chunks
            .iter()
            .enumerate()
            .skip(last_chunk)
            .find(|(_, c)| c.split("\n\n").any(|part| part.ends_with(piece.as_str())))
            .map(|(i, _)| i);
        let Some(i) = found else { panic!("{piece:?} missing after chunk {last_chunk}") };
        last_chunk = i;
    }
}

#[test]
fn character_overlap_prefix_matches_predecessor_suffix() {
    let overlap = 10;
    let text = paragraphs().join("\n\n");
    let chunks = CharacterSplitter::new(config(80, overlap)).split_text(&text);
    assert!(chunks.len() > 1);
    for i in 1..chunks.len() {
        let prev = &chunks[i - 1];
        // The predecessor's own prefix sits at its front, so its tail is the un-prefixed tail.
        let suffix: String = prev.chars().skip(prev.chars().count() - overlap).collect();
        assert!(chunks[i].starts_with(&suffix), "chunk {i} should start with {suffix:?}");
    }
}

#[test]
fn recursive_splitter_keeps_paragraphs_that_cannot_merge() {
    let splitter = RecursiveSplitter::new(config(50, 0));
    let pieces = [
        "The first paragraph is about forty-five chars",
        "The second paragraph also holds forty-five ch",
        "A third paragraph, again of roughly that size",
    ];
    for piece in pieces {
        assert!(piece.chars().count() <= 50);
        assert!(piece.chars().count() > 24);
    }
    let chunks = splitter.split_text(&pieces.join("\n\n"));
    assert_eq!(chunks, pieces.to_vec());
}

#[test]
fn recursive_splitter_falls_through_to_line_breaks() {
    let splitter = RecursiveSplitter::new(config(30, 0));
    let text = "line one is here\nline two is here\nline three is here";
    assert_eq!(splitter.split_text(text), vec!["line one is here", "line two is here", "line three is here"]);
}

#[test]
fn recursive_splitter_descends_only_into_oversized_segments() {
    let splitter = RecursiveSplitter::new(config(20, 0));
    let text = "intro\n\nalpha beta gamma delta epsilon";
    assert_eq!(splitter.split_text(text), vec!["intro", "alpha beta gamma", "delta epsilon"]);
}

#[test]
fn recursive_splitter_applies_overlap_at_each_level() {
    let splitter = RecursiveSplitter::new(config(20, 3));
    let chunks = splitter.split_text("intro\n\nalpha beta gamma delta epsilon");
    // The nested level already prefixed "mma"; the outer pass prefixes it once more.
    assert_eq!(chunks, vec!["intro", "troalpha beta gamma", "mmammadelta epsilon"]);
}

#[test]
fn recursive_splitter_without_character_fallback_emits_oversized_text() {
    let cfg = SplitterConfig::with_separators(10, 0, separators(&["\n\n"])).expect("config");
    let splitter = RecursiveSplitter::new(cfg);
    assert_eq!(splitter.split_text("abcdefghijklmnop"), vec!["abcdefghijklmnop"]);
}

#[test]
fn recursive_splitter_drops_and_reorders_nothing() {
    let splitter = RecursiveSplitter::new(config(100, 0));
    let text = (0..200).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
    let chunks = splitter.split_text(&text);
    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.chars().count() <= 100));
    assert_eq!(chunks.join(" "), text);
}

#[test]
fn recursive_overlap_prefix_matches_predecessor_suffix() {
    let overlap = 10;
    let splitter = RecursiveSplitter::new(config(80, overlap));
    let text = (0..60).map(|i| format!("token{i}")).collect::<Vec<_>>().join(" ");
    let plain = RecursiveSplitter::new(config(80, 0)).split_text(&text);
    let chunks = splitter.split_text(&text);
    assert_eq!(chunks.len(), plain.len());
    for i in 1..chunks.len() {
        let prev = &plain[i - 1];
        let suffix: String = prev.chars().skip(prev.chars().count() - overlap).collect();
        assert!(chunks[i].starts_with(&suffix), "chunk {i} should start with {suffix:?}");
    }
}

#[test]
fn sentence_splitter_packs_whole_sentences() {
    let splitter = SentenceSplitter::new(config(40, 0)).expect("splitter");
    let text = "First sentence here. Second one is here! Third? Fourth sentence that ends.";
    assert_eq!(
        splitter.split_text(text),
        vec!["First sentence here. Second one is here!", "Third? Fourth sentence that ends."]
    );
}

#[test]
fn sentence_splitter_emits_long_sentence_oversized() {
    let splitter = SentenceSplitter::new(config(10, 0)).expect("splitter");
    let text = "Tiny. This sentence is far too long. End.";
    assert_eq!(splitter.split_text(text), vec!["Tiny.", "This sentence is far too long.", "End."]);
}

#[test]
fn sentence_splitter_treats_any_whitespace_as_boundary() {
    let splitter = SentenceSplitter::new(config(5, 0)).expect("splitter");
    assert_eq!(splitter.split_text("One.\nTwo.\n\nThree."), vec!["One.", "Two.", "Three."]);
}

#[test]
fn text_splitter_dispatches_on_kind() {
    let splitter = TextSplitter::new(SplitterKind::Character, config(20, 0)).expect("splitter");
    assert_eq!(splitter.kind(), SplitterKind::Character);
    assert_eq!(TextSplitter::default().kind(), SplitterKind::Recursive);
}

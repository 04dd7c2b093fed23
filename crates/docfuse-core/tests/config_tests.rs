use figment::providers::{Format, Toml};
use figment::Figment;

use docfuse_core::config::{expand_path, resolve_with_base, Config, Settings};
use docfuse_core::{Error, SplitterKind};

#[test]
fn empty_figment_yields_defaults() {
    let settings = Config::from_figment(Figment::new()).settings().expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.chunking.chunk_size, 500);
    assert_eq!(settings.chunking.chunk_overlap, 50);
    assert_eq!(settings.chunking.splitter, SplitterKind::Recursive);
    assert_eq!(settings.chunking.separators, vec!["\n\n", "\n", ". ", " ", ""]);
    assert_eq!(settings.retrieval.alpha, 0.5);
    assert_eq!(settings.retrieval.top_k, 5);
    assert_eq!(settings.retrieval.over_fetch, 2);
}

#[test]
fn toml_sections_override_defaults() {
    let toml = r#"
        [chunking]
        chunk_size = 200
        chunk_overlap = 20
        splitter = "sentence"

        [retrieval]
        alpha = 0.7
        top_k = 3
    "#;
    let config = Config::from_figment(Figment::new().merge(Toml::string(toml)));
    let settings = config.settings().expect("settings");
    assert_eq!(settings.chunking.chunk_size, 200);
    assert_eq!(settings.chunking.chunk_overlap, 20);
    assert_eq!(settings.retrieval.alpha, 0.7);
    assert_eq!(settings.retrieval.top_k, 3);
    assert_eq!(settings.retrieval.over_fetch, 2);

    let splitter = settings.chunking.build_splitter().expect("splitter");
    assert_eq!(splitter.kind(), SplitterKind::Sentence);
    assert_eq!(config.get::<usize>("chunking.chunk_size").expect("get"), 200);
}

#[test]
fn overlap_not_below_size_is_rejected() {
    let toml = "[chunking]\nchunk_size = 100\nchunk_overlap = 100\n";
    let result = Config::from_figment(Figment::new().merge(Toml::string(toml))).settings();
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn alpha_outside_unit_interval_is_rejected() {
    let toml = "[retrieval]\nalpha = 1.5\n";
    let result = Config::from_figment(Figment::new().merge(Toml::string(toml))).settings();
    assert!(matches!(result, Err(Error::InvalidConfig(_))));

    let toml = "[retrieval]\ntop_k = 0\n";
    let result = Config::from_figment(Figment::new().merge(Toml::string(toml))).settings();
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn unknown_splitter_name_is_rejected() {
    let toml = "[chunking]\nsplitter = \"token\"\n";
    let result = Config::from_figment(Figment::new().merge(Toml::string(toml))).settings();
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn paths_expand_home_and_resolve_relative() {
    if let Some(home) = std::env::var_os("HOME") {
        assert_eq!(expand_path("~/notes"), std::path::PathBuf::from(home).join("notes"));
    }
    let base = std::path::Path::new("/srv/docs");
    assert_eq!(resolve_with_base(base, "garden"), base.join("garden"));
    assert_eq!(resolve_with_base(base, "/abs/path"), std::path::PathBuf::from("/abs/path"));
}

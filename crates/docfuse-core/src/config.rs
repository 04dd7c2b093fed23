//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_CHUNKING__CHUNK_SIZE=800`).
//! Typed settings come out of [`Config::settings`], already validated.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::split::{default_separators, SplitterConfig, SplitterKind, TextSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Like [`Config::load`] but reads one explicit TOML file instead of the
    /// `config*.toml` lookup. `APP_*` variables still apply on top.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        let figment = Figment::new().merge(Toml::file(path)).merge(Env::prefixed("APP_").split("__"));
        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self { Self { figment } }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed view of the `chunking` and `retrieval` sections, defaults filled in.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub chunking: ChunkingSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.chunking.splitter_config()?;
        self.retrieval.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingSettings {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default)]
    pub splitter: SplitterKind,
    /// Separator chain for the recursive splitter; the character splitter uses its head.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

impl ChunkingSettings {
    pub fn splitter_config(&self) -> Result<SplitterConfig> {
        SplitterConfig::with_separators(self.chunk_size, self.chunk_overlap, self.separators.clone())
    }

    pub fn build_splitter(&self) -> Result<TextSplitter> {
        TextSplitter::new(self.splitter, self.splitter_config()?)
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            splitter: SplitterKind::default(),
            separators: default_separators(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Weight of the semantic channel, `1 - alpha` goes to keyword search.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Each channel is asked for `top_k * over_fetch` candidates.
    #[serde(default = "default_over_fetch")]
    pub over_fetch: usize,
}

impl RetrievalSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!("alpha must be within [0, 1], got {}", self.alpha)));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be greater than 0".into()));
        }
        if self.over_fetch == 0 {
            return Err(Error::InvalidConfig("over_fetch must be greater than 0".into()));
        }
        Ok(())
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { alpha: default_alpha(), top_k: default_top_k(), over_fetch: default_over_fetch() }
    }
}

fn default_chunk_size() -> usize { DEFAULT_CHUNK_SIZE }
fn default_chunk_overlap() -> usize { DEFAULT_CHUNK_OVERLAP }
fn default_alpha() -> f64 { 0.5 }
fn default_top_k() -> usize { 5 }
fn default_over_fetch() -> usize { 2 }

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

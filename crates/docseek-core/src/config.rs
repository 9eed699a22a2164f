//! Configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`APP_SEARCH__TOP_K=3` sets `search.top_k`). Path settings may use `~` and
//! `${VAR}`; see [`expand_path`].

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        tracing::debug!(env = %env_name, "configuration sources merged");
        Ok(Self { figment })
    }

    /// Build from an inline TOML document; used by tests and embedding callers.
    pub fn from_toml_str(toml: &str) -> Self {
        Self { figment: Figment::new().merge(Toml::string(toml)) }
    }

    /// Extract and validate the full typed settings tree.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub index: IndexSettings,
    pub normalizer: NormalizerSettings,
    pub embedding: EmbeddingSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.search.chunk_length == 0 { return Err(Error::InvalidConfig("search.chunk_length must be > 0".into())); }
        if self.search.top_k == 0 { return Err(Error::InvalidConfig("search.top_k must be > 0".into())); }
        if self.search.workers == 0 { return Err(Error::InvalidConfig("search.workers must be > 0".into())); }
        if self.search.timeout_secs == 0 { return Err(Error::InvalidConfig("search.timeout_secs must be > 0".into())); }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Soft upper bound on chunk length, in characters.
    pub chunk_length: usize,
    pub top_k: usize,
    /// Documents processed concurrently.
    pub workers: usize,
    /// Bound on every similarity backend call.
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let workers = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
        Self { chunk_length: 400, top_k: 5, workers, timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Lance,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub db_dir: String,
    pub backend: BackendKind,
}

impl IndexSettings {
    pub fn db_path(&self) -> PathBuf { expand_path(&self.db_dir) }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { db_dir: "dev_data/indexes/collections".to_string(), backend: BackendKind::Lance }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerSettings {
    /// Stemmer applied to tokens containing any Cyrillic character.
    pub cyrillic_language: String,
    /// Stemmer applied to every other token.
    pub default_language: String,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self { cyrillic_language: "russian".to_string(), default_language: "english".to_string() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_dir: Option<String>,
    pub fake: bool,
}

/// The validated input of one `search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    root_path: PathBuf,
    query: String,
    chunk_length: usize,
    top_k: usize,
}

impl SearchRequest {
    pub fn new(root_path: impl Into<PathBuf>, query: impl Into<String>, chunk_length: usize, top_k: usize) -> Result<Self> {
        let query = query.into();
        if query.trim().is_empty() { return Err(Error::InvalidConfig("query must not be blank".into())); }
        if chunk_length == 0 { return Err(Error::InvalidConfig("chunk_length must be > 0".into())); }
        if top_k == 0 { return Err(Error::InvalidConfig("top_k must be > 0".into())); }
        Ok(Self { root_path: root_path.into(), query, chunk_length, top_k })
    }

    pub fn from_settings(root_path: impl Into<PathBuf>, query: impl Into<String>, search: &SearchSettings) -> Result<Self> {
        Self::new(root_path, query, search.chunk_length, search.top_k)
    }

    pub fn root_path(&self) -> &Path { &self.root_path }
    pub fn query(&self) -> &str { &self.query }
    pub fn chunk_length(&self) -> usize { self.chunk_length }
    pub fn top_k(&self) -> usize { self.top_k }
}

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


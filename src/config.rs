use std::sync::LazyLock;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_SIZE_THRESHOLD: usize = 100_000;
const DEFAULT_MAX_DEPTH: usize = 256;
const ENV_PREFIX: &str = "MARKUP";

/// Shared default, built once and only ever read.
pub static DEFAULT_CONFIG: LazyLock<ExtractorConfig> = LazyLock::new(ExtractorConfig::default);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Documents longer than this (in chars) skip the tree and take the
    /// lightweight pattern scan.
    pub size_threshold: usize,
    pub tree: TreeConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            tree: TreeConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Defaults overlaid with `MARKUP_*` environment variables
    /// (e.g. `MARKUP_SIZE_THRESHOLD=250000`).
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(env: config::Environment) -> Result<Self> {
        config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read extractor settings")?
            .try_deserialize()
            .context("Invalid extractor settings")
    }
}

/// How the tree builder reads markup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Qualified tag names accepted as the document root.
    pub root_tags: Vec<String>,
    /// Elements whose body is kept verbatim instead of parsed as markup.
    pub opaque_tags: Vec<String>,
    pub trim_text: bool,
    /// Nesting deeper than this is refused; the pattern fallback takes over.
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_tags: vec!["apex:page".into(), "apex:component".into()],
            opaque_tags: vec!["script".into(), "style".into()],
            trim_text: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TreeConfig {
    pub fn is_root(&self, tag: &str) -> bool {
        self.root_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_opaque(&self, tag: &str) -> bool {
        self.opaque_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

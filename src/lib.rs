//! Semantic model extraction for page-template markup.
//!
//! [`parse`] turns the raw text of a page into a [`ParsedResult`]: the
//! components it uses, its data bindings and actions, scripts and static
//! resources, and the entities and fields its expressions reference.
//!
//! Well-formed markup is built into a tree and walked, which attributes
//! components to their enclosing page blocks. Markup that doesn't parse
//! falls back to a pattern scan over the raw text, and oversized input
//! takes a lighter scan still. Either way `parse` always returns a model;
//! [`ParsedResult::strategy`] says which path produced it.
//!
//! ## Module Structure
//!
//! - `config`: extractor settings and environment overrides
//! - `model`: the output model
//! - `parser`: tree builder, expression classifier, traversal, fallback
//!   and the finishing passes

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod utils;

pub use config::{ExtractorConfig, TreeConfig, DEFAULT_CONFIG};
pub use error::TreeError;
pub use model::{
    ActionSupport, ComponentUsage, FieldReference, OutputPanel, PageBlock, ParsedResult,
    ScriptKind, ScriptReference, Strategy,
};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Parse one document with the default settings.
pub fn parse(raw: &str) -> ParsedResult {
    parse_with(raw, &DEFAULT_CONFIG)
}

pub fn parse_with(raw: &str, config: &ExtractorConfig) -> ParsedResult {
    parser::process_markup(raw, config)
}

/// Parse independent documents in parallel. Results keep input order.
#[cfg(feature = "rayon")]
pub fn parse_batch<S: AsRef<str> + Sync>(docs: &[S], config: &ExtractorConfig) -> Vec<ParsedResult> {
    docs.par_iter().map(|doc| parse_with(doc.as_ref(), config)).collect()
}

#[cfg(not(feature = "rayon"))]
pub fn parse_batch<S: AsRef<str>>(docs: &[S], config: &ExtractorConfig) -> Vec<ParsedResult> {
    docs.iter().map(|doc| parse_with(doc.as_ref(), config)).collect()
}

pub mod components;
pub mod expressions;
pub mod extract;
pub mod fallback;
pub mod traverse;
pub mod tree;

use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::model::{ParsedResult, Strategy};

/// Oversized input goes straight to the lightweight scan; everything else
/// is tried as a tree first. Never returns `Fallback`: that is decided by
/// the tree build itself.
pub fn choose_strategy(raw: &str, config: &ExtractorConfig) -> Strategy {
    if raw.chars().count() > config.size_threshold {
        Strategy::Lightweight
    } else {
        Strategy::Tree
    }
}

/// Pipeline: size check → tree walk or pattern fallback → finishing passes.
pub fn process_markup(raw: &str, config: &ExtractorConfig) -> ParsedResult {
    let mut result = match choose_strategy(raw, config) {
        Strategy::Lightweight => {
            info!(
                threshold = config.size_threshold,
                "markup over size threshold, using lightweight extraction"
            );
            fallback::extract_lightweight(raw)
        }
        _ => match tree::build_tree(raw, &config.tree) {
            Ok(root) => traverse::extract(&root),
            Err(err) => {
                debug!(error = %err, "markup is not a well-formed tree, using pattern fallback");
                fallback::extract(raw)
            }
        },
    };
    extract::finish(raw, &mut result);
    result
}

pub mod dependencies;
pub mod scripts;

use tracing::debug;

use super::expressions::sort_by_complexity;
use crate::model::{ParsedResult, Strategy};

/// Passes that run after either extraction path: scripts and raw-text
/// counters, expression ordering, dependency resolution.
pub fn finish(raw: &str, result: &mut ParsedResult) {
    result.scripts = scripts::extract_scripts(raw);

    let counts = scripts::raw_counts(raw);
    if result.strategy == Strategy::Tree && counts.form_count != result.form_count {
        debug!(
            tree = result.form_count,
            raw = counts.form_count,
            "form counts disagree, keeping the raw-text count"
        );
    }
    result.form_count = counts.form_count;
    result.has_remote_objects = counts.has_remote_objects;
    result.has_static_resources = counts.has_static_resources;

    sort_by_complexity(&mut result.apex_expressions);
    dependencies::resolve(result);
    result.component_count = result.components.len();
}

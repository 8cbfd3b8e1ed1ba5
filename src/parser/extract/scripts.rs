use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::model::{ScriptKind, ScriptReference};
use crate::utils::truncate;

const INLINE_PREVIEW_CHARS: usize = 200;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\b((?:[^>"']|"[^"]*"|'[^']*')*?)(?:/>|>(.*?)</script\s*>)"#).unwrap()
});
static SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bsrc\s*=\s*["']([^"']+)["']"#).unwrap());
static RESOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\$Resource\.([A-Za-z_][A-Za-z0-9_]*)").unwrap());
static FORM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<apex:form\b").unwrap());

const REMOTING_MARKERS: &[&str] = &["<apex:remoteobjects", "visualforce.remoting"];
const RESOURCE_MARKERS: &[&str] = &["$resource.", "<apex:stylesheet", "<apex:includescript"];

/// Counters read straight off the raw text, whichever path built the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCounts {
    pub form_count: usize,
    pub has_remote_objects: bool,
    pub has_static_resources: bool,
}

pub fn raw_counts(raw: &str) -> RawCounts {
    let lower = raw.to_lowercase();
    RawCounts {
        form_count: FORM_RE.find_iter(raw).count(),
        has_remote_objects: REMOTING_MARKERS.iter().any(|m| lower.contains(m)),
        has_static_resources: RESOURCE_MARKERS.iter().any(|m| lower.contains(m)),
    }
}

/// External scripts, inline scripts and static resources, deduplicated,
/// in pattern order then document order.
pub fn extract_scripts(raw: &str) -> Vec<ScriptReference> {
    let mut seen: IndexSet<ScriptReference> = IndexSet::new();

    for caps in SCRIPT_RE.captures_iter(raw) {
        let attributes = caps.get(1).map_or("", |m| m.as_str());
        if let Some(src) = SRC_RE.captures(attributes) {
            seen.insert(ScriptReference {
                kind: ScriptKind::ExternalUrl,
                value: src[1].trim().to_string(),
            });
            continue;
        }
        let body = caps.get(2).map_or("", |m| m.as_str()).trim();
        if !body.is_empty() {
            seen.insert(ScriptReference {
                kind: ScriptKind::InlineScript,
                value: truncate(body, INLINE_PREVIEW_CHARS),
            });
        }
    }

    for caps in RESOURCE_RE.captures_iter(raw) {
        seen.insert(ScriptReference {
            kind: ScriptKind::StaticResource,
            value: caps[1].to_string(),
        });
    }

    seen.into_iter().collect()
}

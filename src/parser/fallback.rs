//! Pattern-only extraction for markup the tree builder can't read.
//!
//! Works on the raw text alone, so it has no notion of nesting: no page
//! blocks, and components carry no attributes. Every field it can't find
//! is simply left empty.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::components::{action_support, is_custom_namespace, record_element_facts, tag_role, TagRole};
use super::expressions::collect_expressions;
use crate::model::{ComponentUsage, OutputPanel, ParsedResult, Strategy};
use crate::utils::{non_blank, split_list, truncate};

/// Context given to expressions found by the whole-text scan.
pub const RAW_CONTEXT: &str = "raw";

const TEXT_PREVIEW_CHARS: usize = 100;
const MARKUP_PREVIEW_CHARS: usize = 120;

static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z_][\w-]*):([A-Za-z_][\w-]*)").unwrap());
static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([A-Za-z_][\w-]*):([A-Za-z_][\w-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static PAGE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<apex:(?:page|component)\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});
static PANEL_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<apex:outputPanel\b((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#).unwrap()
});
static PANEL_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?apex:outputPanel\b").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static STANDARD_CONTROLLER_RE: LazyLock<Regex> =
    LazyLock::new(|| setting_regex("standardController"));
static CONTROLLER_RE: LazyLock<Regex> = LazyLock::new(|| setting_regex("controller"));
static EXTENSIONS_RE: LazyLock<Regex> = LazyLock::new(|| setting_regex("extensions"));
static API_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| setting_regex("apiVersion"));

fn setting_regex(attribute: &str) -> Regex {
    Regex::new(&format!(r#"(?i)\b{}\s*=\s*["']([^"']*)["']"#, attribute)).unwrap()
}

/// Reduced scan for oversized input: page settings, components and
/// expressions only.
pub fn extract_lightweight(raw: &str) -> ParsedResult {
    let mut result = ParsedResult::new(Strategy::Lightweight);
    scan_page_settings(raw, &mut result);
    scan_components(raw, &mut result);
    collect_expressions(raw, RAW_CONTEXT, &mut result);
    result
}

/// Full pattern scan, used when the tree can't be built.
pub fn extract(raw: &str) -> ParsedResult {
    let mut result = extract_lightweight(raw);
    result.strategy = Strategy::Fallback;
    result.page_label = PAGE_TAG_RE
        .captures(raw)
        .and_then(|caps| non_blank(parse_attributes(&caps[1]).get("label").map(String::as_str)));
    scan_tags(raw, &mut result);
    scan_output_panels(raw, &mut result);
    result
}

/// Settings are matched anywhere in the text, so a page tag that never
/// closes still yields its controller.
fn scan_page_settings(raw: &str, result: &mut ParsedResult) {
    result.controller_name = first_setting(&STANDARD_CONTROLLER_RE, raw);
    result.custom_controller_name = first_setting(&CONTROLLER_RE, raw);
    result.extension_names = first_setting(&EXTENSIONS_RE, raw)
        .map(|v| split_list(&v))
        .unwrap_or_default();
    result.api_version = first_setting(&API_VERSION_RE, raw);
}

fn first_setting(re: &Regex, raw: &str) -> Option<String> {
    re.captures(raw)
        .and_then(|caps| non_blank(caps.get(1).map(|m| m.as_str())))
}

fn scan_components(raw: &str, result: &mut ParsedResult) {
    for caps in COMPONENT_RE.captures_iter(raw) {
        let component = ComponentUsage::new(&caps[1], &caps[2]);
        if is_custom_namespace(&component.namespace) {
            result.custom_components.insert(component.name.clone());
        }
        result.components.push(component);
    }
}

/// Bindings, templates and action supports from each complete opening tag.
fn scan_tags(raw: &str, result: &mut ParsedResult) {
    for caps in OPEN_TAG_RE.captures_iter(raw) {
        let (namespace, name) = (&caps[1], &caps[2]);
        let attributes = parse_attributes(&caps[3]);
        record_element_facts(namespace, name, &attributes, result);
        if tag_role(namespace, name) == TagRole::ActionSupport {
            result.action_supports.push(action_support(&attributes));
        }
    }
}

/// Each opening tag is its own panel. The preview comes from the text up
/// to the next panel tag, so nested and unclosed panels are all kept.
fn scan_output_panels(raw: &str, result: &mut ParsedResult) {
    for caps in PANEL_OPEN_RE.captures_iter(raw) {
        let attributes = parse_attributes(&caps[1]);
        let content_preview = if caps[2].is_empty() {
            let rest = &raw[caps.get(0).map_or(raw.len(), |m| m.end())..];
            let end = PANEL_BOUNDARY_RE.find(rest).map_or(rest.len(), |m| m.start());
            preview(&rest[..end])
        } else {
            None
        };
        result.output_panels.push(OutputPanel {
            id: non_blank(attributes.get("id").map(String::as_str)),
            layout: non_blank(attributes.get("layout").map(String::as_str)),
            content_preview,
        });
    }
}

/// Text with tags removed, or the collapsed markup when there is no text.
fn preview(inner: &str) -> Option<String> {
    let text = collapse(&TAG_RE.replace_all(inner, " "));
    if !text.is_empty() {
        return Some(truncate(&text, TEXT_PREVIEW_CHARS));
    }
    let markup = collapse(inner);
    if markup.is_empty() {
        None
    } else {
        Some(truncate(&markup, MARKUP_PREVIEW_CHARS))
    }
}

fn collapse(s: &str) -> String {
    WHITESPACE_RE.replace_all(s.trim(), " ").into_owned()
}

fn parse_attributes(text: &str) -> IndexMap<String, String> {
    ATTRIBUTE_RE
        .captures_iter(text)
        .map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            (caps[1].to_string(), value.to_string())
        })
        .collect()
}

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::model::{FieldReference, ParsedResult};

/// `{!` content `}`; content may hold parentheses but never braces.
static EXPRESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{!\s*([^{}]+?)\s*\}").unwrap());
static FUNCTION_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*\(").unwrap());
static BOOLEAN_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:AND|OR|NOT)\b").unwrap());
static PROPERTY_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*\.[A-Za-z_$][A-Za-z0-9_$]*").unwrap()
});

const BOOLEAN_SYMBOLS: &[&str] = &["&&", "||", "==", "!=", ">", "<"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    FunctionCall,
    BooleanExpression,
    PropertyPath,
    SimpleReference,
}

/// Trimmed contents of every non-blank `{! }` in `text`, in order.
pub fn find_expressions(text: &str) -> impl Iterator<Item = &str> {
    EXPRESSION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|content| !content.is_empty())
}

/// Content of the first `{! }` in `text`.
pub fn first_expression(text: &str) -> Option<&str> {
    find_expressions(text).next()
}

/// Checks run in a fixed order: a dotted comparison such as
/// `acct.Active__c == true` is a boolean expression, not a property path.
pub fn classify(content: &str) -> ExpressionKind {
    let content = content.trim();
    if FUNCTION_CALL_RE.is_match(content) {
        ExpressionKind::FunctionCall
    } else if BOOLEAN_WORD_RE.is_match(content)
        || BOOLEAN_SYMBOLS.iter().any(|sym| content.contains(sym))
    {
        ExpressionKind::BooleanExpression
    } else if PROPERTY_PATH_RE.is_match(content) {
        ExpressionKind::PropertyPath
    } else {
        ExpressionKind::SimpleReference
    }
}

/// Classify every expression in `text` into `result`: simple references
/// become field references tagged with `context`, the rest go to
/// `apex_expressions`.
pub fn collect_expressions(text: &str, context: &str, result: &mut ParsedResult) {
    for content in find_expressions(text) {
        match classify(content) {
            ExpressionKind::SimpleReference => result.field_references.push(FieldReference {
                expression: content.to_string(),
                context: context.to_string(),
                s_object_name: None,
                field_name: None,
            }),
            _ => {
                result.apex_expressions.insert(content.to_string());
            }
        }
    }
}

pub fn complexity_rank(expression: &str) -> u8 {
    if expression.contains('(') {
        2
    } else if expression.contains('.') {
        1
    } else {
        0
    }
}

/// Most complex first; ties keep their first-seen order.
pub fn sort_by_complexity(expressions: &mut IndexSet<String>) {
    expressions.sort_by(|a, b| complexity_rank(b).cmp(&complexity_rank(a)));
}

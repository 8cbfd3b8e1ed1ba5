use std::sync::LazyLock;

use regex::Regex;

use crate::model::ParsedResult;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static DOTTED_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)+$").unwrap()
});

const LITERALS: &[&str] = &["true", "false", "null"];

/// Derive entity and `Entity.field` references, backfilling each field
/// reference it can place. Anything it can't place is left untouched.
///
/// An undotted reference is qualified as `Controller.name` only when it is a
/// plain identifier: literals (`true`, `false`, `null`, numbers, quoted
/// strings) are never attributed to the controller.
pub fn resolve(result: &mut ParsedResult) {
    let controller = result
        .controller_name
        .clone()
        .filter(|name| !name.contains('.'));
    if let Some(name) = &controller {
        result.s_object_references.insert(name.clone());
    }

    for reference in result.field_references.iter_mut() {
        let expression = reference.expression.trim();
        match expression.split_once('.') {
            Some((entity, field)) => {
                if !IDENTIFIER_RE.is_match(entity) || field.is_empty() {
                    continue;
                }
                result.s_object_references.insert(entity.to_string());
                result.detailed_field_references.insert(expression.to_string());
                reference.s_object_name = Some(entity.to_string());
                reference.field_name = Some(field.to_string());
            }
            None => {
                let Some(name) = &controller else { continue };
                if !IDENTIFIER_RE.is_match(expression)
                    || LITERALS.iter().any(|lit| expression.eq_ignore_ascii_case(lit))
                {
                    continue;
                }
                result.detailed_field_references.insert(format!("{}.{}", name, expression));
                reference.s_object_name = Some(name.clone());
                reference.field_name = Some(expression.to_string());
            }
        }
    }

    // Plain property paths name their entity too; `$Global.x` paths don't.
    for expression in &result.apex_expressions {
        if !DOTTED_PATH_RE.is_match(expression) {
            continue;
        }
        if let Some((entity, _)) = expression.split_once('.') {
            result.s_object_references.insert(entity.to_string());
            result.detailed_field_references.insert(expression.clone());
        }
    }
}

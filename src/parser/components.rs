//! Tag vocabulary shared by the tree walk and the pattern fallback.

use indexmap::IndexMap;

use super::expressions::first_expression;
use crate::model::{ActionSupport, ParsedResult};
use crate::utils::{non_blank, split_list};

const CORE_NAMESPACE: &str = "apex";
const CUSTOM_NAMESPACE: &str = "c";

/// What an element means to the extractor beyond being a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRole {
    Form,
    Block,
    ActionSupport,
    OutputPanel,
    Other,
}

pub fn tag_role(namespace: &str, name: &str) -> TagRole {
    if !namespace.eq_ignore_ascii_case(CORE_NAMESPACE) {
        return TagRole::Other;
    }
    match name.to_ascii_lowercase().as_str() {
        "form" => TagRole::Form,
        "pageblock" => TagRole::Block,
        "actionsupport" => TagRole::ActionSupport,
        "outputpanel" => TagRole::OutputPanel,
        _ => TagRole::Other,
    }
}

pub fn is_custom_namespace(namespace: &str) -> bool {
    namespace.eq_ignore_ascii_case(CUSTOM_NAMESPACE)
}

fn is_input_like(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("input") || lower.starts_with("select")
}

fn is_command(name: &str) -> bool {
    name.eq_ignore_ascii_case("commandButton") || name.eq_ignore_ascii_case("commandLink")
}

/// Attribute naming an included or composed template, per tag.
fn template_attribute(namespace: &str, name: &str) -> Option<&'static str> {
    if !namespace.eq_ignore_ascii_case(CORE_NAMESPACE) {
        return None;
    }
    match name.to_ascii_lowercase().as_str() {
        "composition" => Some("template"),
        "include" => Some("pageName"),
        "insert" | "define" => Some("name"),
        _ => None,
    }
}

fn lookup<'a>(attributes: &'a IndexMap<String, String>, key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

/// Record the bindings a single attribute contributes: input values,
/// command actions.
pub fn record_attribute_bindings(name: &str, attribute: &str, value: &str, result: &mut ParsedResult) {
    if attribute.eq_ignore_ascii_case("value") && is_input_like(name) {
        if let Some(binding) = first_expression(value) {
            result.input_bindings.insert(binding.to_string());
        }
    }
    if attribute.eq_ignore_ascii_case("action") && is_command(name) {
        if let Some(action) = first_expression(value) {
            result.button_actions.insert(action.to_string());
        }
    }
}

/// Per-element facts that don't depend on nesting: custom components,
/// template fragments, attribute bindings.
pub fn record_element_facts(
    namespace: &str,
    name: &str,
    attributes: &IndexMap<String, String>,
    result: &mut ParsedResult,
) {
    if is_custom_namespace(namespace) {
        result.custom_components.insert(name.to_string());
    }
    if let Some(fragment) = template_attribute(namespace, name).and_then(|attr| lookup(attributes, attr)) {
        if !fragment.trim().is_empty() {
            result.template_fragments.insert(fragment.trim().to_string());
        }
    }
    for (attribute, value) in attributes {
        record_attribute_bindings(name, attribute, value, result);
    }
}

pub fn action_support(attributes: &IndexMap<String, String>) -> ActionSupport {
    ActionSupport {
        event: non_blank(lookup(attributes, "event")),
        re_render: non_blank(lookup(attributes, "reRender")),
        action: non_blank(lookup(attributes, "action")),
        status: non_blank(lookup(attributes, "status")),
    }
}

/// Page-level settings carried on the root element.
pub fn apply_page_settings(attributes: &IndexMap<String, String>, result: &mut ParsedResult) {
    result.controller_name = non_blank(lookup(attributes, "standardController"));
    result.custom_controller_name = non_blank(lookup(attributes, "controller"));
    result.extension_names = lookup(attributes, "extensions").map(split_list).unwrap_or_default();
    result.api_version = non_blank(lookup(attributes, "apiVersion"));
    result.page_label = non_blank(lookup(attributes, "label"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Strategy;

    fn attrs(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn roles() {
        assert_eq!(tag_role("apex", "form"), TagRole::Form);
        assert_eq!(tag_role("apex", "pageBlock"), TagRole::Block);
        assert_eq!(tag_role("apex", "pageBlockSection"), TagRole::Other);
        assert_eq!(tag_role("apex", "actionSupport"), TagRole::ActionSupport);
        assert_eq!(tag_role("APEX", "outputpanel"), TagRole::OutputPanel);
        assert_eq!(tag_role("c", "form"), TagRole::Other);
    }

    #[test]
    fn input_and_command_bindings() {
        let mut r = ParsedResult::new(Strategy::Tree);
        record_attribute_bindings("inputField", "value", "{!Account.Name}", &mut r);
        record_attribute_bindings("selectList", "value", "{!picked}", &mut r);
        record_attribute_bindings("outputField", "value", "{!Account.Phone}", &mut r);
        record_attribute_bindings("commandButton", "action", "{!save}", &mut r);
        record_attribute_bindings("commandLink", "action", "{! cancel }", &mut r);
        record_attribute_bindings("actionFunction", "action", "{!refresh}", &mut r);
        record_attribute_bindings("inputText", "value", "plain", &mut r);

        let inputs: Vec<_> = r.input_bindings.iter().map(String::as_str).collect();
        assert_eq!(inputs, vec!["Account.Name", "picked"]);
        let actions: Vec<_> = r.button_actions.iter().map(String::as_str).collect();
        assert_eq!(actions, vec!["save", "cancel"]);
    }

    #[test]
    fn custom_components_and_templates() {
        let mut r = ParsedResult::new(Strategy::Tree);
        record_element_facts("c", "addressCard", &attrs(&[]), &mut r);
        record_element_facts("apex", "composition", &attrs(&[("template", "SiteTemplate")]), &mut r);
        record_element_facts("apex", "include", &attrs(&[("pageName", "Footer")]), &mut r);
        record_element_facts("apex", "insert", &attrs(&[("name", "body")]), &mut r);
        record_element_facts("apex", "include", &attrs(&[("pageName", "Footer")]), &mut r);

        assert_eq!(r.custom_components.len(), 1);
        let fragments: Vec<_> = r.template_fragments.iter().map(String::as_str).collect();
        assert_eq!(fragments, vec!["SiteTemplate", "Footer", "body"]);
    }

    #[test]
    fn action_support_fields() {
        let a = action_support(&attrs(&[
            ("event", "onchange"),
            ("rerender", "panel"),
            ("action", "{!refresh}"),
        ]));
        assert_eq!(a.event.as_deref(), Some("onchange"));
        assert_eq!(a.re_render.as_deref(), Some("panel"));
        assert_eq!(a.action.as_deref(), Some("{!refresh}"));
        assert_eq!(a.status, None);
    }

    #[test]
    fn page_settings() {
        let mut r = ParsedResult::new(Strategy::Tree);
        apply_page_settings(
            &attrs(&[
                ("standardController", "Account"),
                ("extensions", "AccountExt, AuditExt"),
                ("apiVersion", "58.0"),
                ("label", "Account Editor"),
            ]),
            &mut r,
        );
        assert_eq!(r.controller_name.as_deref(), Some("Account"));
        assert_eq!(r.custom_controller_name, None);
        assert_eq!(r.extension_names, vec!["AccountExt", "AuditExt"]);
        assert_eq!(r.api_version.as_deref(), Some("58.0"));
        assert_eq!(r.page_label.as_deref(), Some("Account Editor"));
    }
}

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Which extraction path produced a [`ParsedResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    /// Well-formed markup, walked as a tree.
    Tree,
    /// Tree build failed; pattern scan over the raw text.
    Fallback,
    /// Input over the size threshold; reduced pattern scan.
    Lightweight,
}

/// One occurrence of a namespaced element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentUsage {
    pub namespace: String,
    pub name: String,
    /// Values as written, entity-decoded only. Empty on the fallback path.
    pub attributes: IndexMap<String, String>,
}

impl ComponentUsage {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            attributes: IndexMap::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

/// A simple identifier or dotted reference found inside `{! }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub expression: String,
    /// Where it was found: `ns:name.attr` or a traversal path.
    pub context: String,
    pub s_object_name: Option<String>,
    pub field_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageBlock {
    pub title: Option<String>,
    pub id: Option<String>,
    pub components: Vec<ComponentUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSupport {
    pub event: Option<String>,
    pub re_render: Option<String>,
    pub action: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPanel {
    pub id: Option<String>,
    pub layout: Option<String>,
    pub content_preview: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScriptKind {
    StaticResource,
    InlineScript,
    ExternalUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScriptReference {
    #[serde(rename = "type")]
    pub kind: ScriptKind,
    pub value: String,
}

/// Everything extracted from one markup document.
///
/// Set-valued fields are [`IndexSet`]s: deduplicated, in first-seen order.
/// `apex_expressions` is the exception, re-ordered by complexity rank once
/// extraction finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResult {
    pub strategy: Strategy,

    pub controller_name: Option<String>,
    pub custom_controller_name: Option<String>,
    pub extension_names: Vec<String>,
    pub api_version: Option<String>,
    pub page_label: Option<String>,

    pub components: Vec<ComponentUsage>,
    pub component_count: usize,
    pub form_count: usize,
    pub page_blocks: Vec<PageBlock>,
    pub action_supports: Vec<ActionSupport>,
    pub output_panels: Vec<OutputPanel>,
    pub scripts: Vec<ScriptReference>,
    pub field_references: Vec<FieldReference>,

    pub has_remote_objects: bool,
    pub has_static_resources: bool,

    pub template_fragments: IndexSet<String>,
    pub apex_expressions: IndexSet<String>,
    pub input_bindings: IndexSet<String>,
    pub button_actions: IndexSet<String>,
    pub custom_components: IndexSet<String>,
    pub s_object_references: IndexSet<String>,
    pub detailed_field_references: IndexSet<String>,
}

impl ParsedResult {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            controller_name: None,
            custom_controller_name: None,
            extension_names: Vec::new(),
            api_version: None,
            page_label: None,
            components: Vec::new(),
            component_count: 0,
            form_count: 0,
            page_blocks: Vec::new(),
            action_supports: Vec::new(),
            output_panels: Vec::new(),
            scripts: Vec::new(),
            field_references: Vec::new(),
            has_remote_objects: false,
            has_static_resources: false,
            template_fragments: IndexSet::new(),
            apex_expressions: IndexSet::new(),
            input_bindings: IndexSet::new(),
            button_actions: IndexSet::new(),
            custom_components: IndexSet::new(),
            s_object_references: IndexSet::new(),
            detailed_field_references: IndexSet::new(),
        }
    }

    /// Distinct `ns:name` ids of every component seen, in document order.
    pub fn component_names(&self) -> IndexSet<String> {
        self.components.iter().map(ComponentUsage::qualified_name).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

use super::components::{action_support, apply_page_settings, record_element_facts, tag_role, TagRole};
use super::expressions::collect_expressions;
use super::tree::{Element, Node};
use crate::model::{ComponentUsage, OutputPanel, PageBlock, ParsedResult, Strategy};
use crate::utils::{non_blank, truncate};

const TEXT_PREVIEW_CHARS: usize = 100;
const OUTLINE_PREVIEW_CHARS: usize = 120;

/// Walk a built tree depth-first and collect the full model.
pub fn extract(root: &Element) -> ParsedResult {
    let mut walker = Walker {
        result: ParsedResult::new(Strategy::Tree),
        active_blocks: Vec::new(),
        path: Vec::new(),
    };
    apply_page_settings(&root.attributes, &mut walker.result);
    walker.visit(root);
    walker.result
}

struct Walker {
    result: ParsedResult,
    /// Indices into `result.page_blocks`, innermost last.
    active_blocks: Vec<usize>,
    /// Qualified names from the root down to the current element.
    path: Vec<String>,
}

impl Walker {
    fn visit(&mut self, element: &Element) {
        self.path.push(element.name.clone());
        let mut opened_block = false;

        match element.namespace() {
            Some(namespace) => {
                let name = element.local_name();
                let component = self.component(element, namespace, name);
                if let Some(&active) = self.active_blocks.last() {
                    self.result.page_blocks[active].components.push(component.clone());
                }
                self.result.components.push(component);

                match tag_role(namespace, name) {
                    TagRole::Form => self.result.form_count += 1,
                    TagRole::Block => {
                        self.result.page_blocks.push(PageBlock {
                            title: non_blank(element.attr("title")),
                            id: non_blank(element.attr("id")),
                            components: Vec::new(),
                        });
                        self.active_blocks.push(self.result.page_blocks.len() - 1);
                        opened_block = true;
                    }
                    TagRole::ActionSupport => {
                        self.result.action_supports.push(action_support(&element.attributes))
                    }
                    TagRole::OutputPanel => self.result.output_panels.push(output_panel(element)),
                    TagRole::Other => {}
                }
            }
            None => self.scan_attributes(element),
        }

        for child in &element.children {
            match child {
                Node::Element(el) => self.visit(el),
                Node::Text(text) => {
                    collect_expressions(text, &self.path.join("."), &mut self.result)
                }
            }
        }

        if opened_block {
            self.active_blocks.pop();
        }
        self.path.pop();
    }

    fn component(&mut self, element: &Element, namespace: &str, name: &str) -> ComponentUsage {
        let mut usage = ComponentUsage::new(namespace, name);
        self.scan_attributes(element);
        usage.attributes = element.attributes.clone();
        record_element_facts(namespace, name, &element.attributes, &mut self.result);
        usage
    }

    fn scan_attributes(&mut self, element: &Element) {
        for (attribute, value) in &element.attributes {
            let context = format!("{}.{}", element.name, attribute);
            collect_expressions(value, &context, &mut self.result);
        }
    }
}

fn output_panel(element: &Element) -> OutputPanel {
    let content_preview = match element.first_text() {
        Some(text) => Some(truncate(text.trim(), TEXT_PREVIEW_CHARS)),
        None => {
            let outline = element.outline();
            if outline.is_empty() {
                None
            } else {
                Some(truncate(&outline, OUTLINE_PREVIEW_CHARS))
            }
        }
    };
    OutputPanel {
        id: non_blank(element.attr("id")),
        layout: non_blank(element.attr("layout")),
        content_preview,
    }
}

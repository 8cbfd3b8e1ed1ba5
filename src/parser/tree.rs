use std::borrow::Cow;

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::TreeConfig;
use crate::error::TreeError;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified tag name as written, e.g. `apex:pageBlock` or `div`.
    pub name: String,
    /// Values as written apart from entity decoding (`&amp;` becomes `&`).
    /// Whitespace is kept.
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.name.split_once(':').map(|(ns, _)| ns)
    }

    pub fn local_name(&self) -> &str {
        self.name.split_once(':').map_or(self.name.as_str(), |(_, name)| name)
    }

    /// Attribute lookup; markup attribute names are case-insensitive.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First direct text child.
    pub fn first_text(&self) -> Option<&str> {
        self.children.iter().find_map(|child| match child {
            Node::Text(t) => Some(t.as_str()),
            Node::Element(_) => None,
        })
    }

    /// One-line rendering of the direct children: tags with their
    /// attributes, text as-is.
    pub fn outline(&self) -> String {
        self.children
            .iter()
            .map(|child| match child {
                Node::Text(t) => t.clone(),
                Node::Element(el) => {
                    let attrs: String = el
                        .attributes
                        .iter()
                        .map(|(k, v)| format!(" {}=\"{}\"", k, v))
                        .collect();
                    format!("<{}{}/>", el.name, attrs)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parse markup into a tree rooted at the single recognized root element.
///
/// Bodies of opaque elements (`script`, `style`) are cut straight out of
/// the raw text up to their closing tag and never tokenized, so code such
/// as `a < b` or `'<div>'` can't break the build.
pub fn build_tree(raw: &str, config: &TreeConfig) -> Result<Element, TreeError> {
    // ASCII lowering keeps byte offsets aligned with `raw`.
    let lowered = raw.to_ascii_lowercase();
    let mut offset = 0;
    let mut reader = reader_at(raw, offset, config);

    let mut open: Vec<Element> = Vec::new();
    let mut top_level: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mut element = open_element(&e)?;
                if config.is_opaque(&element.name) {
                    let body_start = offset + reader.buffer_position() as usize;
                    let (body_end, resume) = find_closing(&lowered, body_start, &element.name)
                        .ok_or_else(|| {
                            TreeError::Unbalanced(format!("<{}> is never closed", element.name))
                        })?;
                    let body = &raw[body_start..body_end];
                    if !body.trim().is_empty() {
                        element.children.push(Node::Text(body.to_string()));
                    }
                    attach(element, &mut open, &mut top_level);
                    offset = resume;
                    reader = reader_at(raw, offset, config);
                } else {
                    if open.len() >= config.max_depth {
                        return Err(TreeError::TooDeep(config.max_depth));
                    }
                    open.push(element);
                }
            }
            Event::Empty(e) => {
                let element = open_element(&e)?;
                attach(element, &mut open, &mut top_level);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let element = open
                    .pop()
                    .ok_or_else(|| TreeError::Unbalanced(format!("stray </{}>", name)))?;
                if element.name != name {
                    return Err(TreeError::Unbalanced(format!(
                        "<{}> closed by </{}>",
                        element.name, name
                    )));
                }
                attach(element, &mut open, &mut top_level);
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                push_text(text, &mut open);
            }
            Event::CData(c) => push_text(String::from_utf8_lossy(&c).into_owned(), &mut open),
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(TreeError::Unbalanced(format!(
            "<{}> is never closed",
            unclosed.name
        )));
    }

    let root = top_level
        .iter()
        .position(|el| config.is_root(&el.name))
        .ok_or_else(|| TreeError::MissingRoot {
            expected: config.root_tags.clone(),
        })?;
    if let Some(stray) = top_level
        .iter()
        .enumerate()
        .find_map(|(i, el)| (i != root).then(|| el.name.clone()))
    {
        return Err(TreeError::OutsideRoot(stray));
    }
    Ok(top_level.swap_remove(root))
}

/// A reader over `raw` from `offset`. Tag balance is checked against our own
/// open stack, which survives a restart after an opaque body.
fn reader_at<'a>(raw: &'a str, offset: usize, config: &TreeConfig) -> Reader<&'a [u8]> {
    let mut reader = Reader::from_str(&raw[offset..]);
    let settings = reader.config_mut();
    settings.trim_text(config.trim_text);
    settings.check_end_names = false;
    reader
}

/// End of an opaque body starting at `from`, and the offset just past its
/// closing tag. Matched case-insensitively on the lowered text.
fn find_closing(lowered: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let needle = format!("</{}", name.to_ascii_lowercase());
    let mut search = from;
    while let Some(found) = lowered[search..].find(&needle) {
        let start = search + found;
        let after = start + needle.len();
        let rest = &lowered[after..];
        let trimmed = rest.trim_start();
        if trimmed.starts_with('>') {
            return Some((start, after + (rest.len() - trimmed.len()) + 1));
        }
        search = after;
    }
    None
}

fn open_element(start: &BytesStart) -> Result<Element, TreeError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    // html_attributes: valueless and unquoted attributes are accepted.
    for attr in start.html_attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(Cow::into_owned)
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        element.attributes.insert(key, value);
    }
    Ok(element)
}

fn attach(element: Element, open: &mut [Element], top_level: &mut Vec<Element>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => top_level.push(element),
    }
}

fn push_text(text: String, open: &mut [Element]) {
    if text.trim().is_empty() {
        return;
    }
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Text(text));
    }
}

use quick_xml::events::attributes::AttrError;

/// Why the markup could not be built into a tree. Never escapes `parse`;
/// every variant routes the document to the pattern fallback.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("malformed markup: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("unbalanced markup: {0}")]
    Unbalanced(String),

    #[error("element nesting deeper than {0} levels")]
    TooDeep(usize),

    #[error("<{0}> sits outside the root element")]
    OutsideRoot(String),

    #[error("no recognized root element (expected one of: {})", expected.join(", "))]
    MissingRoot { expected: Vec<String> },
}

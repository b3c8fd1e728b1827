//! Template payloads and attribute extraction.
//!
//! Templates receive one of three payload shapes, depending on the node's
//! rendering strategy:
//!
//! | Strategy | Payload |
//! |----------|---------|
//! | Closed (`hr`, `br`, `cr`, `nbsp`) | `{}` |
//! | Text (`text`) | [`TextPayload`]: `{ Content }` |
//! | Span / Block / Heading | [`NodeAttributes`]: `{ Content, ID, Classes, Attr, Attrs }` |
//!
//! Field names are capitalized so templates read `{{ Content }}` and
//! `<p{{ Attrs }}>`.
//!
//! [`extract`] is deterministic: classes and attribute keys are sorted
//! before serialization, so the same node always yields byte-identical
//! `Attrs`.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::ast::Node;
use crate::html::escape::escape_html;

/// Full payload for container templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeAttributes {
    /// Rendered children.
    #[serde(rename = "Content")]
    pub content: String,
    /// The node's id, or empty.
    #[serde(rename = "ID")]
    pub id: String,
    /// Class names, sorted ascending.
    #[serde(rename = "Classes")]
    pub classes: Vec<String>,
    /// All attributes, including `id` and `class`.
    #[serde(rename = "Attr")]
    pub attr: BTreeMap<String, String>,
    /// `Attr` pre-serialized as ` key="value"` fragments in key order.
    #[serde(rename = "Attrs")]
    pub attrs: String,
}

/// Payload for the `text` template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextPayload {
    #[serde(rename = "Content")]
    pub content: String,
}

/// Payload for closed (void) templates. Serializes to `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClosedPayload {}

/// Extracts the serializable attribute payload of a node.
///
/// `Content` is left empty; the dispatcher fills it in. A node without an
/// attribute set yields an all-empty payload.
pub fn extract(node: &Node) -> NodeAttributes {
    let Some(attribute) = node.attribute() else {
        return NodeAttributes::default();
    };

    let mut attr = attribute.attrs.clone();

    let id = attribute.id.clone().unwrap_or_default();
    if let Some(id) = &attribute.id {
        attr.insert("id".to_string(), id.clone());
    }

    let mut classes = attribute.classes.clone();
    classes.sort();
    if !classes.is_empty() {
        attr.insert("class".to_string(), classes.join(" "));
    }

    let attrs = serialize_attrs(&attr);

    NodeAttributes {
        content: String::new(),
        id,
        classes,
        attr,
        attrs,
    }
}

/// Serializes attributes as ` key="value"` fragments, in map order.
pub fn serialize_attrs(attr: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in attr {
        let _ = write!(out, " {}=\"", key);
        escape_html(&mut out, value);
        out.push('"');
    }
    out
}

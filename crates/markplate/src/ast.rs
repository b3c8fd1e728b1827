//! Document tree.
//!
//! A document is a tree of [`Node`]s. Every node has a [`NodeKind`] and an
//! optional [`Attribute`] set, and comes in one of two shapes:
//!
//! - [`Container`]: owns an ordered list of child nodes (paragraphs, emphasis,
//!   tables, ...)
//! - [`Leaf`]: owns no children, only literal content (text, code, raw HTML,
//!   breaks, rules)
//!
//! Trees are usually produced by [`crate::parse`], but can be built by hand:
//!
//! ```rust
//! use markplate::ast::{Node, NodeKind};
//!
//! let doc = Node::container(NodeKind::Document, vec![
//!     Node::container(NodeKind::Paragraph, vec![
//!         Node::text("hi"),
//!         Node::container(NodeKind::Emphasis, vec![Node::text("there")]),
//!     ]),
//! ]);
//! assert_eq!(doc.plain_text(), "hithere");
//! ```

use std::collections::BTreeMap;

/// Optional per-node attribute data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
    /// Unique identifier (`{#intro}` on a heading).
    pub id: Option<String>,
    /// Class names. Order is not significant.
    pub classes: Vec<String>,
    /// Arbitrary key/value attributes.
    pub attrs: BTreeMap<String, String>,
}

impl Attribute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }
}

/// Column alignment of a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellAlign {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl CellAlign {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            CellAlign::None => None,
            CellAlign::Left => Some("left"),
            CellAlign::Center => Some("center"),
            CellAlign::Right => Some("right"),
        }
    }
}

/// The kind of a node.
///
/// Kinds carry the data that is specific to them (heading level, link
/// destination, ...). Anything the tree builder does not know about lands
/// in [`NodeKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Text,
    Softbreak,
    Hardbreak,
    NonBlockingSpace,
    Emphasis,
    Strong,
    Delete,
    BlockQuote,
    Aside,
    Link {
        destination: String,
        title: String,
    },
    CrossReference {
        destination: String,
    },
    Citation {
        keys: Vec<String>,
    },
    Image {
        destination: String,
        title: String,
    },
    Code,
    CodeBlock {
        info: String,
    },
    Caption,
    CaptionFigure,
    Paragraph,
    InlineHtml,
    BlockHtml,
    Heading {
        level: u8,
    },
    HorizontalRule,
    List {
        /// First item number for ordered lists, `None` for bullet lists.
        start: Option<u64>,
    },
    ListItem,
    TaskListMarker {
        checked: bool,
    },
    Table,
    TableCell {
        header: bool,
        align: CellAlign,
    },
    TableHeader,
    TableBody,
    TableRow,
    Math,
    MathBlock,
    DocumentMatter,
    Callout {
        id: String,
    },
    Index,
    Subscript,
    Superscript,
    FootnoteReference {
        label: String,
    },
    Footnote {
        label: String,
    },
    Other(String),
}

/// A node that owns children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub kind: NodeKind,
    pub attribute: Option<Attribute>,
    pub children: Vec<Node>,
}

/// A node without children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub kind: NodeKind,
    pub attribute: Option<Attribute>,
    /// Raw text, code or HTML, depending on the kind. Empty for breaks and rules.
    pub literal: String,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Container(Container),
    Leaf(Leaf),
}

impl Node {
    /// Creates a container node without attributes.
    pub fn container(kind: NodeKind, children: Vec<Node>) -> Self {
        Node::Container(Container {
            kind,
            attribute: None,
            children,
        })
    }

    /// Creates a leaf node without attributes.
    pub fn leaf(kind: NodeKind, literal: impl Into<String>) -> Self {
        Node::Leaf(Leaf {
            kind,
            attribute: None,
            literal: literal.into(),
        })
    }

    /// Creates a [`NodeKind::Text`] leaf.
    pub fn text(literal: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Text, literal)
    }

    /// Replaces the node's attribute set.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        match &mut self {
            Node::Container(c) => c.attribute = Some(attribute),
            Node::Leaf(l) => l.attribute = Some(attribute),
        }
        self
    }

    pub fn kind(&self) -> &NodeKind {
        match self {
            Node::Container(c) => &c.kind,
            Node::Leaf(l) => &l.kind,
        }
    }

    pub fn attribute(&self) -> Option<&Attribute> {
        match self {
            Node::Container(c) => c.attribute.as_ref(),
            Node::Leaf(l) => l.attribute.as_ref(),
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Node::Container(c) => Some(c),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(l) => Some(l),
            Node::Container(_) => None,
        }
    }

    /// Children of a container; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Container(c) => &c.children,
            Node::Leaf(_) => &[],
        }
    }

    /// Literal content of a leaf; empty for containers.
    pub fn literal(&self) -> &str {
        match self {
            Node::Leaf(l) => &l.literal,
            Node::Container(_) => "",
        }
    }

    /// Concatenated text content of the subtree, without any markup.
    ///
    /// Text, code and math literals contribute their content, breaks become a
    /// single space, everything else contributes only through its children.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_plain_text(&mut out);
        out
    }

    fn collect_plain_text(&self, out: &mut String) {
        match self {
            Node::Leaf(leaf) => match leaf.kind {
                NodeKind::Text | NodeKind::Code | NodeKind::Math => out.push_str(&leaf.literal),
                NodeKind::Softbreak | NodeKind::Hardbreak | NodeKind::NonBlockingSpace => {
                    out.push(' ')
                }
                _ => {}
            },
            Node::Container(container) => {
                for child in &container.children {
                    child.collect_plain_text(out);
                }
            }
        }
    }

    /// Finds the first node (pre-order) matching the predicate.
    pub fn find(&self, predicate: &dyn Fn(&Node) -> bool) -> Option<&Node> {
        if predicate(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(predicate))
    }
}

//! Node classification.
//!
//! Every [`NodeKind`] maps to exactly one rendering [`Strategy`], which fixes
//! both the template name looked up for the node and the payload shape the
//! template receives.
//!
//! | Strategy | Kinds | Template |
//! |----------|-------|----------|
//! | Closed | Softbreak, Hardbreak, NonBlockingSpace, HorizontalRule | `cr`, `br`, `nbsp`, `hr` |
//! | Text | Text | `text` |
//! | Span | Emphasis, Strong, Delete, TableHeader, TableRow, Subscript, Superscript | `em`, `strong`, `del`, `th`, `tr`, `sub`, `sup` |
//! | Block | BlockQuote, Aside, Paragraph, Table | `blockquote`, `aside`, `p`, `table` |
//! | Heading | Heading | `h1` .. `h6` |
//! | Fallback | everything else | none |

use crate::ast::NodeKind;

/// How a node kind is rendered through templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Void element rendered from a template that takes no data.
    Closed(&'static str),
    /// Literal text, pre-formatted by the fallback renderer.
    Text,
    /// Inline container.
    Span(&'static str),
    /// Block container.
    Block(&'static str),
    /// Heading container; the template name depends on the level.
    Heading(u8),
    /// Never templated; always rendered by the fallback renderer.
    Fallback,
}

impl Strategy {
    /// The template name for this strategy, if any.
    pub fn template_name(&self) -> Option<&'static str> {
        match self {
            Strategy::Closed(name) | Strategy::Span(name) | Strategy::Block(name) => Some(*name),
            Strategy::Text => Some(TEXT_TEMPLATE),
            Strategy::Heading(level) => Some(heading_template_name(*level)),
            Strategy::Fallback => None,
        }
    }
}

/// Name of the template used for text nodes.
pub const TEXT_TEMPLATE: &str = "text";

const HEADING_TEMPLATES: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Classifies a node kind.
pub fn classify(kind: &NodeKind) -> Strategy {
    match kind {
        NodeKind::Softbreak => Strategy::Closed("cr"),
        NodeKind::Hardbreak => Strategy::Closed("br"),
        NodeKind::NonBlockingSpace => Strategy::Closed("nbsp"),
        NodeKind::HorizontalRule => Strategy::Closed("hr"),

        NodeKind::Text => Strategy::Text,

        NodeKind::Emphasis => Strategy::Span("em"),
        NodeKind::Strong => Strategy::Span("strong"),
        NodeKind::Delete => Strategy::Span("del"),
        NodeKind::TableHeader => Strategy::Span("th"),
        NodeKind::TableRow => Strategy::Span("tr"),
        NodeKind::Subscript => Strategy::Span("sub"),
        NodeKind::Superscript => Strategy::Span("sup"),

        NodeKind::BlockQuote => Strategy::Block("blockquote"),
        NodeKind::Aside => Strategy::Block("aside"),
        NodeKind::Paragraph => Strategy::Block("p"),
        NodeKind::Table => Strategy::Block("table"),

        NodeKind::Heading { level } => Strategy::Heading(*level),

        NodeKind::Document
        | NodeKind::Link { .. }
        | NodeKind::CrossReference { .. }
        | NodeKind::Citation { .. }
        | NodeKind::Image { .. }
        | NodeKind::Code
        | NodeKind::CodeBlock { .. }
        | NodeKind::Caption
        | NodeKind::CaptionFigure
        | NodeKind::InlineHtml
        | NodeKind::BlockHtml
        | NodeKind::List { .. }
        | NodeKind::ListItem
        | NodeKind::TaskListMarker { .. }
        | NodeKind::TableCell { .. }
        | NodeKind::TableBody
        | NodeKind::Math
        | NodeKind::MathBlock
        | NodeKind::DocumentMatter
        | NodeKind::Callout { .. }
        | NodeKind::Index
        | NodeKind::FootnoteReference { .. }
        | NodeKind::Footnote { .. } => Strategy::Fallback,

        // Unhandled
        NodeKind::Other(_) => Strategy::Fallback,
    }
}

/// Clamps a heading level to `1..=6`. Out-of-range levels become 6.
pub fn heading_level(level: u8) -> u8 {
    match level {
        1..=6 => level,
        _ => 6,
    }
}

/// Template name for a heading level: `h1` .. `h6`, with out-of-range
/// levels mapped to `h6`.
pub fn heading_template_name(level: u8) -> &'static str {
    HEADING_TEMPLATES[usize::from(heading_level(level)) - 1]
}

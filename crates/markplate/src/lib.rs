//! # markplate
//!
//! Markdown to HTML with per-element templates.
//!
//! markplate parses markdown into a document tree and renders it node by
//! node. For every node it checks whether a user template exists for the
//! node's element (`p`, `em`, `h2`, `hr`, ...). If one does, the template
//! receives the node's rendered children and attributes and its output
//! replaces the default markup; otherwise the built-in HTML renderer handles
//! the node.
//!
//! ## Quick Start
//!
//! ```rust
//! use markplate::{parse, TemplateRenderer, Extensions};
//! use markplate::html::HtmlOptions;
//! use markplate::template::{MiniJinjaEngine, TemplateRegistry};
//!
//! let mut registry = TemplateRegistry::new();
//! registry.add_inline("p", "<P{{ Attrs }}>{{ Content }}</P>\n");
//! registry.add_inline("em", "<I>{{ Content }}</I>");
//! let engine = MiniJinjaEngine::from_registry(&registry).unwrap();
//!
//! let renderer = TemplateRenderer::with_html(Some(Box::new(engine)), HtmlOptions::plain());
//! let doc = parse("hi *there*\n", &Extensions::default());
//! assert_eq!(renderer.render(&doc).unwrap(), "<P>hi <I>there</I></P>\n");
//! ```
//!
//! ## Template Names and Payloads
//!
//! | Template | Payload |
//! |----------|---------|
//! | `cr`, `br`, `nbsp`, `hr` | none |
//! | `text` | `Content` (escaped text) |
//! | `em`, `strong`, `del`, `sub`, `sup`, `th`, `tr` | `Content`, `ID`, `Classes`, `Attr`, `Attrs` |
//! | `p`, `blockquote`, `aside`, `table` | same as above |
//! | `h1` .. `h6` | same as above |
//!
//! Elements without a template name (links, lists, code, ...) always use the
//! default HTML renderer; templated elements nested inside them are still
//! templated.
//!
//! ## Modules
//!
//! - [`ast`]: the document tree
//! - [`walk`]: depth-first traversal with skip and terminate signals
//! - [`classify`]: node kind to rendering strategy
//! - [`attributes`]: template payloads
//! - [`html`]: default HTML renderer and typographic substitutions
//! - [`template`]: template registry and engine
//! - [`parse`]: markdown front end
//! - [`config`]: YAML configuration

pub mod ast;
pub mod attributes;
pub mod classify;
pub mod config;
mod error;
pub mod html;
pub mod parse;
mod renderer;
pub mod template;
pub mod walk;

pub use ast::{Attribute, Node, NodeKind};
pub use config::{ConfigError, RenderConfig};
pub use error::{RenderError, TemplateError};
pub use html::{HtmlOptions, HtmlRenderer};
pub use parse::{parse, Extensions};
pub use renderer::{render, render_into, NodeRenderer, TemplateRenderer};
pub use walk::{walk, NodeVisitor, WalkStatus};

/// Parses `markdown` and renders it with `renderer`.
///
/// # Errors
///
/// Returns [`RenderError::Terminated`] if the render was terminated.
pub fn to_html(
    markdown: &str,
    extensions: &Extensions,
    renderer: &dyn NodeRenderer,
) -> Result<String, RenderError> {
    render(&parse(markdown, extensions), renderer)
}

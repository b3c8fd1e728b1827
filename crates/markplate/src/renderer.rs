//! Template-dispatch rendering.
//!
//! [`TemplateRenderer`] renders a document by asking, for every node, whether
//! a user template applies. The node's [`Strategy`] names the template and
//! fixes its payload:
//!
//! - Closed nodes (`hr`, `br`, ...) execute their template with `{}`.
//! - Text nodes are first rendered by the fallback renderer; the `text`
//!   template receives that output as `{ Content }`.
//! - Containers render their children into a scratch buffer, which becomes
//!   `Content` next to the node's attributes (see [`attributes`]).
//!
//! Whenever no template applies the node goes to the fallback
//! [`NodeRenderer`], so a renderer without templates produces exactly what
//! the fallback alone would.
//!
//! A failing template is logged with `tracing::error!` and terminates the
//! walk. [`TemplateRenderer::render`] then returns the failure; the partial
//! output is discarded.

use serde::Serialize;

use crate::ast::Node;
use crate::attributes::{self, ClosedPayload, TextPayload};
use crate::classify::{classify, heading_template_name, Strategy};
use crate::error::{RenderError, TemplateError};
use crate::html::{HtmlOptions, HtmlRenderer};
use crate::template::TemplateEngine;
use crate::walk::{walk, WalkStatus};

/// Renders one `(node, entering)` event into an output buffer.
///
/// Implementations are walk visitors: the returned [`WalkStatus`] steers the
/// traversal. They must be shareable across threads and keep no per-render
/// state, so one renderer serves many documents.
pub trait NodeRenderer: Send + Sync {
    fn render_node(&self, out: &mut String, node: &Node, entering: bool) -> WalkStatus;

    /// Writes anything that precedes the document body.
    fn render_header(&self, _out: &mut String, _document: &Node) {}

    /// Writes anything that follows the document body.
    fn render_footer(&self, _out: &mut String, _document: &Node) {}
}

/// Renders `document` with `renderer`, appending to `out`.
///
/// Returns [`WalkStatus::Terminate`] if the walk was terminated. The footer
/// is only written for completed walks; `out` keeps whatever was produced
/// before termination.
pub fn render_into(document: &Node, renderer: &dyn NodeRenderer, out: &mut String) -> WalkStatus {
    renderer.render_header(out, document);
    let status = walk(document, &mut |node: &Node, entering: bool| {
        renderer.render_node(out, node, entering)
    });
    if status == WalkStatus::Terminate {
        return status;
    }
    renderer.render_footer(out, document);
    WalkStatus::Continue
}

/// Renders `document` with `renderer`.
///
/// # Errors
///
/// Returns [`RenderError::Terminated`] if the walk was terminated.
pub fn render(document: &Node, renderer: &dyn NodeRenderer) -> Result<String, RenderError> {
    let mut out = String::new();
    match render_into(document, renderer, &mut out) {
        WalkStatus::Terminate => Err(RenderError::Terminated),
        _ => Ok(out),
    }
}

/// A renderer that applies user templates, falling back to another renderer.
///
/// # Example
///
/// ```rust
/// use markplate::ast::{Node, NodeKind};
/// use markplate::html::HtmlOptions;
/// use markplate::template::{MiniJinjaEngine, TemplateEngine};
/// use markplate::TemplateRenderer;
///
/// let mut engine = MiniJinjaEngine::new();
/// engine.add_template("em", "<i>{{ Content }}</i>").unwrap();
///
/// let renderer = TemplateRenderer::with_html(Some(Box::new(engine)), HtmlOptions::plain());
/// let doc = Node::container(NodeKind::Paragraph, vec![
///     Node::container(NodeKind::Emphasis, vec![Node::text("hi")]),
/// ]);
/// assert_eq!(renderer.render(&doc).unwrap(), "<p><i>hi</i></p>\n");
/// ```
pub struct TemplateRenderer {
    engine: Option<Box<dyn TemplateEngine>>,
    fallback: Box<dyn NodeRenderer>,
}

impl TemplateRenderer {
    /// Creates a renderer from a template engine and a fallback renderer.
    ///
    /// Without an engine every node goes to the fallback.
    pub fn new(engine: Option<Box<dyn TemplateEngine>>, fallback: Box<dyn NodeRenderer>) -> Self {
        Self { engine, fallback }
    }

    /// Creates a renderer that falls back to [`HtmlRenderer`].
    pub fn with_html(engine: Option<Box<dyn TemplateEngine>>, options: HtmlOptions) -> Self {
        Self::new(engine, Box::new(HtmlRenderer::new(options)))
    }

    /// Renders a whole document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] for the first template that failed,
    /// or [`RenderError::Terminated`] if the fallback renderer terminated.
    pub fn render(&self, document: &Node) -> Result<String, RenderError> {
        let mut out = String::new();
        self.render_header(&mut out, document);

        let mut dispatch = Dispatch::new(self);
        let status = walk(document, &mut |node: &Node, entering: bool| {
            dispatch.node(&mut out, node, entering)
        });
        if status == WalkStatus::Terminate {
            return Err(dispatch.failure.unwrap_or(RenderError::Terminated));
        }

        self.render_footer(&mut out, document);
        Ok(out)
    }

    /// The engine, if it holds a template under `name`.
    fn template(&self, name: &str) -> Option<&dyn TemplateEngine> {
        self.engine
            .as_deref()
            .filter(|engine| engine.has_template(name))
    }
}

impl NodeRenderer for TemplateRenderer {
    fn render_node(&self, out: &mut String, node: &Node, entering: bool) -> WalkStatus {
        Dispatch::new(self).node(out, node, entering)
    }

    fn render_header(&self, out: &mut String, document: &Node) {
        self.fallback.render_header(out, document);
    }

    fn render_footer(&self, out: &mut String, document: &Node) {
        self.fallback.render_footer(out, document);
    }
}

/// Per-render dispatch state: remembers the first template failure.
struct Dispatch<'r> {
    renderer: &'r TemplateRenderer,
    failure: Option<RenderError>,
}

impl<'r> Dispatch<'r> {
    fn new(renderer: &'r TemplateRenderer) -> Self {
        Self {
            renderer,
            failure: None,
        }
    }

    fn node(&mut self, out: &mut String, node: &Node, entering: bool) -> WalkStatus {
        let strategy = classify(node.kind());
        let Some(name) = strategy.template_name() else {
            return self.fallback(out, node, entering);
        };
        match strategy {
            Strategy::Closed(_) => self.render_closed(out, name, node, entering),
            Strategy::Text => self.render_text(out, name, node, entering),
            Strategy::Span(_) | Strategy::Block(_) => {
                self.render_container(out, name, node, entering)
            }
            Strategy::Heading(level) => self.render_heading(out, level, node, entering),
            Strategy::Fallback => self.fallback(out, node, entering),
        }
    }

    fn fallback(&self, out: &mut String, node: &Node, entering: bool) -> WalkStatus {
        self.renderer.fallback.render_node(out, node, entering)
    }

    fn render_closed(
        &mut self,
        out: &mut String,
        name: &str,
        node: &Node,
        entering: bool,
    ) -> WalkStatus {
        let renderer = self.renderer;
        let Some(engine) = renderer.template(name) else {
            return self.fallback(out, node, entering);
        };
        if !entering {
            return WalkStatus::Continue;
        }
        match self.execute(engine, name, &ClosedPayload {}) {
            Some(text) => {
                out.push_str(&text);
                WalkStatus::Continue
            }
            None => WalkStatus::Terminate,
        }
    }

    fn render_text(
        &mut self,
        out: &mut String,
        name: &str,
        node: &Node,
        entering: bool,
    ) -> WalkStatus {
        if !entering {
            return WalkStatus::Continue;
        }

        let mut literal = String::new();
        if self.fallback(&mut literal, node, entering) == WalkStatus::Terminate {
            return WalkStatus::Terminate;
        }

        let renderer = self.renderer;
        let Some(engine) = renderer.template(name) else {
            out.push_str(&literal);
            return WalkStatus::Continue;
        };
        match self.execute(engine, name, &TextPayload { content: literal }) {
            Some(text) => {
                out.push_str(&text);
                WalkStatus::Continue
            }
            None => WalkStatus::Terminate,
        }
    }

    fn render_heading(
        &mut self,
        out: &mut String,
        level: u8,
        node: &Node,
        entering: bool,
    ) -> WalkStatus {
        let name = heading_template_name(level);
        self.render_container(out, name, node, entering)
    }

    fn render_container(
        &mut self,
        out: &mut String,
        name: &str,
        node: &Node,
        entering: bool,
    ) -> WalkStatus {
        // No template: the fallback owns both the entering and the leaving event
        let renderer = self.renderer;
        let Some(engine) = renderer.template(name) else {
            return self.fallback(out, node, entering);
        };
        let Some(container) = node.as_container() else {
            return self.fallback(out, node, entering);
        };
        if !entering {
            return WalkStatus::SkipChildren;
        }

        let mut content = String::new();
        for child in &container.children {
            let status = walk(child, &mut |n: &Node, e: bool| self.node(&mut content, n, e));
            if status == WalkStatus::Terminate {
                return WalkStatus::Terminate;
            }
        }

        let mut payload = attributes::extract(node);
        payload.content = content;
        match self.execute(engine, name, &payload) {
            Some(text) => {
                out.push_str(&text);
                WalkStatus::SkipChildren
            }
            None => WalkStatus::Terminate,
        }
    }

    /// Runs a template. A failure is logged and remembered; returns `None`.
    fn execute<T: Serialize>(
        &mut self,
        engine: &dyn TemplateEngine,
        name: &str,
        payload: &T,
    ) -> Option<String> {
        let result = serde_json::to_value(payload)
            .map_err(TemplateError::from)
            .and_then(|data| engine.render_named(name, &data));

        match result {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::error!(template = name, error = %err, "template rendering error");
                if self.failure.is_none() {
                    self.failure = Some(RenderError::Template {
                        name: name.to_string(),
                        source: err,
                    });
                }
                None
            }
        }
    }
}

//! Markdown front end.
//!
//! [`parse`] turns markdown into a document tree by folding the
//! `pulldown-cmark` event stream over a stack of open frames. A few shapes
//! are normalised on the way so renderers see a stable tree:
//!
//! - adjacent text events merge into a single `Text` leaf
//! - fenced and indented code blocks become one `CodeBlock` leaf
//! - table header cells are wrapped in `TableHeader > TableRow`, body rows in
//!   `TableBody`; cells know whether they are header cells and their column
//!   alignment
//! - raw HTML is `BlockHtml` between blocks and `InlineHtml` inside them

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

use crate::ast::{Attribute, CellAlign, Container, Leaf, Node, NodeKind};

/// Markdown extensions to enable.
///
/// CommonMark features (fenced code, `<...>` autolinks, ...) are always on.
/// Bare URLs are not linked; pulldown-cmark has no extension for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extensions {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub tasklists: bool,
    /// `# Heading {#id .class}`
    pub heading_attributes: bool,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            footnotes: false,
            tasklists: false,
            heading_attributes: true,
        }
    }
}

impl Extensions {
    fn options(&self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_HEADING_ATTRIBUTES, self.heading_attributes);
        options
    }
}

/// Parses markdown into a [`NodeKind::Document`] tree.
pub fn parse(markdown: &str, extensions: &Extensions) -> Node {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, extensions.options()) {
        builder.event(event);
    }
    builder.finish()
}

struct Frame {
    kind: NodeKind,
    attribute: Option<Attribute>,
    children: Vec<Node>,
    /// Set for code blocks, which collect their text instead of children.
    code: Option<String>,
}

impl Frame {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attribute: None,
            children: Vec::new(),
            code: None,
        }
    }

    fn into_node(self) -> Node {
        match self.code {
            Some(literal) => Node::Leaf(Leaf {
                kind: self.kind,
                attribute: self.attribute,
                literal,
            }),
            None => Node::Container(Container {
                kind: self.kind,
                attribute: self.attribute,
                children: self.children,
            }),
        }
    }

    /// Whether raw HTML inside this frame is inline.
    fn is_inline_context(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Paragraph
                | NodeKind::Heading { .. }
                | NodeKind::Emphasis
                | NodeKind::Strong
                | NodeKind::Delete
                | NodeKind::Link { .. }
                | NodeKind::Image { .. }
                | NodeKind::TableCell { .. }
        )
    }
}

struct TreeBuilder {
    /// Open frames; the document frame at the bottom is never popped.
    stack: Vec<Frame>,
    alignments: Vec<CellAlign>,
    in_table_head: bool,
    column: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(NodeKind::Document)],
            alignments: Vec::new(),
            in_table_head: false,
            column: 0,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push(Node::leaf(NodeKind::Code, code.to_string())),
            Event::Html(html) => self.html(&html),
            Event::FootnoteReference(label) => self.push(Node::leaf(
                NodeKind::FootnoteReference {
                    label: label.to_string(),
                },
                "",
            )),
            Event::SoftBreak => self.push(Node::leaf(NodeKind::Softbreak, "")),
            Event::HardBreak => self.push(Node::leaf(NodeKind::Hardbreak, "")),
            Event::Rule => self.push(Node::leaf(NodeKind::HorizontalRule, "")),
            Event::TaskListMarker(checked) => {
                self.push(Node::leaf(NodeKind::TaskListMarker { checked }, ""))
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(NodeKind::Paragraph),
            Tag::Heading(level, id, classes) => {
                let mut frame = Frame::new(NodeKind::Heading { level: level as u8 });
                if id.is_some() || !classes.is_empty() {
                    let mut attribute = Attribute::new();
                    attribute.id = id.map(str::to_string);
                    attribute.classes = classes.into_iter().map(str::to_string).collect();
                    frame.attribute = Some(attribute);
                }
                self.stack.push(frame);
            }
            Tag::BlockQuote => self.open(NodeKind::BlockQuote),
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                let mut frame = Frame::new(NodeKind::CodeBlock { info });
                frame.code = Some(String::new());
                self.stack.push(frame);
            }
            Tag::List(start) => self.open(NodeKind::List { start }),
            Tag::Item => self.open(NodeKind::ListItem),
            Tag::FootnoteDefinition(label) => self.open(NodeKind::Footnote {
                label: label.to_string(),
            }),
            Tag::Table(alignments) => {
                self.alignments = alignments.into_iter().map(cell_align).collect();
                self.open(NodeKind::Table);
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.column = 0;
                self.open(NodeKind::TableHeader);
                self.open(NodeKind::TableRow);
            }
            Tag::TableRow => {
                if !self.top_is(&NodeKind::TableBody) {
                    self.open(NodeKind::TableBody);
                }
                self.column = 0;
                self.open(NodeKind::TableRow);
            }
            Tag::TableCell => {
                let align = self.alignments.get(self.column).copied().unwrap_or_default();
                self.column += 1;
                self.open(NodeKind::TableCell {
                    header: self.in_table_head,
                    align,
                });
            }
            Tag::Emphasis => self.open(NodeKind::Emphasis),
            Tag::Strong => self.open(NodeKind::Strong),
            Tag::Strikethrough => self.open(NodeKind::Delete),
            Tag::Link(_, destination, title) => self.open(NodeKind::Link {
                destination: destination.to_string(),
                title: title.to_string(),
            }),
            Tag::Image(_, destination, title) => self.open(NodeKind::Image {
                destination: destination.to_string(),
                title: title.to_string(),
            }),
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::TableHead => {
                self.close(); // row
                self.close(); // header
                self.in_table_head = false;
            }
            Tag::Table(_) => {
                if self.top_is(&NodeKind::TableBody) {
                    self.close();
                }
                self.close();
                self.alignments.clear();
            }
            _ => self.close(),
        }
    }

    fn text(&mut self, text: &str) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        if let Some(code) = &mut frame.code {
            code.push_str(text);
            return;
        }
        if let Some(Node::Leaf(leaf)) = frame.children.last_mut() {
            if leaf.kind == NodeKind::Text && leaf.attribute.is_none() {
                leaf.literal.push_str(text);
                return;
            }
        }
        frame.children.push(Node::text(text));
    }

    fn html(&mut self, html: &str) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        if frame.is_inline_context() {
            frame.children.push(Node::leaf(NodeKind::InlineHtml, html));
            return;
        }
        if let Some(Node::Leaf(leaf)) = frame.children.last_mut() {
            if leaf.kind == NodeKind::BlockHtml {
                leaf.literal.push_str(html);
                return;
            }
        }
        frame.children.push(Node::leaf(NodeKind::BlockHtml, html));
    }

    fn open(&mut self, kind: NodeKind) {
        self.stack.push(Frame::new(kind));
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            self.push(frame.into_node());
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn top_is(&self, kind: &NodeKind) -> bool {
        self.stack.last().is_some_and(|frame| &frame.kind == kind)
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack
            .pop()
            .map(Frame::into_node)
            .unwrap_or_else(|| Node::container(NodeKind::Document, Vec::new()))
    }
}

fn cell_align(alignment: Alignment) -> CellAlign {
    match alignment {
        Alignment::None => CellAlign::None,
        Alignment::Left => CellAlign::Left,
        Alignment::Center => CellAlign::Center,
        Alignment::Right => CellAlign::Right,
    }
}

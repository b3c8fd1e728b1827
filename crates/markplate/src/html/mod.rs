//! Default HTML renderer.
//!
//! [`HtmlRenderer`] produces canonical HTML for every [`NodeKind`]. It is the
//! fallback target of [`TemplateRenderer`](crate::TemplateRenderer): whenever
//! no template applies, the node is handed to this renderer, which also
//! formats the literal text of text nodes before a `text` template sees it.
//!
//! Rendering is event-driven: containers emit their opening markup on the
//! entering event and their closing markup on the leaving event, leaving the
//! traversal of children to the walker. The only exception is
//! [`NodeKind::Image`], which renders in one step (the alt text is the plain
//! text of its children) and skips its children.

pub mod escape;
pub mod smartypants;

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::ast::{Node, NodeKind};
use crate::attributes;
use crate::classify::heading_level;
use crate::renderer::NodeRenderer;
use crate::walk::WalkStatus;

use escape::escape_html;
use smartypants::{smarten, SmartyRules};

/// Options of the default HTML renderer.
///
/// The three smartypants flags are on by default; everything else is off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// Apply typographic substitutions to text.
    pub smartypants: bool,
    /// Render any `n/d` as a superscript/subscript fraction.
    pub smartypants_fractions: bool,
    /// `--` is an en dash and `---` an em dash.
    pub smartypants_latex_dashes: bool,
    /// Self-close void elements (`<br />`).
    pub xhtml: bool,
    /// Drop raw HTML from the input.
    pub skip_html: bool,
    /// Open absolute links in a new window.
    pub href_target_blank: bool,
    /// Wrap the output in a full HTML page.
    pub complete_page: bool,
    /// Page title; defaults to the text of the first heading.
    pub title: Option<String>,
    /// Stylesheet URL linked from the page head.
    pub css: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            smartypants: true,
            smartypants_fractions: true,
            smartypants_latex_dashes: true,
            xhtml: false,
            skip_html: false,
            href_target_blank: false,
            complete_page: false,
            title: None,
            css: None,
        }
    }
}

impl HtmlOptions {
    /// Options with every flag off: plain escaping, HTML5 void tags.
    pub fn plain() -> Self {
        Self {
            smartypants: false,
            smartypants_fractions: false,
            smartypants_latex_dashes: false,
            ..Self::default()
        }
    }
}

/// Renders nodes as HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: HtmlOptions,
}

impl HtmlRenderer {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    fn void_close(&self) -> &'static str {
        if self.options.xhtml {
            " />"
        } else {
            ">"
        }
    }

    fn text(&self, out: &mut String, text: &str) {
        if self.options.smartypants {
            let rules = SmartyRules {
                latex_dashes: self.options.smartypants_latex_dashes,
                fractions: self.options.smartypants_fractions,
            };
            smarten(out, text, rules);
        } else {
            escape_html(out, text);
        }
    }

    fn inline_tag(&self, out: &mut String, tag: &str, node: &Node, entering: bool) {
        if entering {
            let _ = write!(out, "<{}{}>", tag, attributes::extract(node).attrs);
        } else {
            let _ = write!(out, "</{}>", tag);
        }
    }

    /// Block element whose content starts on the same line (`<p>text</p>`).
    fn block_tag(&self, out: &mut String, tag: &str, node: &Node, entering: bool) {
        if entering {
            cr(out);
            let _ = write!(out, "<{}{}>", tag, attributes::extract(node).attrs);
        } else {
            let _ = writeln!(out, "</{}>", tag);
        }
    }

    /// Block element wrapping other blocks (`<blockquote>\n...\n</blockquote>`).
    fn wrapper_tag(&self, out: &mut String, tag: &str, node: &Node, entering: bool) {
        if entering {
            cr(out);
            let _ = writeln!(out, "<{}{}>", tag, attributes::extract(node).attrs);
        } else {
            cr(out);
            let _ = writeln!(out, "</{}>", tag);
        }
    }

    fn link(&self, out: &mut String, destination: &str, title: &str, node: &Node) {
        out.push_str("<a href=\"");
        escape_html(out, destination);
        out.push('"');
        if !title.is_empty() {
            out.push_str(" title=\"");
            escape_html(out, title);
            out.push('"');
        }
        if self.options.href_target_blank && is_absolute_link(destination) {
            out.push_str(" target=\"_blank\"");
        }
        out.push_str(&attributes::extract(node).attrs);
        out.push('>');
    }

    fn image(&self, out: &mut String, destination: &str, title: &str, node: &Node) {
        out.push_str("<img src=\"");
        escape_html(out, destination);
        out.push_str("\" alt=\"");
        escape_html(out, &node.plain_text());
        out.push('"');
        if !title.is_empty() {
            out.push_str(" title=\"");
            escape_html(out, title);
            out.push('"');
        }
        out.push_str(&attributes::extract(node).attrs);
        out.push_str(self.void_close());
    }

    fn code_block(&self, out: &mut String, info: &str, literal: &str) {
        cr(out);
        out.push_str("<pre><code");
        if let Some(lang) = info.split_whitespace().next() {
            out.push_str(" class=\"language-");
            escape_html(out, lang);
            out.push('"');
        }
        out.push('>');
        escape_html(out, literal);
        out.push_str("</code></pre>\n");
    }

    fn table_cell(&self, out: &mut String, node: &Node, entering: bool) {
        let NodeKind::TableCell { header, align } = node.kind() else {
            return;
        };
        let tag = if *header { "th" } else { "td" };
        if entering {
            let _ = write!(out, "<{}", tag);
            if let Some(align) = align.as_str() {
                let _ = write!(out, " align=\"{}\"", align);
            }
            let _ = write!(out, "{}>", attributes::extract(node).attrs);
        } else {
            let _ = writeln!(out, "</{}>", tag);
        }
    }

    fn page_title(&self, document: &Node) -> String {
        if let Some(title) = &self.options.title {
            return title.clone();
        }
        document
            .find(&|n| matches!(n.kind(), NodeKind::Heading { .. }))
            .map(Node::plain_text)
            .unwrap_or_default()
    }
}

impl HtmlRenderer {
    /// Renders one event: containers open on entering and close on leaving.
    fn render_event(&self, out: &mut String, node: &Node, entering: bool) -> WalkStatus {
        match node.kind() {
            NodeKind::Document | NodeKind::Index | NodeKind::DocumentMatter | NodeKind::Other(_) => {}
            NodeKind::Text => self.text(out, node.literal()),
            NodeKind::Softbreak => out.push('\n'),
            NodeKind::Hardbreak => {
                let _ = writeln!(out, "<br{}", self.void_close());
            }
            NodeKind::NonBlockingSpace => out.push_str("&nbsp;"),
            NodeKind::HorizontalRule => {
                cr(out);
                let _ = writeln!(out, "<hr{}", self.void_close());
            }
            NodeKind::Emphasis => self.inline_tag(out, "em", node, entering),
            NodeKind::Strong => self.inline_tag(out, "strong", node, entering),
            NodeKind::Delete => self.inline_tag(out, "del", node, entering),
            NodeKind::Subscript => self.inline_tag(out, "sub", node, entering),
            NodeKind::Superscript => self.inline_tag(out, "sup", node, entering),
            NodeKind::Paragraph => self.block_tag(out, "p", node, entering),
            NodeKind::Heading { level } => {
                let tag = format!("h{}", heading_level(*level));
                self.block_tag(out, &tag, node, entering);
            }
            NodeKind::BlockQuote => self.wrapper_tag(out, "blockquote", node, entering),
            NodeKind::Aside => self.wrapper_tag(out, "aside", node, entering),
            NodeKind::CaptionFigure => self.wrapper_tag(out, "figure", node, entering),
            NodeKind::Caption => self.block_tag(out, "figcaption", node, entering),
            NodeKind::Link { destination, title } => {
                if entering {
                    self.link(out, destination, title, node);
                } else {
                    out.push_str("</a>");
                }
            }
            NodeKind::CrossReference { destination } => {
                if entering {
                    out.push_str("<a href=\"#");
                    escape_html(out, destination);
                    out.push_str("\">");
                } else {
                    out.push_str("</a>");
                }
            }
            NodeKind::Citation { keys } => {
                out.push_str("<cite>");
                escape_html(out, &keys.join("; "));
                out.push_str("</cite>");
            }
            NodeKind::Image { destination, title } => {
                if entering {
                    self.image(out, destination, title, node);
                }
                return WalkStatus::SkipChildren;
            }
            NodeKind::Code => {
                out.push_str("<code>");
                escape_html(out, node.literal());
                out.push_str("</code>");
            }
            NodeKind::CodeBlock { info } => self.code_block(out, info, node.literal()),
            NodeKind::InlineHtml => {
                if !self.options.skip_html {
                    out.push_str(node.literal());
                }
            }
            NodeKind::BlockHtml => {
                if !self.options.skip_html {
                    cr(out);
                    out.push_str(node.literal());
                    cr(out);
                }
            }
            NodeKind::List { start } => {
                let tag = if start.is_some() { "ol" } else { "ul" };
                if entering {
                    cr(out);
                    let _ = write!(out, "<{}", tag);
                    if let Some(n) = start.filter(|n| *n != 1) {
                        let _ = write!(out, " start=\"{}\"", n);
                    }
                    let _ = writeln!(out, "{}>", attributes::extract(node).attrs);
                } else {
                    cr(out);
                    let _ = writeln!(out, "</{}>", tag);
                }
            }
            NodeKind::ListItem => {
                if entering {
                    cr(out);
                    let _ = write!(out, "<li{}>", attributes::extract(node).attrs);
                } else {
                    let _ = writeln!(out, "</li>");
                }
            }
            NodeKind::TaskListMarker { checked } => {
                out.push_str("<input disabled=\"\" type=\"checkbox\"");
                if *checked {
                    out.push_str(" checked=\"\"");
                }
                out.push_str(self.void_close());
                out.push(' ');
            }
            NodeKind::Table => self.wrapper_tag(out, "table", node, entering),
            NodeKind::TableHeader => self.wrapper_tag(out, "thead", node, entering),
            NodeKind::TableBody => self.wrapper_tag(out, "tbody", node, entering),
            NodeKind::TableRow => self.wrapper_tag(out, "tr", node, entering),
            NodeKind::TableCell { .. } => self.table_cell(out, node, entering),
            NodeKind::Math => {
                out.push_str("<span class=\"math inline\">\\(");
                escape_html(out, node.literal());
                out.push_str("\\)</span>");
            }
            NodeKind::MathBlock => {
                if entering {
                    cr(out);
                    out.push_str("<div class=\"math display\">\\[");
                } else {
                    out.push_str("\\]</div>\n");
                }
            }
            NodeKind::Callout { id } => {
                out.push_str("<span class=\"callout\">");
                escape_html(out, id);
                out.push_str("</span>");
            }
            NodeKind::FootnoteReference { label } => {
                out.push_str("<sup class=\"footnote-reference\"><a href=\"#fn:");
                escape_html(out, label);
                out.push_str("\">");
                escape_html(out, label);
                out.push_str("</a></sup>");
            }
            NodeKind::Footnote { label } => {
                if entering {
                    cr(out);
                    out.push_str("<div class=\"footnote-definition\" id=\"fn:");
                    escape_html(out, label);
                    out.push_str("\"><sup class=\"footnote-definition-label\">");
                    escape_html(out, label);
                    out.push_str("</sup>\n");
                } else {
                    cr(out);
                    out.push_str("</div>\n");
                }
            }
        }
        WalkStatus::Continue
    }
}

impl NodeRenderer for HtmlRenderer {
    fn render_node(&self, out: &mut String, node: &Node, entering: bool) -> WalkStatus {
        let status = self.render_event(out, node, entering);
        // Leaves get no leaving event, so close what entering opened
        if entering && node.as_leaf().is_some() && has_closing_markup(node.kind()) {
            self.render_event(out, node, false);
        }
        status
    }

    fn render_header(&self, out: &mut String, document: &Node) {
        if !self.options.complete_page {
            return;
        }
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n  <title>");
        escape_html(out, &self.page_title(document));
        out.push_str("</title>\n");
        let _ = writeln!(out, "  <meta charset=\"utf-8\"{}", self.void_close());
        if let Some(css) = &self.options.css {
            out.push_str("  <link rel=\"stylesheet\" type=\"text/css\" href=\"");
            escape_html(out, css);
            let _ = writeln!(out, "\"{}", self.void_close());
        }
        out.push_str("</head>\n<body>\n\n");
    }

    fn render_footer(&self, out: &mut String, _document: &Node) {
        if self.options.complete_page {
            out.push_str("\n</body>\n</html>\n");
        }
    }
}

/// Starts a new line unless the output is empty or already at one.
fn cr(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Kinds whose markup is split between the entering and the leaving event.
fn has_closing_markup(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Delete
            | NodeKind::Subscript
            | NodeKind::Superscript
            | NodeKind::Paragraph
            | NodeKind::Heading { .. }
            | NodeKind::BlockQuote
            | NodeKind::Aside
            | NodeKind::CaptionFigure
            | NodeKind::Caption
            | NodeKind::Link { .. }
            | NodeKind::CrossReference { .. }
            | NodeKind::List { .. }
            | NodeKind::ListItem
            | NodeKind::Table
            | NodeKind::TableHeader
            | NodeKind::TableBody
            | NodeKind::TableRow
            | NodeKind::TableCell { .. }
            | NodeKind::MathBlock
            | NodeKind::Footnote { .. }
    )
}

fn is_absolute_link(destination: &str) -> bool {
    destination.contains("://") || destination.starts_with("mailto:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Attribute, CellAlign};
    use crate::renderer::render;

    fn html(node: &Node) -> String {
        render(node, &HtmlRenderer::new(HtmlOptions::plain())).unwrap()
    }

    fn doc(children: Vec<Node>) -> Node {
        Node::container(NodeKind::Document, children)
    }

    #[test]
    fn test_paragraph_with_emphasis() {
        let tree = doc(vec![Node::container(
            NodeKind::Paragraph,
            vec![
                Node::text("hi "),
                Node::container(NodeKind::Emphasis, vec![Node::text("there")]),
            ],
        )]);
        assert_eq!(html(&tree), "<p>hi <em>there</em></p>\n");
    }

    #[test]
    fn test_heading_with_attributes() {
        let tree = doc(vec![Node::container(
            NodeKind::Heading { level: 2 },
            vec![Node::text("Title")],
        )
        .with_attribute(Attribute::new().with_id("t").with_class("x"))]);
        assert_eq!(html(&tree), "<h2 class=\"x\" id=\"t\">Title</h2>\n");
    }

    #[test]
    fn test_heading_level_clamped() {
        let tree = doc(vec![Node::container(
            NodeKind::Heading { level: 9 },
            vec![Node::text("deep")],
        )]);
        assert_eq!(html(&tree), "<h6>deep</h6>\n");
    }

    #[test]
    fn test_void_elements_html_and_xhtml() {
        let tree = doc(vec![
            Node::container(
                NodeKind::Paragraph,
                vec![
                    Node::text("a"),
                    Node::leaf(NodeKind::Hardbreak, ""),
                    Node::text("b"),
                ],
            ),
            Node::leaf(NodeKind::HorizontalRule, ""),
        ]);
        assert_eq!(html(&tree), "<p>a<br>\nb</p>\n<hr>\n");

        let xhtml = HtmlRenderer::new(HtmlOptions {
            xhtml: true,
            ..HtmlOptions::plain()
        });
        assert_eq!(render(&tree, &xhtml).unwrap(), "<p>a<br />\nb</p>\n<hr />\n");
    }

    #[test]
    fn test_text_is_escaped() {
        let tree = doc(vec![Node::container(
            NodeKind::Paragraph,
            vec![Node::text("a < b & \"c\"")],
        )]);
        assert_eq!(html(&tree), "<p>a &lt; b &amp; &quot;c&quot;</p>\n");
    }

    #[test]
    fn test_smartypants_applies_to_text_only() {
        let renderer = HtmlRenderer::new(HtmlOptions::default());
        let tree = doc(vec![Node::container(
            NodeKind::Paragraph,
            vec![Node::text("\"a\" -- "), Node::leaf(NodeKind::Code, "\"b\" --")],
        )]);
        assert_eq!(
            render(&tree, &renderer).unwrap(),
            "<p>&ldquo;a&rdquo; &ndash; <code>&quot;b&quot; --</code></p>\n"
        );
    }

    #[test]
    fn test_link_and_image() {
        let tree = doc(vec![Node::container(
            NodeKind::Paragraph,
            vec![
                Node::container(
                    NodeKind::Link {
                        destination: "https://x.test/?a=1&b=2".into(),
                        title: "T".into(),
                    },
                    vec![Node::text("x")],
                ),
                Node::container(
                    NodeKind::Image {
                        destination: "i.png".into(),
                        title: String::new(),
                    },
                    vec![
                        Node::text("alt "),
                        Node::container(NodeKind::Emphasis, vec![Node::text("text")]),
                    ],
                ),
            ],
        )]);
        assert_eq!(
            html(&tree),
            "<p><a href=\"https://x.test/?a=1&amp;b=2\" title=\"T\">x</a>\
             <img src=\"i.png\" alt=\"alt text\"></p>\n"
        );
    }

    #[test]
    fn test_target_blank_only_for_absolute_links() {
        let renderer = HtmlRenderer::new(HtmlOptions {
            href_target_blank: true,
            ..HtmlOptions::plain()
        });
        let link = |dest: &str| {
            Node::container(
                NodeKind::Link {
                    destination: dest.into(),
                    title: String::new(),
                },
                vec![Node::text("l")],
            )
        };
        assert_eq!(
            render(&link("https://a.test"), &renderer).unwrap(),
            "<a href=\"https://a.test\" target=\"_blank\">l</a>"
        );
        assert_eq!(
            render(&link("/local"), &renderer).unwrap(),
            "<a href=\"/local\">l</a>"
        );
    }

    #[test]
    fn test_code_block() {
        let tree = doc(vec![Node::leaf(
            NodeKind::CodeBlock {
                info: "rust ignore".into(),
            },
            "let a = 1 < 2;\n",
        )]);
        assert_eq!(
            html(&tree),
            "<pre><code class=\"language-rust\">let a = 1 &lt; 2;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_lists() {
        let item = |t: &str| {
            Node::container(
                NodeKind::ListItem,
                vec![Node::text(t)],
            )
        };
        let tree = doc(vec![
            Node::container(NodeKind::List { start: None }, vec![item("a"), item("b")]),
            Node::container(NodeKind::List { start: Some(3) }, vec![item("c")]),
        ]);
        assert_eq!(
            html(&tree),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<ol start=\"3\">\n<li>c</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_table() {
        let cell = |header: bool, align: CellAlign, t: &str| {
            Node::container(NodeKind::TableCell { header, align }, vec![Node::text(t)])
        };
        let tree = doc(vec![Node::container(
            NodeKind::Table,
            vec![
                Node::container(
                    NodeKind::TableHeader,
                    vec![Node::container(
                        NodeKind::TableRow,
                        vec![cell(true, CellAlign::Left, "h")],
                    )],
                ),
                Node::container(
                    NodeKind::TableBody,
                    vec![Node::container(
                        NodeKind::TableRow,
                        vec![cell(false, CellAlign::None, "d")],
                    )],
                ),
            ],
        )]);
        assert_eq!(
            html(&tree),
            "<table>\n<thead>\n<tr>\n<th align=\"left\">h</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n<td>d</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_raw_html_and_skip_html() {
        let tree = doc(vec![
            Node::leaf(NodeKind::BlockHtml, "<div>raw</div>"),
            Node::container(
                NodeKind::Paragraph,
                vec![Node::leaf(NodeKind::InlineHtml, "<b>"), Node::text("x")],
            ),
        ]);
        assert_eq!(html(&tree), "<div>raw</div>\n<p><b>x</p>\n");

        let skipping = HtmlRenderer::new(HtmlOptions {
            skip_html: true,
            ..HtmlOptions::plain()
        });
        assert_eq!(render(&tree, &skipping).unwrap(), "<p>x</p>\n");
    }

    #[test]
    fn test_unhandled_kinds_render_children_only() {
        let tree = doc(vec![Node::container(
            NodeKind::Other("custom".into()),
            vec![Node::text("inner")],
        )]);
        assert_eq!(html(&tree), "inner");
    }

    #[test]
    fn test_leaf_shaped_containers_are_closed() {
        let tree = doc(vec![Node::container(
            NodeKind::Paragraph,
            vec![Node::leaf(NodeKind::Emphasis, ""), Node::text("x")],
        )]);
        assert_eq!(html(&tree), "<p><em></em>x</p>\n");

        let tree = doc(vec![Node::leaf(NodeKind::Paragraph, "")]);
        assert_eq!(html(&tree), "<p></p>\n");
    }

    #[test]
    fn test_complete_page() {
        let renderer = HtmlRenderer::new(HtmlOptions {
            complete_page: true,
            css: Some("style.css".into()),
            ..HtmlOptions::plain()
        });
        let tree = doc(vec![Node::container(
            NodeKind::Heading { level: 1 },
            vec![Node::text("My <Page>")],
        )]);
        let out = render(&tree, &renderer).unwrap();
        assert!(out.starts_with("<!DOCTYPE html>\n<html>\n<head>\n  <title>My &lt;Page&gt;</title>\n"));
        assert!(out.contains("<link rel=\"stylesheet\" type=\"text/css\" href=\"style.css\">\n"));
        assert!(out.contains("<body>\n\n<h1>My &lt;Page&gt;</h1>\n"));
        assert!(out.ends_with("\n</body>\n</html>\n"));
    }

    #[test]
    fn test_explicit_title_wins() {
        let renderer = HtmlRenderer::new(HtmlOptions {
            complete_page: true,
            title: Some("Explicit".into()),
            ..HtmlOptions::plain()
        });
        let tree = doc(vec![Node::container(
            NodeKind::Heading { level: 1 },
            vec![Node::text("Heading")],
        )]);
        assert!(render(&tree, &renderer)
            .unwrap()
            .contains("<title>Explicit</title>"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: HtmlOptions = serde_yaml::from_str("xhtml: true\n").unwrap();
        assert!(options.xhtml);
        assert!(options.smartypants);
        assert!(!options.complete_page);
    }
}

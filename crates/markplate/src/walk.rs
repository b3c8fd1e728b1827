//! Depth-first tree traversal with visitor control signals.
//!
//! [`walk`] calls a [`NodeVisitor`] for every node: once with `entering = true`
//! before the node's children, and, for containers, once more with
//! `entering = false` after them. Leaves are visited once.
//!
//! The visitor steers the walk through the [`WalkStatus`] it returns:
//!
//! | Status | On entering | On leaving |
//! |--------|-------------|------------|
//! | `Continue` | descend into children, then emit leaving | move on |
//! | `SkipChildren` | no descent, no leaving event | move on |
//! | `Terminate` | abort the whole walk | abort the whole walk |
//!
//! Terminate unwinds without visiting siblings and without the leaving
//! events of any ancestor.

use crate::ast::Node;

/// Control signal returned by a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// Keep walking: descend into children (when entering) or advance.
    Continue,
    /// Do not descend into this node's children and do not emit its leaving event.
    SkipChildren,
    /// Stop the walk immediately.
    Terminate,
}

/// Receives `(node, entering)` events from [`walk`].
pub trait NodeVisitor {
    fn visit(&mut self, node: &Node, entering: bool) -> WalkStatus;
}

impl<F> NodeVisitor for F
where
    F: FnMut(&Node, bool) -> WalkStatus,
{
    fn visit(&mut self, node: &Node, entering: bool) -> WalkStatus {
        self(node, entering)
    }
}

/// Walks the subtree rooted at `node`.
///
/// Returns [`WalkStatus::Terminate`] if the visitor terminated the walk,
/// [`WalkStatus::Continue`] otherwise.
pub fn walk<V>(node: &Node, visitor: &mut V) -> WalkStatus
where
    V: NodeVisitor + ?Sized,
{
    match visitor.visit(node, true) {
        WalkStatus::Terminate => return WalkStatus::Terminate,
        WalkStatus::SkipChildren => return WalkStatus::Continue,
        WalkStatus::Continue => {}
    }

    let Some(container) = node.as_container() else {
        return WalkStatus::Continue;
    };

    for child in &container.children {
        if walk(child, visitor) == WalkStatus::Terminate {
            return WalkStatus::Terminate;
        }
    }

    match visitor.visit(node, false) {
        WalkStatus::Terminate => WalkStatus::Terminate,
        _ => WalkStatus::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    fn label(node: &Node) -> String {
        match node.kind() {
            NodeKind::Text => node.literal().to_string(),
            other => format!("{:?}", other),
        }
    }

    fn sample() -> Node {
        Node::container(
            NodeKind::Document,
            vec![
                Node::container(
                    NodeKind::Paragraph,
                    vec![
                        Node::text("a"),
                        Node::container(NodeKind::Emphasis, vec![Node::text("b")]),
                        Node::text("c"),
                    ],
                ),
                Node::leaf(NodeKind::HorizontalRule, ""),
            ],
        )
    }

    fn record(
        root: &Node,
        mut decide: impl FnMut(&Node, bool) -> WalkStatus,
    ) -> (Vec<String>, WalkStatus) {
        let mut events = Vec::new();
        let status = walk(root, &mut |node: &Node, entering: bool| {
            events.push(format!("{}{}", if entering { "+" } else { "-" }, label(node)));
            decide(node, entering)
        });
        (events, status)
    }

    #[test]
    fn test_full_walk_order() {
        let (events, status) = record(&sample(), |_, _| WalkStatus::Continue);
        assert_eq!(status, WalkStatus::Continue);
        assert_eq!(
            events,
            vec![
                "+Document",
                "+Paragraph",
                "+a",
                "+Emphasis",
                "+b",
                "-Emphasis",
                "+c",
                "-Paragraph",
                "+HorizontalRule",
                "-Document",
            ]
        );
    }

    #[test]
    fn test_skip_children_suppresses_descent_and_leaving() {
        let (events, status) = record(&sample(), |node, _| {
            if *node.kind() == NodeKind::Emphasis {
                WalkStatus::SkipChildren
            } else {
                WalkStatus::Continue
            }
        });
        assert_eq!(status, WalkStatus::Continue);
        assert!(events.contains(&"+Emphasis".to_string()));
        assert!(!events.contains(&"+b".to_string()));
        assert!(!events.contains(&"-Emphasis".to_string()));
        // Siblings still visited
        assert!(events.contains(&"+c".to_string()));
    }

    #[test]
    fn test_terminate_unwinds_without_closing_ancestors() {
        let (events, status) = record(&sample(), |node, _| {
            if node.literal() == "b" {
                WalkStatus::Terminate
            } else {
                WalkStatus::Continue
            }
        });
        assert_eq!(status, WalkStatus::Terminate);
        assert_eq!(
            events,
            vec!["+Document", "+Paragraph", "+a", "+Emphasis", "+b"]
        );
    }

    #[test]
    fn test_terminate_on_leaving() {
        let (events, status) = record(&sample(), |node, entering| {
            if !entering && *node.kind() == NodeKind::Paragraph {
                WalkStatus::Terminate
            } else {
                WalkStatus::Continue
            }
        });
        assert_eq!(status, WalkStatus::Terminate);
        assert_eq!(events.last().map(String::as_str), Some("-Paragraph"));
        assert!(!events.contains(&"+HorizontalRule".to_string()));
    }

    #[test]
    fn test_skip_children_on_leaf_is_continue() {
        let leaf = Node::text("x");
        let status = walk(&leaf, &mut |_: &Node, _: bool| WalkStatus::SkipChildren);
        assert_eq!(status, WalkStatus::Continue);
    }

    struct Counter {
        entering: usize,
        leaving: usize,
    }

    impl NodeVisitor for Counter {
        fn visit(&mut self, _node: &Node, entering: bool) -> WalkStatus {
            if entering {
                self.entering += 1;
            } else {
                self.leaving += 1;
            }
            WalkStatus::Continue
        }
    }

    #[test]
    fn test_struct_visitor() {
        let mut counter = Counter {
            entering: 0,
            leaving: 0,
        };
        walk(&sample(), &mut counter);
        assert_eq!(counter.entering, 7);
        // Only containers get a leaving event
        assert_eq!(counter.leaving, 3);
    }
}

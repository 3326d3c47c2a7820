//! Walks a [`UISpecNode`] tree and resolves every node against the
//! [`Registry`]. Failures are local to the node: an unusable node is left out
//! and reported, its siblings are still rendered.

use crate::error::RenderIssue;
use crate::node::{Children, Props, UISpecNode};
use crate::registry::{ComponentKind, MarkupTag, Registry, Resolved};
use serde::Serialize;
use tracing::warn;

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Output tree handed to a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderNode {
    Text {
        text: String,
    },
    Element {
        tag: MarkupTag,
        key: Option<usize>,
        attrs: Props,
        children: Vec<RenderNode>,
    },
    Component {
        kind: ComponentKind,
        key: Option<usize>,
        props: Props,
        children: Vec<RenderNode>,
    },
}

impl RenderNode {
    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text { text: text.into() }
    }

    /// Position-derived key; `None` for the root and for text leaves.
    pub fn key(&self) -> Option<usize> {
        match self {
            RenderNode::Text { .. } => None,
            RenderNode::Element { key, .. } | RenderNode::Component { key, .. } => *key,
        }
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Text { .. } => &[],
            RenderNode::Element { children, .. } | RenderNode::Component { children, .. } => {
                children
            }
        }
    }

    /// Concatenated text of all leaves, depth first.
    pub fn text_content(&self) -> String {
        match self {
            RenderNode::Text { text } => text.clone(),
            _ => self.children().iter().map(RenderNode::text_content).collect(),
        }
    }
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendered {
    /// `None` when the root node itself was skipped.
    pub tree: Option<RenderNode>,
    pub issues: Vec<RenderIssue>,
}

#[derive(Debug, Clone)]
pub struct Renderer<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn render(&self, node: &UISpecNode) -> Rendered {
        let mut issues = Vec::new();
        let tree = self.render_node(node, None, "root", 1, &mut issues);
        Rendered { tree, issues }
    }

    fn render_node(
        &self,
        node: &UISpecNode,
        key: Option<usize>,
        path: &str,
        depth: usize,
        issues: &mut Vec<RenderIssue>,
    ) -> Option<RenderNode> {
        if depth > self.max_depth {
            return skip(
                issues,
                RenderIssue::DepthExceeded {
                    max_depth: self.max_depth,
                    path: path.to_string(),
                },
            );
        }

        match self.registry.resolve(&node.component) {
            Resolved::Text => match &node.children {
                Some(Children::Text(text)) => Some(RenderNode::text(text.clone())),
                _ => skip(
                    issues,
                    RenderIssue::MissingTextContent {
                        path: path.to_string(),
                    },
                ),
            },
            Resolved::Markup(tag) => Some(RenderNode::Element {
                tag,
                key,
                attrs: node.props.clone(),
                children: self.render_children(node, path, depth, issues),
            }),
            Resolved::Component(kind) => Some(RenderNode::Component {
                kind,
                key,
                props: node.props.clone(),
                children: self.render_children(node, path, depth, issues),
            }),
            Resolved::Unrecognized => skip(
                issues,
                RenderIssue::UnknownComponent {
                    component: node.component.clone(),
                    path: path.to_string(),
                },
            ),
        }
    }

    fn render_children(
        &self,
        node: &UISpecNode,
        path: &str,
        depth: usize,
        issues: &mut Vec<RenderIssue>,
    ) -> Vec<RenderNode> {
        match &node.children {
            None => Vec::new(),
            Some(Children::Text(text)) => vec![RenderNode::text(text.clone())],
            Some(Children::Nodes(nodes)) => nodes
                .iter()
                .enumerate()
                .filter_map(|(index, child)| {
                    let child_path = format!("{}.children[{}]", path, index);
                    self.render_node(child, Some(index), &child_path, depth + 1, issues)
                })
                .collect(),
        }
    }
}

fn skip(issues: &mut Vec<RenderIssue>, issue: RenderIssue) -> Option<RenderNode> {
    warn!(path = issue.path(), "skipping UI node: {}", issue);
    issues.push(issue);
    None
}

/// Render with a fresh [`Renderer`] over `registry`.
pub fn render(node: &UISpecNode, registry: &Registry) -> Rendered {
    Renderer::new(registry).render(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_spec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn card_tree() -> UISpecNode {
        UISpecNode::new("Card")
            .with_prop("className", "w-full max-w-md")
            .with_children(vec![
                UISpecNode::new("CardHeader")
                    .with_children(vec![UISpecNode::new("CardTitle").with_text("Today")]),
                UISpecNode::new("CardContent").with_children(vec![UISpecNode::new("div")
                    .with_prop("className", "space-y-2")
                    .with_children(vec![
                        UISpecNode::new("p").with_text("9:00 AM - Team standup"),
                        UISpecNode::text("plain"),
                    ])]),
            ])
    }

    #[test]
    fn test_text_node_renders_literal() {
        let registry = Registry::builtin();
        let rendered = render(&UISpecNode::text("Hello"), &registry);
        assert_eq!(rendered.tree, Some(RenderNode::text("Hello")));
        assert!(rendered.issues.is_empty());
    }

    #[test]
    fn test_text_node_without_content_is_skipped() {
        let registry = Registry::builtin();
        let rendered = render(&UISpecNode::new("text"), &registry);
        assert_eq!(rendered.tree, None);
        assert_eq!(
            rendered.issues,
            vec![RenderIssue::MissingTextContent {
                path: "root".to_string()
            }]
        );
    }

    #[test]
    fn test_markup_and_components() {
        let registry = Registry::builtin();
        let rendered = render(&card_tree(), &registry);
        let tree = rendered.tree.unwrap();

        let RenderNode::Component {
            kind, key, props, children,
        } = &tree
        else {
            panic!("expected a component, got {:?}", tree);
        };
        assert_eq!(*kind, ComponentKind::Card);
        assert_eq!(*key, None);
        assert_eq!(props["className"], json!("w-full max-w-md"));
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].key(), Some(1));

        let div = &children[1].children()[0];
        let RenderNode::Element { tag, attrs, .. } = div else {
            panic!("expected an element, got {:?}", div);
        };
        assert_eq!(*tag, MarkupTag::Div);
        assert_eq!(attrs["className"], json!("space-y-2"));
        assert_eq!(div.children()[1], RenderNode::text("plain"));
        assert_eq!(tree.text_content(), "Today9:00 AM - Team standupplain");
    }

    #[test]
    fn test_unknown_component_skips_only_that_node() {
        let registry = Registry::builtin();
        let tree = UISpecNode::new("div").with_children(vec![
            UISpecNode::new("p").with_text("before"),
            UISpecNode::new("Unknown123"),
            UISpecNode::new("p").with_text("after"),
        ]);

        let rendered = render(&tree, &registry);
        let root = rendered.tree.unwrap();
        let keys: Vec<_> = root.children().iter().map(RenderNode::key).collect();
        assert_eq!(keys, vec![Some(0), Some(2)]);
        assert_eq!(root.text_content(), "beforeafter");
        assert_eq!(
            rendered.issues,
            vec![RenderIssue::UnknownComponent {
                component: "Unknown123".to_string(),
                path: "root.children[1]".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_root_yields_no_tree() {
        let registry = Registry::builtin();
        let rendered = render(&UISpecNode::new("Marquee"), &registry);
        assert_eq!(rendered.tree, None);
        assert_eq!(rendered.issues.len(), 1);
    }

    #[test]
    fn test_restricted_registry_skips_disabled_component() {
        let registry = Registry::with_components(["Card"]).unwrap();
        let tree = UISpecNode::new("Card").with_children(vec![UISpecNode::new("Badge").with_text("x")]);
        let rendered = render(&tree, &registry);
        assert!(rendered.tree.unwrap().children().is_empty());
        assert_eq!(rendered.issues.len(), 1);
    }

    #[test]
    fn test_depth_limit() {
        let registry = Registry::builtin();
        let tree = UISpecNode::new("div").with_children(vec![UISpecNode::new("div")
            .with_children(vec![UISpecNode::new("span").with_text("deep")])]);

        let rendered = Renderer::new(&registry).with_max_depth(2).render(&tree);
        let root = rendered.tree.unwrap();
        assert!(root.children()[0].children().is_empty());
        assert!(matches!(
            rendered.issues.as_slice(),
            [RenderIssue::DepthExceeded { max_depth: 2, .. }]
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let registry = Registry::builtin();
        let tree = card_tree();
        let json = serde_json::to_string(&tree).unwrap();
        let parsed = parse_spec(&json).ready().unwrap();
        assert_eq!(render(&parsed, &registry), render(&tree, &registry));
    }
}

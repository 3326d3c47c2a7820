use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attributes of a node, passed through to the output verbatim.
pub type Props = Map<String, Value>;

/// Component name reserved for literal text leaves.
pub const TEXT_COMPONENT: &str = "text";

/// One widget in a generative UI tree.
///
/// Wire shape: `{ "component": string, "props"?: object, "children"?: UISpecNode[] | string }`.
/// Deserialization goes through [`UISpecNode::from_value`], so every input
/// route accepts the same trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct UISpecNode {
    pub component: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Text(String),
    Nodes(Vec<UISpecNode>),
}

impl UISpecNode {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: Props::new(),
            children: None,
        }
    }

    /// A `text` leaf holding `content`.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(TEXT_COMPONENT).with_text(content)
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.children = Some(Children::Text(content.into()));
        self
    }

    pub fn with_children(mut self, children: Vec<UISpecNode>) -> Self {
        self.children = Some(Children::Nodes(children));
        self
    }

    /// Non-empty component name, and `text` nodes carry string children.
    pub fn is_well_formed(&self) -> bool {
        if self.component.is_empty() {
            return false;
        }
        if self.component == TEXT_COMPONENT {
            return matches!(self.children, Some(Children::Text(_)));
        }
        true
    }

    pub fn child_nodes(&self) -> &[UISpecNode] {
        match &self.children {
            Some(Children::Nodes(nodes)) => nodes,
            _ => &[],
        }
    }

    /// Number of node levels, counting this node.
    pub fn depth(&self) -> usize {
        1 + self
            .child_nodes()
            .iter()
            .map(UISpecNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Lenient conversion from an arbitrary JSON value.
    ///
    /// Used for best-effort trees recovered from a truncated stream: a value
    /// qualifies when it is an object with a non-empty string `component`.
    /// Non-object `props` read as empty. Numeric `children` read as text.
    /// Bare strings inside a `children` array become `text` nodes; array
    /// items that do not qualify are dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let component = obj.get("component")?.as_str()?;
        if component.is_empty() {
            return None;
        }

        let props = obj
            .get("props")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let children = match obj.get("children") {
            Some(Value::String(s)) => Some(Children::Text(s.clone())),
            Some(Value::Number(n)) => Some(Children::Text(n.to_string())),
            Some(Value::Array(items)) => Some(Children::Nodes(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(UISpecNode::text(s.clone())),
                        other => UISpecNode::from_value(other),
                    })
                    .collect(),
            )),
            _ => None,
        };

        Some(Self {
            component: component.to_string(),
            props,
            children,
        })
    }
}

impl TryFrom<Value> for UISpecNode {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        UISpecNode::from_value(&value)
            .ok_or_else(|| "expected an object with a non-empty string `component`".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serialize_omits_empty_fields() {
        let node = UISpecNode::new("Separator");
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({ "component": "Separator" })
        );
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let node: UISpecNode = serde_json::from_value(json!({
            "component": "Card",
            "props": { "className": "w-full" },
            "children": [{ "component": "p", "children": "Sunny" }]
        }))
        .unwrap();

        assert_eq!(node.component, "Card");
        assert_eq!(node.props["className"], "w-full");
        assert_eq!(
            node.child_nodes(),
            &[UISpecNode::new("p").with_text("Sunny")]
        );
    }

    #[test]
    fn test_from_value_requires_component() {
        assert!(UISpecNode::from_value(&json!({ "props": {} })).is_none());
        assert!(UISpecNode::from_value(&json!({ "component": "" })).is_none());
        assert!(UISpecNode::from_value(&json!({ "component": 3 })).is_none());
        assert!(UISpecNode::from_value(&json!(["Card"])).is_none());
    }

    #[test]
    fn test_from_value_is_lenient_with_children() {
        let node = UISpecNode::from_value(&json!({
            "component": "ul",
            "props": "not an object",
            "children": ["plain", {}, { "component": "li", "children": "item" }]
        }))
        .unwrap();

        assert!(node.props.is_empty());
        assert_eq!(
            node.child_nodes(),
            &[
                UISpecNode::text("plain"),
                UISpecNode::new("li").with_text("item"),
            ]
        );
    }

    #[test]
    fn test_numeric_children_read_as_text() {
        let node = UISpecNode::from_value(&json!({ "component": "span", "children": 42 })).unwrap();
        assert_eq!(node, UISpecNode::new("span").with_text("42"));

        let node = UISpecNode::from_value(&json!({ "component": "span", "children": true })).unwrap();
        assert_eq!(node.children, None);
    }

    #[test]
    fn test_deserialize_accepts_mixed_children() {
        let node: UISpecNode = serde_json::from_value(json!({
            "component": "ul",
            "children": ["plain", { "component": "li", "children": "x" }]
        }))
        .unwrap();
        assert_eq!(
            node.child_nodes(),
            &[UISpecNode::text("plain"), UISpecNode::new("li").with_text("x")]
        );

        let err = serde_json::from_value::<UISpecNode>(json!({ "props": {} })).unwrap_err();
        assert!(err.to_string().contains("component"));
    }

    #[test]
    fn test_well_formed() {
        assert!(UISpecNode::text("Hello").is_well_formed());
        assert!(!UISpecNode::new("text").is_well_formed());
        assert!(!UISpecNode::new("").is_well_formed());
        assert!(UISpecNode::new("Card").is_well_formed());
    }

    #[test]
    fn test_depth() {
        let tree = UISpecNode::new("Card").with_children(vec![
            UISpecNode::new("CardHeader")
                .with_children(vec![UISpecNode::new("CardTitle").with_text("Hi")]),
            UISpecNode::new("Separator"),
        ]);
        assert_eq!(tree.depth(), 3);
    }
}

use crate::node::UISpecNode;
use crate::repair::{parse_json, try_repair_with, PartialStrings, RepairOptions};
use tracing::debug;

/// Only text content streams in partially. A half-received component name
/// or prop value is dropped instead of guessed.
const STREAMING_REPAIR: RepairOptions<'static> = RepairOptions {
    partial_strings: PartialStrings::Under(&["children"]),
};

/// Outcome of parsing the payload of a UI block.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecParse {
    Ready(UISpecNode),
    /// Nothing renderable yet: the payload is still streaming or is not
    /// a UI description. Callers show a loading placeholder.
    Pending,
}

impl SpecParse {
    pub fn is_pending(&self) -> bool {
        matches!(self, SpecParse::Pending)
    }

    pub fn ready(self) -> Option<UISpecNode> {
        match self {
            SpecParse::Ready(node) => Some(node),
            SpecParse::Pending => None,
        }
    }
}

/// Parse a UI block payload, recovering the largest usable tree from a
/// truncated document. Never fails; every failure reads as `Pending`.
pub fn parse_spec(text: &str) -> SpecParse {
    let text = text.trim();
    if text.is_empty() {
        return SpecParse::Pending;
    }

    let value = match parse_json(text) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "UI payload incomplete, attempting repair");
            match try_repair_with(text, &STREAMING_REPAIR) {
                Some(value) => value,
                None => return SpecParse::Pending,
            }
        }
    };

    match UISpecNode::from_value(&value) {
        Some(node) => SpecParse::Ready(node),
        None => SpecParse::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Children;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_complete_document() {
        let spec = parse_spec(
            r#"{"component":"Card","children":[{"component":"p","children":"Sunny"}]}"#,
        );
        assert_eq!(
            spec,
            SpecParse::Ready(
                UISpecNode::new("Card").with_children(vec![UISpecNode::new("p").with_text("Sunny")])
            )
        );
    }

    #[test]
    fn test_truncated_class_name_keeps_component() {
        let spec = parse_spec(r#"{"component":"Card","props":{"className":"w-f"#);
        assert_eq!(spec, SpecParse::Ready(UISpecNode::new("Card")));
    }

    #[test]
    fn test_partial_component_name_is_pending() {
        assert!(parse_spec(r#"{"component":"Ca"#).is_pending());
        assert!(parse_spec(r#"{"compo"#).is_pending());
        assert!(parse_spec("{").is_pending());
    }

    #[test]
    fn test_text_streams_progressively() {
        let spec = parse_spec(r#"{"component":"text","children":"Hel"#);
        assert_eq!(spec, SpecParse::Ready(UISpecNode::text("Hel")));
    }

    #[test]
    fn test_half_streamed_child_is_dropped() {
        let node = parse_spec(
            r#"{"component":"ul","children":[{"component":"li","children":"one"},{"comp"#,
        )
        .ready()
        .unwrap();
        assert_eq!(
            node.children,
            Some(Children::Nodes(vec![UISpecNode::new("li").with_text("one")]))
        );
    }

    #[test]
    fn test_escaped_emoji_streams_without_losing_text() {
        let doc = r#"{"component":"p","children":"Hi \uD83D\uDE00!"}"#;
        let start = doc.find("Hi").unwrap() + 2;
        for end in start..=doc.len() {
            let node = parse_spec(&doc[..end]).ready().unwrap();
            match node.children {
                Some(Children::Text(text)) => {
                    assert!(text.starts_with("Hi"), "prefix {:?} gave {:?}", &doc[..end], text)
                }
                other => panic!("prefix {:?} lost its text: {:?}", &doc[..end], other),
            }
        }
        assert_eq!(
            parse_spec(doc),
            SpecParse::Ready(UISpecNode::new("p").with_text("Hi \u{1F600}!"))
        );
    }

    #[test]
    fn test_deep_document_is_ready() {
        let levels = 200;
        let mut doc = String::new();
        for _ in 0..levels {
            doc.push_str(r#"{"component":"div","children":["#);
        }
        doc.push_str(r#"{"component":"span","children":"deep"}"#);
        for _ in 0..levels {
            doc.push_str("]}");
        }

        let node = parse_spec(&doc).ready().unwrap();
        assert_eq!(node.depth(), levels + 1);

        // Truncated deep documents are repaired too.
        let cut = doc.len() - levels;
        assert!(!parse_spec(&doc[..cut]).is_pending());
    }

    #[test]
    fn test_garbage_is_pending() {
        assert!(parse_spec("").is_pending());
        assert!(parse_spec("not json at all").is_pending());
        assert!(parse_spec("[1, 2, 3]").is_pending());
        assert!(parse_spec(r#"{"props":{}}"#).is_pending());
        assert!(parse_spec(r#"{"component":"Card",]"#).is_pending());
    }
}

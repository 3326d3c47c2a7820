use genui_core::{
    parse_spec, render, render_buffer, segment, Block, Children, ComponentKind, MarkupTag,
    Registry, RenderIssue, RenderNode, Renderer, Segmenter, SpecParse, StreamRenderer,
    UISpecNode,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(filename);
    path
}

fn read_fixture(filename: &str) -> String {
    fs::read_to_string(get_fixture_path(filename)).unwrap()
}

fn char_prefixes(text: &str) -> impl Iterator<Item = &str> {
    (0..=text.len())
        .filter(move |&i| text.is_char_boundary(i))
        .map(move |i| &text[..i])
}

// Fixture transcripts
#[test]
fn test_schedule_transcript() {
    let text = read_fixture("schedule.txt");
    let registry = Registry::builtin();
    let blocks = render_buffer(&text, &Segmenter::default(), &Renderer::new(&registry));

    assert_eq!(blocks.len(), 3);
    assert_eq!(
        blocks[0].block,
        Block::Text("Here's your schedule for today:".to_string())
    );
    let Block::Widget(tree) = &blocks[1].block else {
        panic!("expected widget, got {:?}", blocks[1].block);
    };
    assert_eq!(
        tree.text_content(),
        "Today's Schedule9:00 AM - Team standup2:30 PM - Coffee with Sarah"
    );
    assert!(blocks[1].issues.is_empty());
    assert_eq!(
        blocks[2].block,
        Block::Text("Looks like a light day! Your afternoon is free after coffee.".to_string())
    );
}

#[test]
fn test_dashboard_transcript_skips_unknown_component() {
    let text = read_fixture("dashboard.txt");
    let registry = Registry::builtin();
    let blocks = render_buffer(&text, &Segmenter::default(), &Renderer::new(&registry));

    let widgets: Vec<_> = blocks
        .iter()
        .filter_map(|b| match &b.block {
            Block::Widget(tree) => Some(tree),
            _ => None,
        })
        .collect();
    assert_eq!(widgets.len(), 2);

    let content = &widgets[1].children()[0];
    let kinds: Vec<_> = content
        .children()
        .iter()
        .map(|child| match child {
            RenderNode::Component { kind, key, .. } => (*kind, *key),
            other => panic!("unexpected node {:?}", other),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ComponentKind::Progress, Some(0)),
            (ComponentKind::Badge, Some(1))
        ]
    );
    assert_eq!(
        blocks.last().unwrap().issues,
        vec![RenderIssue::UnknownComponent {
            component: "Marquee".to_string(),
            path: "root.children[0].children[2]".to_string(),
        }]
    );
}

#[test]
fn test_truncated_transcript() {
    let text = read_fixture("truncated.txt");
    let segments = segment(&text);
    assert_eq!(segments.len(), 2);
    assert!(!segments[1].closed);
    assert_eq!(
        parse_spec(&segments[1].content),
        SpecParse::Ready(UISpecNode::new("Card"))
    );
}

// Properties
#[test]
fn test_segments_reconstruct_every_prefix() {
    for name in ["schedule.txt", "dashboard.txt", "truncated.txt"] {
        let text = read_fixture(name);
        for prefix in char_prefixes(&text) {
            let segments = segment(prefix);
            assert_eq!(segments, segment(prefix));
            if segments.is_empty() {
                assert!(prefix.trim().is_empty());
                continue;
            }
            let rebuilt: String = segments.iter().map(|s| s.source(prefix)).collect();
            assert_eq!(rebuilt, prefix);
        }
    }
}

#[test]
fn test_every_prefix_of_a_document_parses_softly() {
    let tree = UISpecNode::new("Card")
        .with_prop("className", "w-full")
        .with_children(vec![
            UISpecNode::new("CardTitle").with_text("Weather in Tokyo"),
            UISpecNode::new("Progress").with_prop("value", 42),
            UISpecNode::new("ul").with_children(vec![
                UISpecNode::new("li").with_text("Sunny ☀️"),
                UISpecNode::new("li").with_text("Humidity: 40%"),
            ]),
        ]);
    let json = serde_json::to_string(&tree).unwrap();

    for prefix in char_prefixes(&json) {
        match parse_spec(prefix) {
            SpecParse::Pending => {}
            SpecParse::Ready(node) => assert!(!node.component.is_empty()),
        }
    }
    assert_eq!(parse_spec(&json), SpecParse::Ready(tree));
}

#[test]
fn test_round_trip_rendering() {
    let registry = Registry::builtin();
    let tree = UISpecNode::new("Alert")
        .with_prop("variant", "destructive")
        .with_children(vec![
            UISpecNode::new("AlertTitle").with_text("Heads up"),
            UISpecNode::new("AlertDescription").with_children(vec![
                UISpecNode::new("strong").with_text("Rain"),
                UISpecNode::text(" expected at 4 PM"),
            ]),
        ]);

    let pretty = serde_json::to_string_pretty(&tree).unwrap();
    let parsed = parse_spec(&pretty).ready().unwrap();
    assert_eq!(render(&parsed, &registry), render(&tree, &registry));
}

// Scenarios
#[test]
fn test_literal_text_scenario() {
    let registry = Registry::builtin();
    let node = parse_spec(r#"{"component":"text","children":"Hello"}"#)
        .ready()
        .unwrap();
    assert_eq!(node.children, Some(Children::Text("Hello".to_string())));
    assert_eq!(
        render(&node, &registry).tree,
        Some(RenderNode::text("Hello"))
    );
}

#[test]
fn test_markup_attributes_pass_through() {
    let registry = Registry::builtin();
    let node = parse_spec(r#"{"component":"h2","props":{"className":"text-2xl","data-id":7},"children":"Title"}"#)
        .ready()
        .unwrap();
    let Some(RenderNode::Element { tag, attrs, children, .. }) = render(&node, &registry).tree else {
        panic!("expected an element");
    };
    assert_eq!(tag, MarkupTag::H2);
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs["data-id"], 7);
    assert_eq!(children, vec![RenderNode::text("Title")]);
}

#[test]
fn test_stream_replay_ends_with_full_render() {
    let text = read_fixture("dashboard.txt");
    let registry = Registry::builtin();
    let mut stream = StreamRenderer::new(Segmenter::default(), Renderer::new(&registry));

    let mut frames = Vec::new();
    for chunk in text.as_bytes().chunks(5) {
        // Fixture is ASCII, so byte chunks are valid UTF-8.
        frames.push(stream.push(std::str::from_utf8(chunk).unwrap()));
    }
    let expected = render_buffer(&text, &Segmenter::default(), &Renderer::new(&registry));
    assert_eq!(frames.last(), Some(&expected));
}

fn nested_divs(levels: usize) -> String {
    let mut doc = String::new();
    for _ in 0..levels {
        doc.push_str(r#"{"component":"div","children":["#);
    }
    doc.push_str(r#"{"component":"span","children":"deep"}"#);
    for _ in 0..levels {
        doc.push_str("]}");
    }
    doc
}

#[test]
fn test_deep_closed_block_renders() {
    let registry = Registry::builtin();
    let text = format!("Nested:\n```ui\n{}\n```", nested_divs(70));

    let segments = render_buffer(&text, &Segmenter::default(), &Renderer::new(&registry));
    assert!(segments[1].segment.closed);
    let Block::Widget(tree) = &segments[1].block else {
        panic!("expected a widget, got {:?}", segments[1].block);
    };
    assert_eq!(tree.text_content(), "deep");
    assert!(segments[1].issues.is_empty());

    // The renderer's depth limit, not the JSON parser, decides what is cut.
    let shallow = Renderer::new(&registry).with_max_depth(64);
    let segments = render_buffer(&text, &Segmenter::default(), &shallow);
    assert!(matches!(segments[1].block, Block::Widget(_)));
    assert!(matches!(
        segments[1].issues.as_slice(),
        [RenderIssue::DepthExceeded { max_depth: 64, .. }]
    ));
}

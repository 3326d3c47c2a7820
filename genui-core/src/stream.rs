//! Drives the segment → parse → render pipeline over a growing buffer.

use crate::error::RenderIssue;
use crate::parser::{parse_spec, SpecParse};
use crate::render::{RenderNode, Renderer};
use crate::segmenter::{Segment, SegmentKind, Segmenter};
use serde::Serialize;
use tracing::trace;

/// What to display for one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Block {
    Text(String),
    Widget(RenderNode),
    /// The UI payload is not parseable yet.
    Loading,
    /// The payload parsed but its root node was skipped.
    Omitted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSegment {
    pub segment: Segment,
    pub block: Block,
    pub issues: Vec<RenderIssue>,
}

/// One full pass over `buffer`. Pure; safe to call on every chunk.
pub fn render_buffer(buffer: &str, segmenter: &Segmenter, renderer: &Renderer<'_>) -> Vec<RenderedSegment> {
    segmenter
        .segment(buffer)
        .into_iter()
        .map(|segment| render_segment(segment, renderer))
        .collect()
}

fn render_segment(segment: Segment, renderer: &Renderer<'_>) -> RenderedSegment {
    match segment.kind {
        SegmentKind::Text => RenderedSegment {
            block: Block::Text(segment.content.clone()),
            segment,
            issues: Vec::new(),
        },
        SegmentKind::Ui => match parse_spec(&segment.content) {
            SpecParse::Pending => RenderedSegment {
                segment,
                block: Block::Loading,
                issues: Vec::new(),
            },
            SpecParse::Ready(node) => {
                let rendered = renderer.render(&node);
                RenderedSegment {
                    segment,
                    block: rendered.tree.map_or(Block::Omitted, Block::Widget),
                    issues: rendered.issues,
                }
            }
        },
    }
}

/// Accumulates streamed text for one assistant turn and re-renders it.
///
/// While a UI block is still open, a pass that can no longer parse it keeps
/// showing the last widget rendered for that block.
#[derive(Debug, Clone)]
pub struct StreamRenderer<'r> {
    segmenter: Segmenter,
    renderer: Renderer<'r>,
    buffer: String,
    last_widgets: Vec<Option<RenderNode>>,
}

impl<'r> StreamRenderer<'r> {
    pub fn new(segmenter: Segmenter, renderer: Renderer<'r>) -> Self {
        Self {
            segmenter,
            renderer,
            buffer: String::new(),
            last_widgets: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Append a chunk and re-render.
    pub fn push(&mut self, chunk: &str) -> Vec<RenderedSegment> {
        self.buffer.push_str(chunk);
        self.snapshot()
    }

    /// Replace the buffer with a newer full copy of the message and re-render.
    pub fn update(&mut self, full: &str) -> Vec<RenderedSegment> {
        if !full.starts_with(self.buffer.as_str()) {
            // Not a continuation: earlier widgets may belong to other blocks.
            self.last_widgets.clear();
        }
        self.buffer.clear();
        self.buffer.push_str(full);
        self.snapshot()
    }

    pub fn snapshot(&mut self) -> Vec<RenderedSegment> {
        let mut segments = render_buffer(&self.buffer, &self.segmenter, &self.renderer);
        let mut ordinal = 0;
        for rendered in segments.iter_mut().filter(|r| r.segment.is_ui()) {
            if self.last_widgets.len() <= ordinal {
                self.last_widgets.resize(ordinal + 1, None);
            }
            let held = match &rendered.block {
                Block::Widget(tree) => {
                    self.last_widgets[ordinal] = Some(tree.clone());
                    None
                }
                Block::Loading if !rendered.segment.closed => self.last_widgets[ordinal].clone(),
                _ => None,
            };
            if let Some(tree) = held {
                trace!(ordinal, "holding last widget for open UI block");
                rendered.block = Block::Widget(tree);
            }
            ordinal += 1;
        }
        segments
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_widgets.clear();
    }
}

//! Splits a growing assistant message into plain text and fenced UI blocks.
//!
//! The segmenter is a pure function of the buffer: it is re-run on every new
//! chunk and keeps no memory of earlier calls.

use crate::error::{GenUiError, GenUiResult};
use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::OnceLock;

pub const DEFAULT_FENCE_TAG: &str = "ui";

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Text,
    Ui,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Trimmed text for `Text`, the payload between the fence lines for `Ui`.
    pub content: String,
    /// Byte range of the source buffer covered by this segment. Spans of
    /// consecutive segments are contiguous and cover the whole buffer.
    pub span: Range<usize>,
    /// False only for a UI block whose closing fence has not arrived yet.
    pub closed: bool,
}

impl Segment {
    pub fn is_ui(&self) -> bool {
        self.kind == SegmentKind::Ui
    }

    /// The slice of `buffer` this segment was cut from.
    pub fn source<'a>(&self, buffer: &'a str) -> &'a str {
        &buffer[self.span.clone()]
    }
}

#[derive(Debug, Clone)]
pub struct Segmenter {
    tag: String,
    open: Regex,
    close: Regex,
}

impl Default for Segmenter {
    fn default() -> Self {
        static DEFAULT: OnceLock<Segmenter> = OnceLock::new();
        DEFAULT
            .get_or_init(|| Segmenter::build(DEFAULT_FENCE_TAG))
            .clone()
    }
}

impl Segmenter {
    /// Segmenter for fences opened with three backticks followed by `tag`.
    pub fn new(tag: &str) -> GenUiResult<Self> {
        if tag.is_empty() {
            return Err(GenUiError::InvalidFenceTag {
                tag: tag.to_string(),
                reason: "tag must not be empty".to_string(),
            });
        }
        if tag.chars().any(|c| c.is_whitespace() || c == '`') {
            return Err(GenUiError::InvalidFenceTag {
                tag: tag.to_string(),
                reason: "tag must not contain whitespace or backticks".to_string(),
            });
        }
        Ok(Self::build(tag))
    }

    fn build(tag: &str) -> Self {
        // Both patterns are built from an escaped tag and are always valid.
        let open = Regex::new(&format!(
            r"(?m)^[ \t]*```{}[ \t]*(?:\r?\n|$)",
            regex::escape(tag)
        ))
        .unwrap();
        let close = Regex::new(r"(?m)^[ \t]*```[ \t]*(?:\r?\n|$)").unwrap();
        Self {
            tag: tag.to_string(),
            open,
            close,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn segment(&self, buffer: &str) -> Vec<Segment> {
        let mut tiles = Vec::new();
        let mut pos = 0;

        while pos < buffer.len() {
            let Some(open) = self.open.find_at(buffer, pos) else {
                break;
            };
            if open.start() > pos {
                tiles.push(self.text_tile(buffer, pos..open.start()));
            }

            let body_start = open.end();
            match self.close.find_at(buffer, body_start) {
                Some(close) => {
                    tiles.push(Segment {
                        kind: SegmentKind::Ui,
                        content: buffer[body_start..close.start()].trim().to_string(),
                        span: open.start()..close.end(),
                        closed: true,
                    });
                    pos = close.end();
                }
                None => {
                    tiles.push(Segment {
                        kind: SegmentKind::Ui,
                        content: buffer[body_start..].trim().to_string(),
                        span: open.start()..buffer.len(),
                        closed: false,
                    });
                    pos = buffer.len();
                }
            }
        }

        if pos < buffer.len() {
            tiles.push(self.text_tile(buffer, pos..buffer.len()));
        }

        absorb_blank_text(tiles)
    }

    fn text_tile(&self, buffer: &str, span: Range<usize>) -> Segment {
        let mut text = &buffer[span.clone()];
        if span.end == buffer.len() {
            text = self.strip_partial_fence(text);
        }
        Segment {
            kind: SegmentKind::Text,
            content: text.trim().to_string(),
            span,
            closed: true,
        }
    }

    /// Hides a half-arrived opening fence (for example "```u") at the very
    /// end of the buffer so it does not flash up as text.
    fn strip_partial_fence<'a>(&self, text: &'a str) -> &'a str {
        let line_start = text.rfind('\n').map_or(0, |i| i + 1);
        let line = text[line_start..].trim_start_matches([' ', '\t']);
        if !line.starts_with(FENCE) {
            return text;
        }
        // Inside an ordinary code block the trailing fence is its closer.
        let fences_before = text[..line_start]
            .lines()
            .filter(|l| l.trim_start().starts_with(FENCE))
            .count();
        if fences_before % 2 == 1 {
            return text;
        }
        let rest = &line[FENCE.len()..];
        if self.tag.starts_with(rest) && rest.len() < self.tag.len() {
            &text[..line_start]
        } else {
            text
        }
    }
}

/// Drops whitespace-only text tiles, folding their bytes into a neighbour so
/// the spans keep tiling the buffer.
fn absorb_blank_text(tiles: Vec<Segment>) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::with_capacity(tiles.len());
    let mut pending_start = None;

    for mut tile in tiles {
        if tile.kind == SegmentKind::Text && tile.content.is_empty() {
            match segments.last_mut() {
                Some(prev) => prev.span.end = tile.span.end,
                None => pending_start = Some(tile.span.start),
            }
            continue;
        }
        if let Some(start) = pending_start.take() {
            tile.span.start = start;
        }
        segments.push(tile);
    }

    segments
}

/// Segments `buffer` with the default `ui` fence tag.
pub fn segment(buffer: &str) -> Vec<Segment> {
    Segmenter::default().segment(buffer)
}

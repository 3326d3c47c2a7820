//! # Generative UI core
//!
//! Turns a streamed assistant message into displayable blocks. Fenced
//! ```` ```ui ```` blocks carry a JSON widget tree; the tree may be cut off
//! mid-stream, so parsing recovers the largest usable prefix and reports
//! "pending" when nothing usable has arrived yet.
//!
//! Pipeline: [`segmenter`] → [`parser`] (backed by [`repair`]) → [`render`]
//! against a closed [`registry`]. [`stream`] runs the pipeline over a growing
//! buffer and [`message`] covers chat parts that deliver trees through the
//! `renderUI` tool instead of fenced text.
//!
//! ## Example
//! ```
//! use genui_core::{render_buffer, Block, Registry, Renderer, Segmenter};
//!
//! let registry = Registry::builtin();
//! let renderer = Renderer::new(&registry);
//! let text = "Here you go:\n```ui\n{\"component\":\"Badge\",\"children\":\"New\"}\n```";
//!
//! let blocks = render_buffer(text, &Segmenter::default(), &renderer);
//! assert_eq!(blocks[0].block, Block::Text("Here you go:".to_string()));
//! assert!(matches!(blocks[1].block, Block::Widget(_)));
//! ```

pub mod error;
pub mod message;
pub mod node;
pub mod parser;
pub mod registry;
pub mod render;
pub mod repair;
pub mod segmenter;
pub mod stream;

pub use error::{GenUiError, GenUiResult, RenderIssue};
pub use message::{
    render_message, render_ui_tool, ChatMessage, MessagePart, PartView, RenderUiInput,
    RenderUiOutput, Role, ToolState,
};
pub use node::{Children, Props, UISpecNode, TEXT_COMPONENT};
pub use parser::{parse_spec, SpecParse};
pub use registry::{ComponentKind, MarkupTag, Registry, Resolved};
pub use render::{render, RenderNode, Rendered, Renderer, DEFAULT_MAX_DEPTH};
pub use repair::{
    parse_json, try_repair, try_repair_with, PartialStrings, RepairOptions, MAX_NESTING,
};
pub use segmenter::{segment, Segment, SegmentKind, Segmenter, DEFAULT_FENCE_TAG};
pub use stream::{render_buffer, Block, RenderedSegment, StreamRenderer};

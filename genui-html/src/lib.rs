//! HTML output for generative UI transcripts.
//!
//! [`html`] turns rendered trees, stream segments and message parts into
//! escaped HTML styled through a [`Theme`]. [`config`] loads the YAML
//! settings used by the `genui-render` binary.

pub mod config;
pub mod error;
pub mod html;
pub mod theme;

pub use config::{RenderConfig, DEFAULT_TITLE, MAX_SUPPORTED_DEPTH};
pub use error::{HtmlError, HtmlResult};
pub use html::{
    escape_html, loading_html, message_to_html, node_to_html, page, part_to_html,
    segments_to_html, BASE_STYLES,
};
pub use theme::{Theme, CLASS_PREFIX, PROGRESS_INDICATOR};

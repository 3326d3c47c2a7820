//! Chat message parts and the `renderUI` tool, which hands the client a
//! UI tree directly instead of a fenced block in the text.

use crate::error::{GenUiError, GenUiResult, RenderIssue};
use crate::node::UISpecNode;
use crate::registry::Registry;
use crate::render::{RenderNode, Renderer};
use crate::segmenter::Segmenter;
use crate::stream::{render_buffer, RenderedSegment};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Arguments of a `renderUI` tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderUiInput {
    pub ui: UISpecNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl RenderUiInput {
    /// Decodes tool arguments. `ui` is read with the same leniency as a
    /// fenced block; a missing or non-node `ui` is an error.
    pub fn from_value(value: Value) -> GenUiResult<Self> {
        serde_json::from_value(value).map_err(|e| GenUiError::InvalidToolPayload(e.to_string()))
    }
}

/// Result of a `renderUI` tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderUiOutput {
    pub ui: UISpecNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolState {
    /// Arguments received, output not yet available.
    InputAvailable,
    OutputAvailable(RenderUiOutput),
    OutputError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessagePart {
    Text(String),
    RenderUi(ToolState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub parts: Vec<MessagePart>,
}

/// Display form of one message part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartView {
    /// User text, shown verbatim.
    Plain(String),
    /// Assistant text split into text and UI blocks.
    Segments(Vec<RenderedSegment>),
    Loading,
    Widget {
        title: Option<String>,
        tree: Option<RenderNode>,
        issues: Vec<RenderIssue>,
    },
    Error(String),
}

pub fn render_message(
    message: &ChatMessage,
    segmenter: &Segmenter,
    renderer: &Renderer<'_>,
) -> Vec<PartView> {
    message
        .parts
        .iter()
        .map(|part| match part {
            MessagePart::Text(text) => match message.role {
                Role::User => PartView::Plain(text.clone()),
                Role::Assistant => PartView::Segments(render_buffer(text, segmenter, renderer)),
            },
            MessagePart::RenderUi(ToolState::InputAvailable) => PartView::Loading,
            MessagePart::RenderUi(ToolState::OutputAvailable(output)) => {
                let rendered = renderer.render(&output.ui);
                PartView::Widget {
                    title: output.title.clone(),
                    tree: rendered.tree,
                    issues: rendered.issues,
                }
            }
            MessagePart::RenderUi(ToolState::OutputError(error)) => {
                PartView::Error(format!("Error rendering UI: {}", error))
            }
        })
        .collect()
}

pub mod render_ui_tool {
    use super::*;

    pub const NAME: &str = "renderUI";

    /// The tool echoes its arguments; rendering happens on the client.
    pub fn execute(input: RenderUiInput) -> RenderUiOutput {
        RenderUiOutput {
            ui: input.ui,
            title: input.title,
        }
    }

    pub fn description(registry: &Registry) -> String {
        let example = json!({
            "component": "Card",
            "props": { "className": "w-full max-w-md" },
            "children": [
                { "component": "CardHeader", "children": [
                    { "component": "CardTitle", "children": "Title" }
                ]},
                { "component": "CardContent", "children": [
                    { "component": "p", "children": "Content here" }
                ]}
            ]
        });
        format!(
            "Render a dynamic UI component.\n\n{}\nExample:\n{}",
            registry.catalogue(),
            serde_json::to_string_pretty(&example).unwrap_or_default()
        )
    }

    /// JSON schema of the tool arguments.
    pub fn input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "ui": {
                    "type": "object",
                    "description": "The UI specification to render",
                    "properties": {
                        "component": { "type": "string", "description": "The component name" },
                        "props": {
                            "type": "object",
                            "description": "Props to pass to the component",
                            "additionalProperties": true
                        },
                        "children": { "description": "Child components or text content" }
                    },
                    "required": ["component"]
                },
                "title": {
                    "type": "string",
                    "description": "A brief title describing what this UI shows"
                }
            },
            "required": ["ui"]
        })
    }
}

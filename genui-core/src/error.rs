use serde::Serialize;
use thiserror::Error;

pub type GenUiResult<T> = Result<T, GenUiError>;

/// Hard errors. Parsing and rendering never produce these; they come from
/// configuration (registry, fence tag) and from strict tool-output decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenUiError {
    #[error("Invalid fence tag '{tag}': {reason}")]
    InvalidFenceTag { tag: String, reason: String },

    #[error("Unknown component '{name}' in registry configuration")]
    UnknownRegistryComponent { name: String },

    #[error("Component '{name}' is listed more than once")]
    DuplicateComponent { name: String },

    #[error("Component name '{name}' collides with a reserved name")]
    ReservedComponentName { name: String },

    #[error("Invalid render-UI tool payload: {0}")]
    InvalidToolPayload(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<serde_json::Error> for GenUiError {
    fn from(err: serde_json::Error) -> Self {
        GenUiError::DeserializationError(err.to_string())
    }
}

/// Non-fatal, node-local rendering problem. The node is skipped and its
/// siblings are still rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderIssue {
    #[error("Unknown component '{component}' at {path}")]
    UnknownComponent { component: String, path: String },

    #[error("Text node at {path} has no string content")]
    MissingTextContent { path: String },

    #[error("Maximum nesting depth ({max_depth}) exceeded at {path}")]
    DepthExceeded { max_depth: usize, path: String },
}

impl RenderIssue {
    pub fn path(&self) -> &str {
        match self {
            RenderIssue::UnknownComponent { path, .. }
            | RenderIssue::MissingTextContent { path }
            | RenderIssue::DepthExceeded { path, .. } => path,
        }
    }
}

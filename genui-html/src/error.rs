use genui_core::GenUiError;
use thiserror::Error;

pub type HtmlResult<T> = Result<T, HtmlError>;

#[derive(Error, Debug)]
pub enum HtmlError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] GenUiError),

    #[error("Failed to write HTML: {0}")]
    Format(#[from] std::fmt::Error),
}

impl From<serde_yaml::Error> for HtmlError {
    fn from(err: serde_yaml::Error) -> Self {
        HtmlError::YamlError(err.to_string())
    }
}

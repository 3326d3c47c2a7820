//! Render settings loaded from YAML.
//!
//! ```yaml
//! title: Assistant transcript
//! fenceTag: ui
//! maxDepth: 64
//! components: [Card, CardHeader, CardTitle, CardContent, Badge]
//! theme:
//!   Card: rounded-lg border p-4
//!   Badge.secondary: badge badge-muted
//! ```

use crate::error::{HtmlError, HtmlResult};
use crate::theme::Theme;
use genui_core::{Registry, Segmenter, DEFAULT_FENCE_TAG, DEFAULT_MAX_DEPTH, MAX_NESTING};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_TITLE: &str = "Generative UI";

/// Deepest tree the JSON parser delivers: each node level nests an object
/// and its `children` array.
pub const MAX_SUPPORTED_DEPTH: usize = MAX_NESTING / 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderConfig {
    pub title: String,
    pub fence_tag: String,
    pub max_depth: usize,
    /// Allow-list of component names. `None` enables every built-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<String>>,
    pub theme: Theme,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            fence_tag: DEFAULT_FENCE_TAG.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            components: None,
            theme: Theme::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_yaml(yaml: &str) -> HtmlResult<Self> {
        let config: RenderConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> HtmlResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| HtmlError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded render config");
        Self::from_yaml(&yaml)
    }

    /// Checks everything that would otherwise fail later when building the
    /// segmenter or registry.
    pub fn validate(&self) -> HtmlResult<()> {
        if self.max_depth == 0 {
            return Err(HtmlError::InvalidConfig(
                "maxDepth must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(HtmlError::InvalidConfig(format!(
                "maxDepth must be at most {}",
                MAX_SUPPORTED_DEPTH
            )));
        }
        self.segmenter()?;
        self.registry()?;
        Ok(())
    }

    pub fn segmenter(&self) -> HtmlResult<Segmenter> {
        Ok(Segmenter::new(&self.fence_tag)?)
    }

    pub fn registry(&self) -> HtmlResult<Registry> {
        match &self.components {
            Some(names) => Ok(Registry::with_components(names)?),
            None => Ok(Registry::builtin()),
        }
    }
}

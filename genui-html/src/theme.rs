//! Class tokens applied to each component when writing HTML.
//!
//! Every component gets a base class derived from its name (`Card` →
//! `genui-card`, `CardTitle` → `genui-card-title`). A documented variant
//! other than `default` adds a modifier class (`genui-badge-secondary`).
//! Overrides are keyed by component name, or `Name.variant` for one variant,
//! and replace the computed classes for that key.

use genui_core::ComponentKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CLASS_PREFIX: &str = "genui";

/// Override key for the inner bar of `Progress`.
pub const PROGRESS_INDICATOR: &str = "Progress.indicator";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    overrides: BTreeMap<String, String>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the classes for `key` (`"Card"`, `"Badge.secondary"`, ...).
    pub fn with_override(mut self, key: impl Into<String>, classes: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), classes.into());
        self
    }

    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    /// Classes for `kind`, with `variant` applied when it is one the
    /// component documents. Unknown variants fall back to the base classes.
    pub fn classes(&self, kind: ComponentKind, variant: Option<&str>) -> String {
        let variant = variant.filter(|v| *v != "default" && kind.variants().contains(v));
        if let Some(variant) = variant {
            if let Some(classes) = self.overrides.get(&format!("{}.{}", kind.name(), variant)) {
                return classes.clone();
            }
        }

        let base = self
            .overrides
            .get(kind.name())
            .cloned()
            .unwrap_or_else(|| base_class(kind.name()));
        match variant {
            Some(variant) => format!("{} {}-{}", base, base_class(kind.name()), variant),
            None => base,
        }
    }

    /// Classes for a named sub-part such as [`PROGRESS_INDICATOR`].
    pub fn part(&self, key: &str) -> String {
        self.overrides
            .get(key)
            .cloned()
            .unwrap_or_else(|| base_class(key))
    }

    /// Separator orientation modifier. Horizontal is the default look.
    pub fn separator(&self, vertical: bool) -> String {
        let key = if vertical {
            "Separator.vertical"
        } else {
            "Separator"
        };
        match self.overrides.get(key) {
            Some(classes) => classes.clone(),
            None if vertical => format!(
                "{} {}-vertical",
                self.classes(ComponentKind::Separator, None),
                base_class("Separator")
            ),
            None => self.classes(ComponentKind::Separator, None),
        }
    }
}

/// `CardTitle` → `genui-card-title`, `Progress.indicator` →
/// `genui-progress-indicator`.
fn base_class(name: &str) -> String {
    let mut out = String::from(CLASS_PREFIX);
    for part in name.split('.') {
        for (i, c) in part.chars().enumerate() {
            if i == 0 || c.is_ascii_uppercase() {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

use crate::error::{GenUiError, GenUiResult};
use crate::node::TEXT_COMPONENT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Registered widget primitives. The set is closed; the model can only
/// request these by exact, case-sensitive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Card,
    CardHeader,
    CardTitle,
    CardDescription,
    CardContent,
    CardFooter,
    Badge,
    Button,
    Progress,
    Separator,
    Skeleton,
    Alert,
    AlertTitle,
    AlertDescription,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 14] = [
        ComponentKind::Card,
        ComponentKind::CardHeader,
        ComponentKind::CardTitle,
        ComponentKind::CardDescription,
        ComponentKind::CardContent,
        ComponentKind::CardFooter,
        ComponentKind::Badge,
        ComponentKind::Button,
        ComponentKind::Progress,
        ComponentKind::Separator,
        ComponentKind::Skeleton,
        ComponentKind::Alert,
        ComponentKind::AlertTitle,
        ComponentKind::AlertDescription,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Card => "Card",
            ComponentKind::CardHeader => "CardHeader",
            ComponentKind::CardTitle => "CardTitle",
            ComponentKind::CardDescription => "CardDescription",
            ComponentKind::CardContent => "CardContent",
            ComponentKind::CardFooter => "CardFooter",
            ComponentKind::Badge => "Badge",
            ComponentKind::Button => "Button",
            ComponentKind::Progress => "Progress",
            ComponentKind::Separator => "Separator",
            ComponentKind::Skeleton => "Skeleton",
            ComponentKind::Alert => "Alert",
            ComponentKind::AlertTitle => "AlertTitle",
            ComponentKind::AlertDescription => "AlertDescription",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Documented `variant` values, if the component has any.
    pub fn variants(self) -> &'static [&'static str] {
        match self {
            ComponentKind::Badge => &["default", "secondary", "destructive", "outline"],
            ComponentKind::Button => &[
                "default",
                "destructive",
                "outline",
                "secondary",
                "ghost",
                "link",
            ],
            ComponentKind::Alert => &["default", "destructive"],
            _ => &[],
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Plain markup elements the model may use for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkupTag {
    Div,
    Span,
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Ul,
    Ol,
    Li,
    Strong,
    Em,
}

impl MarkupTag {
    pub const ALL: [MarkupTag; 14] = [
        MarkupTag::Div,
        MarkupTag::Span,
        MarkupTag::P,
        MarkupTag::H1,
        MarkupTag::H2,
        MarkupTag::H3,
        MarkupTag::H4,
        MarkupTag::H5,
        MarkupTag::H6,
        MarkupTag::Ul,
        MarkupTag::Ol,
        MarkupTag::Li,
        MarkupTag::Strong,
        MarkupTag::Em,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarkupTag::Div => "div",
            MarkupTag::Span => "span",
            MarkupTag::P => "p",
            MarkupTag::H1 => "h1",
            MarkupTag::H2 => "h2",
            MarkupTag::H3 => "h3",
            MarkupTag::H4 => "h4",
            MarkupTag::H5 => "h5",
            MarkupTag::H6 => "h6",
            MarkupTag::Ul => "ul",
            MarkupTag::Ol => "ol",
            MarkupTag::Li => "li",
            MarkupTag::Strong => "strong",
            MarkupTag::Em => "em",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

impl fmt::Display for MarkupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a `component` string refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Text,
    Markup(MarkupTag),
    Component(ComponentKind),
    Unrecognized,
}

/// Closed lookup table from component names to primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    components: BTreeSet<ComponentKind>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Every built-in component enabled.
    pub fn builtin() -> Self {
        Self {
            components: ComponentKind::ALL.into_iter().collect(),
        }
    }

    /// Registry restricted to `names`. Names are checked up front: unknown
    /// names, duplicates, and names shadowing a markup tag or `text` fail.
    pub fn with_components<I, S>(names: I) -> GenUiResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut components = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if name == TEXT_COMPONENT || MarkupTag::from_name(name).is_some() {
                return Err(GenUiError::ReservedComponentName {
                    name: name.to_string(),
                });
            }
            let kind = ComponentKind::from_name(name).ok_or_else(|| {
                GenUiError::UnknownRegistryComponent {
                    name: name.to_string(),
                }
            })?;
            if !components.insert(kind) {
                return Err(GenUiError::DuplicateComponent {
                    name: name.to_string(),
                });
            }
        }
        Ok(Self { components })
    }

    pub fn resolve(&self, name: &str) -> Resolved {
        if name == TEXT_COMPONENT {
            return Resolved::Text;
        }
        if let Some(tag) = MarkupTag::from_name(name) {
            return Resolved::Markup(tag);
        }
        match ComponentKind::from_name(name) {
            Some(kind) if self.components.contains(&kind) => Resolved::Component(kind),
            _ => Resolved::Unrecognized,
        }
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.components.contains(&kind)
    }

    pub fn components(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.iter().copied()
    }

    /// Human-readable list of what the model may emit, for tool descriptions
    /// and prompts.
    pub fn catalogue(&self) -> String {
        let mut out = String::from("Available components:\n");
        for kind in self.components() {
            out.push_str("- ");
            out.push_str(kind.name());
            let variants = kind.variants();
            if !variants.is_empty() {
                out.push_str(" (variants: ");
                out.push_str(&variants.join(", "));
                out.push(')');
            }
            if kind == ComponentKind::Progress {
                out.push_str(" (value: 0-100)");
            }
            out.push('\n');
        }
        let tags: Vec<&str> = MarkupTag::ALL.iter().map(|t| t.as_str()).collect();
        out.push_str("\nHTML elements: ");
        out.push_str(&tags.join(", "));
        out.push('\n');
        out
    }
}

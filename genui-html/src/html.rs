//! Converts rendered UI trees and message parts to safe HTML.
//! No script, no inline event handlers; only structure, classes and styles.

use crate::error::HtmlResult;
use crate::theme::{Theme, PROGRESS_INDICATOR};
use genui_core::{Block, ComponentKind, PartView, Props, RenderNode, RenderedSegment, Role};
use serde_json::Value;
use std::fmt::Write;
use tracing::debug;

/// Document styles for the default theme classes.
pub const BASE_STYLES: &str = "html,body{margin:0;min-height:100vh;background:#ffffff;color:#09090b;font-family:system-ui,-apple-system,sans-serif;}\
.genui-transcript{max-width:48rem;margin:0 auto;padding:1.5rem;display:flex;flex-direction:column;gap:1rem;}\
.genui-message{display:flex;flex-direction:column;gap:0.75rem;}\
.genui-message-user{align-self:flex-end;background:#18181b;color:#fafafa;border-radius:0.75rem;padding:0.5rem 1rem;}\
.genui-text{white-space:pre-wrap;line-height:1.6;}\
.genui-widget-title{font-size:0.875rem;font-weight:600;color:#71717a;margin:0 0 0.5rem;}\
.genui-error{color:#b91c1c;font-size:0.875rem;}\
.genui-card{border:1px solid #e4e4e7;border-radius:0.75rem;background:#ffffff;box-shadow:0 1px 2px rgba(0,0,0,0.05);}\
.genui-card-header{display:flex;flex-direction:column;gap:0.375rem;padding:1.5rem;}\
.genui-card-title{margin:0;font-size:1.125rem;font-weight:600;line-height:1.2;}\
.genui-card-description{margin:0;font-size:0.875rem;color:#71717a;}\
.genui-card-content{padding:0 1.5rem 1.5rem;}\
.genui-card-footer{display:flex;align-items:center;padding:0 1.5rem 1.5rem;}\
.genui-badge{display:inline-flex;align-items:center;border-radius:9999px;padding:0.125rem 0.625rem;font-size:0.75rem;font-weight:600;background:#18181b;color:#fafafa;border:1px solid transparent;}\
.genui-badge-secondary{background:#f4f4f5;color:#18181b;}\
.genui-badge-destructive{background:#ef4444;color:#fafafa;}\
.genui-badge-outline{background:transparent;color:#09090b;border-color:#e4e4e7;}\
.genui-button{display:inline-flex;align-items:center;justify-content:center;border-radius:0.375rem;padding:0.5rem 1rem;font-size:0.875rem;font-weight:500;background:#18181b;color:#fafafa;border:1px solid transparent;cursor:pointer;}\
.genui-button:disabled{opacity:0.5;cursor:default;}\
.genui-button-destructive{background:#ef4444;}\
.genui-button-outline{background:#ffffff;color:#09090b;border-color:#e4e4e7;}\
.genui-button-secondary{background:#f4f4f5;color:#18181b;}\
.genui-button-ghost{background:transparent;color:#09090b;}\
.genui-button-link{background:transparent;color:#18181b;text-decoration:underline;}\
.genui-progress{position:relative;height:0.5rem;width:100%;overflow:hidden;border-radius:9999px;background:#f4f4f5;}\
.genui-progress-indicator{height:100%;background:#18181b;}\
.genui-separator{height:1px;width:100%;background:#e4e4e7;}\
.genui-separator-vertical{height:100%;width:1px;}\
.genui-skeleton{border-radius:0.375rem;background:#f4f4f5;animation:genui-pulse 2s ease-in-out infinite;}\
.genui-alert{position:relative;border:1px solid #e4e4e7;border-radius:0.5rem;padding:1rem;}\
.genui-alert-destructive{border-color:#ef4444;color:#b91c1c;}\
.genui-alert-title{margin:0 0 0.25rem;font-weight:500;}\
.genui-alert-description{font-size:0.875rem;}\
@keyframes genui-pulse{50%{opacity:0.5;}}";

/// Attributes that carry URLs.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "xlink:href"];

/// CSS properties that take bare numbers; every other number gets `px`.
const UNITLESS_CSS: &[&str] = &[
    "flex",
    "flex-grow",
    "flex-shrink",
    "font-weight",
    "line-height",
    "opacity",
    "order",
    "z-index",
];

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn node_to_html(node: &RenderNode, theme: &Theme) -> HtmlResult<String> {
    let mut out = String::new();
    write_node(&mut out, node, theme)?;
    Ok(out)
}

/// HTML for the segments of one assistant message, in order. Omitted
/// widgets produce no output.
pub fn segments_to_html(segments: &[RenderedSegment], theme: &Theme) -> HtmlResult<String> {
    let mut out = String::new();
    for rendered in segments {
        match &rendered.block {
            Block::Text(text) => write_text(&mut out, text)?,
            Block::Widget(tree) => write_node(&mut out, tree, theme)?,
            Block::Loading => write_loading(&mut out, theme)?,
            Block::Omitted => {}
        }
    }
    Ok(out)
}

pub fn part_to_html(view: &PartView, theme: &Theme) -> HtmlResult<String> {
    let mut out = String::new();
    match view {
        PartView::Plain(text) => write_text(&mut out, text)?,
        PartView::Segments(segments) => out.push_str(&segments_to_html(segments, theme)?),
        PartView::Loading => write_loading(&mut out, theme)?,
        PartView::Widget { title, tree, .. } => {
            out.push_str("<div class=\"genui-widget\">");
            if let Some(title) = title {
                write!(out, "<p class=\"genui-widget-title\">{}</p>", escape_html(title))?;
            }
            if let Some(tree) = tree {
                write_node(&mut out, tree, theme)?;
            }
            out.push_str("</div>");
        }
        PartView::Error(message) => {
            write!(out, "<div class=\"genui-error\">{}</div>", escape_html(message))?;
        }
    }
    Ok(out)
}

/// One chat bubble holding every part of a message.
pub fn message_to_html(role: Role, views: &[PartView], theme: &Theme) -> HtmlResult<String> {
    let role = match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let mut out = String::new();
    write!(out, "<div class=\"genui-message genui-message-{}\">", role)?;
    for view in views {
        out.push_str(&part_to_html(view, theme)?);
    }
    out.push_str("</div>");
    Ok(out)
}

/// Placeholder shown while a UI payload is still streaming.
pub fn loading_html(theme: &Theme) -> HtmlResult<String> {
    let mut out = String::new();
    write_loading(&mut out, theme)?;
    Ok(out)
}

/// Standalone document around `body`.
pub fn page(title: &str, body: &str) -> HtmlResult<String> {
    let mut html = String::new();
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body>
<main class="genui-transcript">
{}
</main>
</body>
</html>
"#,
        escape_html(title),
        BASE_STYLES,
        body
    )?;
    Ok(html)
}

fn write_text(out: &mut String, text: &str) -> std::fmt::Result {
    write!(out, "<div class=\"genui-text\">{}</div>", escape_html(text))
}

fn write_loading(out: &mut String, theme: &Theme) -> std::fmt::Result {
    let skeleton = theme.classes(ComponentKind::Skeleton, None);
    write!(
        out,
        "<div class=\"{} genui-loading\" aria-busy=\"true\"><div class=\"{}\">",
        escape_html(&theme.classes(ComponentKind::Card, None)),
        escape_html(&theme.classes(ComponentKind::CardHeader, None))
    )?;
    for (height, width) in [("1.5rem", "75%"), ("1rem", "50%")] {
        write_skeleton_line(out, &skeleton, height, width)?;
    }
    write!(
        out,
        "</div><div class=\"{}\">",
        escape_html(&theme.classes(ComponentKind::CardContent, None))
    )?;
    for width in ["100%", "83%", "66%"] {
        write_skeleton_line(out, &skeleton, "1rem", width)?;
    }
    out.push_str("</div></div>");
    Ok(())
}

fn write_skeleton_line(out: &mut String, class: &str, height: &str, width: &str) -> std::fmt::Result {
    write!(
        out,
        "<div class=\"{}\" style=\"height:{};width:{};margin-bottom:0.5rem;\"></div>",
        escape_html(class),
        height,
        width
    )
}

fn write_node(out: &mut String, node: &RenderNode, theme: &Theme) -> std::fmt::Result {
    match node {
        RenderNode::Text { text } => {
            out.push_str(&escape_html(text));
            Ok(())
        }
        RenderNode::Element {
            tag,
            attrs,
            children,
            ..
        } => {
            let tag = tag.as_str();
            write_open(out, tag, None, "", attrs, &[])?;
            write_children(out, children, theme)?;
            write!(out, "</{}>", tag)
        }
        RenderNode::Component {
            kind,
            props,
            children,
            ..
        } => write_component(out, *kind, props, children, theme),
    }
}

fn write_children(out: &mut String, children: &[RenderNode], theme: &Theme) -> std::fmt::Result {
    for child in children {
        write_node(out, child, theme)?;
    }
    Ok(())
}

fn write_component(
    out: &mut String,
    kind: ComponentKind,
    props: &Props,
    children: &[RenderNode],
    theme: &Theme,
) -> std::fmt::Result {
    let variant = props.get("variant").and_then(Value::as_str);
    let class = theme.classes(kind, variant);

    match kind {
        ComponentKind::Progress => {
            let pct = progress_value(props.get("value"));
            write_open(
                out,
                "div",
                Some(&class),
                &format!(
                    " role=\"progressbar\" aria-valuemin=\"0\" aria-valuemax=\"100\" aria-valuenow=\"{}\"",
                    pct
                ),
                props,
                &["value", "max"],
            )?;
            return write!(
                out,
                "<div class=\"{}\" style=\"width:{}%\"></div></div>",
                escape_html(&theme.part(PROGRESS_INDICATOR)),
                pct
            );
        }
        ComponentKind::Separator => {
            let vertical = props.get("orientation").and_then(Value::as_str) == Some("vertical");
            let orientation = if vertical { "vertical" } else { "horizontal" };
            write_open(
                out,
                "div",
                Some(&theme.separator(vertical)),
                &format!(" role=\"separator\" aria-orientation=\"{}\"", orientation),
                props,
                &["orientation", "decorative"],
            )?;
            return out.write_str("</div>");
        }
        _ => {}
    }

    let (tag, extra, consumed): (&str, &str, &[&str]) = match kind {
        ComponentKind::CardTitle => ("h3", "", &[]),
        ComponentKind::CardDescription => ("p", "", &[]),
        ComponentKind::AlertTitle => ("h5", "", &[]),
        ComponentKind::Badge => ("span", "", &["variant"]),
        ComponentKind::Button => ("button", " type=\"button\"", &["variant", "size", "type"]),
        ComponentKind::Alert => ("div", " role=\"alert\"", &["variant"]),
        _ => ("div", "", &[]),
    };
    write_open(out, tag, Some(&class), extra, props, consumed)?;
    write_children(out, children, theme)?;
    write!(out, "</{}>", tag)
}

/// `value` clamped to 0-100. Missing or non-numeric values read as 0.
fn progress_value(value: Option<&Value>) -> f64 {
    let pct = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if pct.is_nan() {
        0.0
    } else {
        pct.clamp(0.0, 100.0)
    }
}

/// Opening tag. `extra` holds trusted, pre-escaped attributes; `consumed`
/// names props the component handles itself.
fn write_open(
    out: &mut String,
    tag: &str,
    class: Option<&str>,
    extra: &str,
    props: &Props,
    consumed: &[&str],
) -> std::fmt::Result {
    write!(out, "<{}", tag)?;

    let mut classes: Vec<&str> = class.into_iter().collect();
    for key in ["className", "class"] {
        if let Some(Value::String(c)) = props.get(key) {
            classes.push(c);
        }
    }
    let class = classes.join(" ");
    if !class.trim().is_empty() {
        write!(out, " class=\"{}\"", escape_html(class.trim()))?;
    }
    out.push_str(extra);

    for (name, value) in props {
        if matches!(name.as_str(), "className" | "class") || consumed.contains(&name.as_str()) {
            continue;
        }
        write_attr(out, name, value)?;
    }
    out.write_char('>')
}

fn write_attr(out: &mut String, name: &str, value: &Value) -> std::fmt::Result {
    let name = match name {
        "htmlFor" => "for",
        "tabIndex" => "tabindex",
        other => other,
    };
    if !is_safe_attr_name(name) {
        debug!(attribute = name, "dropping unsafe attribute");
        return Ok(());
    }

    if name == "style" {
        let css = match value {
            Value::Object(map) => style_object_to_css(map),
            Value::String(s) if is_safe_css(s) => s.clone(),
            _ => String::new(),
        };
        if css.is_empty() {
            return Ok(());
        }
        return write!(out, " style=\"{}\"", escape_html(&css));
    }

    match value {
        Value::Bool(true) => write!(out, " {}", name),
        Value::Bool(false) | Value::Null => Ok(()),
        Value::Number(n) => write!(out, " {}=\"{}\"", name, n),
        Value::String(s) => {
            if URL_ATTRIBUTES.contains(&name.to_ascii_lowercase().as_str()) && is_script_url(s) {
                debug!(attribute = name, "dropping script URL");
                return Ok(());
            }
            write!(out, " {}=\"{}\"", name, escape_html(s))
        }
        Value::Array(_) | Value::Object(_) => {
            debug!(attribute = name, "dropping structured attribute value");
            Ok(())
        }
    }
}

fn is_safe_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-'))
        && !name.to_ascii_lowercase().starts_with("on")
}

/// True for `javascript:` and `vbscript:` URLs, ignoring case and the
/// whitespace and control characters browsers skip.
fn is_script_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    normalized.starts_with("javascript:") || normalized.starts_with("vbscript:")
}

fn is_safe_css(css: &str) -> bool {
    let lower = css.to_ascii_lowercase();
    !lower.contains("expression(") && !lower.contains("javascript:") && !lower.contains('<')
}

/// React-style style object (`{"backgroundColor": "red", "width": 40}`) to
/// a declaration list. Entries that could break out of their declaration
/// are dropped.
fn style_object_to_css(map: &serde_json::Map<String, Value>) -> String {
    let mut css = String::new();
    for (key, value) in map {
        let property = css_property(key);
        if property.is_empty()
            || !property
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            continue;
        }
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) if UNITLESS_CSS.contains(&property.as_str()) => n.to_string(),
            Value::Number(n) => format!("{}px", n),
            _ => continue,
        };
        if value.contains([';', '{', '}']) || !is_safe_css(&value) {
            debug!(property = %property, "dropping unsafe style value");
            continue;
        }
        // Writing into a String cannot fail.
        let _ = write!(css, "{}:{};", property, value.trim());
    }
    css
}

/// `backgroundColor` → `background-color`, `WebkitTransform` →
/// `-webkit-transform`. Already-hyphenated names pass through.
fn css_property(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

//! Best-effort completion of truncated JSON documents.
//!
//! A single forward scan tracks the open containers and remembers the last
//! point at which the prefix was a complete value inside its container. On
//! truncation the prefix up to that point is closed with the matching
//! brackets, so a dangling key, a key without a value, or a half-read number
//! or literal is discarded. Truncated strings are handled per
//! [`PartialStrings`]. Syntax errors are never repaired.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Deepest container nesting accepted by [`parse_json`]. A UI node level is
/// an object plus its `children` array, so this allows about 512 levels.
pub const MAX_NESTING: usize = 1024;

/// Strict JSON parse without serde_json's fixed recursion limit of 128,
/// which a tree of about 64 node levels already reaches. Nesting is bounded
/// by [`MAX_NESTING`] instead.
pub fn parse_json(text: &str) -> serde_json::Result<Value> {
    let depth = nesting_depth(text);
    if depth > MAX_NESTING {
        return Err(serde::de::Error::custom(format!(
            "nesting depth {} exceeds {}",
            depth, MAX_NESTING
        )));
    }
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Deepest bracket nesting outside of strings.
fn nesting_depth(text: &str) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Policy for a string value cut off by the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialStrings<'a> {
    /// Close the string at the truncation point.
    #[default]
    Close,
    /// Discard it like any other dangling value.
    Drop,
    /// Close it only when it is the value of one of these keys, or an item
    /// of an array stored under one of them. Discard it otherwise.
    Under(&'a [&'a str]),
}

impl PartialStrings<'_> {
    fn allows(&self, key: Option<&str>) -> bool {
        match self {
            PartialStrings::Close => true,
            PartialStrings::Drop => false,
            PartialStrings::Under(keys) => key.is_some_and(|k| keys.contains(&k)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairOptions<'a> {
    pub partial_strings: PartialStrings<'a>,
}

/// Repair with the default options (truncated strings are closed).
pub fn try_repair(text: &str) -> Option<Value> {
    try_repair_with(text, &RepairOptions::default())
}

/// Parse `text` as JSON, completing it if the input stops early.
///
/// Returns `None` for empty input, malformed input, or a truncated
/// top-level scalar.
pub fn try_repair_with(text: &str, options: &RepairOptions<'_>) -> Option<Value> {
    let text = text.trim_start();
    match text.as_bytes().first()? {
        b'{' | b'[' => {}
        _ => return serde_json::from_str(text).ok(),
    }

    match scan(text)? {
        Outcome::Complete(end) => parse_json(&text[..end]).ok(),
        Outcome::Truncated {
            cut,
            closers,
            partial,
        } => {
            if let Some(partial) = partial {
                if options.partial_strings.allows(partial.key.as_deref()) {
                    let body = trim_dangling_escape(&text[partial.start + 1..]);
                    let candidate =
                        format!("{}{}\"{}", &text[..=partial.start], body, partial.closers);
                    if let Ok(value) = parse_json(&candidate) {
                        debug!(at = text.len(), "closed truncated JSON string");
                        return Some(value);
                    }
                }
            }
            let candidate = format!("{}{}", &text[..cut], closers);
            let value = parse_json(&candidate).ok();
            if value.is_some() {
                debug!(cut, dropped = text.len() - cut, "completed truncated JSON");
            }
            value
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Key,
    Colon,
    Value,
    CommaOrClose,
}

#[derive(Debug, Clone)]
struct Frame {
    container: Container,
    expect: Expect,
    /// Only the opening bracket has been seen.
    empty: bool,
    /// Object: key of the member being read. Array: key the array sits under.
    key: Option<String>,
}

#[derive(Debug)]
struct PartialString {
    /// Byte offset of the opening quote.
    start: usize,
    key: Option<String>,
    closers: String,
}

#[derive(Debug)]
enum Outcome {
    /// The root container closes at this offset.
    Complete(usize),
    /// Input ended early. `text[..cut] + closers` is the last complete state.
    Truncated {
        cut: usize,
        closers: String,
        partial: Option<PartialString>,
    },
}

fn closers(stack: &[Frame]) -> String {
    stack
        .iter()
        .rev()
        .map(|frame| match frame.container {
            Container::Object => '}',
            Container::Array => ']',
        })
        .collect()
}

fn finish_value(stack: &mut [Frame]) {
    if let Some(top) = stack.last_mut() {
        top.expect = Expect::CommaOrClose;
        top.empty = false;
    }
}

fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

fn scan_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut j = start;
    while j < bytes.len() && pred(bytes[j]) {
        j += 1;
    }
    j
}

/// Returns `None` on a syntax error.
fn scan(text: &str) -> Option<Outcome> {
    const LITERALS: [&str; 3] = ["true", "false", "null"];

    let bytes = text.as_bytes();
    let mut stack: Vec<Frame> = Vec::new();
    let mut cut = 0;
    let mut cut_closers = String::new();
    let mut i = 0;

    loop {
        i = scan_while(bytes, i, |b| b.is_ascii_whitespace());
        if i >= bytes.len() {
            return Some(Outcome::Truncated {
                cut,
                closers: cut_closers,
                partial: None,
            });
        }
        let b = bytes[i];
        let expect = stack.last().map_or(Expect::Value, |f| f.expect);

        // Set when a value or container finished at `i`.
        let completed = match expect {
            Expect::Value => match b {
                b'{' | b'[' => {
                    let (container, expect, key) = if b == b'{' {
                        (Container::Object, Expect::Key, None)
                    } else {
                        let parent_key = stack.last().and_then(|f| f.key.clone());
                        (Container::Array, Expect::Value, parent_key)
                    };
                    stack.push(Frame {
                        container,
                        expect,
                        empty: true,
                        key,
                    });
                    if stack.len() > MAX_NESTING {
                        return None;
                    }
                    i += 1;
                    cut = i;
                    cut_closers = closers(&stack);
                    false
                }
                b']' => {
                    let empty_array = stack
                        .last()
                        .is_some_and(|f| f.container == Container::Array && f.empty);
                    if !empty_array {
                        return None;
                    }
                    stack.pop();
                    i += 1;
                    true
                }
                b'"' => match string_end(bytes, i) {
                    Some(end) => {
                        i = end + 1;
                        true
                    }
                    None => {
                        return Some(Outcome::Truncated {
                            cut,
                            closers: cut_closers,
                            partial: Some(PartialString {
                                start: i,
                                key: stack.last().and_then(|f| f.key.clone()),
                                closers: closers(&stack),
                            }),
                        });
                    }
                },
                b'-' | b'0'..=b'9' => {
                    let end = scan_while(bytes, i, |c| {
                        matches!(c, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
                    });
                    if end == bytes.len() {
                        // The number may still grow.
                        return Some(Outcome::Truncated {
                            cut,
                            closers: cut_closers,
                            partial: None,
                        });
                    }
                    i = end;
                    true
                }
                b't' | b'f' | b'n' => {
                    let end = scan_while(bytes, i, |c| c.is_ascii_alphabetic());
                    let word = &text[i..end];
                    if LITERALS.contains(&word) {
                        i = end;
                        true
                    } else if end == bytes.len() && LITERALS.iter().any(|l| l.starts_with(word)) {
                        return Some(Outcome::Truncated {
                            cut,
                            closers: cut_closers,
                            partial: None,
                        });
                    } else {
                        return None;
                    }
                }
                _ => return None,
            },
            Expect::Key => match b {
                b'"' => {
                    let Some(end) = string_end(bytes, i) else {
                        return Some(Outcome::Truncated {
                            cut,
                            closers: cut_closers,
                            partial: None,
                        });
                    };
                    let key: String = serde_json::from_str(&text[i..=end]).ok()?;
                    if let Some(top) = stack.last_mut() {
                        top.key = Some(key);
                        top.expect = Expect::Colon;
                    }
                    i = end + 1;
                    false
                }
                b'}' if stack.last().is_some_and(|f| f.empty) => {
                    stack.pop();
                    i += 1;
                    true
                }
                _ => return None,
            },
            Expect::Colon => {
                if b != b':' {
                    return None;
                }
                if let Some(top) = stack.last_mut() {
                    top.expect = Expect::Value;
                }
                i += 1;
                false
            }
            Expect::CommaOrClose => {
                let top = stack.last_mut()?;
                match (b, top.container) {
                    (b',', Container::Object) => {
                        top.expect = Expect::Key;
                        top.key = None;
                        i += 1;
                        false
                    }
                    (b',', Container::Array) => {
                        top.expect = Expect::Value;
                        i += 1;
                        false
                    }
                    (b'}', Container::Object) | (b']', Container::Array) => {
                        stack.pop();
                        i += 1;
                        true
                    }
                    _ => return None,
                }
            }
        };

        if completed {
            if stack.is_empty() {
                return Some(Outcome::Complete(i));
            }
            finish_value(&mut stack);
            cut = i;
            cut_closers = closers(&stack);
        }
    }
}

/// Drops a backslash or `\u` escape cut off at the end of a string body,
/// then a high surrogate still waiting for its low half.
fn trim_dangling_escape(body: &str) -> &str {
    let mut body = body;
    let trailing = body.bytes().rev().take_while(|&b| b == b'\\').count();
    if trailing % 2 == 1 {
        body = &body[..body.len() - 1];
    }
    if let Some(pos) = last_unicode_escape(body) {
        if body.len() - (pos + 2) < 4 {
            body = &body[..pos];
        }
    }
    if let Some(pos) = last_unicode_escape(body) {
        let high_surrogate = body.len() - pos == 6
            && u16::from_str_radix(&body[pos + 2..], 16)
                .is_ok_and(|unit| (0xD800..=0xDBFF).contains(&unit));
        if high_surrogate {
            body = &body[..pos];
        }
    }
    body
}

/// Offset of the last unescaped `\u` in `body`.
fn last_unicode_escape(body: &str) -> Option<usize> {
    let pos = body.rfind("\\u")?;
    let escaped = body[..pos].bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1;
    (!escaped).then_some(pos)
}

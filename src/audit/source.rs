//! @acp:module "Source Scanning"
//! @acp:summary "Lexical Rust source masking and lookup for auditors"
//! @acp:domain audit
//! @acp:layer analysis
//!
//! Lexical helpers for the auditors. This is not a Rust parser: it masks
//! comments (and optionally string literals) while keeping line structure,
//! then locates functions by brace matching and constants by pattern.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// `pub const NAME: Type = value;`, possibly spanning lines
static CONST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*pub(?:\([^)]*\))?[ \t]+const[ \t]+([A-Z][A-Z0-9_]*)[ \t]*:[ \t]*([^=]+?)[ \t]*=[ \t]*([^;]+);",
    )
    .unwrap()
});

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?[0-9][0-9_]*(?:\.[0-9_]*)?)(?:[iuf](?:8|16|32|64|128|size))?$").unwrap()
});

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).unwrap());

static CHECK_VARIANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bCheckName::([A-Z][A-Za-z0-9]*)").unwrap());

/// Value of a scanned constant
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Number(f64),
    /// Slice or array constant; holds its entry count
    List(usize),
    Other(String),
}

impl ConstValue {
    /// Numeric view used for contract comparison
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConstValue::Number(n) => Some(*n),
            ConstValue::List(len) => Some(*len as f64),
            ConstValue::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDef {
    pub name: String,
    pub ty: String,
    pub value: ConstValue,
    pub line: usize,
}

/// Location of a function body in masked source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnSpan {
    pub name: String,
    /// Line of the `fn` keyword
    pub line: usize,
    /// Text from `fn` up to the opening brace
    pub signature: Range<usize>,
    /// Text between the braces
    pub body: Range<usize>,
    /// Line holding the opening brace
    pub body_line: usize,
}

/// Replace comments, and string and char literals when `mask_strings` is set,
/// with spaces. Newlines survive so line numbers stay valid.
pub fn mask_source(src: &str, mask_strings: bool) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c == '/' && next == Some('/') {
            while i < chars.len() && chars[i] != '\n' {
                out.push(' ');
                i += 1;
            }
        } else if c == '/' && next == Some('*') {
            let mut depth = 0usize;
            while i < chars.len() {
                let pair = (chars[i], chars.get(i + 1).copied());
                if pair == ('/', Some('*')) {
                    depth += 1;
                    out.push_str("  ");
                    i += 2;
                } else if pair == ('*', Some('/')) {
                    depth = depth.saturating_sub(1);
                    out.push_str("  ");
                    i += 2;
                    if depth == 0 {
                        break;
                    }
                } else {
                    out.push(blank(chars[i]));
                    i += 1;
                }
            }
        } else if let Some(end) = literal_end(&chars, i) {
            for &ch in &chars[i..end] {
                out.push(if mask_strings { blank(ch) } else { ch });
            }
            i = end;
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}

fn blank(c: char) -> char {
    if c == '\n' {
        '\n'
    } else {
        ' '
    }
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// End (exclusive) of a string, raw string or char literal starting at `i`
fn literal_end(chars: &[char], i: usize) -> Option<usize> {
    match chars[i] {
        '"' => Some(quoted_end(chars, i + 1)),
        '\'' => char_literal_end(chars, i),
        'r' => {
            let prev_ok = match i {
                0 => true,
                1 => !is_ident(chars[0]) || chars[0] == 'b',
                _ => {
                    !is_ident(chars[i - 1]) || (chars[i - 1] == 'b' && !is_ident(chars[i - 2]))
                }
            };
            if !prev_ok {
                return None;
            }
            let mut j = i + 1;
            while chars.get(j) == Some(&'#') {
                j += 1;
            }
            if chars.get(j) != Some(&'"') {
                return None;
            }
            let hashes = j - i - 1;
            let mut k = j + 1;
            while k < chars.len() {
                if chars[k] == '"' && (0..hashes).all(|h| chars.get(k + 1 + h) == Some(&'#')) {
                    return Some(k + 1 + hashes);
                }
                k += 1;
            }
            Some(chars.len())
        }
        _ => None,
    }
}

fn quoted_end(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '"' => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

/// Char literals only; lifetimes return `None`
fn char_literal_end(chars: &[char], i: usize) -> Option<usize> {
    if chars.get(i + 1) == Some(&'\\') {
        let close = (i + 3..chars.len().min(i + 12)).find(|&k| chars[k] == '\'')?;
        return Some(close + 1);
    }
    if chars.get(i + 2) == Some(&'\'') {
        return Some(i + 3);
    }
    None
}

/// 1-based line of a byte offset
pub fn line_of(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}

/// Find `fn name` in masked source and match its body braces
pub fn find_fn(masked: &str, name: &str) -> Option<FnSpan> {
    let pattern = Regex::new(&format!(r"\bfn\s+{}\s*[<(]", regex::escape(name))).ok()?;
    let found = pattern.find(masked)?;

    let rest = &masked[found.start()..];
    let open = found.start() + rest.find(['{', ';'])?;
    if masked[open..].starts_with(';') {
        return None;
    }

    let mut depth = 0usize;
    for (offset, c) in masked[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let close = open + offset;
                    return Some(FnSpan {
                        name: name.to_string(),
                        line: line_of(masked, found.start()),
                        signature: found.start()..open,
                        body: open + 1..close,
                        body_line: line_of(masked, open),
                    });
                }
            }
            _ => {}
        }
    }
    None
}

/// Every `pub const` in the source, keyed by name
pub fn parse_consts(src: &str) -> BTreeMap<String, ConstDef> {
    let masked = mask_source(src, false);
    let mut consts = BTreeMap::new();

    for caps in CONST_PATTERN.captures_iter(&masked) {
        let (Some(name), Some(ty), Some(raw)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            continue;
        };
        let raw_value = raw.as_str().trim();
        let value = if raw_value.starts_with("&[") || raw_value.starts_with('[') {
            ConstValue::List(count_entries(raw_value))
        } else {
            parse_number(raw_value)
                .map(ConstValue::Number)
                .unwrap_or_else(|| ConstValue::Other(raw_value.to_string()))
        };

        consts.insert(
            name.as_str().to_string(),
            ConstDef {
                name: name.as_str().to_string(),
                ty: ty.as_str().trim().to_string(),
                value,
                line: line_of(&masked, name.start()),
            },
        );
    }

    consts
}

fn parse_number(raw: &str) -> Option<f64> {
    let caps = NUMBER_PATTERN.captures(raw)?;
    caps.get(1)?.as_str().replace('_', "").parse().ok()
}

fn count_entries(list: &str) -> usize {
    if list.contains('"') {
        return STRING_LITERAL.find_iter(list).count();
    }
    let inner = list
        .trim_start_matches('&')
        .trim_start_matches('[')
        .trim_end_matches(']');
    inner.split(',').filter(|item| !item.trim().is_empty()).count()
}

/// Check names listed in an array constant such as `CHECK_ORDER`,
/// with the line of its declaration
pub fn parse_check_array(src: &str, name: &str) -> Option<(Vec<String>, usize)> {
    let masked = mask_source(src, true);
    let pattern = Regex::new(&format!(
        r"(?s)\b{}\s*:[^=]*=\s*&?\[(.*?)\]\s*;",
        regex::escape(name)
    ))
    .ok()?;
    let caps = pattern.captures(&masked)?;
    let items = caps.get(1)?;

    let names = CHECK_VARIANT
        .captures_iter(items.as_str())
        .filter_map(|c| c.get(1))
        .map(|m| to_snake_case(m.as_str()))
        .collect();
    Some((names, line_of(&masked, caps.get(0)?.start())))
}

fn to_snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for (i, c) in camel.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

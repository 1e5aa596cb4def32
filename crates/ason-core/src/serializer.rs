//! Canonical value → ASON text.
//!
//! [`serialize`] emits the minimal text for a canonical value: no whitespace
//! inside lists and objects, object keys in value order, numbers in their
//! normal form and union members joined with ` | `. The contradiction is the
//! literal `empty`. Non-canonical input is rejected with
//! [`AsonError::InvariantViolation`], so callers normalize first. A tree
//! nested deeper than [`MAX_SERIALIZE_DEPTH`] is rejected with
//! [`AsonError::ResourceExceeded`] before any recursive walk.
//!
//! The `Display` impl on [`Value`] writes any value, canonical or not, as an
//! expression that re-parses under the default grammar. Nested composites
//! are parenthesized to keep their grouping.

use crate::error::{AsonError, Resource, Result};
use crate::value::{Value, WILDCARD};
use std::fmt::{self, Write};

const RESERVED: [&str; 4] = ["null", "true", "false", "empty"];

/// Deepest tree `serialize` and `serialize_pretty` accept.
pub const MAX_SERIALIZE_DEPTH: usize = 512;

/// Serialize a canonical value to compact ASON text.
pub fn serialize(value: &Value) -> Result<String> {
    check_serializable(value)?;
    render(value, Layout::Compact)
}

/// Serialize a canonical value with two-space indentation.
pub fn serialize_pretty(value: &Value) -> Result<String> {
    check_serializable(value)?;
    render(value, Layout::Pretty)
}

fn render(value: &Value, layout: Layout) -> Result<String> {
    let mut out = String::new();
    write_value(&mut out, value, layout, 0, Context::Top)
        .map_err(|e| AsonError::InvariantViolation(e.to_string()))?;
    Ok(out)
}

fn check_serializable(value: &Value) -> Result<()> {
    if value.nesting_depth() > MAX_SERIALIZE_DEPTH {
        return Err(AsonError::ResourceExceeded {
            resource: Resource::Depth,
            limit: MAX_SERIALIZE_DEPTH,
        });
    }
    if !value.is_canonical() {
        tracing::error!(kind = %value.kind(), "refusing to serialize a non-canonical value");
        return Err(AsonError::InvariantViolation(
            "serialize requires a normalized value".to_string(),
        ));
    }
    if let Some(name) = value
        .variables()
        .into_iter()
        .find(|name| !is_identifier(name))
    {
        return Err(AsonError::InvariantViolation(format!(
            "variable name '{name}' cannot be written as an identifier"
        )));
    }
    Ok(())
}

/// Can `name` be read back as a variable?
fn is_identifier(name: &str) -> bool {
    if name == WILDCARD {
        return true;
    }
    if RESERVED.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Clone, Copy, PartialEq)]
enum Layout {
    Compact,
    Pretty,
}

/// Operator a value is written under, for parenthesization.
#[derive(Clone, Copy, PartialEq)]
enum Context {
    Top,
    UnionMember,
    IntersectionMember,
}

fn write_value<W: Write>(
    out: &mut W,
    value: &Value,
    layout: Layout,
    depth: usize,
    ctx: Context,
) -> fmt::Result {
    match value {
        Value::Null => out.write_str("null"),
        Value::Boolean(b) => out.write_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write!(out, "{n}"),
        Value::String(s) => write_string(out, s),
        Value::Variable(name) => out.write_str(name),
        Value::List(items) => {
            if items.is_empty() {
                return out.write_str("[]");
            }
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                newline(out, layout, depth + 1)?;
                write_value(out, item, layout, depth + 1, Context::Top)?;
            }
            newline(out, layout, depth)?;
            out.write_char(']')
        }
        Value::Object(map) => {
            if map.is_empty() {
                return out.write_str("{}");
            }
            out.write_char('{')?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                newline(out, layout, depth + 1)?;
                write_string(out, key)?;
                out.write_str(if layout == Layout::Pretty { ": " } else { ":" })?;
                write_value(out, item, layout, depth + 1, Context::Top)?;
            }
            newline(out, layout, depth)?;
            out.write_char('}')
        }
        Value::Union(members) if members.is_empty() => out.write_str("empty"),
        Value::Union(members) => {
            let parens = ctx != Context::Top;
            write_composite(out, members, " | ", Context::UnionMember, parens, layout, depth)
        }
        Value::Intersection(members) => {
            let parens = ctx == Context::IntersectionMember;
            write_composite(
                out,
                members,
                " & ",
                Context::IntersectionMember,
                parens,
                layout,
                depth,
            )
        }
    }
}

fn write_composite<W: Write>(
    out: &mut W,
    members: &[Value],
    separator: &str,
    member_ctx: Context,
    parens: bool,
    layout: Layout,
    depth: usize,
) -> fmt::Result {
    if parens {
        out.write_char('(')?;
    }
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.write_str(separator)?;
        }
        write_value(out, member, layout, depth, member_ctx)?;
    }
    if parens {
        out.write_char(')')?;
    }
    Ok(())
}

fn newline<W: Write>(out: &mut W, layout: Layout, depth: usize) -> fmt::Result {
    if layout == Layout::Pretty {
        out.write_char('\n')?;
        for _ in 0..depth {
            out.write_str("  ")?;
        }
    }
    Ok(())
}

/// JSON string escaping. Non-ASCII text is written as-is.
fn write_string<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '\u{0008}' => out.write_str("\\b")?,
            '\u{000C}' => out.write_str("\\f")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, Layout::Compact, 0, Context::Top)
    }
}

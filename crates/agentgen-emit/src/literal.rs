//! Python string literal encoding.
//!
//! Short single-line values become a quoted literal in the style of Python's
//! `repr`. Multi-line values and values longer than [`BLOCK_THRESHOLD`]
//! characters become a triple-quoted block so generated code stays readable.
//! Encoding never alters the value a Python interpreter reads back.

use agentgen_core::{Error, Result};

/// Values longer than this (in characters) are emitted as blocks.
pub const BLOCK_THRESHOLD: usize = 120;

/// Encode `value` as a Python string literal.
pub fn py_str(value: &str) -> Result<String> {
    check_controls(value)?;
    if value.contains('\n') || value.chars().count() > BLOCK_THRESHOLD {
        Ok(block(value))
    } else {
        Ok(quoted(value))
    }
}

/// Encode `value` as a triple-quoted block regardless of length.
pub fn py_block(value: &str) -> Result<String> {
    check_controls(value)?;
    Ok(block(value))
}

/// Reject C0 control characters other than TAB, LF and CR.
pub fn check_controls(value: &str) -> Result<()> {
    match value
        .chars()
        .find(|c| c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r' | '\x7f'))
    {
        Some(c) => Err(Error::emission(format!(
            "control character U+{:04X} cannot appear in generated source: {:?}",
            c as u32,
            preview(value)
        ))),
        None => Ok(()),
    }
}

fn preview(value: &str) -> String {
    value.chars().take(40).collect()
}

/// `repr`-style literal: single quotes unless the value contains a single
/// quote and no double quote.
fn quoted(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\x7f' => out.push_str("\\x7f"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Triple-quoted block. Backslashes, embedded `"""` runs, a trailing `"`
/// and carriage returns are escaped.
fn block(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 6);
    out.push_str("\"\"\"");
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '"' if chars[i..].starts_with(&['"', '"', '"']) => {
                out.push_str("\\\"\\\"\\\"");
                i += 3;
                continue;
            }
            '"' if i + 1 == chars.len() => out.push_str("\\\""),
            c => out.push(c),
        }
        i += 1;
    }
    out.push_str("\"\"\"");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_use_single_quotes() {
        assert_eq!(py_str("Senior Researcher").unwrap(), "'Senior Researcher'");
        assert_eq!(py_str("").unwrap(), "''");
    }

    #[test]
    fn quote_choice_follows_repr() {
        assert_eq!(py_str("it's").unwrap(), "\"it's\"");
        assert_eq!(py_str("say \"hi\"").unwrap(), "'say \"hi\"'");
        assert_eq!(py_str("it's \"odd\"").unwrap(), "'it\\'s \"odd\"'");
    }

    #[test]
    fn backslashes_and_tabs_are_escaped() {
        assert_eq!(py_str("C:\\temp\tx").unwrap(), "'C:\\\\temp\\tx'");
    }

    #[test]
    fn multi_line_values_become_blocks() {
        assert_eq!(py_str("line1\nline2").unwrap(), "\"\"\"line1\nline2\"\"\"");
    }

    #[test]
    fn long_values_become_blocks() {
        let long = "x".repeat(BLOCK_THRESHOLD + 1);
        assert_eq!(py_str(&long).unwrap(), format!("\"\"\"{}\"\"\"", long));
        let edge = "x".repeat(BLOCK_THRESHOLD);
        assert_eq!(py_str(&edge).unwrap(), format!("'{}'", edge));
    }

    #[test]
    fn block_escapes_triple_quotes_and_trailing_quote() {
        assert_eq!(
            py_str("a\n\"\"\"b\"\"\"").unwrap(),
            "\"\"\"a\n\\\"\\\"\\\"b\\\"\\\"\\\"\"\"\""
        );
        assert_eq!(py_str("say\n\"hi\"").unwrap(), "\"\"\"say\n\"hi\\\"\"\"\"");
    }

    #[test]
    fn block_escapes_trailing_quote_after_backslash() {
        assert_eq!(py_str("a\nb\\\"").unwrap(), "\"\"\"a\nb\\\\\\\"\"\"\"");
    }

    #[test]
    fn block_keeps_surrounding_whitespace() {
        assert_eq!(py_str("  a\nb  ").unwrap(), "\"\"\"  a\nb  \"\"\"");
    }

    #[test]
    fn control_characters_are_rejected() {
        let err = py_str("bad\u{0}value").err().unwrap();
        assert_eq!(err.kind(), "emission");
        assert!(err.to_string().contains("U+0000"));
        assert!(py_str("tab\tand\r\nnewline").is_ok());
    }
}

//! Relaxed JSON.
//!
//! Definition files are hand-edited and may carry `//` line comments,
//! `/* */` block comments and a trailing comma before `}` or `]`. These are
//! removed here, outside of string literals, before the text reaches
//! `serde_json`.

use std::path::Path;

use serde_json::Value;

use crate::{FgdError, Result};

/// Rewrite relaxed JSON into strict JSON, leaving string literals untouched.
pub fn to_strict_json(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;
    // Byte offset in `out` of a comma not yet followed by a value.
    let mut pending_comma: Option<usize> = None;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'/') => {
                // Keep the newline so serde_json error positions stay meaningful.
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                if let Some(index) = pending_comma.take() {
                    if c == '}' || c == ']' {
                        out.remove(index);
                    }
                }
                match c {
                    '"' => in_string = true,
                    ',' => pending_comma = Some(out.len()),
                    _ => {}
                }
                out.push(c);
            }
        }
    }

    out
}

/// Parse relaxed JSON text. `path` is only used for error reporting.
pub fn parse(path: &Path, source: &str) -> Result<Value> {
    serde_json::from_str(&to_strict_json(source)).map_err(|e| FgdError::json(path, e))
}

/// Read and parse a relaxed JSON file.
pub fn read(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| FgdError::io(path, e))?;
    parse(path, &content)
}

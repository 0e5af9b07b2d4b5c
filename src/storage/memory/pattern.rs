//! Glob patterns for key enumeration

use crate::utils::error::{GateError, Result};
use regex::Regex;

/// Translate a key glob (`*`, `?`, `[...]`, `\` escape) into an anchored regex
pub(crate) fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');

    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => {
                i += 1;
                if let Some(&c) = chars.get(i) {
                    push_literal(&mut out, c);
                } else {
                    push_literal(&mut out, '\\');
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end;
                }
                None => push_literal(&mut out, '['),
            },
            c => push_literal(&mut out, c),
        }
        i += 1;
    }

    out.push('$');
    Regex::new(&out).map_err(|e| GateError::store(format!("invalid key pattern {pattern:?}: {e}")))
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

/// Index of the `]` closing the class opened at `start`
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if chars.get(i) == Some(&'^') {
        i += 1;
    }
    // a leading `]` is a member of the class
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            ']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn push_class(out: &mut String, body: &[char]) {
    out.push('[');
    let mut i = 0;
    if body.first() == Some(&'^') {
        out.push('^');
        i = 1;
    }
    while i < body.len() {
        match body[i] {
            '\\' => {
                i += 1;
                if let Some(&c) = body.get(i) {
                    if !c.is_alphanumeric() {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
            '-' if i > 0 && i + 1 < body.len() => out.push('-'),
            c @ ('[' | ']' | '&' | '~' | '-' | '^') => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        i += 1;
    }
    out.push(']');
}

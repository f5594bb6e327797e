//! Reversible text deltas
//!
//! A delta is a tab-separated list of operations over the reference text:
//! - `=N` copy the next N characters of the reference
//! - `-N` skip the next N characters of the reference
//! - `+TEXT` insert TEXT (percent-escaped: `%`, control characters and non-ASCII)
//! - `#N` trailer, always last: the target is N characters long
//!
//! Counts are Unicode scalar values, not bytes. The diff itself runs over lines
//! (Myers), so an edit inside a line is stored as a replaced line.

use crate::error::{RcsError, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use similar::{Algorithm, DiffOp, TextDiff};

/// Characters escaped inside `+` operations. Non-ASCII is always escaped.
const INSERT_ESCAPES: &AsciiSet = &CONTROLS.add(b'%');

const SEPARATOR: char = '\t';

/// Compute the delta that turns `reference` into `target`
pub fn encode(reference: &str, target: &str) -> String {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(reference, target);
    let old = diff.old_slices();
    let new = diff.new_slices();

    let mut ops: Vec<String> = Vec::new();
    for op in diff.ops() {
        match *op {
            DiffOp::Equal { old_index, len, .. } => {
                ops.push(format!("={}", char_len(&old[old_index..old_index + len])));
            }
            DiffOp::Delete { old_index, old_len, .. } => {
                ops.push(format!("-{}", char_len(&old[old_index..old_index + old_len])));
            }
            DiffOp::Insert { new_index, new_len, .. } => {
                ops.push(insert_op(&new[new_index..new_index + new_len]));
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                ops.push(format!("-{}", char_len(&old[old_index..old_index + old_len])));
                ops.push(insert_op(&new[new_index..new_index + new_len]));
            }
        }
    }
    ops.push(format!("#{}", target.chars().count()));

    ops.join("\t")
}

/// Apply `delta` to `reference`, reproducing the text it was encoded against
pub fn decode(reference: &str, delta: &str) -> Result<String> {
    let mut tokens: Vec<&str> = delta.split(SEPARATOR).collect();
    let expected_len = match tokens.pop().and_then(|t| t.strip_prefix('#')) {
        Some(n) => parse_count(n)?,
        None => return Err(malformed("missing length trailer")),
    };

    let mut out = String::with_capacity(reference.len());
    let mut rest = reference;

    for (i, token) in tokens.iter().enumerate() {
        let mut chars = token.chars();
        let op = chars
            .next()
            .ok_or_else(|| malformed(format!("empty operation at position {}", i)))?;
        let arg = chars.as_str();

        match op {
            '=' => {
                let (head, tail) = split_chars(rest, parse_count(arg)?)?;
                out.push_str(head);
                rest = tail;
            }
            '-' => {
                let (_, tail) = split_chars(rest, parse_count(arg)?)?;
                rest = tail;
            }
            '+' => out.push_str(&unescape(arg)?),
            other => {
                return Err(malformed(format!(
                    "invalid operation '{}' at position {}",
                    other, i
                )))
            }
        }
    }

    if !rest.is_empty() {
        return Err(malformed(format!(
            "delta leaves {} characters of the reference unconsumed",
            rest.chars().count()
        )));
    }

    let actual_len = out.chars().count();
    if actual_len != expected_len {
        return Err(malformed(format!(
            "decoded {} characters, trailer says {}",
            actual_len, expected_len
        )));
    }

    Ok(out)
}

fn char_len(slices: &[&str]) -> usize {
    slices.iter().map(|s| s.chars().count()).sum()
}

fn insert_op(slices: &[&str]) -> String {
    let mut op = String::from("+");
    for s in slices {
        op.extend(utf8_percent_encode(s, INSERT_ESCAPES));
    }
    op
}

fn parse_count(s: &str) -> Result<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("invalid count '{}'", s)));
    }
    s.parse()
        .map_err(|_| malformed(format!("count out of range '{}'", s)))
}

/// Split after the first `n` characters of `s`
fn split_chars(s: &str, n: usize) -> Result<(&str, &str)> {
    let at = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .nth(n)
        .ok_or_else(|| {
            malformed(format!(
                "operation runs past end of reference by {} characters",
                n - s.chars().count()
            ))
        })?;
    Ok(s.split_at(at))
}

fn unescape(s: &str) -> Result<String> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let valid = bytes
                    .get(i + 1..i + 3)
                    .map_or(false, |h| h.iter().all(u8::is_ascii_hexdigit));
                if !valid {
                    return Err(malformed("truncated escape sequence"));
                }
                i += 3;
            }
            b if b < 0x20 || b >= 0x7f => {
                return Err(malformed(format!("unescaped byte 0x{:02x} in insertion", b)));
            }
            _ => i += 1,
        }
    }

    percent_decode_str(s)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|e| malformed(format!("insertion is not UTF-8: {}", e)))
}

fn malformed(msg: impl Into<String>) -> RcsError {
    RcsError::MalformedDelta(msg.into())
}

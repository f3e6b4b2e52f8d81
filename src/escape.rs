//! Quoting rules for string literals in an xx listing.
//!
//! A literal is written as `"..."` when none of its bytes is a comment
//! delimiter; otherwise its bytes are written as hex tokens so the parser can
//! never mistake payload for the start of a comment.

use crate::error::{Result, XxError};

/// Characters that open a comment (or a cosmetic line) in the xx format.
pub const RESERVED_DELIMITERS: [char; 6] = ['#', ';', '%', '|', '-', '/'];

pub const QUOTE: char = '"';

pub fn is_reserved(c: char) -> bool {
    RESERVED_DELIMITERS.contains(&c)
}

/// How a literal's bytes end up on the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralForm {
    /// Escaped body to place between quotes.
    Quoted(String),
    /// Space-separated hex tokens.
    Hex,
}

pub fn choose_form(bytes: &[u8]) -> LiteralForm {
    if bytes.iter().any(|&b| is_reserved(b as char)) {
        LiteralForm::Hex
    } else {
        LiteralForm::Quoted(escape(bytes))
    }
}

/// Inverse of [`unescape`]. The result is plain ASCII and never contains a
/// raw quote, so the first closing quote on a line is always the real one.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\x22"),
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}

/// Expands backslash escapes into raw bytes, one byte per character.
///
/// Supported: `\n \t \r \0 \\ \" \'` and `\xHH`. An unrecognised escape keeps
/// both the backslash and the character. Characters above U+00FF have no
/// single-byte form and are rejected.
pub fn unescape(text: &str, context: &str) -> Result<Vec<u8>> {
    let err = |reason: String| XxError::InvalidEscape {
        context: context.to_string(),
        reason,
    };
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(byte_of(c).ok_or_else(|| err(format!("{c:?} is outside the single-byte alphabet")))?);
            continue;
        }
        let Some(e) = chars.next() else {
            return Err(err("trailing backslash".into()));
        };
        match e {
            'n' => out.push(b'\n'),
            't' => out.push(b'\t'),
            'r' => out.push(b'\r'),
            '0' => out.push(0),
            '\\' => out.push(b'\\'),
            '"' => out.push(b'"'),
            '\'' => out.push(b'\''),
            'x' => {
                let hi = chars.next().and_then(|c| c.to_digit(16));
                let lo = chars.next().and_then(|c| c.to_digit(16));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push((hi * 16 + lo) as u8),
                    _ => return Err(err("\\x needs two hex digits".into())),
                }
            }
            other => {
                out.push(b'\\');
                out.push(byte_of(other).ok_or_else(|| err(format!("{other:?} is outside the single-byte alphabet")))?);
            }
        }
    }
    Ok(out)
}

fn byte_of(c: char) -> Option<u8> {
    u8::try_from(u32::from(c)).ok()
}

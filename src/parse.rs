//! Reader for the subset of the xx format that [`crate::codec`] emits.

use crate::error::{Result, XxError};
use crate::escape::{is_reserved, unescape, QUOTE};

/// Box-drawing block (U+2500..=U+259F); lines starting here are decoration.
pub const COSMETIC: std::ops::RangeInclusive<char> = '\u{2500}'..='\u{259F}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    Blank,
    /// Comment or framing; carries no bytes.
    Skip,
    /// Body between the quotes, still escaped.
    Quoted(&'a str),
    /// Token text with any trailing comment removed.
    Hex(&'a str),
}

/// Classifies one line. `lineno` is 1-based and only used for errors.
pub fn classify(line: &str, lineno: usize) -> Result<LineClass<'_>> {
    let stripped = line.trim_start();
    let Some(first) = stripped.chars().next() else {
        return Ok(LineClass::Blank);
    };
    if is_reserved(first) || COSMETIC.contains(&first) {
        return Ok(LineClass::Skip);
    }
    if first == QUOTE {
        let rest = &stripped[1..];
        let end = rest.find(QUOTE).ok_or(XxError::UnterminatedLiteral { line: lineno })?;
        let trailer = rest[end + 1..].trim_start();
        if trailer.chars().next().is_some_and(|c| !is_reserved(c)) {
            return Err(XxError::MalformedToken { line: lineno, token: trailer.to_string() });
        }
        return Ok(LineClass::Quoted(&rest[..end]));
    }
    let payload = match stripped.find(is_reserved) {
        Some(pos) => &stripped[..pos],
        None => stripped,
    };
    Ok(LineClass::Hex(payload))
}

/// Parses one byte token: exactly two hex digits.
pub fn parse_token(token: &str, lineno: usize) -> Result<u8> {
    let malformed = || XxError::MalformedToken { line: lineno, token: token.to_string() };
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    u8::from_str_radix(token, 16).map_err(|_| malformed())
}

/// Rebuilds the bytes described by an xx listing.
pub fn parse(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        match classify(line, lineno)? {
            LineClass::Blank | LineClass::Skip => {}
            LineClass::Quoted(body) => out.extend(unescape(body, &format!("line {lineno}"))?),
            LineClass::Hex(payload) => {
                for token in payload.split_whitespace() {
                    out.push(parse_token(token, lineno)?);
                }
            }
        }
    }
    Ok(out)
}

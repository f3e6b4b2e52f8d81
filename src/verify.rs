use tracing::{debug, info};

use crate::error::{Result, XxError};
use crate::parse::parse;

/// An independent implementation of the xx format, used as a second opinion.
pub trait ReferenceDecoder {
    fn decode_text(&self, text: &str) -> anyhow::Result<Vec<u8>>;
}

/// Parses `text` and requires it to reproduce `expected` exactly.
pub fn verify(text: &str, expected: &[u8]) -> Result<()> {
    let parsed = parse(text)?;
    compare(&parsed, expected)?;
    debug!(bytes = expected.len(), "listing round-trips");
    Ok(())
}

/// Same check as [`verify`], but the bytes come from `reference`.
pub fn verify_with<R: ReferenceDecoder + ?Sized>(reference: &R, text: &str, expected: &[u8]) -> Result<()> {
    let decoded = reference.decode_text(text).map_err(|source| XxError::Reference { source })?;
    compare(&decoded, expected)?;
    info!(bytes = expected.len(), "reference decoder agrees");
    Ok(())
}

fn compare(parsed: &[u8], expected: &[u8]) -> Result<()> {
    if parsed != expected {
        return Err(XxError::RoundTripMismatch {
            parsed_len: parsed.len(),
            expected_len: expected.len(),
        });
    }
    Ok(())
}

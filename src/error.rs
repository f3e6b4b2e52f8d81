use anyhow::Error;

/// Everything that can go wrong while building a layout, rendering an image or
/// reading a listing back.
#[derive(thiserror::Error, Debug)]
pub enum XxError {
    #[error("line {line}: unterminated string literal")]
    UnterminatedLiteral { line: usize },
    #[error("line {line}: malformed byte token {token:?}")]
    MalformedToken { line: usize, token: String },
    #[error("invalid escape in {context}: {reason}")]
    InvalidEscape { context: String, reason: String },
    #[error("block {name} @ {addr:#06x} needs {len} bytes but only {gap} fit before the next block")]
    ConfigurationOverflow {
        name: String,
        addr: u32,
        len: usize,
        gap: usize,
    },
    #[error("block {name} @ {addr:#06x} lies below the data region at {data_start:#06x}")]
    MisplacedBlock {
        name: String,
        addr: u32,
        data_start: u32,
    },
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("round-trip mismatch: parsed {parsed_len} bytes, expected {expected_len} bytes")]
    RoundTripMismatch {
        parsed_len: usize,
        expected_len: usize,
    },
    #[error("layout config: {source}")]
    Config {
        #[from]
        source: serde_json::Error,
    },
    #[error("reference decoder failed: {source}")]
    Reference {
        #[source]
        source: Error,
    },
}

pub type Result<T, E = XxError> = std::result::Result<T, E>;

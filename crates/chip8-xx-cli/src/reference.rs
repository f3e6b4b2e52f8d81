use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

use chip8_xx::ReferenceDecoder;

/// Runs the upstream `xx.py` assembler: `python xx.py <listing> -o <bin>`.
#[derive(Debug, Clone)]
pub struct XxPy {
    pub python: String,
    pub script: PathBuf,
}

impl XxPy {
    pub fn new(script: PathBuf) -> Self {
        Self { python: "python3".into(), script }
    }
}

impl ReferenceDecoder for XxPy {
    fn decode_text(&self, text: &str) -> Result<Vec<u8>> {
        let dir = std::env::temp_dir().join(format!("c8xx-{}", std::process::id()));
        std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        let input = dir.join("listing.xx");
        let output = dir.join("listing.ch8");
        std::fs::write(&input, text)?;

        debug!(script = %self.script.display(), "running reference decoder");
        let status = Command::new(&self.python)
            .arg(&self.script)
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .status()
            .with_context(|| format!("spawning {}", self.python))?;
        let result = if status.success() {
            std::fs::read(&output).with_context(|| format!("reading {}", output.display()))
        } else {
            Err(anyhow::anyhow!("{} exited with {status}", self.script.display()))
        };
        let _ = std::fs::remove_dir_all(&dir);
        result
    }
}

use std::path::Path;

use anyhow::Result;

/// Conventional CHIP-8 program load address.
pub const DEFAULT_BASE: u32 = 0x200;

/// A ROM image mapped at `base`. Address `base + i` holds `bytes[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub base: u32,
    pub bytes: Vec<u8>,
}

impl Image {
    /// # Panics
    ///
    /// If `base + bytes.len()` does not fit in a `u32`. Use [`Image::try_new`]
    /// for sizes that are not known to fit.
    pub fn new(base: u32, bytes: impl Into<Vec<u8>>) -> Self {
        match Self::try_new(base, bytes) {
            Ok(image) => image,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(base: u32, bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        anyhow::ensure!(
            u32::try_from(bytes.len()).is_ok_and(|len| base.checked_add(len).is_some()),
            "image of {} bytes does not fit above {base:#06x}",
            bytes.len()
        );
        Ok(Self { base, bytes })
    }

    pub fn load(path: &Path, base: u32) -> Result<Self> {
        Self::try_new(base, std::fs::read(path)?)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// One past the last mapped address.
    pub fn end(&self) -> u32 {
        self.base + self.bytes.len() as u32
    }

    /// Bytes in `[start, end)`, clipped to the mapped range.
    pub fn slice(&self, start: u32, end: u32) -> &[u8] {
        let lo = start.clamp(self.base, self.end()) - self.base;
        let hi = end.clamp(self.base, self.end()) - self.base;
        if lo >= hi {
            return &[];
        }
        &self.bytes[lo as usize..hi as usize]
    }
}

//! Region planning and line rendering.
//!
//! An image is split into regions that tile `[base, end)`: code up to the
//! layout's code end, padding up to the padding end, then declared buffers and
//! strings with undeclared `Data` runs in between. Every region renders to
//! lines whose hex tokens (or quoted body) carry exactly the region's bytes.

use std::fmt;

use bitvec::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::decoder::Decoder;
use crate::escape::{choose_form, LiteralForm};
use crate::image::Image;
use crate::layout::{BlockContent, Layout, NamedBlock};

/// Bytes per line outside the code region.
pub const CHUNK: usize = 16;
/// Bytes per full code line (two instruction words).
pub const CODE_LINE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Code,
    Padding,
    Buffer,
    StringLiteral,
    /// Bytes in the data region that no block declares.
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub kind: RegionKind,
    pub start: u32,
    pub len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Region {
    fn new(kind: RegionKind, start: u32, end: u32) -> Self {
        Self { kind, start, len: (end - start) as usize, name: None }
    }

    /// One past the last address. Regions from [`plan`] always lie inside
    /// their image, so this cannot overflow for them.
    pub fn end(&self) -> u32 {
        self.start + self.len as u32
    }
}

/// One line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmittedLine {
    /// Space-separated byte tokens plus an optional comment.
    Hex { addr: u32, bytes: Vec<u8>, comment: Option<String> },
    /// A string literal in quotes; `body` is the escaped form of `bytes`.
    Quoted { addr: u32, bytes: Vec<u8>, body: String, comment: Option<String> },
    /// A `#` comment line tied to an address (block headers).
    Note { addr: u32, text: String },
    /// Framing, titles and blank lines. Never carries bytes.
    Cosmetic(String),
}

impl EmittedLine {
    pub fn payload(&self) -> &[u8] {
        match self {
            EmittedLine::Hex { bytes, .. } | EmittedLine::Quoted { bytes, .. } => bytes,
            EmittedLine::Note { .. } | EmittedLine::Cosmetic(_) => &[],
        }
    }

    pub fn addr(&self) -> Option<u32> {
        match self {
            EmittedLine::Hex { addr, .. } | EmittedLine::Quoted { addr, .. } | EmittedLine::Note { addr, .. } => {
                Some(*addr)
            }
            EmittedLine::Cosmetic(_) => None,
        }
    }
}

impl fmt::Display for EmittedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmittedLine::Hex { bytes, comment, .. } => {
                let tokens = hex_tokens(bytes);
                match comment {
                    Some(c) if tokens.is_empty() => write!(f, "# {c}"),
                    Some(c) => write!(f, "{tokens} # {c}"),
                    None => f.write_str(&tokens),
                }
            }
            EmittedLine::Quoted { body, comment, .. } => match comment {
                Some(c) => write!(f, "\"{body}\" # {c}"),
                None => write!(f, "\"{body}\""),
            },
            EmittedLine::Note { text, .. } => write!(f, "# {text}"),
            EmittedLine::Cosmetic(text) => f.write_str(text),
        }
    }
}

pub fn hex_tokens(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Splits `image` into regions according to `layout`. Boundaries past the end
/// of the image are clipped, so the result always tiles the image.
pub fn plan(image: &Image, layout: &Layout) -> Vec<Region> {
    let base = image.base;
    let end = image.end();
    let code_end = layout.code_end().unwrap_or(end).clamp(base, end);
    let pad_end = layout.pad_end().unwrap_or(code_end).clamp(code_end, end);

    let mut regions = Vec::new();
    if code_end > base {
        regions.push(Region::new(RegionKind::Code, base, code_end));
    }
    if pad_end > code_end {
        regions.push(Region::new(RegionKind::Padding, code_end, pad_end));
    }

    let mut cursor = pad_end;
    for block in layout.blocks().range(pad_end..end).map(|(_, b)| b) {
        debug_assert!(block.addr >= cursor, "layout blocks overlap");
        if block.addr > cursor {
            regions.push(Region::new(RegionKind::Data, cursor, block.addr));
        }
        let block_end = block.addr + (block.len() as u32).min(end - block.addr);
        let kind = match block.content {
            BlockContent::Buffer { .. } => RegionKind::Buffer,
            BlockContent::Literal { .. } => RegionKind::StringLiteral,
        };
        let mut region = Region::new(kind, block.addr, block_end);
        region.name = Some(block.name.clone());
        regions.push(region);
        cursor = block_end;
    }
    if cursor < end {
        regions.push(Region::new(RegionKind::Data, cursor, end));
    }

    debug!(regions = regions.len(), code_end, pad_end, "planned regions");
    regions
}

/// True when `regions` cover every byte of `image` exactly once.
pub fn tiles(regions: &[Region], image: &Image) -> bool {
    let mut covered = bitvec![usize, Lsb0; 0; image.len()];
    for r in regions {
        let end = u32::try_from(r.len).ok().and_then(|len| r.start.checked_add(len));
        if r.start < image.base || end.map_or(true, |end| end > image.end()) {
            return false;
        }
        let lo = (r.start - image.base) as usize;
        let span = &mut covered[lo..lo + r.len];
        if span.any() {
            return false;
        }
        span.fill(true);
    }
    covered.all()
}

/// Renders every region of `image` in address order.
pub fn render<D: Decoder>(image: &Image, layout: &Layout, dec: &D) -> Vec<EmittedLine> {
    let mut lines = Vec::new();
    for region in plan(image, layout) {
        render_region(image, layout, dec, &region, &mut lines);
    }
    lines
}

pub fn render_region<D: Decoder>(
    image: &Image,
    layout: &Layout,
    dec: &D,
    region: &Region,
    out: &mut Vec<EmittedLine>,
) {
    let bytes = image.slice(region.start, region.end());
    match region.kind {
        RegionKind::Code => code_lines(dec, region.start, bytes, out),
        RegionKind::Padding => chunk_lines(region.start, bytes, Some("padding"), out),
        RegionKind::Data => chunk_lines(region.start, bytes, None, out),
        RegionKind::Buffer | RegionKind::StringLiteral => match layout.block_at(region.start) {
            Some(block) => block_lines(block, bytes, out),
            None => chunk_lines(region.start, bytes, None, out),
        },
    }
}

fn code_lines<D: Decoder>(dec: &D, start: u32, bytes: &[u8], out: &mut Vec<EmittedLine>) {
    let mut addr = start;
    for group in bytes.chunks(CODE_LINE as usize) {
        let comment = match *group {
            [a, b, c, d] => format!(
                "0x{addr:04x}: {} | {}",
                dec.mnemonic(u16::from_be_bytes([a, b])),
                dec.mnemonic(u16::from_be_bytes([c, d]))
            ),
            [a, b, ..] => {
                // 2 or 3 bytes left: one word, then a lone byte if any
                out.push(EmittedLine::Hex {
                    addr,
                    bytes: vec![a, b],
                    comment: Some(format!("0x{addr:04x}: {}", dec.mnemonic(u16::from_be_bytes([a, b])))),
                });
                if let Some(&c) = group.get(2) {
                    out.push(odd_byte(addr + 2, c));
                }
                break;
            }
            [a] => {
                out.push(odd_byte(addr, a));
                break;
            }
            [] => break,
        };
        out.push(EmittedLine::Hex { addr, bytes: group.to_vec(), comment: Some(comment) });
        addr += CODE_LINE;
    }
}

fn odd_byte(addr: u32, b: u8) -> EmittedLine {
    EmittedLine::Hex { addr, bytes: vec![b], comment: Some(format!("0x{addr:04x}: odd byte")) }
}

fn chunk_lines(start: u32, bytes: &[u8], label: Option<&str>, out: &mut Vec<EmittedLine>) {
    for (i, chunk) in bytes.chunks(CHUNK).enumerate() {
        let addr = start + (i * CHUNK) as u32;
        let comment = match label {
            Some(label) => format!("0x{addr:04x}: {label}"),
            None => format!("0x{addr:04x}"),
        };
        out.push(EmittedLine::Hex { addr, bytes: chunk.to_vec(), comment: Some(comment) });
    }
}

fn block_lines(block: &NamedBlock, bytes: &[u8], out: &mut Vec<EmittedLine>) {
    let addr = block.addr;
    match &block.content {
        BlockContent::Buffer { len } => {
            let zeroed = bytes.len() == *len && bytes.iter().all(|&b| b == 0);
            if !zeroed {
                warn!(name = %block.name, addr, "buffer is not zero-filled in the image");
            }
            let text = if zeroed {
                format!("{} @ 0x{addr:04x} ({} bytes, zero-filled)", block.name, bytes.len())
            } else {
                format!("{} @ 0x{addr:04x} ({} bytes)", block.name, bytes.len())
            };
            out.push(EmittedLine::Note { addr, text });
            chunk_lines(addr, bytes, None, out);
        }
        BlockContent::Literal { bytes: declared, .. } => {
            if declared.as_slice() != bytes {
                warn!(name = %block.name, addr, "image bytes differ from the declared string");
                out.push(EmittedLine::Hex {
                    addr,
                    bytes: bytes.to_vec(),
                    comment: Some(format!("0x{addr:04x}: {} (hex, differs from declaration)", block.name)),
                });
                return;
            }
            out.push(literal_line(addr, &block.name, bytes));
        }
    }
}

/// Single line for a string literal, quoted unless a byte would read as a
/// comment delimiter.
pub fn literal_line(addr: u32, name: &str, bytes: &[u8]) -> EmittedLine {
    match choose_form(bytes) {
        LiteralForm::Quoted(body) => EmittedLine::Quoted {
            addr,
            bytes: bytes.to_vec(),
            body,
            comment: Some(format!("0x{addr:04x}: {name}")),
        },
        LiteralForm::Hex => EmittedLine::Hex {
            addr,
            bytes: bytes.to_vec(),
            comment: Some(format!("0x{addr:04x}: {name} (hex)")),
        },
    }
}

/// Concatenated payload of `lines`; the inverse of [`render`] at line level.
pub fn collect_bytes(lines: &[EmittedLine]) -> Vec<u8> {
    lines.iter().flat_map(|l| l.payload().iter().copied()).collect()
}

pub fn to_text(lines: &[EmittedLine]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.to_string());
        text.push('\n');
    }
    text
}

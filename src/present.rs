//! Box-drawing decoration around rendered regions.
//!
//! Every line produced here starts with a box-drawing character (or is
//! blank), so the parser skips it and the round-trip bytes are unaffected.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::codec::{plan, render, to_text, EmittedLine, Region, RegionKind};
use crate::image::Image;
use crate::isa::chip8::Chip8Decoder;
use crate::layout::{Annotation, Layout};

/// Interior width of every box; full lines are two characters wider.
pub const WIDTH: usize = 76;

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorations: u8 {
const HEADER = 1 << 0; // title, legend, syscall table, memory map
const ANNOTATIONS = 1 << 1; // titled boxes before annotated addresses
}
}

impl Default for Decorations {
    fn default() -> Self {
        Decorations::all()
    }
}

mod glyph {
    pub const TL: char = '\u{250c}';
    pub const TR: char = '\u{2510}';
    pub const BL: char = '\u{2514}';
    pub const BR: char = '\u{2518}';
    pub const H: char = '\u{2500}';
    pub const V: char = '\u{2502}';
    pub const DTL: char = '\u{2554}';
    pub const DTR: char = '\u{2557}';
    pub const DBL: char = '\u{255a}';
    pub const DBR: char = '\u{255d}';
    pub const DH: char = '\u{2550}';
    pub const DV: char = '\u{2551}';
}

fn rule(left: char, fill: char, right: char) -> String {
    let mut s = String::with_capacity(WIDTH + 2);
    s.push(left);
    s.extend(std::iter::repeat(fill).take(WIDTH));
    s.push(right);
    s
}

/// Left-justifies `text` to `width` characters (not bytes).
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut s = text.to_string();
    s.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    s
}

pub fn box_top() -> String {
    rule(glyph::TL, glyph::H, glyph::TR)
}

pub fn box_bottom() -> String {
    rule(glyph::BL, glyph::H, glyph::BR)
}

pub fn box_text(text: &str) -> String {
    format!("{}{}{}", glyph::V, pad(&format!(" {text}"), WIDTH), glyph::V)
}

pub fn box_title(title: &str) -> String {
    let title = format!(" {title} ");
    let rem = WIDTH.saturating_sub(title.chars().count());
    let left = rem / 2;
    let right = rem - left;
    let mut s = String::new();
    s.push(glyph::TL);
    s.extend(std::iter::repeat(glyph::H).take(left));
    s.push_str(&title);
    s.extend(std::iter::repeat(glyph::H).take(right));
    s.push(glyph::TR);
    s
}

pub fn double_box(lines: &[String]) -> Vec<String> {
    let mut out = vec![rule(glyph::DTL, glyph::DH, glyph::DTR)];
    out.extend(
        lines
            .iter()
            .map(|l| format!("{}{}{}", glyph::DV, pad(&format!(" {l}"), WIDTH), glyph::DV)),
    );
    out.push(rule(glyph::DBL, glyph::DH, glyph::DBR));
    out
}

pub fn title_block(title: &str, lines: &[String]) -> Vec<String> {
    let mut out = vec![box_title(title)];
    out.extend(lines.iter().map(|l| box_text(l)));
    out.push(box_bottom());
    out
}

const LEGEND: [&str; 5] = [
    "Legend",
    "1NNN  JP addr            2NNN  CALL addr        ANNN  LD I, addr",
    "6XNN  LD Vx, byte        7XNN  ADD Vx, byte     8XY0 LD Vx, Vy",
    "3XNN  SE Vx, byte        4XNN  SNE Vx, byte     9XY0 SNE Vx, Vy",
    "FX55  LD [I], Vx         FX65  LD Vx, [I]      0NNN SYS (syscall)",
];

/// Title box, opcode legend, syscall table and memory map.
pub fn header_block(layout: &Layout, regions: &[Region], dec: &Chip8Decoder) -> Vec<String> {
    let mut out = Vec::new();
    if !layout.header().is_empty() {
        out.push(box_top());
        out.extend(layout.header().iter().map(|l| box_text(l)));
        out.push(box_bottom());
        out.push(String::new());
    }

    let legend: Vec<String> = LEGEND.iter().map(|s| s.to_string()).collect();
    out.extend(double_box(&legend));
    out.push(String::new());

    let calls: Vec<String> = dec
        .syscalls()
        .map(|(nnn, name)| format!("{nnn:#06x} {}", name.strip_prefix("sys_").unwrap_or(name)))
        .collect();
    if !calls.is_empty() {
        let rows: Vec<String> = calls.chunks(4).map(|row| row.join("  ")).collect();
        out.extend(title_block("Syscall Table", &rows));
        out.push(String::new());
    }

    out.extend(title_block("Memory Map (ROM image)", &memory_map(regions)));
    out.push(String::new());
    out
}

/// One row per contiguous code / padding / data span (inclusive end).
fn memory_map(regions: &[Region]) -> Vec<String> {
    let mut spans: Vec<(&str, u32, u32)> = Vec::new();
    for r in regions.iter().filter(|r| r.len > 0) {
        let label = match r.kind {
            RegionKind::Code => "code",
            RegionKind::Padding => "padding (00)",
            RegionKind::Buffer | RegionKind::StringLiteral | RegionKind::Data => "data (buffers + strings)",
        };
        match spans.last_mut() {
            Some(last) if last.0 == label && last.2 == r.start => last.2 = r.end(),
            _ => spans.push((label, r.start, r.end())),
        }
    }
    spans
        .into_iter()
        .map(|(label, start, end)| format!("0x{start:04X}..0x{:04X}  {label}", end - 1))
        .collect()
}

fn annotation_lines(notes: &[Annotation]) -> Vec<String> {
    notes.iter().flat_map(|n| title_block(&n.title, &n.lines)).collect()
}

/// Interleaves annotation boxes with `lines`: each box goes right before the
/// first addressed line at or after its address. Boxes past the last line are
/// appended at the end.
pub fn annotate(lines: Vec<EmittedLine>, annotations: &BTreeMap<u32, Vec<Annotation>>) -> Vec<EmittedLine> {
    let mut pending = annotations.iter().peekable();
    let mut out = Vec::with_capacity(lines.len() + annotations.len() * 3);
    for line in lines {
        if let Some(addr) = line.addr() {
            while let Some((_, notes)) = pending.next_if(|&(&at, _)| at <= addr) {
                out.extend(annotation_lines(notes).into_iter().map(EmittedLine::Cosmetic));
            }
        }
        out.push(line);
    }
    for (_, notes) in pending {
        out.extend(annotation_lines(notes).into_iter().map(EmittedLine::Cosmetic));
    }
    out
}

/// Full listing of `image`: optional header, then every region with its
/// annotations.
pub fn document(image: &Image, layout: &Layout, decorations: Decorations) -> String {
    let dec = layout.decoder();
    let mut lines = Vec::new();
    if decorations.contains(Decorations::HEADER) {
        let regions = plan(image, layout);
        lines.extend(header_block(layout, &regions, &dec).into_iter().map(EmittedLine::Cosmetic));
    }
    let body = render(image, layout, &dec);
    if decorations.contains(Decorations::ANNOTATIONS) {
        lines.extend(annotate(body, layout.annotations()));
    } else {
        lines.extend(body);
    }
    to_text(&lines)
}

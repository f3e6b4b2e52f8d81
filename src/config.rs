//! JSON layout files.
//!
//! Addresses and lengths may be written as integers or as strings (`"0x0800"`,
//! `"80"`), since JSON has no hex literals.

use std::path::Path;

use anyhow::Context;
use num_traits::Num;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::image::DEFAULT_BASE;
use crate::layout::{Annotation, Layout};

/// Layout of the CHIP-8 CLI ROM (`roms/cli/build/cli.ch8`).
pub const CLI_ROM_JSON: &str = include_str!("../layouts/cli_rom.json");

/// Parses `0x`-prefixed hex or plain decimal.
pub fn parse_num<T: Num>(s: &str) -> Option<T> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => T::from_str_radix(hex, 16).ok(),
        None => T::from_str_radix(s, 10).ok(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumText {
    Int(u64),
    Text(String),
}

fn num<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Num + TryFrom<u64>,
{
    match NumText::deserialize(de)? {
        NumText::Int(v) => T::try_from(v).map_err(|_| D::Error::custom(format!("{v} is out of range"))),
        NumText::Text(s) => parse_num(&s).ok_or_else(|| D::Error::custom(format!("bad number {s:?}"))),
    }
}

fn opt_num<'de, D, T>(de: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Num + TryFrom<u64>,
{
    num(de).map(Some)
}

fn default_base() -> u32 {
    DEFAULT_BASE
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    #[serde(default = "default_base", deserialize_with = "num")]
    base: u32,
    #[serde(default, deserialize_with = "opt_num")]
    code_end: Option<u32>,
    #[serde(default, deserialize_with = "opt_num")]
    pad_end: Option<u32>,
    #[serde(default)]
    header: Vec<String>,
    #[serde(default)]
    syscalls: Vec<SyscallEntry>,
    #[serde(default)]
    annotations: Vec<AnnotationEntry>,
    #[serde(default)]
    buffers: Vec<BufferEntry>,
    #[serde(default)]
    strings: Vec<StringEntry>,
}

#[derive(Deserialize)]
struct SyscallEntry {
    #[serde(deserialize_with = "num")]
    id: u16,
    name: String,
}

#[derive(Deserialize)]
struct AnnotationEntry {
    #[serde(deserialize_with = "num")]
    addr: u32,
    #[serde(flatten)]
    note: Annotation,
}

#[derive(Deserialize)]
struct BufferEntry {
    #[serde(deserialize_with = "num")]
    addr: u32,
    name: String,
    #[serde(deserialize_with = "num")]
    len: usize,
}

#[derive(Deserialize)]
struct StringEntry {
    #[serde(deserialize_with = "num")]
    addr: u32,
    name: String,
    /// Backslash-escaped source text.
    text: String,
}

pub fn from_json_str(json: &str) -> Result<Layout> {
    let file: LayoutFile = serde_json::from_str(json)?;
    let mut b = Layout::builder(file.base);
    if let Some(end) = file.code_end {
        b = b.code_end(end);
    }
    if let Some(end) = file.pad_end {
        b = b.pad_end(end);
    }
    for line in file.header {
        b = b.header_line(line);
    }
    for s in file.syscalls {
        b = b.syscall(s.id, s.name);
    }
    for a in file.annotations {
        b = b.annotate(a.addr, a.note);
    }
    for buf in file.buffers {
        b = b.buffer(buf.addr, buf.name, buf.len);
    }
    for s in file.strings {
        b = b.literal(s.addr, s.name, s.text);
    }
    b.build()
}

pub fn load(path: &Path) -> anyhow::Result<Layout> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading layout {}", path.display()))?;
    from_json_str(&json).with_context(|| format!("in layout {}", path.display()))
}

pub fn cli_rom() -> Result<Layout> {
    from_json_str(CLI_ROM_JSON)
}

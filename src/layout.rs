use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, XxError};
use crate::escape::unescape;
use crate::image::DEFAULT_BASE;
use crate::isa::chip8::{Chip8Decoder, CLI_SYSCALLS};

/// Cosmetic note placed before the first line at its address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Annotation {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), lines: Vec::new() }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    /// Zero-filled scratch area of a fixed size.
    Buffer { len: usize },
    /// String constant; `text` is the escaped source, `bytes` what it decodes to.
    Literal { text: String, bytes: Vec<u8> },
}

/// A declared buffer or string at a fixed address in the data region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlock {
    pub name: String,
    pub addr: u32,
    pub content: BlockContent,
}

impl NamedBlock {
    /// Bytes the block occupies in the image.
    pub fn len(&self) -> usize {
        match &self.content {
            BlockContent::Buffer { len } => *len,
            BlockContent::Literal { bytes, .. } => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Static description of an image: where code stops, where padding stops, and
/// which named blocks live in the data region. Only built through
/// [`LayoutBuilder`], which enforces that every block fits before the next one.
#[derive(Debug, Clone)]
pub struct Layout {
    base: u32,
    code_end: Option<u32>,
    pad_end: Option<u32>,
    header: Vec<String>,
    syscalls: BTreeMap<u16, String>,
    annotations: BTreeMap<u32, Vec<Annotation>>,
    blocks: BTreeMap<u32, NamedBlock>,
}

impl Layout {
    pub fn builder(base: u32) -> LayoutBuilder {
        LayoutBuilder::new(base)
    }

    /// No boundaries, no blocks: the whole image is code.
    pub fn empty(base: u32) -> Self {
        Self {
            base,
            code_end: None,
            pad_end: None,
            header: Vec::new(),
            syscalls: BTreeMap::new(),
            annotations: BTreeMap::new(),
            blocks: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn code_end(&self) -> Option<u32> {
        self.code_end
    }

    pub fn pad_end(&self) -> Option<u32> {
        self.pad_end
    }

    /// First address of the data region, if the layout has one.
    pub fn data_start(&self) -> Option<u32> {
        self.pad_end.or(self.code_end)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn annotations(&self) -> &BTreeMap<u32, Vec<Annotation>> {
        &self.annotations
    }

    pub fn blocks(&self) -> &BTreeMap<u32, NamedBlock> {
        &self.blocks
    }

    pub fn block_at(&self, addr: u32) -> Option<&NamedBlock> {
        self.blocks.get(&addr)
    }

    pub fn decoder(&self) -> Chip8Decoder {
        Chip8Decoder::with_syscalls(self.syscalls.iter().map(|(&nnn, name)| (nnn, name.clone())))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::empty(DEFAULT_BASE)
    }
}

#[derive(Debug, Clone)]
enum Decl {
    Buffer { name: String, addr: u32, len: usize },
    Literal { name: String, addr: u32, text: String },
}

#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    base: u32,
    code_end: Option<u32>,
    pad_end: Option<u32>,
    header: Vec<String>,
    syscalls: BTreeMap<u16, String>,
    annotations: BTreeMap<u32, Vec<Annotation>>,
    decls: Vec<Decl>,
}

impl LayoutBuilder {
    pub fn new(base: u32) -> Self {
        Self {
            base,
            code_end: None,
            pad_end: None,
            header: Vec::new(),
            syscalls: BTreeMap::new(),
            annotations: BTreeMap::new(),
            decls: Vec::new(),
        }
    }

    pub fn code_end(mut self, addr: u32) -> Self {
        self.code_end = Some(addr);
        self
    }

    pub fn pad_end(mut self, addr: u32) -> Self {
        self.pad_end = Some(addr);
        self
    }

    pub fn header_line(mut self, text: impl Into<String>) -> Self {
        self.header.push(text.into());
        self
    }

    pub fn syscall(mut self, nnn: u16, name: impl Into<String>) -> Self {
        self.syscalls.insert(nnn & 0x0FFF, name.into());
        self
    }

    pub fn cli_syscalls(self) -> Self {
        CLI_SYSCALLS.iter().fold(self, |b, &(nnn, name)| b.syscall(nnn, name))
    }

    pub fn annotate(mut self, addr: u32, note: Annotation) -> Self {
        self.annotations.entry(addr).or_default().push(note);
        self
    }

    pub fn buffer(mut self, addr: u32, name: impl Into<String>, len: usize) -> Self {
        self.decls.push(Decl::Buffer { name: name.into(), addr, len });
        self
    }

    /// `text` uses backslash escapes (`\n`, `\xHH`, ...).
    pub fn literal(mut self, addr: u32, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.decls.push(Decl::Literal { name: name.into(), addr, text: text.into() });
        self
    }

    /// Every piece of layout text ends up on one listing line, so none may
    /// contain a line break.
    fn check_single_line(&self) -> Result<()> {
        let notes = self.annotations.values().flatten();
        let texts = self
            .header
            .iter()
            .map(|l| ("header line", l))
            .chain(self.syscalls.values().map(|n| ("syscall name", n)))
            .chain(notes.clone().map(|a| ("annotation title", &a.title)))
            .chain(notes.flat_map(|a| a.lines.iter()).map(|l| ("annotation line", l)))
            .chain(self.decls.iter().map(|d| match d {
                Decl::Buffer { name, .. } | Decl::Literal { name, .. } => ("block name", name),
            }));
        for (what, text) in texts {
            if text.contains(['\n', '\r']) {
                return Err(XxError::InvalidLayout(format!("{what} {text:?} contains a line break")));
            }
        }
        Ok(())
    }

    pub fn build(self) -> Result<Layout> {
        match (self.code_end, self.pad_end) {
            (Some(code_end), _) if code_end < self.base => {
                return Err(XxError::InvalidLayout(format!(
                    "code end {code_end:#06x} is below base {:#06x}",
                    self.base
                )));
            }
            (Some(code_end), Some(pad_end)) if pad_end < code_end => {
                return Err(XxError::InvalidLayout(format!(
                    "padding end {pad_end:#06x} is below code end {code_end:#06x}"
                )));
            }
            (None, Some(_)) => {
                return Err(XxError::InvalidLayout("padding end given without a code end".into()));
            }
            _ => {}
        }
        self.check_single_line()?;
        let data_start = self.pad_end.or(self.code_end);

        let mut blocks: BTreeMap<u32, NamedBlock> = BTreeMap::new();
        for decl in self.decls {
            let block = match decl {
                Decl::Buffer { name, addr, len } => NamedBlock { name, addr, content: BlockContent::Buffer { len } },
                Decl::Literal { name, addr, text } => {
                    let bytes = unescape(&text, &format!("string {name}"))?;
                    NamedBlock { name, addr, content: BlockContent::Literal { text, bytes } }
                }
            };
            match data_start {
                Some(start) if block.addr >= start => {}
                Some(start) => {
                    return Err(XxError::MisplacedBlock { name: block.name, addr: block.addr, data_start: start });
                }
                None => {
                    return Err(XxError::InvalidLayout(format!(
                        "block {} declared but the layout has no data region",
                        block.name
                    )));
                }
            }
            if let Some(prev) = blocks.get(&block.addr) {
                return Err(XxError::InvalidLayout(format!(
                    "blocks {} and {} both start at {:#06x}",
                    prev.name, block.name, block.addr
                )));
            }
            blocks.insert(block.addr, block);
        }

        let starts: Vec<u32> = blocks.keys().copied().collect();
        for pair in starts.windows(2) {
            let (addr, next) = (pair[0], pair[1]);
            let block = &blocks[&addr];
            let gap = (next - addr) as usize;
            if block.len() > gap {
                return Err(XxError::ConfigurationOverflow {
                    name: block.name.clone(),
                    addr,
                    len: block.len(),
                    gap,
                });
            }
        }

        Ok(Layout {
            base: self.base,
            code_end: self.code_end,
            pad_end: self.pad_end,
            header: self.header,
            syscalls: self.syscalls,
            annotations: self.annotations,
            blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_length_counts_decoded_bytes() {
        // "ab\n" is 4 source chars but 3 bytes, exactly filling the gap
        let layout = Layout::builder(0x200)
            .code_end(0x200)
            .literal(0x300, "A", "ab\\n")
            .literal(0x303, "B", "c")
            .build()
            .unwrap();
        assert_eq!(layout.block_at(0x300).unwrap().len(), 3);
        assert_eq!(layout.blocks().keys().copied().collect::<Vec<_>>(), vec![0x300, 0x303]);
    }

    #[test]
    fn overflowing_block_is_rejected() {
        let err = Layout::builder(0x200)
            .code_end(0x200)
            .buffer(0x300, "BUF", 0x20)
            .literal(0x310, "S", "x")
            .build()
            .unwrap_err();
        match err {
            XxError::ConfigurationOverflow { name, addr, len, gap } => {
                assert_eq!(name, "BUF");
                assert_eq!(addr, 0x300);
                assert_eq!(len, 0x20);
                assert_eq!(gap, 0x10);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blocks_must_sit_in_data_region() {
        let err = Layout::builder(0x200).code_end(0x400).pad_end(0x800).buffer(0x500, "B", 1).build().unwrap_err();
        assert!(matches!(err, XxError::MisplacedBlock { data_start: 0x800, .. }));
        let err = Layout::builder(0x200).buffer(0x500, "B", 1).build().unwrap_err();
        assert!(matches!(err, XxError::InvalidLayout(_)));
    }

    #[test]
    fn boundaries_must_be_ordered() {
        assert!(Layout::builder(0x200).code_end(0x100).build().is_err());
        assert!(Layout::builder(0x200).code_end(0x400).pad_end(0x300).build().is_err());
        assert!(Layout::builder(0x200).pad_end(0x300).build().is_err());
    }

    #[test]
    fn duplicate_block_start_is_rejected() {
        let err = Layout::builder(0x200).code_end(0x200).buffer(0x300, "A", 1).buffer(0x300, "B", 1).build().unwrap_err();
        assert!(matches!(err, XxError::InvalidLayout(_)));
    }

    #[test]
    fn layout_text_must_stay_on_one_line() {
        let base = || Layout::builder(0x200).code_end(0x200);
        let cases = [
            base().annotate(0x200, Annotation::new("Boot").line("first\n00 ff")),
            base().annotate(0x200, Annotation::new("Bo\rot")),
            base().buffer(0x300, "BUF\n01 02", 2),
            base().literal(0x300, "S\r", "x"),
            base().header_line("title\n12 34"),
            base().syscall(0x101, "sys\nspawn"),
        ];
        for b in cases {
            assert!(matches!(b.build(), Err(XxError::InvalidLayout(_))));
        }
        // escaped newlines in literal text are fine
        assert!(base().literal(0x300, "S", "a\\n").build().is_ok());
    }
}

pub mod codec;
pub mod config;
pub mod decoder;
pub mod disasm;
pub mod error;
pub mod escape;
pub mod image;
pub mod layout;
pub mod parse;
pub mod present;
pub mod verify;

pub mod isa {
    pub mod chip8; // CHIP-8 with the CLI ROM kernel's SYS calls
}

pub use codec::{plan, render, EmittedLine, Region, RegionKind};
pub use decoder::{Decoder, Instr};
pub use disasm::decode;
pub use error::XxError;
pub use image::Image;
pub use layout::{Annotation, Layout, LayoutBuilder, NamedBlock};
pub use parse::parse;
pub use present::{document, Decorations};
pub use verify::{verify, verify_with, ReferenceDecoder};

use serde::{Deserialize, Serialize};

use crate::disasm::fmt_instr;

/// Register-to-register ALU forms of class 0x8 (selected by the low nibble).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AluOp {
    Ld,
    Or,
    And,
    Xor,
    Add,
    Sub,
    Shr,
    Subn,
    Shl,
}

impl AluOp {
    pub fn from_nibble(n: u8) -> Option<Self> {
        Some(match n {
            0x0 => AluOp::Ld,
            0x1 => AluOp::Or,
            0x2 => AluOp::And,
            0x3 => AluOp::Xor,
            0x4 => AluOp::Add,
            0x5 => AluOp::Sub,
            0x6 => AluOp::Shr,
            0x7 => AluOp::Subn,
            0xE => AluOp::Shl,
            _ => return None,
        })
    }
}

/// One decoded CHIP-8 word. Operands are already extracted from the bit-fields
/// (`nnn` = low 12 bits, `x`/`y` = middle nibbles, `kk` = low byte, `n` = low nibble).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instr {
    Cls,
    Ret,
    Sys { nnn: u16 },
    Jp { nnn: u16 },
    Call { nnn: u16 },
    SeImm { x: u8, kk: u8 },
    SneImm { x: u8, kk: u8 },
    SeReg { x: u8, y: u8 },
    LdImm { x: u8, kk: u8 },
    AddImm { x: u8, kk: u8 },
    Alu { op: AluOp, x: u8, y: u8 },
    SneReg { x: u8, y: u8 },
    LdI { nnn: u16 },
    JpV0 { nnn: u16 },
    Rnd { x: u8, kk: u8 },
    Drw { x: u8, y: u8, n: u8 },
    Skp { x: u8 },
    Sknp { x: u8 },
    LdVxDt { x: u8 },
    LdVxK { x: u8 },
    LdDtVx { x: u8 },
    LdStVx { x: u8 },
    AddIVx { x: u8 },
    LdFVx { x: u8 },
    LdBVx { x: u8 },
    StoreRegs { x: u8 },
    LoadRegs { x: u8 },
    /// Word that matches no known form; carries the raw value.
    Unknown(u16),
}

impl Instr {
    pub fn is_known(&self) -> bool {
        !matches!(self, Instr::Unknown(_))
    }
}

pub trait Decoder {
    fn decode(&self, word: u16) -> Instr;

    /// Symbolic name for a `SYS nnn` call, if the decoder knows one.
    fn syscall_name(&self, _nnn: u16) -> Option<&str> {
        None
    }

    fn mnemonic(&self, word: u16) -> String {
        let instr = self.decode(word);
        let name = match instr {
            Instr::Sys { nnn } => self.syscall_name(nnn),
            _ => None,
        };
        fmt_instr(&instr, name)
    }
}

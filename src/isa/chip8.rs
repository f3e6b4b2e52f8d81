use std::collections::BTreeMap;

use crate::decoder::{AluOp, Decoder, Instr};

/// System calls of the CHIP-8 CLI ROM kernel (`SYS 0x1xx`).
pub const CLI_SYSCALLS: &[(u16, &str)] = &[
    (0x0101, "sys_spawn"),
    (0x0102, "sys_exit"),
    (0x0103, "sys_wait"),
    (0x0104, "sys_yield"),
    (0x0110, "sys_write"),
    (0x0111, "sys_read"),
    (0x0112, "sys_input_mode"),
    (0x0113, "sys_console_mode"),
    (0x0120, "sys_fs_list"),
    (0x0121, "sys_fs_open"),
    (0x0122, "sys_fs_read"),
    (0x0123, "sys_fs_close"),
];

/// CHIP-8 decoder. The instruction table is fixed; only the syscall names vary.
#[derive(Debug, Clone)]
pub struct Chip8Decoder {
    syscalls: BTreeMap<u16, String>,
}

impl Chip8Decoder {
    /// Decoder that knows the CLI ROM syscalls.
    pub fn new() -> Self {
        Self::with_syscalls(CLI_SYSCALLS.iter().map(|&(nnn, name)| (nnn, name.to_string())))
    }

    pub fn with_syscalls<I: IntoIterator<Item = (u16, String)>>(syscalls: I) -> Self {
        Self {
            syscalls: syscalls.into_iter().map(|(nnn, name)| (nnn & 0x0FFF, name)).collect(),
        }
    }

    pub fn syscalls(&self) -> impl Iterator<Item = (u16, &str)> {
        self.syscalls.iter().map(|(&nnn, name)| (nnn, name.as_str()))
    }
}

impl Default for Chip8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for Chip8Decoder {
    fn decode(&self, word: u16) -> Instr {
        let nnn = word & 0x0FFF;
        let n = (word & 0x000F) as u8;
        let x = ((word >> 8) & 0xF) as u8;
        let y = ((word >> 4) & 0xF) as u8;
        let kk = (word & 0xFF) as u8;

        // Full-word forms win over the class-0 SYS catch-all.
        match word {
            0x00E0 => return Instr::Cls,
            0x00EE => return Instr::Ret,
            _ => {}
        }

        match word >> 12 {
            0x0 => Instr::Sys { nnn },
            0x1 => Instr::Jp { nnn },
            0x2 => Instr::Call { nnn },
            0x3 => Instr::SeImm { x, kk },
            0x4 => Instr::SneImm { x, kk },
            0x5 if n == 0 => Instr::SeReg { x, y },
            0x6 => Instr::LdImm { x, kk },
            0x7 => Instr::AddImm { x, kk },
            0x8 => match AluOp::from_nibble(n) {
                Some(op) => Instr::Alu { op, x, y },
                None => Instr::Unknown(word),
            },
            0x9 if n == 0 => Instr::SneReg { x, y },
            0xA => Instr::LdI { nnn },
            0xB => Instr::JpV0 { nnn },
            0xC => Instr::Rnd { x, kk },
            0xD => Instr::Drw { x, y, n },
            0xE => match kk {
                0x9E => Instr::Skp { x },
                0xA1 => Instr::Sknp { x },
                _ => Instr::Unknown(word),
            },
            0xF => match kk {
                0x07 => Instr::LdVxDt { x },
                0x0A => Instr::LdVxK { x },
                0x15 => Instr::LdDtVx { x },
                0x18 => Instr::LdStVx { x },
                0x1E => Instr::AddIVx { x },
                0x29 => Instr::LdFVx { x },
                0x33 => Instr::LdBVx { x },
                0x55 => Instr::StoreRegs { x },
                0x65 => Instr::LoadRegs { x },
                _ => Instr::Unknown(word),
            },
            _ => Instr::Unknown(word),
        }
    }

    fn syscall_name(&self, nnn: u16) -> Option<&str> {
        self.syscalls.get(&nnn).map(String::as_str)
    }
}

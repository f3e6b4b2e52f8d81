use crate::decoder::{AluOp, Decoder, Instr};
use crate::isa::chip8::Chip8Decoder;

/// Mnemonic text for `word` using the CLI ROM syscall table. Total: unknown
/// words render as `OP wwww`.
pub fn decode(word: u16) -> String {
    Chip8Decoder::new().mnemonic(word)
}

/// One `wwww  MNEMONIC` row per word.
pub fn describe_words<D: Decoder>(dec: &D, words: &[u16]) -> Vec<String> {
    words.iter().map(|&w| format!("{w:04x}  {}", dec.mnemonic(w))).collect()
}

pub fn fmt_instr(i: &Instr, sys_name: Option<&str>) -> String {
    match *i {
        Instr::Cls => "CLS".to_string(),
        Instr::Ret => "RET".to_string(),
        Instr::Sys { nnn } => match sys_name {
            Some(name) => format!("SYS {nnn:#05x} ({name})"),
            None => format!("SYS {nnn:#05x}"),
        },
        Instr::Jp { nnn } => format!("JP {nnn:#05x}"),
        Instr::Call { nnn } => format!("CALL {nnn:#05x}"),
        Instr::SeImm { x, kk } => format!("SE V{x:X}, {kk:#04x}"),
        Instr::SneImm { x, kk } => format!("SNE V{x:X}, {kk:#04x}"),
        Instr::SeReg { x, y } => format!("SE V{x:X}, V{y:X}"),
        Instr::LdImm { x, kk } => format!("LD V{x:X}, {kk:#04x}"),
        Instr::AddImm { x, kk } => format!("ADD V{x:X}, {kk:#04x}"),
        Instr::Alu { op, x, y } => alu(op, x, y),
        Instr::SneReg { x, y } => format!("SNE V{x:X}, V{y:X}"),
        Instr::LdI { nnn } => format!("LD I, {nnn:#05x}"),
        Instr::JpV0 { nnn } => format!("JP V0, {nnn:#05x}"),
        Instr::Rnd { x, kk } => format!("RND V{x:X}, {kk:#04x}"),
        Instr::Drw { x, y, n } => format!("DRW V{x:X}, V{y:X}, {n}"),
        Instr::Skp { x } => format!("SKP V{x:X}"),
        Instr::Sknp { x } => format!("SKNP V{x:X}"),
        Instr::LdVxDt { x } => format!("LD V{x:X}, DT"),
        Instr::LdVxK { x } => format!("LD V{x:X}, K"),
        Instr::LdDtVx { x } => format!("LD DT, V{x:X}"),
        Instr::LdStVx { x } => format!("LD ST, V{x:X}"),
        Instr::AddIVx { x } => format!("ADD I, V{x:X}"),
        Instr::LdFVx { x } => format!("LD F, V{x:X}"),
        Instr::LdBVx { x } => format!("LD B, V{x:X}"),
        Instr::StoreRegs { x } => format!("LD [I], V{x:X}"),
        Instr::LoadRegs { x } => format!("LD V{x:X}, [I]"),
        Instr::Unknown(word) => format!("OP {word:04x}"),
    }
}

fn alu(op: AluOp, x: u8, y: u8) -> String {
    let mn = match op {
        AluOp::Ld => "LD",
        AluOp::Or => "OR",
        AluOp::And => "AND",
        AluOp::Xor => "XOR",
        AluOp::Add => "ADD",
        AluOp::Sub => "SUB",
        AluOp::Subn => "SUBN",
        // shifts only name the destination
        AluOp::Shr => return format!("SHR V{x:X}"),
        AluOp::Shl => return format!("SHL V{x:X}"),
    };
    format!("{mn} V{x:X}, V{y:X}")
}

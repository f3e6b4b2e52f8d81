use chip8_xx::decoder::{AluOp, Decoder, Instr};
use chip8_xx::decode;
use chip8_xx::disasm::describe_words;
use chip8_xx::isa::chip8::Chip8Decoder;
use pretty_assertions::assert_eq;

#[test]
fn every_word_decodes_to_text() {
    let dec = Chip8Decoder::new();
    for word in 0..=u16::MAX {
        let text = dec.mnemonic(word);
        assert!(!text.is_empty(), "{word:04x}");
        assert_eq!(text, dec.mnemonic(word), "{word:04x} not deterministic");
        if !dec.decode(word).is_known() {
            assert_eq!(text, format!("OP {word:04x}"));
        }
    }
}

#[test]
fn mnemonic_table() {
    let cases: &[(u16, &str)] = &[
        (0x00E0, "CLS"),
        (0x00EE, "RET"),
        (0x0101, "SYS 0x101 (sys_spawn)"),
        (0x0123, "SYS 0x123 (sys_fs_close)"),
        (0x0234, "SYS 0x234"),
        (0x1234, "JP 0x234"),
        (0x2F00, "CALL 0xf00"),
        (0x3A0B, "SE VA, 0x0b"),
        (0x4100, "SNE V1, 0x00"),
        (0x5120, "SE V1, V2"),
        (0x6CFF, "LD VC, 0xff"),
        (0x7301, "ADD V3, 0x01"),
        (0x8120, "LD V1, V2"),
        (0x8121, "OR V1, V2"),
        (0x8122, "AND V1, V2"),
        (0x8123, "XOR V1, V2"),
        (0x8124, "ADD V1, V2"),
        (0x8125, "SUB V1, V2"),
        (0x8126, "SHR V1"),
        (0x8127, "SUBN V1, V2"),
        (0x812E, "SHL V1"),
        (0x9AB0, "SNE VA, VB"),
        (0xA800, "LD I, 0x800"),
        (0xB010, "JP V0, 0x010"),
        (0xC20F, "RND V2, 0x0f"),
        (0xD12F, "DRW V1, V2, 15"),
        (0xE49E, "SKP V4"),
        (0xE4A1, "SKNP V4"),
        (0xF507, "LD V5, DT"),
        (0xF50A, "LD V5, K"),
        (0xF515, "LD DT, V5"),
        (0xF518, "LD ST, V5"),
        (0xF51E, "ADD I, V5"),
        (0xF529, "LD F, V5"),
        (0xF533, "LD B, V5"),
        (0xF555, "LD [I], V5"),
        (0xF565, "LD V5, [I]"),
        (0x5121, "OP 5121"),
        (0x812F, "OP 812f"),
        (0x9AB1, "OP 9ab1"),
        (0xE400, "OP e400"),
        (0xF5FF, "OP f5ff"),
    ];
    for &(word, text) in cases {
        assert_eq!(decode(word), text, "{word:04x}");
    }
}

#[test]
fn sys_without_name_is_still_sys() {
    let dec = Chip8Decoder::with_syscalls(Vec::new());
    assert_eq!(dec.decode(0x0101), Instr::Sys { nnn: 0x101 });
    assert_eq!(dec.mnemonic(0x0101), "SYS 0x101");
}

#[test]
fn alu_fields_are_extracted() {
    let dec = Chip8Decoder::new();
    assert_eq!(dec.decode(0x8AB4), Instr::Alu { op: AluOp::Add, x: 0xA, y: 0xB });
    assert_eq!(dec.decode(0xD5E3), Instr::Drw { x: 5, y: 0xE, n: 3 });
}

#[test]
fn word_rows_pair_hex_with_mnemonic() {
    let rows = describe_words(&Chip8Decoder::new(), &[0x00E0, 0x0110, 0xFFFF]);
    assert_eq!(rows, vec!["00e0  CLS", "0110  SYS 0x110 (sys_write)", "ffff  OP ffff"]);
}

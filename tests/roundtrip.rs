use chip8_xx::codec::{collect_bytes, plan, render, tiles, to_text, EmittedLine, RegionKind};
use chip8_xx::config::cli_rom;
use chip8_xx::isa::chip8::Chip8Decoder;
use chip8_xx::{document, parse, verify, Decorations, Image, Layout, XxError};
use pretty_assertions::assert_eq;

/// `len` pseudo-random bytes from a linear congruential sequence seeded by `seed`.
fn noise(seed: u32, len: usize) -> Vec<u8> {
    let mut s = seed;
    (0..len)
        .map(|_| {
            s = s.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (s >> 24) as u8
        })
        .collect()
}

fn put(rom: &mut [u8], addr: u32, bytes: &[u8]) {
    let off = (addr - 0x200) as usize;
    rom[off..off + bytes.len()].copy_from_slice(bytes);
}

/// A ROM shaped like the CLI build: code, zero padding, zero buffers, strings.
fn cli_like_rom() -> Image {
    let mut rom = vec![0u8; 0xBE2 - 0x200];
    put(&mut rom, 0x200, &noise(7, 0x596 - 0x200));
    put(&mut rom, 0xB00, b"> ");
    put(&mut rom, 0xB10, b"chip8 cli ready\n");
    put(
        &mut rom,
        0xB40,
        b"help - show commands\nls   - list files\nrun  - run a rom\ncat  - print file\nexit - quit\n",
    );
    put(&mut rom, 0xBA0, b"unknown command\n");
    put(&mut rom, 0xBB0, b"usage: run <rom>\n");
    put(&mut rom, 0xBC1, b"usage: cat <file>\n");
    put(&mut rom, 0xBD4, b"error\n");
    put(&mut rom, 0xBE0, b"/\n");
    Image::new(0x200, rom)
}

#[test]
fn two_word_image_with_empty_layout() {
    let image = Image::new(0x200, vec![0x12, 0x34, 0x00, 0xE0]);
    let lines = render(&image, &Layout::empty(0x200), &Chip8Decoder::new());
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].to_string(), "12 34 00 e0 # 0x0200: JP 0x234 | CLS");
    assert_eq!(parse(&to_text(&lines)).unwrap(), vec![0x12, 0x34, 0x00, 0xE0]);
}

#[test]
fn greeting_literal_is_quoted() {
    let image = Image::new(0x200, b"ok\n".to_vec());
    let layout = Layout::builder(0x200).code_end(0x200).literal(0x200, "GREETING", "ok\\n").build().unwrap();
    let lines = render(&image, &layout, &Chip8Decoder::new());
    assert_eq!(lines.len(), 1);
    assert!(matches!(lines[0], EmittedLine::Quoted { .. }));
    assert_eq!(lines[0].to_string(), "\"ok\\n\" # 0x0200: GREETING");
    assert_eq!(parse(&to_text(&lines)).unwrap(), vec![0x6f, 0x6b, 0x0a]);
}

#[test]
fn hash_literal_uses_hex_path() {
    let image = Image::new(0x200, b"a#b".to_vec());
    let layout = Layout::builder(0x200).code_end(0x200).literal(0x200, "HASH", "a#b").build().unwrap();
    let lines = render(&image, &layout, &Chip8Decoder::new());
    assert!(matches!(lines[0], EmittedLine::Hex { .. }));
    let text = to_text(&lines);
    assert_eq!(text, "61 23 62 # 0x0200: HASH (hex)\n");
    assert_eq!(parse(&text).unwrap(), b"a#b".to_vec());
}

#[test]
fn verify_reports_both_lengths() {
    let err = verify("12 34 00 # 0x0200", &[0x12, 0x34, 0x00, 0xE0]).unwrap_err();
    match err {
        XxError::RoundTripMismatch { parsed_len, expected_len } => {
            assert_eq!(parsed_len, 3);
            assert_eq!(expected_len, 4);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(verify("12 34 00 e0 # x", &[0x12, 0x34, 0x00, 0xE0]).is_ok());
}

#[test]
fn cli_layout_round_trips() {
    let layout = cli_rom().unwrap();
    let image = cli_like_rom();
    let regions = plan(&image, &layout);
    assert!(tiles(&regions, &image));
    assert_eq!(regions.iter().map(|r| r.len).sum::<usize>(), image.len());

    let text = document(&image, &layout, Decorations::all());
    verify(&text, &image.bytes).unwrap();

    assert!(text.contains("\"> \" # 0x0b00: PROMPT"));
    assert!(text.contains("\"chip8 cli ready\\n\" # 0x0b10: WELCOME"));
    assert!(text.contains("# 0x0b40: HELP_TEXT (hex)"));
    assert!(text.contains("2f # 0x0be0: SLASH (hex)"));
    assert!(text.contains("\"\\n\" # 0x0be1: NEWLINE"));
    assert!(text.contains("# LINE_BUF @ 0x0800 (80 bytes, zero-filled)"));
    assert!(text.contains("# DIR_BUF @ 0x0900 (280 bytes, zero-filled)"));
    assert!(text.contains("0x0596..0x07FF  padding (00)"));
    // 0x596 - 0x200 = 918 = 229 * 4 + 2, so code ends on a single-word line
    let last_code = text.lines().filter(|l| l.contains(": ") && l.contains("# 0x0594")).count();
    assert_eq!(last_code, 1);
}

#[test]
fn round_trip_law_over_many_images() {
    let dec = Chip8Decoder::new();
    for seed in 0..40u32 {
        let len = (seed as usize * 37) % 300 + (seed as usize % 3);
        let image = Image::new(0x200, noise(seed, len));
        let layouts = [
            Layout::empty(0x200),
            Layout::builder(0x200).code_end(0x223).pad_end(0x240).build().unwrap(),
            Layout::builder(0x200)
                .code_end(0x210)
                .pad_end(0x220)
                .buffer(0x220, "BUF", 0x21)
                .literal(0x250, "S", "x;y\\n")
                .literal(0x260, "T", "plain")
                .build()
                .unwrap(),
        ];
        for layout in &layouts {
            let regions = plan(&image, layout);
            assert!(tiles(&regions, &image), "seed {seed}");
            let lines = render(&image, layout, &dec);
            assert_eq!(collect_bytes(&lines), image.bytes, "seed {seed}");
            for decorations in [Decorations::empty(), Decorations::all()] {
                let text = document(&image, layout, decorations);
                assert_eq!(parse(&text).unwrap(), image.bytes, "seed {seed}");
            }
        }
    }
}

#[test]
fn padding_lines_are_sixteen_wide() {
    let image = Image::new(0x200, vec![0u8; 0x28]);
    let layout = Layout::builder(0x200).code_end(0x204).pad_end(0x228).build().unwrap();
    let lines = render(&image, &layout, &Chip8Decoder::new());
    let padding: Vec<String> = lines.iter().skip(1).map(ToString::to_string).collect();
    assert_eq!(
        padding,
        vec![
            "00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 # 0x0204: padding",
            "00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 # 0x0214: padding",
            "00 00 00 00 # 0x0224: padding",
        ]
    );
    let kinds: Vec<RegionKind> = plan(&image, &layout).iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RegionKind::Code, RegionKind::Padding]);
}

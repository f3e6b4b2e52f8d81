use std::io::Write as _;

use chip8_xx::config::{cli_rom, load};
use chip8_xx::{XxError, Layout};

#[test]
fn layout_file_loads_from_disk() {
    let path = std::env::temp_dir().join(format!("_xx_layout_{}.json", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    write!(
        f,
        r#"{{ "code_end": "0x204", "syscalls": [ {{ "id": "0x200", "name": "sys_beep" }} ],
             "annotations": [ {{ "addr": "0x200", "title": "Start", "lines": ["entry"] }} ] }}"#
    )
    .unwrap();
    drop(f);
    let layout = load(&path).unwrap();
    assert_eq!(layout.base(), 0x200);
    assert_eq!(layout.annotations()[&0x200][0].title, "Start");
    assert_eq!(chip8_xx::Decoder::mnemonic(&layout.decoder(), 0x0200), "SYS 0x200 (sys_beep)");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn overflow_in_file_is_fatal() {
    let err = chip8_xx::config::from_json_str(
        r#"{ "code_end": "0x200", "strings": [
             { "addr": "0x300", "name": "LONG", "text": "abcd" },
             { "addr": "0x302", "name": "NEXT", "text": "z" } ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, XxError::ConfigurationOverflow { len: 4, gap: 2, .. }));
}

#[test]
fn bundled_layout_has_no_blocks_below_data() {
    let layout: Layout = cli_rom().unwrap();
    let data = layout.data_start().unwrap();
    assert!(layout.blocks().keys().all(|&a| a >= data));
}

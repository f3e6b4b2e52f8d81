use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::{Path, PathBuf};
use std::process::Command;

use chip8_xx::config::{self, parse_num};
use chip8_xx::codec::tiles;
use chip8_xx::disasm::describe_words;
use chip8_xx::{document, plan, verify, verify_with, Decorations, Image, Layout};

mod reference;
use reference::XxPy;

#[derive(Parser, Debug)]
#[command(author, version, about = "Annotated CHIP-8 ROM listings (xx format)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug)]
struct LayoutOpts {
    /// JSON layout (default: built-in CLI ROM layout)
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,
    /// Treat the whole image as code and ignore any layout
    #[arg(long, conflicts_with = "layout")]
    plain: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write the xx listing for a ROM
    Render {
        #[arg(long, default_value = "roms/cli/build/cli.ch8")]
        rom: PathBuf,
        #[arg(long, default_value = "roms/cli/cli.xx")]
        out: PathBuf,
        #[command(flatten)]
        layout: LayoutOpts,
        /// Skip the header and annotation boxes
        #[arg(long)]
        bare: bool,
        /// Shell command that builds the ROM first
        #[arg(long, value_name = "CMD")]
        build: Option<String>,
        /// Check that the written listing round-trips to the ROM
        #[arg(long)]
        verify: bool,
        /// Upstream xx.py for a second round-trip check
        #[arg(long, env = "XX_PY", value_name = "PY")]
        xx: Option<PathBuf>,
    },
    /// Check an existing listing against a ROM without rewriting it
    Verify {
        #[arg(long, default_value = "roms/cli/build/cli.ch8")]
        rom: PathBuf,
        #[arg(long = "xx-file", default_value = "roms/cli/cli.xx")]
        xx_file: PathBuf,
        #[arg(long, env = "XX_PY", value_name = "PY")]
        xx: Option<PathBuf>,
    },
    /// Show how a ROM is split into regions
    Regions {
        #[arg(long, default_value = "roms/cli/build/cli.ch8")]
        rom: PathBuf,
        #[command(flatten)]
        layout: LayoutOpts,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Decode 16-bit words (hex or dec)
    Decode {
        #[arg(required = true)]
        words: Vec<String>,
        #[command(flatten)]
        layout: LayoutOpts,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_layout(opts: &LayoutOpts) -> Result<Layout> {
    if opts.plain {
        return Ok(Layout::default());
    }
    match &opts.layout {
        Some(path) => config::load(path),
        None => Ok(config::cli_rom()?),
    }
}

fn load_rom(path: &Path, layout: &Layout) -> Result<Image> {
    anyhow::ensure!(path.exists(), "ROM not found: {}", path.display());
    Image::load(path, layout.base()).with_context(|| format!("reading {}", path.display()))
}

fn run_build(cmd: &str) -> Result<()> {
    info!(%cmd, "building ROM");
    let status = Command::new("sh").arg("-c").arg(cmd).status().with_context(|| format!("spawning {cmd:?}"))?;
    anyhow::ensure!(status.success(), "build command {cmd:?} failed with {status}");
    Ok(())
}

fn check(text: &str, rom: &Image, xx_file: &Path, xx: Option<&PathBuf>) -> Result<()> {
    verify(text, &rom.bytes).with_context(|| format!("xx verification failed: {}", xx_file.display()))?;
    info!(file = %xx_file.display(), bytes = rom.len(), "listing round-trips");
    if let Some(script) = xx {
        verify_with(&XxPy::new(script.clone()), text, &rom.bytes)
            .with_context(|| format!("xx.py verification failed: {}", xx_file.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Render { rom, out, layout, bare, build, verify, xx } => {
            if let Some(cmd) = &build {
                run_build(cmd)?;
            }
            let layout = load_layout(&layout)?;
            let image = load_rom(&rom, &layout)?;
            let decorations = if bare { Decorations::empty() } else { Decorations::all() };
            let text = document(&image, &layout, decorations);
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&out, &text).with_context(|| format!("writing {}", out.display()))?;
            info!(out = %out.display(), lines = text.lines().count(), "wrote listing");
            if verify {
                check(&text, &image, &out, xx.as_ref())?;
            }
        }
        Cmd::Verify { rom, xx_file, xx } => {
            let image = load_rom(&rom, &Layout::default())?;
            let text = std::fs::read_to_string(&xx_file).with_context(|| format!("reading {}", xx_file.display()))?;
            check(&text, &image, &xx_file, xx.as_ref())?;
            println!("ok: {} matches {} ({} bytes)", xx_file.display(), rom.display(), image.len());
        }
        Cmd::Regions { rom, layout, format } => {
            let layout = load_layout(&layout)?;
            let image = load_rom(&rom, &layout)?;
            let regions = plan(&image, &layout);
            anyhow::ensure!(tiles(&regions, &image), "regions do not tile {}", rom.display());
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&regions)?),
                OutputFormat::Text => {
                    println!("{:<16} {:<8} {:<8} {:>6}  name", "kind", "start", "end", "len");
                    for r in &regions {
                        println!(
                            "{:<16} {:#06x}   {:#06x}   {:>6}  {}",
                            format!("{:?}", r.kind),
                            r.start,
                            r.end(),
                            r.len,
                            r.name.as_deref().unwrap_or("-")
                        );
                    }
                }
            }
        }
        Cmd::Decode { words, layout } => {
            let layout = load_layout(&layout)?;
            let words = parse_words(&words)?;
            for line in describe_words(&layout.decoder(), &words) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn parse_words(words: &[String]) -> Result<Vec<u16>> {
    words
        .iter()
        .map(|w| parse_num::<u16>(w).with_context(|| format!("not a 16-bit word: {w:?}")))
        .collect()
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hid_ps2_tablegen::{
    compile, render, render_summary, RenderOptions, SourceTable, DEFAULT_COMBINATIONS,
};

#[derive(Debug, Parser)]
#[command(name = "hid_ps2_tablegen")]
#[command(about = "Compile the HID usage -> PS/2 scan code dataset into Rust lookup tables")]
struct Cli {
    /// Tab-separated dataset (HID Usage Page, HID Usage ID, Key Name, PS/2 Set N Make/Break).
    #[arg(long, env = "HID_PS2_TABLE")]
    input: PathBuf,

    /// Where to write the generated Rust source. Printed to stdout if omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path of the crate providing `ScanCode`, `ScanCodePair` and `PageSetMap`.
    #[arg(long, default_value = "ps2_scancode")]
    types_path: String,

    /// Fail if `--output` differs from a fresh render instead of writing it.
    #[arg(long, requires = "output", conflicts_with = "summary")]
    check: bool,

    /// Print a per-table key count report instead of the generated source.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source = SourceTable::load(&cli.input)?;
    let tables = compile(&source, &DEFAULT_COMBINATIONS)
        .with_context(|| format!("compile {}", cli.input.display()))?;

    if cli.summary {
        print!("{}", render_summary(&tables));
        return Ok(());
    }

    let source_label = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());
    let generated = render(
        &tables,
        &RenderOptions {
            types_path: cli.types_path,
            source_label,
        },
    );

    match cli.output {
        None => print!("{generated}"),
        Some(path) if cli.check => {
            let existing = fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            if existing != generated {
                bail!(
                    "{} is out of date (rerun hid_ps2_tablegen without --check)",
                    path.display()
                );
            }
            tracing::info!("{} is up to date", path.display());
        }
        Some(path) => {
            write_atomic(&path, generated.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
    }

    Ok(())
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("hid_ps2_table.rs");
    let tmp_path = parent.join(format!(".{file_name}.tablegen.tmp"));

    fs::write(&tmp_path, data)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;

    // `rename` doesn't replace on Windows.
    #[cfg(windows)]
    {
        let _ = fs::remove_file(path);
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| {
            format!(
                "rename temp file {} to {}",
                tmp_path.display(),
                path.display()
            )
        });
    }

    Ok(())
}

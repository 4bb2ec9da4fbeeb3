use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use hid_ps2_tablegen::{generate, RenderOptions, DEFAULT_COMBINATIONS};

const DATASET: &str = "data/hid_ps2_table.tsv";

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    let input = manifest_dir.join(DATASET);
    println!("cargo:rerun-if-changed={}", input.display());

    let generated = generate(&input, &DEFAULT_COMBINATIONS, &RenderOptions::default())
        .with_context(|| format!("compile {}", input.display()))?;

    let out = out_dir.join("hid_ps2_table.rs");
    fs::write(&out, generated).with_context(|| format!("write {}", out.display()))?;
    Ok(())
}

//! HID usage -> PS/2 scan code table compiler.
//!
//! Reads the tab-separated dataset (usage page, usage ID, key name and per-set make/break codes),
//! drops rows that do not describe a physical key, and builds one usage ID -> scan code pair
//! table per configured (usage page, scan code set). The tables are emitted as Rust `static`s
//! written against the `ps2_scancode` types, either from a build script or from the
//! `hid_ps2_tablegen` binary.
//!
//! "No code" and "unassigned" fields are not materialised per entry: every such slot refers to
//! one of two shared sentinels ([`model::NONE`], [`model::UNASSIGNED`] here; `SC_NONE` and
//! `SC_UNASSIGNED` in the emitted source).
//!
//! ```no_run
//! use hid_ps2_tablegen::{generate, RenderOptions, DEFAULT_COMBINATIONS};
//!
//! let src = generate(
//!     std::path::Path::new("data/hid_ps2_table.tsv"),
//!     &DEFAULT_COMBINATIONS,
//!     &RenderOptions::default(),
//! )?;
//! # Ok::<(), hid_ps2_tablegen::TableError>(())
//! ```

pub mod compile;
pub mod error;
pub mod model;
pub mod render;
pub mod schema;

use std::path::Path;

pub use compile::{
    compile, is_filtered, Combination, CompiledTables, PageSetTable, TableEntry,
    DEFAULT_COMBINATIONS,
};
pub use error::{Result, RowRef, TableError};
pub use render::{render, render_summary, RenderOptions};
pub use schema::SourceTable;

/// Loads the dataset at `input`, compiles `combinations` and renders the artifact.
pub fn generate(
    input: &Path,
    combinations: &[Combination],
    opts: &RenderOptions,
) -> Result<String> {
    let source = SourceTable::load(input)?;
    tracing::debug!("read {} rows from {}", source.len(), input.display());
    let tables = compile(&source, combinations)?;
    Ok(render(&tables, opts))
}

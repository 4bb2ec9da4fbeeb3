//! Rust source emission.
//!
//! The artifact is written against the `ps2_scancode` types and is meant to be pulled in with
//! `include!`. Output depends only on the compiled tables and [`RenderOptions`], so identical
//! input always renders byte-identical text.

use std::fmt::Write as _;

use ps2_scancode::{ScanCodeSet, UsageId, UsagePage};

use crate::compile::{CompiledTables, PageSetTable};
use crate::model::CodeSlot;

pub const NONE_STATIC: &str = "SC_NONE";
pub const UNASSIGNED_STATIC: &str = "SC_UNASSIGNED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Path of the crate providing `ScanCode`, `ScanCodePair`, `PageSetMap`, ...
    pub types_path: String,
    /// Shown in the `@generated` header.
    pub source_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            types_path: "ps2_scancode".to_string(),
            source_label: "hid_ps2_table.tsv".to_string(),
        }
    }
}

fn page_variant(page: UsagePage) -> &'static str {
    match page {
        UsagePage::GenericDesktop => "GenericDesktop",
        UsagePage::KeyboardKeypad => "KeyboardKeypad",
        UsagePage::Consumer => "Consumer",
    }
}

fn set_variant(set: ScanCodeSet) -> &'static str {
    match set {
        ScanCodeSet::Set1 => "Set1",
        ScanCodeSet::Set2 => "Set2",
    }
}

fn table_prefix(table: &PageSetTable) -> String {
    format!("PAGE_{}_SC{}", table.page(), table.set())
}

/// Name of the `PageSetMap` static emitted for a table, e.g. `PAGE_07_SC2_MAP`.
pub fn map_static_name(page: UsagePage, set: ScanCodeSet) -> String {
    format!("PAGE_{page}_SC{set}_MAP")
}

fn entry_prefix(table: &PageSetTable, id: UsageId) -> String {
    let width = table.page().usage_id_digits();
    format!("PAGE_{}_ID_{id:0width$X}_SC{}", table.page(), table.set())
}

fn byte_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Emits the static for a slot's own code (if it has one) and returns the name to reference.
fn render_slot(out: &mut String, slot: &CodeSlot, own_name: String) -> String {
    match slot {
        CodeSlot::NoCode => NONE_STATIC.to_string(),
        CodeSlot::Unassigned => UNASSIGNED_STATIC.to_string(),
        CodeSlot::Bytes(code) => {
            let _ = writeln!(
                out,
                "static {own_name}: ScanCode = ScanCode::new(&[{}]);",
                byte_list(code.bytes())
            );
            own_name
        }
    }
}

fn render_table(out: &mut String, table: &PageSetTable) {
    let prefix = table_prefix(table);
    let width = table.page().usage_id_digits();

    let _ = writeln!(
        out,
        "// Usage Page: {}, PS/2 Set {}",
        table.page(),
        table.set()
    );

    let mut pairs = Vec::with_capacity(table.len());
    for (id, entry) in table.iter() {
        let entry_prefix = entry_prefix(table, id);
        let pair = entry.pair();
        let make = render_slot(out, pair.make_slot(), format!("{entry_prefix}_MK"));
        let brk = render_slot(out, pair.break_slot(), format!("{entry_prefix}_BRK"));
        let pair_name = format!("{entry_prefix}_PAIR");
        if !entry.key_name().is_empty() {
            let _ = writeln!(out, "/// {}", entry.key_name());
        }
        let _ = writeln!(
            out,
            "static {pair_name}: ScanCodePair = ScanCodePair::new(&{make}, &{brk});"
        );
        pairs.push((id, pair_name));
    }

    let _ = writeln!(
        out,
        "static {prefix}_ENTRIES: [(UsageId, &ScanCodePair); {}] = [",
        pairs.len()
    );
    for (id, pair_name) in &pairs {
        let _ = writeln!(out, "    (0x{id:0width$X}, &{pair_name}),");
    }
    let _ = writeln!(out, "];");

    let _ = writeln!(
        out,
        "pub static {}: PageSetMap = PageSetMap::new(UsagePage::{}, ScanCodeSet::{}, &{prefix}_ENTRIES);",
        map_static_name(table.page(), table.set()),
        page_variant(table.page()),
        set_variant(table.set()),
    );
}

/// Renders every table, the shared sentinels and the `TABLES` index as Rust source.
pub fn render(tables: &CompiledTables, opts: &RenderOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "// @generated by hid_ps2_tablegen from {}. Do not edit.",
        opts.source_label
    );
    let _ = writeln!(out, "#[allow(unused_imports)]");
    let _ = writeln!(
        out,
        "use {}::{{PageSetMap, ScanCode, ScanCodePair, ScanCodeSet, UsageId, UsagePage}};",
        opts.types_path
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "/// Shared code for transitions that emit nothing.");
    let _ = writeln!(out, "pub static {NONE_STATIC}: ScanCode = ScanCode::new(&[]);");
    let _ = writeln!(out, "/// Shared code for keys with no mapping in a scan code set.");
    let _ = writeln!(
        out,
        "pub static {UNASSIGNED_STATIC}: ScanCode = ScanCode::new(&[]);"
    );

    for table in tables.tables() {
        let _ = writeln!(out);
        render_table(&mut out, table);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "/// Every table above, in generation order.");
    let _ = writeln!(
        out,
        "pub static TABLES: [&PageSetMap; {}] = [",
        tables.tables().len()
    );
    for table in tables.tables() {
        let _ = writeln!(
            out,
            "    &{},",
            map_static_name(table.page(), table.set())
        );
    }
    let _ = writeln!(out, "];");

    out
}

/// Human-readable per-table report.
pub fn render_summary(tables: &CompiledTables) -> String {
    let mut out = String::new();
    for table in tables.tables() {
        let (mut no_code, mut unassigned) = (0usize, 0usize);
        for (_, entry) in table.iter() {
            for slot in [entry.pair().make_slot(), entry.pair().break_slot()] {
                match slot {
                    CodeSlot::NoCode => no_code += 1,
                    CodeSlot::Unassigned => unassigned += 1,
                    CodeSlot::Bytes(_) => {}
                }
            }
        }
        let _ = writeln!(
            out,
            "usage page {}, PS/2 set {}: {} keys ({} no-code slots, {} unassigned slots)",
            table.page(),
            table.set(),
            table.len(),
            no_code,
            unassigned
        );
    }
    out
}

//! Dataset -> per (usage page, scan code set) lookup tables.

use std::collections::btree_map::{BTreeMap, Entry};

use ps2_scancode::{ScanCodeSet, UsageId, UsagePage};

use crate::error::{Result, TableError};
use crate::model::ScanCodePair;
use crate::schema::{SourceRecord, SourceTable};

/// One (usage page, scan code set) table to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combination {
    pub page: UsagePage,
    pub set: ScanCodeSet,
}

impl Combination {
    pub const fn new(page: UsagePage, set: ScanCodeSet) -> Self {
        Self { page, set }
    }
}

/// Every table the firmware consumes, in output order.
pub const DEFAULT_COMBINATIONS: [Combination; 6] = [
    Combination::new(UsagePage::GenericDesktop, ScanCodeSet::Set1),
    Combination::new(UsagePage::GenericDesktop, ScanCodeSet::Set2),
    Combination::new(UsagePage::KeyboardKeypad, ScanCodeSet::Set1),
    Combination::new(UsagePage::KeyboardKeypad, ScanCodeSet::Set2),
    Combination::new(UsagePage::Consumer, ScanCodeSet::Set1),
    Combination::new(UsagePage::Consumer, ScanCodeSet::Set2),
];

/// Key names marking rows that do not describe a physical key.
pub const PLACEHOLDER_KEY_NAMES: [&str; 3] = ["RESERVED", "DO NOT USE", "UNASSIGNED"];

/// Alternate name for Pause. It shares Pause's usage ID, so only the Pause row is tabulated.
pub const PAUSE_BREAK_ALIAS: &str = "Break (Ctrl-Pause)";

/// Whether a row with this key name is dropped before decoding.
pub fn is_filtered(key_name: &str) -> bool {
    PLACEHOLDER_KEY_NAMES.contains(&key_name) || key_name == PAUSE_BREAK_ALIAS
}

#[derive(Debug)]
pub struct TableEntry {
    key_name: String,
    line: usize,
    pair: ScanCodePair,
}

impl TableEntry {
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Source line the entry was compiled from.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn pair(&self) -> &ScanCodePair {
        &self.pair
    }
}

/// Usage ID -> scan code pair for one [`Combination`]. Read-only once compiled.
#[derive(Debug)]
pub struct PageSetTable {
    combination: Combination,
    entries: BTreeMap<UsageId, TableEntry>,
}

impl PageSetTable {
    pub fn combination(&self) -> Combination {
        self.combination
    }

    pub fn page(&self) -> UsagePage {
        self.combination.page
    }

    pub fn set(&self) -> ScanCodeSet {
        self.combination.set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: UsageId) -> Option<&ScanCodePair> {
        self.entries.get(&id).map(TableEntry::pair)
    }

    pub fn entry(&self, id: UsageId) -> Option<&TableEntry> {
        self.entries.get(&id)
    }

    /// Entries in ascending usage ID order.
    pub fn iter(&self) -> impl Iterator<Item = (UsageId, &TableEntry)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }
}

/// Result of one compilation run: one table per configured combination, in configured order.
#[derive(Debug)]
pub struct CompiledTables {
    tables: Vec<PageSetTable>,
}

impl CompiledTables {
    pub fn tables(&self) -> &[PageSetTable] {
        &self.tables
    }

    pub fn get(&self, page: UsagePage, set: ScanCodeSet) -> Option<&PageSetTable> {
        let combination = Combination::new(page, set);
        self.tables.iter().find(|t| t.combination == combination)
    }
}

/// Compiles `source` into one table per entry of `combinations`.
///
/// Fails on the first malformed field or duplicate usage ID; nothing is returned in that case.
pub fn compile(source: &SourceTable, combinations: &[Combination]) -> Result<CompiledTables> {
    let mut tables: Vec<PageSetTable> = Vec::with_capacity(combinations.len());
    for &combination in combinations {
        if tables.iter().any(|t| t.combination == combination) {
            tracing::warn!(
                "usage page {} / PS/2 set {} listed more than once; compiling it once",
                combination.page,
                combination.set
            );
            continue;
        }
        tables.push(compile_combination(source, combination)?);
    }
    Ok(CompiledTables { tables })
}

fn compile_combination(source: &SourceTable, combination: Combination) -> Result<PageSetTable> {
    let mut entries = BTreeMap::new();
    let mut filtered = 0usize;
    let page_label = combination.page.to_string();

    for record in source.records() {
        if is_filtered(record.key_name()) {
            filtered += 1;
            continue;
        }
        if !record.is_usage_page(&page_label) {
            continue;
        }
        insert_record(&mut entries, record, combination)?;
    }

    tracing::debug!(
        page = %combination.page,
        set = %combination.set,
        filtered,
        "skipped placeholder and alias rows"
    );

    if entries.is_empty() {
        tracing::warn!(
            "usage page {} / PS/2 set {} has no keys; emitting an empty table",
            combination.page,
            combination.set
        );
    } else {
        tracing::info!(
            page = %combination.page,
            set = %combination.set,
            entries = entries.len(),
            "compiled table"
        );
    }

    Ok(PageSetTable {
        combination,
        entries,
    })
}

fn insert_record(
    entries: &mut BTreeMap<UsageId, TableEntry>,
    record: &SourceRecord,
    combination: Combination,
) -> Result<()> {
    let usage_id = record.usage_id(combination.page)?;
    let pair = record.scan_code_pair(combination.set)?;

    match entries.entry(usage_id) {
        Entry::Occupied(existing) => Err(TableError::DuplicateKey {
            row: record.row_ref(),
            page: combination.page,
            set: combination.set,
            first_line: existing.get().line,
        }),
        Entry::Vacant(slot) => {
            slot.insert(TableEntry {
                key_name: record.key_name().to_string(),
                line: record.line(),
                pair,
            });
            Ok(())
        }
    }
}

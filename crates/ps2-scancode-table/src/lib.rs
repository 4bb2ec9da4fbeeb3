#![forbid(unsafe_code)]
#![no_std]

//! HID usage -> PS/2 scan code lookup tables.
//!
//! The tables are compiled from `data/hid_ps2_table.tsv` by the build script (see
//! `hid_ps2_tablegen`) into read-only `static`s, one [`PageSetMap`] per (usage page, scan code
//! set). Nothing is allocated or initialised at runtime.
//!
//! Keys that emit nothing on release (and the like) share [`SC_NONE`]; keys without a mapping in
//! a scan code set share [`SC_UNASSIGNED`]. Both are empty, so tell them apart by address with
//! [`is_no_code`] / [`is_unassigned`] rather than by value.

pub use ps2_scancode::{PageSetMap, ScanCode, ScanCodePair, ScanCodeSet, UsageId, UsagePage};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/hid_ps2_table.rs"));
}

pub use generated::{
    PAGE_01_SC1_MAP, PAGE_01_SC2_MAP, PAGE_07_SC1_MAP, PAGE_07_SC2_MAP, PAGE_0C_SC1_MAP,
    PAGE_0C_SC2_MAP, SC_NONE, SC_UNASSIGNED, TABLES,
};

/// Whether `code` is the shared "no code" sentinel.
pub fn is_no_code(code: &ScanCode) -> bool {
    core::ptr::eq(code, &SC_NONE)
}

/// Whether `code` is the shared "unassigned" sentinel.
pub fn is_unassigned(code: &ScanCode) -> bool {
    core::ptr::eq(code, &SC_UNASSIGNED)
}

/// Table for `page` / `set`.
pub fn table(page: UsagePage, set: ScanCodeSet) -> Option<&'static PageSetMap> {
    TABLES
        .iter()
        .copied()
        .find(|map| map.page() == page && map.set() == set)
}

#![forbid(unsafe_code)]
#![cfg_attr(not(test), no_std)]

//! HID usage -> PS/2 scan code data model.
//!
//! These are the types the generated lookup tables (see `ps2-scancode-table`) are written
//! against. Everything here is `const`-constructible so the tables can live in `static`s with no
//! runtime initialisation and no allocation:
//!
//! - [`ScanCode`]: the raw bytes a PS/2 keyboard transmits for one make or break event.
//! - [`ScanCodePair`]: the make/break encoding of one key under one scan code set.
//! - [`PageSetMap`]: usage ID -> [`ScanCodePair`] for one (usage page, scan code set).
//!
//! `ScanCode` deliberately does not implement `Clone`: a scan code is referenced from the pairs
//! that use it, and the "no code" / "unassigned" sentinels are compared by address.

use core::fmt;

/// HID usage ID within a usage page.
///
/// Keyboard/Keypad and Generic Desktop usages fit in a byte; Consumer usages do not, so the
/// storage type is 16 bits wide and each page bounds its own range (see
/// [`UsagePage::max_usage_id`]).
pub type UsageId = u16;

/// HID usage pages that carry keys with a PS/2 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum UsagePage {
    GenericDesktop = 0x01,
    KeyboardKeypad = 0x07,
    Consumer = 0x0C,
}

impl UsagePage {
    pub const ALL: [UsagePage; 3] = [
        UsagePage::GenericDesktop,
        UsagePage::KeyboardKeypad,
        UsagePage::Consumer,
    ];

    /// Numeric usage page value as defined by the HID Usage Tables.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(UsagePage::GenericDesktop),
            0x07 => Some(UsagePage::KeyboardKeypad),
            0x0C => Some(UsagePage::Consumer),
            _ => None,
        }
    }

    /// Largest usage ID accepted for this page.
    ///
    /// Consumer usages are bounded the same way the USB consumer-control report sanitises them.
    pub const fn max_usage_id(self) -> UsageId {
        match self {
            UsagePage::GenericDesktop | UsagePage::KeyboardKeypad => 0xFF,
            UsagePage::Consumer => 0x03FF,
        }
    }

    /// Number of hex digits used when printing a usage ID of this page.
    pub const fn usage_id_digits(self) -> usize {
        match self {
            UsagePage::GenericDesktop | UsagePage::KeyboardKeypad => 2,
            UsagePage::Consumer => 4,
        }
    }
}

impl fmt::Display for UsagePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.code())
    }
}

/// PS/2 scan code set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ScanCodeSet {
    Set1 = 1,
    Set2 = 2,
}

impl ScanCodeSet {
    pub const ALL: [ScanCodeSet; 2] = [ScanCodeSet::Set1, ScanCodeSet::Set2];

    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Name of the dataset column holding this set's make codes.
    pub const fn make_column(self) -> &'static str {
        match self {
            ScanCodeSet::Set1 => "PS/2 Set 1 Make",
            ScanCodeSet::Set2 => "PS/2 Set 2 Make",
        }
    }

    /// Name of the dataset column holding this set's break codes.
    pub const fn break_column(self) -> &'static str {
        match self {
            ScanCodeSet::Set1 => "PS/2 Set 1 Break",
            ScanCodeSet::Set2 => "PS/2 Set 2 Break",
        }
    }
}

impl fmt::Display for ScanCodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Bytes transmitted for one make or break event. May be empty.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ScanCode {
    bytes: &'static [u8],
}

impl ScanCode {
    pub const fn new(bytes: &'static [u8]) -> Self {
        Self { bytes }
    }

    pub const fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Formats as space separated upper-case hex, e.g. `E0 F0 37`.
impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// Press/release encoding of one key.
#[derive(Debug)]
pub struct ScanCodePair {
    make: &'static ScanCode,
    brk: &'static ScanCode,
}

impl ScanCodePair {
    pub const fn new(make: &'static ScanCode, brk: &'static ScanCode) -> Self {
        Self { make, brk }
    }

    pub const fn make_code(&self) -> &'static ScanCode {
        self.make
    }

    pub const fn break_code(&self) -> &'static ScanCode {
        self.brk
    }
}

/// Read-only usage ID -> [`ScanCodePair`] table for one (usage page, scan code set).
///
/// Entries must be strictly ascending by usage ID and within the page's usage range. This is
/// checked by [`PageSetMap::new`]; since the tables are built in `static` initialisers, a violation
/// is a compile error rather than a runtime failure.
#[derive(Debug)]
pub struct PageSetMap {
    page: UsagePage,
    set: ScanCodeSet,
    entries: &'static [(UsageId, &'static ScanCodePair)],
}

impl PageSetMap {
    pub const fn new(
        page: UsagePage,
        set: ScanCodeSet,
        entries: &'static [(UsageId, &'static ScanCodePair)],
    ) -> Self {
        let mut i = 0;
        while i < entries.len() {
            if entries[i].0 > page.max_usage_id() {
                panic!("usage ID out of range for usage page");
            }
            if i > 0 && entries[i - 1].0 >= entries[i].0 {
                panic!("usage IDs must be unique and in ascending order");
            }
            i += 1;
        }
        Self {
            page,
            set,
            entries,
        }
    }

    pub const fn page(&self) -> UsagePage {
        self.page
    }

    pub const fn set(&self) -> ScanCodeSet {
        self.set
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: UsageId) -> Option<&'static ScanCodePair> {
        self.entries
            .binary_search_by_key(&id, |(k, _)| *k)
            .ok()
            .map(|idx| self.entries[idx].1)
    }

    pub fn contains(&self, id: UsageId) -> bool {
        self.get(id).is_some()
    }

    /// Entries in ascending usage ID order.
    pub fn iter(&self) -> impl Iterator<Item = (UsageId, &'static ScanCodePair)> + '_ {
        self.entries.iter().map(|(id, pair)| (*id, *pair))
    }
}

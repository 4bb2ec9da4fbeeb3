//! Compile-time view of scan codes.
//!
//! Mirrors `ps2_scancode`, but owns its bytes: these values are built from the dataset and
//! then rendered as `static` items.

use std::fmt;

/// Shared "this half of the transition emits nothing" code.
pub static NONE: ScanCode = ScanCode::empty();

/// Shared "no mapping exists in this scan code set" code.
pub static UNASSIGNED: ScanCode = ScanCode::empty();

/// Bytes for one make or break event.
///
/// Not `Clone`: each non-sentinel code belongs to exactly one pair slot.
#[derive(Debug, PartialEq, Eq)]
pub struct ScanCode(Vec<u8>);

impl ScanCode {
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// One make or break slot of a [`ScanCodePair`].
#[derive(Debug, PartialEq, Eq)]
pub enum CodeSlot {
    /// Refers to [`NONE`].
    NoCode,
    /// Refers to [`UNASSIGNED`].
    Unassigned,
    Bytes(ScanCode),
}

impl CodeSlot {
    /// Resolves the slot to the code it refers to. Sentinel slots always resolve to the same
    /// process-wide instance.
    pub fn scan_code(&self) -> &ScanCode {
        match self {
            CodeSlot::NoCode => &NONE,
            CodeSlot::Unassigned => &UNASSIGNED,
            CodeSlot::Bytes(code) => code,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, CodeSlot::Bytes(_))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ScanCodePair {
    make: CodeSlot,
    brk: CodeSlot,
}

impl ScanCodePair {
    pub fn new(make: CodeSlot, brk: CodeSlot) -> Self {
        Self { make, brk }
    }

    pub fn make_slot(&self) -> &CodeSlot {
        &self.make
    }

    pub fn break_slot(&self) -> &CodeSlot {
        &self.brk
    }

    pub fn make_code(&self) -> &ScanCode {
        self.make.scan_code()
    }

    pub fn break_code(&self) -> &ScanCode {
        self.brk.scan_code()
    }
}

use std::fmt;
use std::path::PathBuf;

use ps2_scancode::{ScanCodeSet, UsagePage};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TableError>;

/// Identifies the dataset row an error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRef {
    /// 1-based line number in the source file.
    pub line: usize,
    pub usage_page: String,
    pub usage_id: String,
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} (usage page {:?}, usage ID {:?})",
            self.line, self.usage_page, self.usage_id
        )
    }
}

/// Errors produced while loading or compiling the dataset.
///
/// Every variant is fatal: the compiler never emits a partial table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset has no header line")]
    MissingHeader,

    #[error("missing required column {column:?}")]
    MissingColumn { column: &'static str },

    #[error("line {line}: expected {expected} tab-separated fields, found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A usage page, usage ID or scan code field is not valid hex (or is out of range).
    #[error("{row}: malformed {field:?} value {value:?}: {reason}")]
    MalformedInput {
        row: RowRef,
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A scan code field is neither a hex byte sequence nor one of the recognised markers.
    #[error("{row}: unknown marker {value:?} in {field:?} (expected hex bytes, \"None\" or \"UNASSIGNED\")")]
    UnknownMarker {
        row: RowRef,
        field: &'static str,
        value: String,
    },

    #[error("{row}: duplicate usage ID in usage page {page}, PS/2 set {set} (already defined on line {first_line})")]
    DuplicateKey {
        row: RowRef,
        page: UsagePage,
        set: ScanCodeSet,
        first_line: usize,
    },
}

impl TableError {
    /// Row the error was raised for, when it concerns a single row.
    pub fn row(&self) -> Option<&RowRef> {
        match self {
            TableError::MalformedInput { row, .. }
            | TableError::UnknownMarker { row, .. }
            | TableError::DuplicateKey { row, .. } => Some(row),
            _ => None,
        }
    }
}

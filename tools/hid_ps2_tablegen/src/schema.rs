//! Tab-separated dataset reader and field decoding.
//!
//! The dataset is read as plain text (no numeric coercion, so `"07"` and `"00B5"` keep their
//! leading zeros). Structural problems (missing columns, ragged rows) are rejected when the file
//! is parsed; per-field decoding into typed values happens once, when a row is compiled.

use std::fs;
use std::path::Path;

use ps2_scancode::{ScanCodeSet, UsageId, UsagePage};

use crate::error::{Result, RowRef, TableError};
use crate::model::{CodeSlot, ScanCode, ScanCodePair};

pub const USAGE_PAGE_COLUMN: &str = "HID Usage Page";
pub const USAGE_ID_COLUMN: &str = "HID Usage ID";
pub const KEY_NAME_COLUMN: &str = "Key Name";

/// Code field marker: the key never emits this half of the transition.
pub const NO_CODE_MARKER: &str = "None";
/// Code field marker: the key has no mapping in this scan code set.
pub const UNASSIGNED_MARKER: &str = "UNASSIGNED";

#[derive(Debug, Clone, PartialEq, Eq)]
struct SetCodes {
    make: String,
    brk: String,
}

/// One dataset row, still as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    line: usize,
    usage_page: String,
    usage_id: String,
    key_name: String,
    codes: [SetCodes; 2],
}

impl SourceRecord {
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn usage_page_text(&self) -> &str {
        &self.usage_page
    }

    pub fn usage_id_text(&self) -> &str {
        &self.usage_id
    }

    pub fn row_ref(&self) -> RowRef {
        RowRef {
            line: self.line,
            usage_page: self.usage_page.clone(),
            usage_id: self.usage_id.clone(),
        }
    }

    fn set_codes(&self, set: ScanCodeSet) -> &SetCodes {
        match set {
            ScanCodeSet::Set1 => &self.codes[0],
            ScanCodeSet::Set2 => &self.codes[1],
        }
    }

    /// Whether this row belongs to `page`. The page column must hold the page's label exactly
    /// (`"07"`, `"0C"`); any other text, including other valid pages, is simply not a match.
    pub fn is_usage_page(&self, page: &str) -> bool {
        self.usage_page == page
    }

    /// Usage ID of this row, range checked against `page`.
    pub fn usage_id(&self, page: UsagePage) -> Result<UsageId> {
        let value = parse_hex(&self.usage_id, 4).ok_or_else(|| {
            self.malformed(USAGE_ID_COLUMN, &self.usage_id, "expected 1-4 hex digits")
        })?;
        if value > page.max_usage_id() {
            return Err(self.malformed(
                USAGE_ID_COLUMN,
                &self.usage_id,
                &format!(
                    "exceeds 0x{:X}, the largest usage ID of usage page {page}",
                    page.max_usage_id()
                ),
            ));
        }
        Ok(value)
    }

    /// Decodes the make/break fields of `set`.
    pub fn scan_code_pair(&self, set: ScanCodeSet) -> Result<ScanCodePair> {
        let codes = self.set_codes(set);
        let make = self.decode(set.make_column(), &codes.make)?;
        let brk = self.decode(set.break_column(), &codes.brk)?;
        Ok(ScanCodePair::new(make, brk))
    }

    fn decode(&self, field: &'static str, text: &str) -> Result<CodeSlot> {
        decode_code_field(text).map_err(|err| match err {
            FieldError::Malformed(reason) => self.malformed(field, text, &reason),
            FieldError::UnknownMarker => TableError::UnknownMarker {
                row: self.row_ref(),
                field,
                value: text.to_string(),
            },
        })
    }

    fn malformed(&self, field: &'static str, value: &str, reason: &str) -> TableError {
        TableError::MalformedInput {
            row: self.row_ref(),
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// The parsed dataset: every record in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    records: Vec<SourceRecord>,
}

struct ColumnIndex {
    usage_page: usize,
    usage_id: usize,
    key_name: usize,
    codes: [(usize, usize); 2],
}

impl ColumnIndex {
    fn from_header(header: &[&str]) -> Result<Self> {
        let find = |column: &'static str| {
            header
                .iter()
                .position(|h| *h == column)
                .ok_or(TableError::MissingColumn { column })
        };
        let set_columns = |set: ScanCodeSet| -> Result<(usize, usize)> {
            Ok((find(set.make_column())?, find(set.break_column())?))
        };

        Ok(Self {
            usage_page: find(USAGE_PAGE_COLUMN)?,
            usage_id: find(USAGE_ID_COLUMN)?,
            key_name: find(KEY_NAME_COLUMN)?,
            codes: [set_columns(ScanCodeSet::Set1)?, set_columns(ScanCodeSet::Set2)?],
        })
    }
}

impl SourceTable {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.strip_suffix('\r').unwrap_or(line)))
            .filter(|(_, line)| !line.is_empty());

        let (_, header) = lines.next().ok_or(TableError::MissingHeader)?;
        let header: Vec<&str> = header.split('\t').collect();
        let columns = ColumnIndex::from_header(&header)?;

        let mut records = Vec::new();
        for (line, text) in lines {
            let fields: Vec<&str> = text.split('\t').collect();
            if fields.len() != header.len() {
                return Err(TableError::MalformedRow {
                    line,
                    expected: header.len(),
                    found: fields.len(),
                });
            }
            let set_codes = |(make, brk): (usize, usize)| SetCodes {
                make: fields[make].to_string(),
                brk: fields[brk].to_string(),
            };
            records.push(SourceRecord {
                line,
                usage_page: fields[columns.usage_page].to_string(),
                usage_id: fields[columns.usage_id].to_string(),
                key_name: fields[columns.key_name].to_string(),
                codes: [set_codes(columns.codes[0]), set_codes(columns.codes[1])],
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[SourceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FieldError {
    Malformed(String),
    UnknownMarker,
}

fn is_hex_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn parse_hex(s: &str, max_digits: usize) -> Option<u16> {
    if !is_hex_digits(s) || s.len() > max_digits {
        return None;
    }
    u16::from_str_radix(s, 16).ok()
}

/// Decodes one make/break field.
///
/// A field where no token looks like hex is an unknown marker; a field with some hex-looking
/// tokens but an invalid one is malformed.
fn decode_code_field(text: &str) -> std::result::Result<CodeSlot, FieldError> {
    match text {
        NO_CODE_MARKER => return Ok(CodeSlot::NoCode),
        UNASSIGNED_MARKER => return Ok(CodeSlot::Unassigned),
        _ => {}
    }

    let tokens: Vec<&str> = text.split_ascii_whitespace().collect();
    if !tokens.iter().any(|t| is_hex_digits(t)) {
        return Err(FieldError::UnknownMarker);
    }

    let mut bytes = Vec::with_capacity(tokens.len());
    for token in tokens {
        let byte = parse_hex(token, 2)
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| FieldError::Malformed(format!("{token:?} is not a hex byte")))?;
        bytes.push(byte);
    }
    Ok(CodeSlot::Bytes(ScanCode::new(bytes)))
}

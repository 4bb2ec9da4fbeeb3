use std::path::PathBuf;

use hid_ps2_tablegen::model::{CodeSlot, NONE, UNASSIGNED};
use hid_ps2_tablegen::{
    compile, generate, Combination, CompiledTables, RenderOptions, SourceTable, TableError,
    DEFAULT_COMBINATIONS,
};
use ps2_scancode::{ScanCodeSet, UsagePage};

const HEADER: &str = "HID Usage Page\tHID Usage ID\tKey Name\tPS/2 Set 1 Make\tPS/2 Set 1 Break\tPS/2 Set 2 Make\tPS/2 Set 2 Break";

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

fn shipped_dataset() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/ps2-scancode-table/data/hid_ps2_table.tsv")
}

fn compile_fixture() -> CompiledTables {
    let source = SourceTable::load(&testdata("minimal.tsv")).unwrap();
    compile(&source, &DEFAULT_COMBINATIONS).unwrap()
}

fn compile_rows(rows: &[&str]) -> Result<CompiledTables, TableError> {
    let mut text = format!("{HEADER}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    let source = SourceTable::parse(&text)?;
    compile(&source, &DEFAULT_COMBINATIONS)
}

#[test]
fn one_table_per_combination_in_configured_order() {
    let tables = compile_fixture();
    let order: Vec<Combination> = tables.tables().iter().map(|t| t.combination()).collect();
    assert_eq!(order, DEFAULT_COMBINATIONS.to_vec());

    let keyboard = tables
        .get(UsagePage::KeyboardKeypad, ScanCodeSet::Set1)
        .unwrap();
    let ids: Vec<u16> = keyboard.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![0x00, 0x01, 0x03, 0x04, 0x46, 0x48, 0xE0]);

    let consumer = tables.get(UsagePage::Consumer, ScanCodeSet::Set2).unwrap();
    assert_eq!(consumer.len(), 2);
    assert!(consumer.get(0x0152).is_some());
}

#[test]
fn compiled_bytes_keep_source_order() {
    let tables = compile_fixture();

    let power = tables
        .get(UsagePage::GenericDesktop, ScanCodeSet::Set2)
        .unwrap()
        .get(0x81)
        .unwrap();
    assert_eq!(power.make_code().bytes(), &[0xE0, 0x37]);
    assert_eq!(power.break_code().bytes(), &[0xE0, 0xF0, 0x37]);

    let print_screen = tables
        .get(UsagePage::KeyboardKeypad, ScanCodeSet::Set2)
        .unwrap()
        .get(0x46)
        .unwrap();
    assert_eq!(
        print_screen.break_code().bytes(),
        &[0xE0, 0xF0, 0x7C, 0xE0, 0xF0, 0x12]
    );
}

#[test]
fn sentinel_slots_share_one_instance_across_tables() {
    let tables = compile_fixture();

    let set1 = tables
        .get(UsagePage::KeyboardKeypad, ScanCodeSet::Set1)
        .unwrap();
    let set2 = tables
        .get(UsagePage::KeyboardKeypad, ScanCodeSet::Set2)
        .unwrap();
    let consumer = tables.get(UsagePage::Consumer, ScanCodeSet::Set1).unwrap();

    let no_event = set1.get(0x00).unwrap();
    let overrun = set2.get(0x01).unwrap();
    assert!(std::ptr::eq(no_event.make_code(), &NONE));
    assert!(std::ptr::eq(no_event.break_code(), overrun.break_code()));

    let undefined = set1.get(0x03).unwrap();
    let bass_up = consumer.get(0x0152).unwrap();
    assert!(std::ptr::eq(undefined.make_code(), &UNASSIGNED));
    assert!(std::ptr::eq(undefined.make_code(), bass_up.break_code()));
    assert!(!std::ptr::eq(undefined.make_code(), no_event.make_code()));

    // Every sentinel slot in every table resolves to one of the two statics, and every other
    // slot owns its own code.
    for table in tables.tables() {
        for (_, entry) in table.iter() {
            let pair = entry.pair();
            for (slot, code) in [
                (pair.make_slot(), pair.make_code()),
                (pair.break_slot(), pair.break_code()),
            ] {
                match slot {
                    CodeSlot::NoCode => assert!(std::ptr::eq(code, &NONE)),
                    CodeSlot::Unassigned => assert!(std::ptr::eq(code, &UNASSIGNED)),
                    CodeSlot::Bytes(_) => {
                        assert!(!std::ptr::eq(code, &NONE));
                        assert!(!std::ptr::eq(code, &UNASSIGNED));
                    }
                }
            }
        }
    }
}

#[test]
fn placeholder_rows_never_reach_a_table() {
    let tables = compile_fixture();

    for table in tables.tables() {
        for (_, entry) in table.iter() {
            assert!(
                !["RESERVED", "DO NOT USE", "UNASSIGNED", "Break (Ctrl-Pause)"]
                    .contains(&entry.key_name()),
                "{} leaked into usage page {} set {}",
                entry.key_name(),
                table.page(),
                table.set()
            );
        }
    }

    let keyboard = tables
        .get(UsagePage::KeyboardKeypad, ScanCodeSet::Set2)
        .unwrap();
    for id in [0xA5, 0xB0, 0xE8] {
        assert!(keyboard.get(id).is_none(), "0x{id:02X}");
    }
    let desktop = tables
        .get(UsagePage::GenericDesktop, ScanCodeSet::Set1)
        .unwrap();
    assert!(desktop.get(0x84).is_none());
}

#[test]
fn pause_wins_over_its_break_alias() {
    let tables = compile_fixture();

    for set in ScanCodeSet::ALL {
        let table = tables.get(UsagePage::KeyboardKeypad, set).unwrap();
        assert_eq!(table.iter().filter(|(id, _)| *id == 0x48).count(), 1);

        let entry = table.entry(0x48).unwrap();
        assert_eq!(entry.key_name(), "Pause");
        assert_eq!(entry.line(), 9);
        assert!(std::ptr::eq(entry.pair().break_code(), &NONE));
    }

    let set1 = tables
        .get(UsagePage::KeyboardKeypad, ScanCodeSet::Set1)
        .unwrap();
    assert_eq!(
        set1.get(0x48).unwrap().make_code().bytes(),
        &[0xE1, 0x1D, 0x45, 0xE1, 0x9D, 0xC5]
    );
}

#[test]
fn page_without_keys_yields_empty_tables() {
    let tables = compile_rows(&[
        "01\t84\tRESERVED\tUNASSIGNED\tUNASSIGNED\tUNASSIGNED\tUNASSIGNED",
        "07\t04\ta A\t1E\t9E\t1C\tF0 1C",
    ])
    .unwrap();

    for set in ScanCodeSet::ALL {
        assert!(tables
            .get(UsagePage::GenericDesktop, set)
            .unwrap()
            .is_empty());
        assert!(tables.get(UsagePage::Consumer, set).unwrap().is_empty());
        assert_eq!(tables.get(UsagePage::KeyboardKeypad, set).unwrap().len(), 1);
    }
}

#[test]
fn duplicate_usage_id_is_rejected() {
    let err = compile_rows(&[
        "07\t04\ta A\t1E\t9E\t1C\tF0 1C",
        "07\t4\tAlso A\t1E\t9E\t1C\tF0 1C",
    ])
    .unwrap_err();

    match err {
        TableError::DuplicateKey {
            row,
            page,
            set,
            first_line,
        } => {
            assert_eq!(row.line, 3);
            assert_eq!(row.usage_id, "4");
            assert_eq!(page, UsagePage::KeyboardKeypad);
            assert_eq!(set, ScanCodeSet::Set1);
            assert_eq!(first_line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn same_usage_id_on_different_pages_is_fine() {
    let tables = compile_rows(&[
        "01\t81\tSystem Power\tE0 5E\tE0 DE\tE0 37\tE0 F0 37",
        "07\t81\tKeyboard Volume Dn\tUNASSIGNED\tUNASSIGNED\tUNASSIGNED\tUNASSIGNED",
    ])
    .unwrap();
    assert!(tables
        .get(UsagePage::GenericDesktop, ScanCodeSet::Set1)
        .unwrap()
        .get(0x81)
        .is_some());
    assert!(tables
        .get(UsagePage::KeyboardKeypad, ScanCodeSet::Set1)
        .unwrap()
        .get(0x81)
        .is_some());
}

#[test]
fn malformed_fields_name_the_row_and_column() {
    let err = compile_rows(&["07\t04\ta A\t1E\t9E\t1C\tF0 1G"]).unwrap_err();
    let msg = err.to_string();
    match &err {
        TableError::MalformedInput { row, field, value, .. } => {
            assert_eq!(row.line, 2);
            assert_eq!(row.usage_page, "07");
            assert_eq!(row.usage_id, "04");
            assert_eq!(*field, "PS/2 Set 2 Break");
            assert_eq!(value, "F0 1G");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(msg.contains("line 2"), "{msg}");
    assert!(msg.contains("PS/2 Set 2 Break"), "{msg}");

    let err = compile_rows(&["07\tZZ\tBogus\t1E\t9E\t1C\tF0 1C"]).unwrap_err();
    assert!(
        matches!(&err, TableError::MalformedInput { field: "HID Usage ID", .. }),
        "{err}"
    );

    let err = compile_rows(&[
        "07\t04\ta A\t1E\t9E\t1C\tF0 1C",
        "07\t100\tBogus\t1E\t9E\t1C\tF0 1C",
    ])
    .unwrap_err();
    assert!(
        matches!(&err, TableError::MalformedInput { field: "HID Usage ID", .. }),
        "{err}"
    );
    let row = err.row().unwrap();
    assert_eq!(row.line, 3);
    assert_eq!(row.usage_id, "100");
}

#[test]
fn file_level_errors_have_no_row() {
    let err = SourceTable::parse("HID Usage Page\tHID Usage ID\n").unwrap_err();
    assert!(matches!(err, TableError::MissingColumn { .. }), "{err}");
    assert!(err.row().is_none());
}

#[test]
fn rows_of_other_usage_pages_are_skipped() {
    // Vendor-defined and other 16-bit pages, and page text that is not the exact label of a
    // configured page, never reach a table and never fail the run.
    let tables = compile_rows(&[
        "07\t04\ta A\t1E\t9E\t1C\tF0 1C",
        "FF00\t01\tVendor Key\tn/a\tn/a\tn/a\tn/a",
        "0100\t01\tOther Page\t??\t??\t??\t??",
        "7\t05\tb B\t30\tB0\t32\tF0 32",
        "x7\t06\tc C\t2E\tAE\t21\tF0 21",
    ])
    .unwrap();

    for set in ScanCodeSet::ALL {
        let table = tables.get(UsagePage::KeyboardKeypad, set).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get(0x04).is_some());
        assert!(table.get(0x05).is_none());
    }
    assert!(tables
        .tables()
        .iter()
        .filter(|t| t.page() != UsagePage::KeyboardKeypad)
        .all(|t| t.is_empty()));
}

#[test]
fn unknown_markers_are_rejected() {
    let err = compile_rows(&["07\t04\ta A\tnone\t9E\t1C\tF0 1C"]).unwrap_err();
    match err {
        TableError::UnknownMarker { row, field, value } => {
            assert_eq!(row.line, 2);
            assert_eq!(field, "PS/2 Set 1 Make");
            assert_eq!(value, "none");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = compile_rows(&["07\t04\ta A\t1E\t\t1C\tF0 1C"]).unwrap_err();
    assert!(
        matches!(&err, TableError::UnknownMarker { field: "PS/2 Set 1 Break", .. }),
        "{err}"
    );
}

#[test]
fn only_selected_rows_are_decoded() {
    // Filtered rows and rows of pages that are not configured may carry codes that would not
    // decode.
    let tables = compile_rows(&[
        "07\tA5\tRESERVED\t??\t??\t??\t??",
        "0D\t30\tTip Pressure\tn/a\tn/a\tn/a\tn/a",
        "07\t04\ta A\t1E\t9E\t1C\tF0 1C",
    ])
    .unwrap();
    assert_eq!(
        tables
            .get(UsagePage::KeyboardKeypad, ScanCodeSet::Set1)
            .unwrap()
            .len(),
        1
    );

    // Only the configured set's columns are decoded.
    let source = SourceTable::parse(&format!("{HEADER}\n07\t04\ta A\t1E\t9E\tbad\tbad\n")).unwrap();
    let only_set1 = [Combination::new(UsagePage::KeyboardKeypad, ScanCodeSet::Set1)];
    let tables = compile(&source, &only_set1).unwrap();
    assert_eq!(tables.tables().len(), 1);
    assert!(compile(&source, &DEFAULT_COMBINATIONS).is_err());
}

#[test]
fn repeated_combination_is_compiled_once() {
    let source = SourceTable::load(&testdata("minimal.tsv")).unwrap();
    let combo = Combination::new(UsagePage::KeyboardKeypad, ScanCodeSet::Set2);
    let tables = compile(&source, &[combo, combo]).unwrap();
    assert_eq!(tables.tables().len(), 1);
}

#[test]
fn generation_is_deterministic() {
    let opts = RenderOptions::default();
    let first = generate(&shipped_dataset(), &DEFAULT_COMBINATIONS, &opts).unwrap();
    let second = generate(&shipped_dataset(), &DEFAULT_COMBINATIONS, &opts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn shipped_dataset_compiles() {
    let source = SourceTable::load(&shipped_dataset()).unwrap();
    let tables = compile(&source, &DEFAULT_COMBINATIONS).unwrap();

    let counts: Vec<usize> = tables.tables().iter().map(|t| t.len()).collect();
    assert_eq!(counts, vec![3, 3, 173, 173, 24, 24]);
}

#[test]
fn missing_dataset_is_an_io_error() {
    let err = SourceTable::load(&testdata("does-not-exist.tsv")).unwrap_err();
    assert!(matches!(err, TableError::Io { .. }), "{err}");
    assert!(err.to_string().contains("does-not-exist.tsv"));
}

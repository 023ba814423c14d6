use fv_core::{
  classify, infer, to_csv, to_indented_json, EscapeStrategy, FileKind, SchemaError, ViewerEngine,
  ViewerError, ViewerOptions,
};
use serde_json::json;

fn engine() -> ViewerEngine {
  ViewerEngine::new(ViewerOptions {
    default_page_size: 2,
    default_visible_fields: 5,
    ..ViewerOptions::default()
  })
}

#[test]
fn classify_by_extension_case_insensitive() {
  assert_eq!(classify("data.json"), FileKind::Json);
  assert_eq!(classify("data.JSON"), FileKind::Json);
  assert_eq!(classify("report.XLSX"), FileKind::Tabular);
  assert_eq!(classify("report.xls"), FileKind::Tabular);
  assert_eq!(classify("table.csv"), FileKind::Tabular);
  assert_eq!(classify("notes.txt"), FileKind::Other);
  assert_eq!(classify("no_extension"), FileKind::Other);
  assert_eq!(classify("trailing."), FileKind::Other);
}

#[test]
fn infer_unions_keys_and_keeps_order() {
  let v = json!([{"a":1,"b":"x"},{"a":2,"c":true}]);
  let s = infer(&v).unwrap();
  assert_eq!(s.fields, vec!["a", "b", "c"]);
  assert_eq!(s.rows.len(), 2);
  assert_eq!(s.rows[0].original_index, 0);
  assert_eq!(s.rows[0].cells.get("a"), Some(&json!(1)));
  assert_eq!(s.rows[0].cells.get("b"), Some(&json!("x")));
  assert!(!s.rows[0].cells.contains_key("c"));
  assert_eq!(s.rows[1].original_index, 1);
  assert_eq!(s.rows[1].cells.get("c"), Some(&json!(true)));
  assert!(!s.rows[1].cells.contains_key("b"));
}

#[test]
fn infer_wraps_non_object_elements_with_value_sentinel() {
  let v = json!([1, "two", [3]]);
  let s = infer(&v).unwrap();
  assert_eq!(s.fields, vec!["value"]);
  assert_eq!(s.rows[1].cells.get("value"), Some(&json!("two")));
  assert_eq!(s.rows[2].cells.get("value"), Some(&json!([3])));
}

#[test]
fn infer_rejects_non_array_and_empty_array() {
  assert_eq!(infer(&json!(42)).unwrap_err(), SchemaError::NotAnArray);
  assert_eq!(infer(&json!({"a":1})).unwrap_err(), SchemaError::NotAnArray);
  assert_eq!(infer(&json!([])).unwrap_err(), SchemaError::EmptyArray);
}

#[test]
fn to_csv_quote_all_matches_expected_bytes() {
  let v = json!([{"a":1,"b":"x"},{"a":2,"c":true}]);
  let s = infer(&v).unwrap();
  let fields = vec!["a".to_string(), "b".to_string()];
  let out = String::from_utf8(to_csv(&s.rows, &fields, EscapeStrategy::QuoteAll)).unwrap();
  assert_eq!(out, "\"a\",\"b\"\n\"1\",\"x\"\n\"2\",\"\"");
  assert_eq!(out.lines().count(), s.rows.len() + 1);
}

#[test]
fn to_csv_replace_commas_is_lossy_not_quoted() {
  let v = json!([{"a":"x,y","b":null,"c":{"k":1,"l":2},"d":[1,2]}]);
  let s = infer(&v).unwrap();
  let fields = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
  let out = String::from_utf8(to_csv(&s.rows, &fields, EscapeStrategy::ReplaceCommas)).unwrap();
  // Commas in scalar text become full-width; null renders empty; object and
  // array cells keep their JSON serialization verbatim, commas included.
  assert_eq!(out, "a,b,c,d\nx，y,,{\"k\":1,\"l\":2},[1,2]");
}

#[test]
fn ingest_json_makes_file_current_and_list_view_works() {
  let eng = engine();
  let outcome = eng.ingest("people.json", br#"[{"a":1,"b":"x"},{"a":2,"c":true}]"#, 0);
  assert!(outcome.parse_error.is_none());
  assert_eq!(outcome.file.kind, FileKind::Json);

  let current = eng.current_file().unwrap();
  assert_eq!(current.id, outcome.file.id);

  let lv = eng.list_view(&outcome.file.id).unwrap();
  assert_eq!(lv.schema.fields, vec!["a", "b", "c"]);
  assert_eq!(lv.default_fields, vec!["a", "b", "c"]);
}

#[test]
fn default_visible_fields_cap_at_five() {
  let eng = engine();
  let outcome = eng.ingest(
    "wide.json",
    br#"[{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7}]"#,
    0,
  );
  let lv = eng.list_view(&outcome.file.id).unwrap();
  assert_eq!(lv.schema.fields.len(), 7);
  assert_eq!(lv.default_fields, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn list_page_cursor_no_dup_no_drop() {
  let eng = engine();
  let outcome = eng.ingest("rows.json", br#"[{"x":1},{"x":2},{"x":3}]"#, 0);
  let id = outcome.file.id;

  let p1 = eng.list_page(&id, None, 2).unwrap();
  assert_eq!(p1.rows.len(), 2);
  assert_eq!(p1.rows[0].original_index, 0);
  assert_eq!(p1.rows[1].original_index, 1);
  assert!(!p1.reached_eof);

  let cursor = p1.next_cursor.unwrap();
  let p2 = eng.list_page(&id, Some(&cursor), 2).unwrap();
  assert_eq!(p2.rows.len(), 1);
  assert_eq!(p2.rows[0].original_index, 2);
  assert!(p2.reached_eof);
  assert!(p2.next_cursor.is_none());
}

#[test]
fn list_page_rejects_garbage_cursor() {
  let eng = engine();
  let outcome = eng.ingest("rows.json", br#"[{"x":1}]"#, 0);
  let err = eng.list_page(&outcome.file.id, Some("not-a-cursor"), 2).unwrap_err();
  assert!(matches!(err, ViewerError::BadCursor(_)));
}

#[test]
fn malformed_json_is_cataloged_without_content() {
  let eng = engine();
  let outcome = eng.ingest("broken.json", b"{not json", 0);
  assert!(outcome.parse_error.is_some());
  assert!(outcome.file.content.is_none());

  // Still listed and removable.
  assert_eq!(eng.list_files().len(), 1);
  let err = eng.tree_json(&outcome.file.id).unwrap_err();
  assert!(matches!(err, ViewerError::NoContent(_)));
  eng.remove_file(&outcome.file.id).unwrap();
  assert!(eng.list_files().is_empty());
}

#[test]
fn tree_json_round_trips_and_matches_export() {
  let eng = engine();
  let outcome = eng.ingest("doc.json", br#"{"name":"demo","items":[1,2,3]}"#, 0);
  let id = outcome.file.id;

  let text = eng.tree_json(&id).unwrap();
  let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
  assert_eq!(reparsed, json!({"name":"demo","items":[1,2,3]}));
  // 2-space indentation.
  assert!(text.contains("\n  \"name\""));

  let export = eng.export_json(&id).unwrap();
  assert_eq!(export.text, text);
  assert_eq!(export.file_name, "doc.json");
  assert_eq!(export.mime, "application/json");
}

#[test]
fn indented_json_is_stable_across_call_sites() {
  let v = json!({"a":[1,{"b":null}]});
  assert_eq!(to_indented_json(&v), to_indented_json(&v));
}

#[test]
fn export_list_csv_uses_replace_commas_and_derived_name() {
  let eng = engine();
  let outcome = eng.ingest("sales.json", br#"[{"a":"one,two","b":3}]"#, 0);
  let export = eng
    .export_list_csv(&outcome.file.id, Some(vec!["a".into(), "b".into()]))
    .unwrap();
  assert_eq!(export.file_name, "sales_list.csv");
  assert_eq!(export.mime, "text/csv; charset=utf-8");
  assert_eq!(String::from_utf8(export.bytes).unwrap(), "a,b\none，two,3");
}

#[test]
fn export_list_csv_rejects_unknown_or_empty_fields() {
  let eng = engine();
  let outcome = eng.ingest("rows.json", br#"[{"x":1}]"#, 0);
  let err = eng
    .export_list_csv(&outcome.file.id, Some(vec!["nope".into()]))
    .unwrap_err();
  assert!(matches!(err, ViewerError::InvalidArg(_)));
  let err = eng.export_list_csv(&outcome.file.id, Some(vec![])).unwrap_err();
  assert!(matches!(err, ViewerError::InvalidArg(_)));
}

#[test]
fn clipboard_projection_omits_absent_fields() {
  let eng = engine();
  let outcome = eng.ingest("mixed.json", br#"[{"a":1,"b":"x"},{"a":2,"c":true}]"#, 0);
  let text = eng
    .clipboard_list_json(&outcome.file.id, Some(vec!["a".into(), "b".into()]))
    .unwrap();
  let v: serde_json::Value = serde_json::from_str(&text).unwrap();
  assert_eq!(v, json!([{"a":1,"b":"x"},{"a":2}]));
}

#[test]
fn csv_sheet_view_parses_quotes_headers_and_bom() {
  let eng = engine();
  let text = "\u{feff}id,,note\n1,a,\"line1\nline2\"\n2,b,\"say \"\"hi\"\"\"\n";
  let outcome = eng.ingest("people.csv", text.as_bytes(), 0);
  assert_eq!(outcome.file.kind, FileKind::Tabular);

  let data = eng.sheet_view(&outcome.file.id).unwrap();
  assert_eq!(data.sheets.len(), 1);
  let sheet = &data.sheets[0];
  assert_eq!(sheet.name, "people");
  assert_eq!(sheet.headers, vec!["id", "col_1", "note"]);
  assert_eq!(sheet.rows.len(), 2);
  assert_eq!(sheet.rows[0], vec!["1", "a", "line1\nline2"]);
  assert_eq!(sheet.rows[1], vec!["2", "b", "say \"hi\""]);
}

#[test]
fn export_sheet_csv_quotes_all_cells_with_section_header() {
  let eng = engine();
  let outcome = eng.ingest("people.csv", b"id,name\n1,Alice\n2,Bob\n", 0);
  let export = eng.export_sheet_csv(&outcome.file.id).unwrap();
  assert_eq!(export.file_name, "people.csv");
  assert_eq!(
    String::from_utf8(export.bytes).unwrap(),
    "--- people ---\n\"id\",\"name\"\n\"1\",\"Alice\"\n\"2\",\"Bob\""
  );
}

#[test]
fn export_sheet_csv_pads_ragged_rows_to_header_width() {
  let eng = engine();
  let outcome = eng.ingest("ragged.csv", b"id,name\n1\n2,Bob\n", 0);
  let export = eng.export_sheet_csv(&outcome.file.id).unwrap();
  assert_eq!(
    String::from_utf8(export.bytes).unwrap(),
    "--- ragged ---\n\"id\",\"name\"\n\"1\",\"\"\n\"2\",\"Bob\""
  );
}

#[test]
fn binary_workbooks_are_cataloged_but_not_decodable() {
  let eng = engine();
  let outcome = eng.ingest("report.xlsx", &[0x50, 0x4b, 0x03, 0x04], 0);
  assert_eq!(outcome.file.kind, FileKind::Tabular);
  let err = eng.sheet_view(&outcome.file.id).unwrap_err();
  assert!(matches!(err, ViewerError::UnsupportedWorkbook(_)));
}

#[test]
fn remove_current_file_clears_selection() {
  let eng = engine();
  let a = eng.ingest("a.json", br#"[{"x":1}]"#, 0);
  let b = eng.ingest("b.json", br#"[{"y":2}]"#, 0);
  assert_eq!(eng.current_file().unwrap().id, b.file.id);

  eng.remove_file(&b.file.id).unwrap();
  assert!(eng.current_file().is_none());
  assert_eq!(eng.list_files().len(), 1);

  eng.set_current(&a.file.id).unwrap();
  assert_eq!(eng.current_file().unwrap().id, a.file.id);
  assert!(matches!(
    eng.set_current("missing"),
    Err(ViewerError::FileNotFound(_))
  ));
}

#[test]
fn visible_fields_default_then_user_selection() {
  let eng = engine();
  let outcome = eng.ingest("rows.json", br#"[{"a":1,"b":2}]"#, 0);
  let id = outcome.file.id;

  assert_eq!(eng.visible_fields(&id).unwrap(), vec!["a", "b"]);
  eng.set_visible_fields(&id, vec!["b".into()]).unwrap();
  assert_eq!(eng.visible_fields(&id).unwrap(), vec!["b"]);

  let err = eng.set_visible_fields(&id, vec!["zzz".into()]).unwrap_err();
  assert!(matches!(err, ViewerError::InvalidArg(_)));
}

#[test]
fn open_path_reads_from_disk_and_surfaces_read_errors() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("data.json");
  std::fs::write(&path, br#"[{"k":"v"}]"#).unwrap();

  let eng = engine();
  let outcome = eng.open_path(&path).unwrap();
  assert_eq!(outcome.file.name, "data.json");
  assert_eq!(outcome.file.kind, FileKind::Json);
  assert!(outcome.file.last_modified_ms > 0);

  let err = eng.open_path(dir.path().join("missing.json")).unwrap_err();
  assert!(matches!(err, ViewerError::Read(_)));
}

#[test]
fn list_view_errors_for_non_array_and_empty_array() {
  let eng = engine();
  let obj = eng.ingest("obj.json", br#"{"a":1}"#, 0);
  let err = eng.list_view(&obj.file.id).unwrap_err();
  assert!(matches!(err, ViewerError::Schema(SchemaError::NotAnArray)));

  let empty = eng.ingest("empty.json", b"[]", 0);
  let err = eng.list_view(&empty.file.id).unwrap_err();
  assert!(matches!(err, ViewerError::Schema(SchemaError::EmptyArray)));
}

#[test]
fn prefs_toggles() {
  let eng = engine();
  let prefs = eng.prefs();
  assert_eq!(prefs.theme, fv_core::Theme::Light);
  assert!(!prefs.sidebar_collapsed);

  assert!(eng.toggle_sidebar());
  eng.set_theme(fv_core::Theme::Dark);
  assert!(eng.toggle_fullscreen());

  let prefs = eng.prefs();
  assert_eq!(prefs.theme, fv_core::Theme::Dark);
  assert!(prefs.sidebar_collapsed);
  assert!(prefs.fullscreen);
}

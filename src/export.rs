use serde_json::{Map, Value};

use crate::{
  formats::file_stem,
  models::{EscapeStrategy, Row, SheetData},
};

/// Mime tags the shell attaches to download blobs.
pub const CSV_MIME: &str = "text/csv; charset=utf-8";
pub const JSON_MIME: &str = "application/json";

/// Pretty-print with 2-space indentation. Both the clipboard-copy and the
/// file-download affordances go through this one function, which keeps the
/// two byte-identical for the same value.
pub fn to_indented_json(value: &Value) -> String {
  serde_json::to_string_pretty(value).expect("json value serialize")
}

/// Render rows to CSV text (UTF-8 bytes).
///
/// The first line is `fields` joined by `,`; each following line renders the
/// fields in order for one row. Absent and null cells render empty; object
/// and array cells render as their compact JSON text; other scalars render
/// as their display string. `strategy` picks the cell escaping policy:
/// `QuoteAll` quotes every cell (headers included), `ReplaceCommas` swaps
/// commas only in scalar cell text — container JSON and header cells pass
/// through verbatim, matching the list call site.
pub fn to_csv(rows: &[Row], fields: &[String], strategy: EscapeStrategy) -> Vec<u8> {
  let mut lines = Vec::with_capacity(rows.len() + 1);

  let header = fields
    .iter()
    .map(|f| match strategy {
      EscapeStrategy::ReplaceCommas => f.clone(),
      EscapeStrategy::QuoteAll => format!("\"{f}\""),
    })
    .collect::<Vec<_>>()
    .join(",");
  lines.push(header);

  for row in rows {
    let line = fields
      .iter()
      .map(|f| render_cell(row.cells.get(f), strategy))
      .collect::<Vec<_>>()
      .join(",");
    lines.push(line);
  }

  lines.join("\n").into_bytes()
}

/// Render all sheets of a tabular file to one CSV text, each sheet under a
/// `--- <name> ---` section header with a blank line between sheets. Cells
/// are quoted verbatim (the sheet call site's escaping policy).
pub fn sheet_to_csv(data: &SheetData) -> Vec<u8> {
  let sections = data
    .sheets
    .iter()
    .map(|sheet| {
      let width = sheet.headers.len();
      let mut lines = Vec::with_capacity(sheet.rows.len() + 2);
      lines.push(format!("--- {} ---", sheet.name));
      lines.push(quote_all_line(&sheet.headers, width));
      for row in &sheet.rows {
        lines.push(quote_all_line(row, width));
      }
      lines.join("\n")
    })
    .collect::<Vec<_>>();

  sections.join("\n\n").into_bytes()
}

/// Pretty JSON of rows projected onto the selected fields, for the list
/// view's copy-to-clipboard action. Absent cells are omitted from the
/// projected objects rather than emitted as null.
pub fn clipboard_json(rows: &[Row], fields: &[String]) -> String {
  let projected: Vec<Value> = rows
    .iter()
    .map(|row| {
      let mut obj = Map::new();
      for f in fields {
        if let Some(v) = row.cells.get(f) {
          obj.insert(f.clone(), v.clone());
        }
      }
      Value::Object(obj)
    })
    .collect();
  to_indented_json(&Value::Array(projected))
}

/// Download name for the list-view CSV: extension replaced, `_list` suffix.
pub fn list_csv_file_name(original_name: &str) -> String {
  format!("{}_list.csv", file_stem(original_name))
}

/// Download name for the sheet-view CSV: extension replaced.
pub fn sheet_csv_file_name(original_name: &str) -> String {
  format!("{}.csv", file_stem(original_name))
}

/// Quote every cell verbatim, padding short rows out to the header width so
/// each line carries the same number of cells.
fn quote_all_line(cells: &[String], width: usize) -> String {
  let mut quoted: Vec<String> = cells.iter().map(|c| format!("\"{c}\"")).collect();
  while quoted.len() < width {
    quoted.push("\"\"".to_string());
  }
  quoted.join(",")
}

fn cell_export_text(value: Option<&Value>) -> String {
  match value {
    None | Some(Value::Null) => String::new(),
    Some(v @ (Value::Object(_) | Value::Array(_))) => {
      serde_json::to_string(v).expect("json value serialize")
    }
    Some(Value::String(s)) => s.clone(),
    Some(Value::Bool(b)) => b.to_string(),
    Some(Value::Number(n)) => n.to_string(),
  }
}

fn render_cell(value: Option<&Value>, strategy: EscapeStrategy) -> String {
  let text = cell_export_text(value);
  match strategy {
    EscapeStrategy::QuoteAll => format!("\"{text}\""),
    // Deliberately lossy: avoids delimiter collisions without quoting. The
    // replacement only touches scalar text; container cells keep their JSON
    // serialization verbatim, commas and all.
    EscapeStrategy::ReplaceCommas => match value {
      Some(Value::Object(_) | Value::Array(_)) => text,
      _ => text.replace(',', "，"),
    },
  }
}

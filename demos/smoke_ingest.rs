use std::path::PathBuf;

use fv_core::{FileKind, ViewerEngine, ViewerOptions};

fn main() -> Result<(), String> {
  let path = std::env::args()
    .nth(1)
    .ok_or_else(|| "usage: cargo run --example smoke_ingest -- <path-to-file>".to_string())?;
  let path = PathBuf::from(path);

  let eng = ViewerEngine::new(ViewerOptions {
    default_page_size: 5,
    ..ViewerOptions::default()
  });

  let outcome = eng.open_path(&path).map_err(|e| e.to_string())?;
  println!("name={}", outcome.file.name);
  println!("kind={:?}", outcome.file.kind);
  println!("bytes={}", outcome.file.byte_size);
  if let Some(err) = &outcome.parse_error {
    println!("parse_error={err}");
    return Ok(());
  }

  match outcome.file.kind {
    FileKind::Json => {
      match eng.list_view(&outcome.file.id) {
        Ok(lv) => {
          println!("fields={:?}", lv.schema.fields);
          println!("rows={}", lv.schema.rows.len());
          let p1 = eng.list_page(&outcome.file.id, None, 5).map_err(|e| e.to_string())?;
          for row in &p1.rows {
            let cells: Vec<String> = lv
              .default_fields
              .iter()
              .map(|f| eng.cell_preview(row.cells.get(f)))
              .collect();
            println!("row[{}]: {}", row.original_index, cells.join(" | "));
          }
        }
        Err(e) => {
          // Not a list-shaped document; fall back to the tree text.
          println!("list view unavailable ({e}); tree follows");
          println!("{}", eng.tree_json(&outcome.file.id).map_err(|e| e.to_string())?);
        }
      }
    }
    FileKind::Tabular => {
      let data = eng.sheet_view(&outcome.file.id).map_err(|e| e.to_string())?;
      for sheet in &data.sheets {
        println!("sheet={} headers={:?} rows={}", sheet.name, sheet.headers, sheet.rows.len());
      }
    }
    FileKind::Other => println!("no viewer for this kind"),
  }

  Ok(())
}

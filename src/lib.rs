mod cursor;
mod display;
mod engine;
mod export;
mod formats;
mod models;
mod schema;
mod state;

pub use crate::engine::{ViewerEngine, ViewerOptions};
pub use crate::models::{
  CsvExport, DisplayPrefs, EscapeStrategy, FileKind, IngestOutcome, InferredSchema, JsonExport,
  ListView, LoadedFile, Row, RowPage, Sheet, SheetData, Theme,
};
pub use crate::schema::{default_visible_fields, infer, SchemaError, VALUE_FIELD};
pub use crate::export::{
  clipboard_json, list_csv_file_name, sheet_csv_file_name, sheet_to_csv, to_csv, to_indented_json,
  CSV_MIME, JSON_MIME,
};
pub use crate::display::{cell_text, truncate_chars};
pub use crate::formats::classify;

pub use crate::engine::ViewerError;

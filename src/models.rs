use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
  Json,
  Tabular,
  Other,
}

/// One entry of the session file catalog.
///
/// `content` is the parsed JSON value for `Json` files; `raw` is the decoded
/// text for `Tabular` (CSV) files. A JSON file whose parse failed is still
/// cataloged, with `content: None`, so it stays visible and removable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedFile {
  pub id: String,
  pub name: String,
  pub kind: FileKind,
  pub byte_size: u64,
  pub last_modified_ms: i64,
  pub content: Option<Value>,
  pub raw: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
  pub file: LoadedFile,
  /// Present when the upload was classified as JSON but did not parse.
  pub parse_error: Option<String>,
}

/// One record of an inferred tabular schema. Fields absent from the source
/// object are simply missing from `cells` (absent, not null).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
  pub original_index: u64,
  pub cells: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferredSchema {
  /// Sorted union of keys across all rows.
  pub fields: Vec<String>,
  /// Rows in input order, one per source element.
  pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListView {
  pub schema: InferredSchema,
  /// Initial visible-field selection: the first min(5, |fields|) fields.
  pub default_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowPage {
  pub rows: Vec<Row>,
  pub next_cursor: Option<String>,
  pub reached_eof: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
  pub name: String,
  pub headers: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetData {
  pub file_name: String,
  pub sheets: Vec<Sheet>,
}

/// CSV cell escaping policy. The list and sheet export call sites use
/// different policies on purpose (kept as found, see DESIGN.md).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EscapeStrategy {
  /// Replace every literal `,` in scalar cell text with a full-width comma
  /// (container cells keep their JSON serialization verbatim).
  ReplaceCommas,
  /// Wrap every cell in double quotes verbatim.
  QuoteAll,
}

/// A downloadable CSV artifact (filename + mime + bytes), ready to hand to
/// the shell's save/blob machinery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvExport {
  pub file_name: String,
  pub mime: String,
  pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonExport {
  pub file_name: String,
  pub mime: String,
  pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
  Light,
  Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayPrefs {
  pub theme: Theme,
  pub sidebar_collapsed: bool,
  pub fullscreen: bool,
}

impl Default for DisplayPrefs {
  fn default() -> Self {
    Self {
      theme: Theme::Light,
      sidebar_collapsed: false,
      fullscreen: false,
    }
  }
}

use std::{
  collections::HashMap,
  path::Path,
  sync::Arc,
  time::{SystemTime, UNIX_EPOCH},
};

use log::{info, warn};
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  cursor::{decode_cursor, encode_cursor, Cursor},
  display, export, formats,
  models::{
    CsvExport, DisplayPrefs, EscapeStrategy, FileKind, IngestOutcome, InferredSchema, JsonExport,
    ListView, LoadedFile, RowPage, SheetData, Theme,
  },
  schema::{self, SchemaError},
  state::ViewState,
};

#[derive(Debug, Error)]
pub enum ViewerError {
  #[error("read error: {0}")]
  Read(#[from] std::io::Error),
  #[error("file not found: {0}")]
  FileNotFound(String),
  #[error("parse error: {0}")]
  Parse(String),
  #[error("no content loaded for file: {0}")]
  NoContent(String),
  #[error(transparent)]
  Schema(#[from] SchemaError),
  #[error("unsupported kind for this view: {0:?}")]
  UnsupportedKind(FileKind),
  #[error("cannot decode workbook: {0}")]
  UnsupportedWorkbook(String),
  #[error("bad cursor token: {0}")]
  BadCursor(String),
  #[error("invalid argument: {0}")]
  InvalidArg(String),
}

#[derive(Debug, Clone)]
pub struct ViewerOptions {
  pub default_page_size: usize,
  /// How many fields the list view shows before the user picks their own.
  pub default_visible_fields: usize,
  /// Advertised upload cap for the shell's upload hint. The core itself
  /// accepts whatever bytes it is handed.
  pub max_upload_bytes: u64,
  /// Char cap for cell preview text (`cell_preview`).
  pub cell_preview_max_chars: usize,
}

impl Default for ViewerOptions {
  fn default() -> Self {
    Self {
      default_page_size: 20,
      default_visible_fields: 5,
      max_upload_bytes: 10 * 1024 * 1024,
      cell_preview_max_chars: 50,
    }
  }
}

/// The file-viewer core. Cloneable; all clones share one session-scoped
/// view state and schema cache, so a shell can keep one engine in managed
/// state and call it from every command handler.
#[derive(Clone)]
pub struct ViewerEngine {
  options: ViewerOptions,
  state: Arc<Mutex<ViewState>>,
  /// Inferred schemas by file id. Content is immutable once cataloged, so
  /// a cached schema never goes stale; entries die with their file.
  schemas: Arc<Mutex<HashMap<String, Arc<InferredSchema>>>>,
}

impl ViewerEngine {
  pub fn new(options: ViewerOptions) -> Self {
    Self {
      options,
      state: Arc::new(Mutex::new(ViewState::default())),
      schemas: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  pub fn options(&self) -> &ViewerOptions {
    &self.options
  }

  /// Shell API: ingest(name, bytes) -> IngestOutcome
  ///
  /// Classifies the upload, parses/decodes per kind, catalogs the file and
  /// makes it the current selection. A JSON upload that fails to parse is
  /// still cataloged (without content) and the diagnostic comes back in
  /// `parse_error`; the caller shows it as a terminal alert.
  pub fn ingest(&self, name: &str, bytes: &[u8], last_modified_ms: i64) -> IngestOutcome {
    let kind = formats::classify(name);

    let mut content: Option<Value> = None;
    let mut raw: Option<String> = None;
    let mut parse_error: Option<String> = None;

    match kind {
      FileKind::Json => match formats::json::load_bytes(bytes) {
        Ok(v) => content = Some(v),
        Err(e) => {
          warn!("json parse failed for {name}: {e}");
          parse_error = Some(e.to_string());
        }
      },
      FileKind::Tabular => {
        // Only text-based tabular uploads are decoded here; binary
        // workbooks stay opaque and fail later at sheet_view.
        if formats::is_csv_name(name) {
          raw = Some(String::from_utf8_lossy(bytes).to_string());
        }
      }
      FileKind::Other => {}
    }

    let file = LoadedFile {
      id: Uuid::new_v4().to_string(),
      name: name.to_string(),
      kind,
      byte_size: bytes.len() as u64,
      last_modified_ms,
      content,
      raw,
    };

    info!("ingested {name} ({} bytes) as {kind:?}", file.byte_size);

    let mut state = self.state.lock();
    state.upsert_file(file.clone());
    state.set_current(&file.id);

    IngestOutcome { file, parse_error }
  }

  /// Shell API: open_path(path) -> IngestOutcome
  ///
  /// Disk-backed variant of `ingest` for shells that hand over a path
  /// instead of bytes. A failed read surfaces once as `Read`; there is no
  /// retry, the user re-initiates the action.
  pub fn open_path(&self, path: impl AsRef<Path>) -> Result<IngestOutcome, ViewerError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let name = path
      .file_name()
      .and_then(|s| s.to_str())
      .unwrap_or_default()
      .to_string();
    let last_modified_ms = std::fs::metadata(path)
      .ok()
      .and_then(|m| m.modified().ok())
      .map(system_time_ms)
      .unwrap_or_else(now_ms);
    Ok(self.ingest(&name, &bytes, last_modified_ms))
  }

  pub fn list_files(&self) -> Vec<LoadedFile> {
    self.state.lock().list_files()
  }

  pub fn get_file(&self, id: &str) -> Result<LoadedFile, ViewerError> {
    self
      .state
      .lock()
      .get_file(id)
      .cloned()
      .ok_or_else(|| ViewerError::FileNotFound(id.to_string()))
  }

  pub fn set_current(&self, id: &str) -> Result<(), ViewerError> {
    if self.state.lock().set_current(id) {
      Ok(())
    } else {
      Err(ViewerError::FileNotFound(id.to_string()))
    }
  }

  pub fn current_file(&self) -> Option<LoadedFile> {
    self.state.lock().current_file().cloned()
  }

  pub fn remove_file(&self, id: &str) -> Result<(), ViewerError> {
    if !self.state.lock().remove_file(id) {
      return Err(ViewerError::FileNotFound(id.to_string()));
    }
    self.schemas.lock().remove(id);
    Ok(())
  }

  /// Shell API: tree_json(id) -> String
  ///
  /// Pretty-printed JSON of the full value: the tree view's source text and
  /// also the clipboard/download payload (one function, so the two are
  /// byte-identical).
  pub fn tree_json(&self, id: &str) -> Result<String, ViewerError> {
    let value = self.content_value(id)?;
    Ok(export::to_indented_json(&value))
  }

  /// Shell API: list_view(id) -> ListView
  pub fn list_view(&self, id: &str) -> Result<ListView, ViewerError> {
    let schema = self.schema_for(id)?;
    let default_fields =
      schema::default_visible_fields(&schema.fields, self.options.default_visible_fields);
    Ok(ListView {
      schema: (*schema).clone(),
      default_fields,
    })
  }

  /// Shell API: list_page(id, cursor, page_size) -> RowPage
  ///
  /// Pages the inferred rows with an opaque cursor token; `page_size = 0`
  /// means the configured default.
  pub fn list_page(
    &self,
    id: &str,
    cursor: Option<&str>,
    page_size: usize,
  ) -> Result<RowPage, ViewerError> {
    let schema = self.schema_for(id)?;
    let page_size = if page_size == 0 {
      self.options.default_page_size
    } else {
      page_size
    };

    let c = decode_cursor(cursor)?;
    let start = c.row as usize;
    if start > schema.rows.len() {
      return Err(ViewerError::BadCursor(format!(
        "row {} beyond row count {}",
        start,
        schema.rows.len()
      )));
    }

    let end = (start + page_size).min(schema.rows.len());
    let rows = schema.rows[start..end].to_vec();
    let reached_eof = end >= schema.rows.len();
    let next_cursor = if reached_eof {
      None
    } else {
      Some(encode_cursor(Cursor { row: end as u64 }))
    };

    Ok(RowPage {
      rows,
      next_cursor,
      reached_eof,
    })
  }

  /// Shell API: sheet_view(id) -> SheetData
  ///
  /// CSV text parses into a single sheet named after the file stem. Binary
  /// workbooks (`.xlsx`/`.xls`) are cataloged but not decodable here.
  pub fn sheet_view(&self, id: &str) -> Result<SheetData, ViewerError> {
    let file = self.get_file(id)?;
    if file.kind != FileKind::Tabular {
      return Err(ViewerError::UnsupportedKind(file.kind));
    }
    let raw = file
      .raw
      .as_deref()
      .ok_or_else(|| ViewerError::UnsupportedWorkbook(file.name.clone()))?;
    let sheet = formats::csv::parse_sheet(formats::file_stem(&file.name), raw);
    Ok(SheetData {
      file_name: file.name,
      sheets: vec![sheet],
    })
  }

  /// Currently visible fields for a file: the user's selection if one was
  /// made, otherwise the default for freshly opened JSON lists.
  pub fn visible_fields(&self, id: &str) -> Result<Vec<String>, ViewerError> {
    if let Some(fields) = self.state.lock().visible_fields(id) {
      return Ok(fields);
    }
    let file = self.get_file(id)?;
    if file.kind == FileKind::Json && file.content.is_some() {
      let schema = self.schema_for(id)?;
      return Ok(schema::default_visible_fields(
        &schema.fields,
        self.options.default_visible_fields,
      ));
    }
    Ok(vec![])
  }

  pub fn set_visible_fields(&self, id: &str, fields: Vec<String>) -> Result<(), ViewerError> {
    let schema = self.schema_for(id)?;
    for f in &fields {
      if !schema.fields.contains(f) {
        return Err(ViewerError::InvalidArg(format!("unknown field: {f}")));
      }
    }
    self.state.lock().set_visible_fields(id, fields);
    Ok(())
  }

  /// Shell API: export_list_csv(id, fields) -> CsvExport
  ///
  /// List-view call site: `ReplaceCommas` escaping, filename stem +
  /// `_list.csv`. `fields = None` exports the currently visible fields.
  pub fn export_list_csv(
    &self,
    id: &str,
    fields: Option<Vec<String>>,
  ) -> Result<CsvExport, ViewerError> {
    let file = self.get_file(id)?;
    let schema = self.schema_for(id)?;
    let fields = self.resolve_fields(id, &schema, fields)?;

    let bytes = export::to_csv(&schema.rows, &fields, EscapeStrategy::ReplaceCommas);
    info!("exported {} rows of {} as list csv", schema.rows.len(), file.name);
    Ok(CsvExport {
      file_name: export::list_csv_file_name(&file.name),
      mime: export::CSV_MIME.to_string(),
      bytes,
    })
  }

  /// Shell API: export_sheet_csv(id) -> CsvExport
  ///
  /// Sheet-view call site: `QuoteAll` escaping, all sheets concatenated
  /// under `--- name ---` section headers, filename stem + `.csv`.
  pub fn export_sheet_csv(&self, id: &str) -> Result<CsvExport, ViewerError> {
    let data = self.sheet_view(id)?;
    let bytes = export::sheet_to_csv(&data);
    info!("exported {} sheet(s) of {} as csv", data.sheets.len(), data.file_name);
    Ok(CsvExport {
      file_name: export::sheet_csv_file_name(&data.file_name),
      mime: export::CSV_MIME.to_string(),
      bytes,
    })
  }

  /// Shell API: export_json(id) -> JsonExport
  ///
  /// Pretty JSON of the full value, filename = the original upload name.
  pub fn export_json(&self, id: &str) -> Result<JsonExport, ViewerError> {
    let file = self.get_file(id)?;
    let text = self.tree_json(id)?;
    Ok(JsonExport {
      file_name: file.name,
      mime: export::JSON_MIME.to_string(),
      text,
    })
  }

  /// Shell API: clipboard_list_json(id, fields) -> String
  ///
  /// Pretty JSON of the rows projected onto the selected fields (absent
  /// fields omitted), for the list view's copy action.
  pub fn clipboard_list_json(
    &self,
    id: &str,
    fields: Option<Vec<String>>,
  ) -> Result<String, ViewerError> {
    let schema = self.schema_for(id)?;
    let fields = self.resolve_fields(id, &schema, fields)?;
    Ok(export::clipboard_json(&schema.rows, &fields))
  }

  /// Short display text for one cell, used by table renderers.
  pub fn cell_preview(&self, value: Option<&Value>) -> String {
    display::cell_text(value, self.options.cell_preview_max_chars)
  }

  pub fn prefs(&self) -> DisplayPrefs {
    self.state.lock().prefs()
  }

  pub fn set_theme(&self, theme: Theme) {
    self.state.lock().set_theme(theme);
  }

  pub fn toggle_sidebar(&self) -> bool {
    self.state.lock().toggle_sidebar()
  }

  pub fn set_sidebar_collapsed(&self, collapsed: bool) {
    self.state.lock().set_sidebar_collapsed(collapsed);
  }

  pub fn toggle_fullscreen(&self) -> bool {
    self.state.lock().toggle_fullscreen()
  }

  fn content_value(&self, id: &str) -> Result<Value, ViewerError> {
    let file = self.get_file(id)?;
    if file.kind != FileKind::Json {
      return Err(ViewerError::UnsupportedKind(file.kind));
    }
    file.content.ok_or(ViewerError::NoContent(file.name))
  }

  fn schema_for(&self, id: &str) -> Result<Arc<InferredSchema>, ViewerError> {
    if let Some(s) = self.schemas.lock().get(id) {
      return Ok(s.clone());
    }
    let value = self.content_value(id)?;
    let inferred = Arc::new(schema::infer(&value)?);
    self.schemas.lock().insert(id.to_string(), inferred.clone());
    Ok(inferred)
  }

  fn resolve_fields(
    &self,
    id: &str,
    schema: &InferredSchema,
    fields: Option<Vec<String>>,
  ) -> Result<Vec<String>, ViewerError> {
    let fields = match fields {
      Some(f) => f,
      None => match self.state.lock().visible_fields(id) {
        Some(f) => f,
        None => {
          schema::default_visible_fields(&schema.fields, self.options.default_visible_fields)
        }
      },
    };
    if fields.is_empty() {
      return Err(ViewerError::InvalidArg("no fields selected".into()));
    }
    for f in &fields {
      if !schema.fields.contains(f) {
        return Err(ViewerError::InvalidArg(format!("unknown field: {f}")));
      }
    }
    Ok(fields)
  }
}

fn now_ms() -> i64 {
  system_time_ms(SystemTime::now())
}

fn system_time_ms(t: SystemTime) -> i64 {
  t.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64
}

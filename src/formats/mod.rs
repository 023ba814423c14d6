use crate::models::FileKind;

/// Map an uploaded file *name* to the viewer kind that should handle it.
///
/// Only the lowercased extension after the final `.` matters; a name with no
/// extension is `Other`. Total: never fails.
pub fn classify(file_name: &str) -> FileKind {
  let ext = match file_name.rsplit_once('.') {
    Some((_, ext)) if !ext.is_empty() => ext.to_ascii_lowercase(),
    _ => return FileKind::Other,
  };
  match ext.as_str() {
    "json" => FileKind::Json,
    "xlsx" | "xls" | "csv" => FileKind::Tabular,
    _ => FileKind::Other,
  }
}

/// Whether a tabular upload is CSV text (as opposed to a binary workbook).
pub(crate) fn is_csv_name(file_name: &str) -> bool {
  matches!(file_name.rsplit_once('.'), Some((_, ext)) if ext.eq_ignore_ascii_case("csv"))
}

/// File name with its extension removed (the whole name if there is none).
pub(crate) fn file_stem(file_name: &str) -> &str {
  match file_name.rsplit_once('.') {
    Some((stem, _)) if !stem.is_empty() => stem,
    _ => file_name,
  }
}

pub(crate) mod csv;
pub(crate) mod json;

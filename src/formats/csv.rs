use crate::models::Sheet;

/// Parse decoded CSV text into a single sheet named after the file stem.
///
/// Quote handling follows the usual CSV conventions: `""` is an escaped
/// quote inside a quoted field, and newlines inside quoted fields belong to
/// the record. CRLF line endings are tolerated. An empty upload yields a
/// sheet with one generic header and no rows rather than nothing, so the
/// tab still renders.
pub(crate) fn parse_sheet(sheet_name: &str, text: &str) -> Sheet {
  let text = text.strip_prefix('\u{feff}').unwrap_or(text);
  let mut records = split_records(text);

  let headers = if records.is_empty() {
    vec!["col_0".to_string()]
  } else {
    normalize_headers(parse_csv_line(&records.remove(0)))
  };

  let rows: Vec<Vec<String>> = records.iter().map(|r| parse_csv_line(r)).collect();

  Sheet {
    name: sheet_name.to_string(),
    headers,
    rows,
  }
}

/// Normalize empty header cells to generic names so every column stays
/// addressable in the table view.
fn normalize_headers(mut headers: Vec<String>) -> Vec<String> {
  for (i, h) in headers.iter_mut().enumerate() {
    if h.trim().is_empty() {
      *h = format!("col_{i}");
    }
  }
  if headers.is_empty() {
    headers.push("col_0".to_string());
  }
  headers
}

/// Split text into CSV records, treating newlines inside quoted fields as
/// part of the record. Record terminators (LF / CRLF) are not included.
fn split_records(text: &str) -> Vec<String> {
  let mut records = Vec::new();
  let mut cur = String::new();
  let mut in_quotes = false;
  let mut chars = text.chars().peekable();

  while let Some(ch) = chars.next() {
    match ch {
      '"' => {
        if in_quotes && matches!(chars.peek(), Some('"')) {
          cur.push('"');
          cur.push('"');
          let _ = chars.next();
        } else {
          in_quotes = !in_quotes;
          cur.push('"');
        }
      }
      '\r' if !in_quotes && matches!(chars.peek(), Some('\n')) => {
        let _ = chars.next();
        records.push(std::mem::take(&mut cur));
      }
      '\n' if !in_quotes => {
        records.push(std::mem::take(&mut cur));
      }
      _ => cur.push(ch),
    }
  }
  if !cur.is_empty() {
    records.push(cur);
  }
  records
}

/// Single-record CSV field splitter: supports quotes and escaped quotes ("").
fn parse_csv_line(line: &str) -> Vec<String> {
  let mut out: Vec<String> = Vec::new();
  let mut cur = String::new();
  let mut in_quotes = false;
  let mut chars = line.chars().peekable();

  while let Some(ch) = chars.next() {
    match ch {
      '"' => {
        if in_quotes && matches!(chars.peek(), Some('"')) {
          cur.push('"');
          let _ = chars.next();
        } else {
          in_quotes = !in_quotes;
        }
      }
      ',' if !in_quotes => {
        out.push(cur);
        cur = String::new();
      }
      _ => cur.push(ch),
    }
  }
  out.push(cur);

  out
}

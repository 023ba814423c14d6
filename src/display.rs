use serde_json::Value;

/// Short text for one table cell, the way the list view renders values:
/// absent/null as a dash, containers as a size badge, scalars as their
/// display string truncated to `max_chars`.
pub fn cell_text(value: Option<&Value>, max_chars: usize) -> String {
  match value {
    None | Some(Value::Null) => "-".to_string(),
    Some(Value::Array(items)) => format!("array[{}]", items.len()),
    Some(Value::Object(_)) => "object".to_string(),
    Some(Value::Bool(b)) => b.to_string(),
    Some(Value::Number(n)) => n.to_string(),
    Some(Value::String(s)) => truncate_chars(s, max_chars),
  }
}

/// Char-based truncation with an ellipsis marker (never splits a char).
pub fn truncate_chars(s: &str, max: usize) -> String {
  if max == 0 {
    return String::new();
  }
  let mut out = String::new();
  for (i, ch) in s.chars().enumerate() {
    if i >= max {
      out.push('…');
      break;
    }
    out.push(ch);
  }
  out
}

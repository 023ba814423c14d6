use serde_json::Value;

use crate::engine::ViewerError;

/// Parse JSON text into a value. Strict: malformed input yields a
/// `Parse` error carrying the serde diagnostic (line/column included);
/// no partial value is ever returned.
pub(crate) fn load(text: &str) -> Result<Value, ViewerError> {
  serde_json::from_str(text).map_err(|e| ViewerError::Parse(e.to_string()))
}

/// Parse JSON from raw upload bytes. Invalid UTF-8 in a `.json` upload is
/// reported as a parse failure, same as malformed JSON.
pub(crate) fn load_bytes(bytes: &[u8]) -> Result<Value, ViewerError> {
  let text = std::str::from_utf8(bytes).map_err(|e| ViewerError::Parse(e.to_string()))?;
  load(text)
}

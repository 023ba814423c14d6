use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Row-paging position. Opaque to callers: it travels as a base64 token so
/// the shell can treat it as a black box between page requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct Cursor {
  pub row: u64,
}

pub(crate) fn encode_cursor(c: Cursor) -> String {
  let json = serde_json::to_vec(&c).expect("cursor serialize");
  base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json)
}

pub(crate) fn decode_cursor(token: Option<&str>) -> Result<Cursor, crate::engine::ViewerError> {
  match token {
    None => Ok(Cursor { row: 0 }),
    Some(t) if t.is_empty() => Ok(Cursor { row: 0 }),
    Some(t) => {
      let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(t)
        .map_err(|e| crate::engine::ViewerError::BadCursor(e.to_string()))?;
      let c: Cursor = serde_json::from_slice(&bytes)
        .map_err(|e| crate::engine::ViewerError::BadCursor(e.to_string()))?;
      Ok(c)
    }
  }
}

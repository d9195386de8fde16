//! APIレスポンスパーサー
//!
//! 解析サーバーの応答本文をパースし、
//! エラー応答からは利用者向けの詳細メッセージを取り出す

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 応答本文からJSON部分を取り出す
///
/// 先頭のBOMと前後の空白を除去する。空の本文はエラー
///
/// # Examples
/// ```
/// use review_intel_common::extract_json;
///
/// let json = extract_json("\u{feff}  {\"file_id\": \"abc\"}\n").unwrap();
/// assert_eq!(json, "{\"file_id\": \"abc\"}");
/// ```
pub fn extract_json(body: &str) -> Result<&str> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(Error::Parse("応答本文が空です".into()));
    }
    Ok(trimmed)
}

/// 応答本文を型 `T` としてパース
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let json_str = extract_json(body)?;
    let value = serde_json::from_str(json_str)?;
    Ok(value)
}

/// エラー応答から `detail` を取り出す
///
/// - `{"detail": "..."}` → その文字列
/// - `{"detail": [{"msg": "..."}, ...]}`（入力検証エラー）→ `msg` を "; " で連結
/// - それ以外 → None
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(extract_json(body).ok()?).ok()?;

    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UploadInfo;

    #[test]
    fn test_extract_json_empty_body() {
        assert!(matches!(extract_json("   \n"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_response_upload_info() {
        let body = r#"{"file_id": "4f1c", "filename": "reviews.csv", "total_rows": 120, "columns": ["review_text", "rating"], "message": "ok"}"#;
        let info: UploadInfo = parse_response(body).unwrap();
        assert_eq!(info.file_id, "4f1c");
        assert_eq!(info.total_rows, 120);
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let result: Result<UploadInfo> = parse_response("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_extract_detail_string() {
        let body = r#"{"detail": "Only CSV files are supported"}"#;
        assert_eq!(extract_detail(body).as_deref(), Some("Only CSV files are supported"));
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "text"], "msg": "String should have at least 3 characters"}, {"msg": "field required"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("String should have at least 3 characters; field required")
        );
    }

    #[test]
    fn test_extract_detail_absent() {
        assert_eq!(extract_detail(r#"{"error": "boom"}"#), None);
        assert_eq!(extract_detail(r#"{"detail": ""}"#), None);
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(""), None);
    }
}

//! JSON bodies exchanged with the conversion server.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Body of a successful creation request: `{ "task_id": "..." }`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateResponse {
    #[serde(default, deserialize_with = "lenient_id")]
    pub task_id: Option<String>,
}

/// Body of `GET /progress/{task_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatusReport {
    #[serde(default, deserialize_with = "lenient_progress")]
    pub progress: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl StatusReport {
    /// `error`, or `done` carrying a non-empty download URL.
    pub fn is_terminal(&self) -> bool {
        match self.status.as_deref() {
            Some("error") => true,
            Some("done") => self
                .download_url
                .as_deref()
                .is_some_and(|url| !url.is_empty()),
            _ => false,
        }
    }
}

/// Accepts a non-empty string or a number; anything else counts as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) if !id.is_empty() => Some(id),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Integers pass through; floats are truncated toward zero.
fn lenient_progress<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value as i64)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_report_tolerates_missing_fields() {
        let report: StatusReport = serde_json::from_str(r#"{"status":"running"}"#).unwrap();
        assert_eq!(report.progress, None);
        assert!(!report.is_terminal());
    }

    #[test]
    fn float_progress_is_truncated() {
        let report: StatusReport =
            serde_json::from_str(r#"{"progress":42.7,"status":"running"}"#).unwrap();
        assert_eq!(report.progress, Some(42));
    }

    #[test]
    fn done_is_terminal_only_with_download_url() {
        let without: StatusReport =
            serde_json::from_str(r#"{"progress":100,"status":"done"}"#).unwrap();
        assert!(!without.is_terminal());
        let with: StatusReport = serde_json::from_str(
            r#"{"progress":100,"status":"done","download_url":"/download/a.pdf"}"#,
        )
        .unwrap();
        assert!(with.is_terminal());
    }

    #[test]
    fn done_with_empty_download_url_is_not_terminal() {
        let report: StatusReport = serde_json::from_str(
            r#"{"progress":100,"status":"done","download_url":""}"#,
        )
        .unwrap();
        assert!(!report.is_terminal());
    }

    #[test]
    fn create_response_ignores_empty_and_null_ids() {
        let empty: CreateResponse = serde_json::from_str(r#"{"task_id":""}"#).unwrap();
        assert_eq!(empty.task_id, None);
        let null: CreateResponse = serde_json::from_str(r#"{"task_id":null}"#).unwrap();
        assert_eq!(null.task_id, None);
        let absent: CreateResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert_eq!(absent.task_id, None);
        let numeric: CreateResponse = serde_json::from_str(r#"{"task_id":17}"#).unwrap();
        assert_eq!(numeric.task_id.as_deref(), Some("17"));
    }
}

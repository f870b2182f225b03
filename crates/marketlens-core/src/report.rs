//! Machine-readable result envelope.
//!
//! Analytics degrade instead of failing: a fetch that returns nothing still
//! produces a rendered result, with the degradation recorded as warnings.
//! The envelope carries that context alongside the data so downstream
//! consumers can surface it.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Standard envelope for machine-readable analytics output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report<T> {
    pub meta: ReportMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ReportError>,
}

impl<T> Report<T> {
    pub fn success(meta: ReportMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(meta: ReportMeta, data: T, errors: Vec<ReportError>) -> Self {
        Self { meta, data, errors }
    }
}

/// Metadata attached to every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub request_id: String,
    pub generated_at: String,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ReportMeta {
    pub fn new(request_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            request_id: request_id.into(),
            generated_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .expect("UTC now must be RFC3339 formattable"),
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

/// Structured error payload for partial or failed computations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    pub code: String,
    pub message: String,
}

impl ReportError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_empty_collections() {
        let report = Report::success(ReportMeta::new("req-123", 4), 42_u32);
        let json = serde_json::to_value(&report).expect("must serialize");

        assert_eq!(json["data"], 42);
        assert_eq!(json["meta"]["request_id"], "req-123");
        assert!(json.get("errors").is_none());
        assert!(json["meta"].get("warnings").is_none());
    }

    #[test]
    fn keeps_warnings_and_errors_when_present() {
        let meta = ReportMeta::new("req-456", 9).with_warnings(vec![String::from("degraded")]);
        let report = Report::with_errors(
            meta,
            serde_json::json!({}),
            vec![ReportError::new("history.empty", "no data for 'AAPL'")],
        );
        let json = serde_json::to_value(&report).expect("must serialize");

        assert_eq!(json["meta"]["warnings"][0], "degraded");
        assert_eq!(json["errors"][0]["code"], "history.empty");
    }
}

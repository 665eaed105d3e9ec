use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::time::us_to_ms;

/// One timed operation node within a trace, as captured on the wire.
/// `timestamp` and `duration` are absolute/elapsed microseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub trace_id: String,
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Span {
    pub fn start_ms(&self) -> f64 {
        us_to_ms(self.timestamp)
    }

    pub fn end_ms(&self) -> f64 {
        us_to_ms(self.timestamp) + us_to_ms(self.duration)
    }

    pub fn duration_ms(&self) -> f64 {
        us_to_ms(self.duration)
    }

    pub fn tag_u64(&self, key: &str) -> Option<u64> {
        self.tags.get(key).and_then(|v| v.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_span() {
        let span: Span = serde_json::from_str(
            r#"{
                "traceId": "t1",
                "id": "s1",
                "parentId": "s0",
                "name": "gmail.get_messages",
                "timestamp": 1000000,
                "duration": 2500,
                "tags": {"gen_ai.usage.total_tokens": "42"}
            }"#,
        )
        .unwrap();

        assert_eq!(span.trace_id, "t1");
        assert_eq!(span.parent_id.as_deref(), Some("s0"));
        assert_eq!(span.start_ms(), 1000.0);
        assert_eq!(span.duration_ms(), 2.5);
        assert_eq!(span.end_ms(), 1002.5);
        assert_eq!(span.tag_u64("gen_ai.usage.total_tokens"), Some(42));
    }

    #[test]
    fn optional_fields_default() {
        let span: Span =
            serde_json::from_str(r#"{"traceId": "t1", "id": "s1", "name": "root"}"#).unwrap();
        assert_eq!(span.parent_id, None);
        assert_eq!(span.timestamp, 0);
        assert_eq!(span.duration, 0);
        assert!(span.tags.is_empty());
    }

    #[test]
    fn missing_id_is_rejected() {
        let result: Result<Span, _> =
            serde_json::from_str(r#"{"traceId": "t1", "name": "root"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn tag_u64_skips_unparsable() {
        let span: Span = serde_json::from_str(
            r#"{"traceId": "t1", "id": "s1", "name": "chat", "tags": {"k": "abc"}}"#,
        )
        .unwrap();
        assert_eq!(span.tag_u64("k"), None);
        assert_eq!(span.tag_u64("missing"), None);
    }
}

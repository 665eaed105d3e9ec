use std::fs;
use std::path::Path;

use tracebench_core::error::{Result, TracebenchError};
use tracebench_core::model::span::Span;
use tracebench_core::model::trace::Trace;
use tracing::warn;

pub fn read_dump(path: &Path) -> Result<Vec<Trace>> {
    let raw = fs::read_to_string(path).map_err(|e| {
        TracebenchError::DataFormat(format!("failed reading {}: {e}", path.display()))
    })?;
    parse_dump(&raw)
}

/// Parse the captured wrapper document: an outer object whose `rawData`
/// string field carries the serialized array of span arrays. Captured dumps
/// may start with a UTF-8 BOM.
pub fn parse_dump(raw: &str) -> Result<Vec<Trace>> {
    let raw = raw.trim_start_matches('\u{feff}');

    let wrapper: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| TracebenchError::DataFormat(format!("invalid wrapper json: {e}")))?;
    let payload = wrapper
        .get("rawData")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            TracebenchError::DataFormat("wrapper is missing the rawData string field".to_string())
        })?;

    let trace_values: Vec<serde_json::Value> = serde_json::from_str(payload)
        .map_err(|e| TracebenchError::DataFormat(format!("invalid trace payload: {e}")))?;

    let mut traces = Vec::with_capacity(trace_values.len());
    for (index, value) in trace_values.into_iter().enumerate() {
        match serde_json::from_value::<Vec<Span>>(value) {
            Ok(spans) => {
                let trace_id = spans
                    .first()
                    .map(|s| s.trace_id.clone())
                    .unwrap_or_default();
                traces.push(Trace::new(trace_id, spans));
            }
            Err(e) => {
                warn!(index, error = %e, "skipping malformed trace");
            }
        }
    }

    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use testkit::{benchmark_trace, wrapper_dump};

    #[test]
    fn parses_wrapper_dump() {
        let traces = vec![
            benchmark_trace("t1", 1_000_000),
            benchmark_trace("t2", 5_000_000),
        ];
        let parsed = parse_dump(&wrapper_dump(&traces)).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].trace_id, "t1");
        assert_eq!(parsed[0].spans.len(), 5);
    }

    #[test]
    fn tolerates_utf8_bom() {
        let dump = format!("\u{feff}{}", wrapper_dump(&[benchmark_trace("t1", 0)]));
        let parsed = parse_dump(&dump).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn rejects_missing_raw_data() {
        let err = parse_dump(r#"{"other": "[]"}"#).unwrap_err();
        assert!(err.to_string().contains("rawData"));
    }

    #[test]
    fn rejects_invalid_wrapper() {
        assert!(parse_dump("not json").is_err());
        assert!(parse_dump(r#"{"rawData": "not json"}"#).is_err());
    }

    #[test]
    fn skips_malformed_trace_keeps_rest() {
        // Second trace has a span without an id, which fails decoding; the
        // surrounding traces must survive.
        let dump = serde_json::json!({
            "rawData": serde_json::to_string(&serde_json::json!([
                [{"traceId": "t1", "id": "a", "name": "x"}],
                [{"traceId": "t2", "name": "broken"}],
                [{"traceId": "t3", "id": "b", "name": "y"}],
            ]))
            .unwrap()
        })
        .to_string();

        let parsed = parse_dump(&dump).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].trace_id, "t1");
        assert_eq!(parsed[1].trace_id, "t3");
    }

    #[test]
    fn empty_trace_array_is_valid() {
        let dump = serde_json::json!({"rawData": "[]"}).to_string();
        assert!(parse_dump(&dump).unwrap().is_empty());

        let dump = serde_json::json!({"rawData": "[[]]"}).to_string();
        let parsed = parse_dump(&dump).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].is_empty());
        assert_eq!(parsed[0].trace_id, "");
    }

    #[test]
    fn read_dump_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dump(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(
            err,
            tracebench_core::TracebenchError::DataFormat(_)
        ));
    }
}

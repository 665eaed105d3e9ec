use std::collections::HashMap;

use tracebench_core::model::span::Span;
use tracebench_core::model::trace::Trace;

pub fn span(
    trace_id: &str,
    id: &str,
    parent_id: Option<&str>,
    name: &str,
    start_us: u64,
    duration_us: u64,
) -> Span {
    Span {
        trace_id: trace_id.to_string(),
        id: id.to_string(),
        parent_id: parent_id.map(str::to_string),
        name: name.to_string(),
        timestamp: start_us,
        duration: duration_us,
        tags: HashMap::new(),
    }
}

pub fn span_with_tags(
    trace_id: &str,
    id: &str,
    parent_id: Option<&str>,
    name: &str,
    start_us: u64,
    duration_us: u64,
    tags: &[(&str, &str)],
) -> Span {
    let mut out = span(trace_id, id, parent_id, name, start_us, duration_us);
    out.tags = tags
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    out
}

/// One realistic benchmark iteration: HTTP root, a non-category
/// orchestration child, two sequential gmail calls, one chat call carrying
/// token tags.
pub fn benchmark_trace(trace_id: &str, base_us: u64) -> Trace {
    let spans = vec![
        span(
            trace_id,
            "root",
            None,
            "HTTP POST /benchmark/analyze",
            base_us,
            1_800_000,
        ),
        span(
            trace_id,
            "orchestrate",
            Some("root"),
            "analyze_google_account",
            base_us + 50_000,
            1_600_000,
        ),
        span(
            trace_id,
            "gmail-1",
            Some("orchestrate"),
            "gmail.list_message_ids",
            base_us + 100_000,
            300_000,
        ),
        span(
            trace_id,
            "gmail-2",
            Some("orchestrate"),
            "gmail.get_messages",
            base_us + 450_000,
            400_000,
        ),
        span_with_tags(
            trace_id,
            "chat-1",
            Some("orchestrate"),
            "chat.completion",
            base_us + 900_000,
            700_000,
            &[
                ("gen_ai.usage.input_tokens", "1200"),
                ("gen_ai.usage.output_tokens", "300"),
                ("gen_ai.usage.total_tokens", "1500"),
            ],
        ),
    ];
    Trace::new(trace_id, spans)
}

/// Encode traces in the captured-dump wrapper format: the outer object's
/// `rawData` field carries the serialized trace array as a string.
pub fn wrapper_dump(traces: &[Trace]) -> String {
    let arrays: Vec<&Vec<Span>> = traces.iter().map(|t| &t.spans).collect();
    let inner = serde_json::to_string(&arrays).expect("serialize spans");
    serde_json::json!({ "rawData": inner }).to_string()
}

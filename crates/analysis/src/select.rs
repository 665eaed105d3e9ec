use tracebench_core::model::trace::Trace;
use tracebench_core::pattern::{BenchmarkMarker, NamePattern};

use crate::record::SpanHit;

/// All spans across the traces matching a name pattern, in trace order.
pub fn spans_by_name(traces: &[Trace], pattern: &NamePattern) -> Vec<SpanHit> {
    traces
        .iter()
        .flat_map(|t| t.spans.iter())
        .filter(|s| pattern.matches(&s.name))
        .map(|s| SpanHit {
            trace_id: s.trace_id.clone(),
            span_id: s.id.clone(),
            name: s.name.clone(),
            duration_ms: s.duration_ms(),
        })
        .collect()
}

/// Millisecond durations of every benchmark-marker span: the per-iteration
/// end-to-end latency samples.
pub fn benchmark_latencies(traces: &[Trace], marker: &BenchmarkMarker) -> Vec<f64> {
    traces
        .iter()
        .flat_map(|t| t.spans.iter())
        .filter(|s| marker.matches(&s.name))
        .map(|s| s.duration_ms())
        .collect()
}

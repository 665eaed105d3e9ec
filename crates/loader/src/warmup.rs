use std::collections::HashSet;

use tracebench_core::model::trace::Trace;
use tracebench_core::pattern::BenchmarkMarker;
use tracing::{info, warn};

/// Remove the first `warmup` benchmark iterations from the working set.
///
/// Qualifying traces are those containing a span matching the benchmark
/// marker, ordered by their earliest span timestamp. When fewer qualifying
/// traces exist than requested, exclusion is skipped entirely rather than
/// partially applied.
pub fn exclude_warmup(traces: &mut Vec<Trace>, warmup: usize, marker: &BenchmarkMarker) {
    if warmup == 0 {
        return;
    }

    let mut qualifying: Vec<(u64, &str)> = traces
        .iter()
        .filter(|t| t.is_benchmark(marker))
        .map(|t| (t.min_timestamp().unwrap_or(u64::MAX), t.trace_id.as_str()))
        .collect();

    if qualifying.len() <= warmup {
        warn!(
            found = qualifying.len(),
            requested = warmup,
            "not enough benchmark iterations to exclude warm-up, keeping all"
        );
        return;
    }

    qualifying.sort_by_key(|(start, _)| *start);
    let excluded: HashSet<String> = qualifying
        .iter()
        .take(warmup)
        .map(|(_, id)| id.to_string())
        .collect();

    let before = traces.len();
    traces.retain(|t| !excluded.contains(&t.trace_id));
    info!(
        excluded = before - traces.len(),
        iterations = warmup,
        "excluded warm-up traces"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use testkit::{benchmark_trace, span};

    fn plain_trace(trace_id: &str, start_us: u64) -> Trace {
        Trace::new(
            trace_id,
            vec![span(trace_id, "a", None, "security filterchain", start_us, 100)],
        )
    }

    #[test]
    fn excludes_earliest_qualifying_traces() {
        let mut traces = vec![
            benchmark_trace("t3", 3_000_000),
            benchmark_trace("t1", 1_000_000),
            benchmark_trace("t5", 5_000_000),
            benchmark_trace("t2", 2_000_000),
            benchmark_trace("t4", 4_000_000),
        ];
        exclude_warmup(&mut traces, 2, &BenchmarkMarker::default());

        let ids: Vec<&str> = traces.iter().map(|t| t.trace_id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t5", "t4"]);
    }

    #[test]
    fn never_removes_non_qualifying_traces() {
        // The non-benchmark trace starts earliest but must survive.
        let mut traces = vec![
            plain_trace("infra", 0),
            benchmark_trace("t1", 1_000_000),
            benchmark_trace("t2", 2_000_000),
            benchmark_trace("t3", 3_000_000),
        ];
        exclude_warmup(&mut traces, 1, &BenchmarkMarker::default());

        let ids: Vec<&str> = traces.iter().map(|t| t.trace_id.as_str()).collect();
        assert_eq!(ids, vec!["infra", "t2", "t3"]);
    }

    #[test]
    fn zero_warmup_is_a_no_op() {
        let mut traces = vec![benchmark_trace("t1", 0)];
        exclude_warmup(&mut traces, 0, &BenchmarkMarker::default());
        assert_eq!(traces.len(), 1);
    }

    #[test]
    fn insufficient_iterations_skip_exclusion_entirely() {
        let mut traces = vec![
            benchmark_trace("t1", 1_000_000),
            benchmark_trace("t2", 2_000_000),
        ];
        exclude_warmup(&mut traces, 2, &BenchmarkMarker::default());
        assert_eq!(traces.len(), 2);

        exclude_warmup(&mut traces, 5, &BenchmarkMarker::default());
        assert_eq!(traces.len(), 2);
    }

    #[test]
    fn removes_every_trace_sharing_an_excluded_id() {
        // A second capture fragment with the same trace id goes with it.
        let mut traces = vec![
            benchmark_trace("t1", 1_000_000),
            plain_trace("t1", 9_000_000),
            benchmark_trace("t2", 2_000_000),
            benchmark_trace("t3", 3_000_000),
        ];
        exclude_warmup(&mut traces, 1, &BenchmarkMarker::default());

        let ids: Vec<&str> = traces.iter().map(|t| t.trace_id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t3"]);
    }
}

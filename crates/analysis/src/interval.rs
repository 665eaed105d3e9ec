use tracebench_core::model::trace::Trace;
use tracebench_core::pattern::{NamePattern, matches_any};

use crate::record::{CriticalIo, ExecutionPattern};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval {
    start: f64,
    end: f64,
}

/// Wall-clock milliseconds during which at least one span matching the
/// patterns was active. Overlapping spans are merged into shared time, so
/// concurrently issued calls are counted once rather than additively.
pub fn critical_io(trace: &Trace, patterns: &[NamePattern]) -> CriticalIo {
    if trace.is_empty() {
        return CriticalIo {
            trace_id: trace.trace_id.clone(),
            critical_io_ms: 0.0,
            span_count: 0,
            pattern: ExecutionPattern::NoTrace,
        };
    }

    let mut intervals: Vec<Interval> = trace
        .spans
        .iter()
        .filter(|s| matches_any(&s.name, patterns))
        .map(|s| Interval {
            start: s.start_ms(),
            end: s.end_ms(),
        })
        .collect();

    if intervals.is_empty() {
        return CriticalIo {
            trace_id: trace.trace_id.clone(),
            critical_io_ms: 0.0,
            span_count: 0,
            pattern: ExecutionPattern::NoMatchingSpans,
        };
    }

    let span_count = intervals.len();
    intervals.sort_by(|a, b| a.start.total_cmp(&b.start));
    let merged = merge(intervals);

    CriticalIo {
        trace_id: trace.trace_id.clone(),
        critical_io_ms: merged.iter().map(|i| i.end - i.start).sum(),
        span_count,
        pattern: ExecutionPattern::UnionIntervals,
    }
}

/// Collapse a start-sorted interval list into disjoint blocks. Touching
/// intervals (next.start == current.end) merge.
fn merge(intervals: Vec<Interval>) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::new();
    let mut iter = intervals.into_iter();
    let Some(mut current) = iter.next() else {
        return merged;
    };

    for next in iter {
        if next.start <= current.end {
            current.end = current.end.max(next.end);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}

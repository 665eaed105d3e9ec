use tracebench_core::model::span::Span;
use tracebench_core::model::trace::Trace;
use tracebench_core::pattern::{NamePattern, matches_any};

use crate::record::{CriticalPath, ExecutionPattern};
use crate::tree::SpanTree;

/// Critical-path milliseconds for the category across the whole span
/// hierarchy: one post-order walk computes each span's contribution (its own
/// duration when its name matches, else 0) and folds children in, taking
/// the maximum over concurrent siblings and the sum over sequential ones.
pub fn critical_path(trace: &Trace, patterns: &[NamePattern]) -> CriticalPath {
    if trace.is_empty() {
        return CriticalPath {
            trace_id: trace.trace_id.clone(),
            critical_path_ms: 0.0,
            span_count: 0,
            pattern: ExecutionPattern::NoTrace,
        };
    }

    let span_count = trace
        .spans
        .iter()
        .filter(|s| matches_any(&s.name, patterns))
        .count();
    if span_count == 0 {
        return CriticalPath {
            trace_id: trace.trace_id.clone(),
            critical_path_ms: 0.0,
            span_count: 0,
            pattern: ExecutionPattern::NoMatchingSpans,
        };
    }

    let tree = SpanTree::build(trace);
    let mut contributing: Vec<(&Span, f64)> = Vec::new();
    for &root in tree.roots() {
        let value = subtree_value(&tree, root, patterns);
        if value > 0.0 {
            contributing.push((tree.span(root), value));
        }
    }

    CriticalPath {
        trace_id: trace.trace_id.clone(),
        critical_path_ms: combine(&contributing),
        span_count,
        pattern: ExecutionPattern::RecursiveHierarchical,
    }
}

fn subtree_value(tree: &SpanTree<'_>, index: usize, patterns: &[NamePattern]) -> f64 {
    let span = tree.span(index);
    let own = if matches_any(&span.name, patterns) {
        span.duration_ms()
    } else {
        0.0
    };

    // Only children whose subtree carries category time participate in the
    // concurrency grouping.
    let mut contributing: Vec<(&Span, f64)> = Vec::new();
    for &child in tree.children(index) {
        let value = subtree_value(tree, child, patterns);
        if value > 0.0 {
            contributing.push((tree.span(child), value));
        }
    }

    own + combine(&contributing)
}

fn combine(contributing: &[(&Span, f64)]) -> f64 {
    if contributing.len() < 2 {
        return contributing.iter().map(|(_, v)| v).sum();
    }

    if concurrent(contributing) {
        contributing.iter().map(|(_, v)| *v).fold(0.0, f64::max)
    } else {
        contributing.iter().map(|(_, v)| v).sum()
    }
}

/// Adjacent-pair overlap over start-sorted spans: one overlapping pair
/// classifies the whole group as concurrent. Groups of 3+ siblings with
/// partial overlap are not broken down further.
fn concurrent(contributing: &[(&Span, f64)]) -> bool {
    let mut spans: Vec<&Span> = contributing.iter().map(|(s, _)| *s).collect();
    spans.sort_by_key(|s| s.timestamp);
    spans
        .windows(2)
        .any(|w| w[1].timestamp < w[0].timestamp + w[0].duration)
}

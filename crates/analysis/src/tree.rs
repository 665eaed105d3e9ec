use std::collections::HashMap;

use tracebench_core::model::span::Span;
use tracebench_core::model::trace::Trace;

/// Arena view of one trace: nodes are indices into the trace's span list,
/// edges are child-index lists built once at construction. A span whose
/// parent id does not resolve within the trace is root-equivalent.
pub struct SpanTree<'a> {
    spans: &'a [Span],
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl<'a> SpanTree<'a> {
    pub fn build(trace: &'a Trace) -> Self {
        let spans = trace.spans.as_slice();
        let by_id: HashMap<&str, usize> = spans
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        let mut children = vec![Vec::new(); spans.len()];
        let mut roots = Vec::new();
        for (i, span) in spans.iter().enumerate() {
            match span.parent_id.as_deref().and_then(|p| by_id.get(p)) {
                Some(&parent) if parent != i => children[parent].push(i),
                _ => roots.push(i),
            }
        }

        Self {
            spans,
            children,
            roots,
        }
    }

    pub fn span(&self, index: usize) -> &Span {
        &self.spans[index]
    }

    pub fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testkit::span;

    #[test]
    fn builds_parent_child_edges() {
        let trace = Trace::new(
            "t1",
            vec![
                span("t1", "root", None, "a", 0, 100),
                span("t1", "left", Some("root"), "b", 0, 40),
                span("t1", "right", Some("root"), "c", 50, 40),
                span("t1", "leaf", Some("left"), "d", 0, 10),
            ],
        );

        let tree = SpanTree::build(&trace);
        assert_eq!(tree.roots(), &[0]);
        assert_eq!(tree.children(0), &[1, 2]);
        assert_eq!(tree.children(1), &[3]);
        assert!(tree.children(3).is_empty());
    }

    #[test]
    fn unresolved_parent_is_root_equivalent() {
        let trace = Trace::new(
            "t1",
            vec![
                span("t1", "a", Some("missing"), "x", 0, 10),
                span("t1", "b", None, "y", 0, 10),
            ],
        );

        let tree = SpanTree::build(&trace);
        assert_eq!(tree.roots(), &[0, 1]);
    }

    #[test]
    fn self_parent_does_not_loop() {
        let trace = Trace::new("t1", vec![span("t1", "a", Some("a"), "x", 0, 10)]);
        let tree = SpanTree::build(&trace);
        assert_eq!(tree.roots(), &[0]);
        assert!(tree.children(0).is_empty());
    }

    #[test]
    fn multiple_roots_survive() {
        let trace = Trace::new(
            "t1",
            vec![
                span("t1", "a", None, "x", 0, 10),
                span("t1", "b", None, "y", 20, 10),
            ],
        );
        let tree = SpanTree::build(&trace);
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.len(), 2);
    }
}

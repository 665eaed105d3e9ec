use serde::{Deserialize, Serialize};

use crate::model::span::Span;
use crate::pattern::BenchmarkMarker;

/// The full span forest captured for one logical request/iteration.
/// A trace with zero spans is valid and treated as "no data" downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Trace {
    pub trace_id: String,
    pub spans: Vec<Span>,
}

impl Trace {
    pub fn new(trace_id: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            trace_id: trace_id.into(),
            spans,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Earliest span start in microseconds, None for an empty trace.
    pub fn min_timestamp(&self) -> Option<u64> {
        self.spans.iter().map(|s| s.timestamp).min()
    }

    pub fn is_benchmark(&self, marker: &BenchmarkMarker) -> bool {
        self.spans.iter().any(|s| marker.matches(&s.name))
    }
}

use serde::Serialize;

/// Distinguishes a measured zero from "nothing measured" so downstream
/// diagnostics can tell the two apart.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPattern {
    NoTrace,
    NoMatchingSpans,
    UnionIntervals,
    RecursiveHierarchical,
}

impl ExecutionPattern {
    pub fn has_data(self) -> bool {
        matches!(self, Self::UnionIntervals | Self::RecursiveHierarchical)
    }
}

/// Per-trace interval-union result: wall-clock milliseconds during which at
/// least one matching span was active.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CriticalIo {
    pub trace_id: String,
    pub critical_io_ms: f64,
    pub span_count: usize,
    pub pattern: ExecutionPattern,
}

/// Per-trace recursive critical-path result over the full span hierarchy.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CriticalPath {
    pub trace_id: String,
    pub critical_path_ms: f64,
    pub span_count: usize,
    pub pattern: ExecutionPattern,
}

/// Token counts summed from matching spans of one benchmark trace.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub trace_id: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub spans_with_tokens: usize,
}

/// One span matched by a name listing query.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpanHit {
    pub trace_id: String,
    pub span_id: String,
    pub name: String,
    pub duration_ms: f64,
}

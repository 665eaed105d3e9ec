pub mod critical_path;
pub mod interval;
pub mod record;
pub mod select;
pub mod stats;
pub mod summary;
pub mod tokens;
pub mod tree;

pub use record::{CriticalIo, CriticalPath, ExecutionPattern, SpanHit, TokenUsage};
pub use summary::{RunSummary, summarize};

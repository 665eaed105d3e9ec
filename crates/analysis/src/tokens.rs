use tracebench_core::model::trace::Trace;
use tracebench_core::pattern::{BenchmarkMarker, NamePattern, matches_any};

use crate::record::TokenUsage;

pub const INPUT_TOKENS_TAG: &str = "gen_ai.usage.input_tokens";
pub const OUTPUT_TOKENS_TAG: &str = "gen_ai.usage.output_tokens";
pub const TOTAL_TOKENS_TAG: &str = "gen_ai.usage.total_tokens";

/// Per-iteration token counts, summed across spans matching the token
/// category. Only traces containing a benchmark-marker span report usage;
/// unparsable tag values are skipped.
pub fn token_usage(
    traces: &[Trace],
    patterns: &[NamePattern],
    marker: &BenchmarkMarker,
) -> Vec<TokenUsage> {
    traces
        .iter()
        .filter(|t| t.is_benchmark(marker))
        .map(|t| trace_token_usage(t, patterns))
        .collect()
}

fn trace_token_usage(trace: &Trace, patterns: &[NamePattern]) -> TokenUsage {
    let mut usage = TokenUsage {
        trace_id: trace.trace_id.clone(),
        input_tokens: 0,
        output_tokens: 0,
        total_tokens: 0,
        spans_with_tokens: 0,
    };

    for span in trace.spans.iter().filter(|s| matches_any(&s.name, patterns)) {
        if let Some(v) = span.tag_u64(INPUT_TOKENS_TAG) {
            usage.input_tokens += v;
        }
        if let Some(v) = span.tag_u64(OUTPUT_TOKENS_TAG) {
            usage.output_tokens += v;
        }
        if let Some(v) = span.tag_u64(TOTAL_TOKENS_TAG) {
            usage.total_tokens += v;
            usage.spans_with_tokens += 1;
        }
    }

    usage
}

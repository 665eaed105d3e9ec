use serde::Serialize;
use tracebench_core::config::Config;
use tracebench_core::model::trace::Trace;
use tracing::warn;

use crate::critical_path::critical_path;
use crate::interval::critical_io;
use crate::record::{CriticalIo, CriticalPath, TokenUsage};
use crate::select::benchmark_latencies;
use crate::stats::{self, BasicStats, Outliers, Stability};
use crate::tokens::token_usage;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LatencySummary {
    pub stats: BasicStats,
    pub cv_percent: f64,
    pub percentiles: Vec<(f64, f64)>,
    pub stability: Option<Stability>,
    pub outliers: Outliers,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySummary {
    pub name: String,
    pub mean_critical_io_ms: Option<f64>,
    pub per_trace: Vec<CriticalIo>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CriticalPathSummary {
    pub mean_ms: Option<f64>,
    pub per_trace: Vec<CriticalPath>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TokenSummary {
    pub mean_input_tokens: Option<f64>,
    pub mean_output_tokens: Option<f64>,
    pub mean_total_tokens: Option<f64>,
    pub per_trace: Vec<TokenUsage>,
}

/// Everything one analysis invocation derives from a filtered trace set.
/// Pricing is deliberately absent; cost is a rendering concern.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub trace_count: usize,
    pub benchmark_trace_count: usize,
    pub latency: LatencySummary,
    pub categories: Vec<CategorySummary>,
    pub total_io: CategorySummary,
    pub critical_path: CriticalPathSummary,
    pub tokens: TokenSummary,
    pub orchestration_overhead_ms: Option<f64>,
}

pub fn summarize(traces: &[Trace], config: &Config) -> RunSummary {
    let marker = &config.benchmark_marker;
    let benchmark_trace_count = traces.iter().filter(|t| t.is_benchmark(marker)).count();

    let latencies = benchmark_latencies(traces, marker);
    if latencies.is_empty() {
        warn!("no benchmark spans found, latency statistics are empty");
    }
    let latency_stats = stats::basic_stats(&latencies);
    let cv_percent = stats::coefficient_of_variation(&latencies);
    let latency = LatencySummary {
        cv_percent,
        percentiles: stats::percentiles(&latencies, &stats::DEFAULT_PERCENTILES),
        stability: (latency_stats.count > 0).then(|| stats::stability_rating(cv_percent)),
        outliers: stats::outliers(&latencies),
        stats: latency_stats,
    };

    let categories = config
        .categories
        .iter()
        .map(|c| {
            let patterns = c.name_patterns();
            let per_trace: Vec<CriticalIo> =
                traces.iter().map(|t| critical_io(t, &patterns)).collect();
            CategorySummary {
                name: c.name.clone(),
                mean_critical_io_ms: mean_nonzero(per_trace.iter().map(|io| io.critical_io_ms)),
                per_trace,
            }
        })
        .collect();

    let all_patterns = config.all_patterns();
    let total_per_trace: Vec<CriticalIo> = traces
        .iter()
        .map(|t| critical_io(t, &all_patterns))
        .collect();
    let total_io = CategorySummary {
        name: "total".to_string(),
        mean_critical_io_ms: mean_nonzero(total_per_trace.iter().map(|io| io.critical_io_ms)),
        per_trace: total_per_trace,
    };

    let path_per_trace: Vec<CriticalPath> = traces
        .iter()
        .map(|t| critical_path(t, &all_patterns))
        .collect();
    let critical_path = CriticalPathSummary {
        mean_ms: mean_nonzero(path_per_trace.iter().map(|p| p.critical_path_ms)),
        per_trace: path_per_trace,
    };

    let token_patterns = match config.category(&config.token_category) {
        Some(c) => c.name_patterns(),
        None => {
            warn!(
                category = %config.token_category,
                "token category is not configured, token metrics are empty"
            );
            Vec::new()
        }
    };
    let token_per_trace = token_usage(traces, &token_patterns, marker);
    let tokens = TokenSummary {
        mean_input_tokens: mean_nonzero(token_per_trace.iter().map(|u| u.input_tokens as f64)),
        mean_output_tokens: mean_nonzero(token_per_trace.iter().map(|u| u.output_tokens as f64)),
        mean_total_tokens: mean_nonzero(token_per_trace.iter().map(|u| u.total_tokens as f64)),
        per_trace: token_per_trace,
    };

    let mean_latency = (latency.stats.count > 0).then_some(latency.stats.mean);
    let orchestration_overhead_ms = match (mean_latency, total_io.mean_critical_io_ms) {
        (Some(lat), Some(io)) => Some((lat - io).max(0.0)),
        _ => None,
    };

    RunSummary {
        trace_count: traces.len(),
        benchmark_trace_count,
        latency,
        categories,
        total_io,
        critical_path,
        tokens,
        orchestration_overhead_ms,
    }
}

/// Zero-filtered mean: traces where a metric measured nothing do not drag
/// the average down. None when every value is zero.
fn mean_nonzero(values: impl Iterator<Item = f64>) -> Option<f64> {
    let filtered: Vec<f64> = values.filter(|v| *v > 0.0).collect();
    if filtered.is_empty() {
        return None;
    }
    Some(filtered.iter().sum::<f64>() / filtered.len() as f64)
}

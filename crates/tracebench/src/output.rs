use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracebench_analysis::record::{SpanHit, TokenUsage};
use tracebench_analysis::stats::{self, Stability};
use tracebench_analysis::summary::RunSummary;

/// The analyze command's full result: the analyzer's summary plus the one
/// rendering-level derivation (cost from configured token prices).
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeReport {
    pub summary: RunSummary,
    pub ai_cost_per_request: Option<f64>,
}

pub fn render_human(report: &AnalyzeReport) -> String {
    let s = &report.summary;
    let mut out = String::new();

    out.push_str("=== Trace Analysis Report ===\n");
    let _ = writeln!(
        out,
        "traces={} benchmark_traces={}",
        s.trace_count, s.benchmark_trace_count
    );
    out.push('\n');

    out.push_str("-- Indicative Latency --\n");
    let st = &s.latency.stats;
    let _ = writeln!(
        out,
        "count={} mean={:.2}ms median={:.2}ms min={:.2}ms max={:.2}ms range={:.2}ms std_dev={:.2}ms",
        st.count, st.mean, st.median, st.min, st.max, st.range, st.std_dev
    );
    let _ = writeln!(
        out,
        "cv={:.1}% stability={}",
        s.latency.cv_percent,
        s.latency
            .stability
            .map(Stability::label)
            .unwrap_or("unknown")
    );
    let percentile_line = s
        .latency
        .percentiles
        .iter()
        .map(|(p, v)| format!("p{p:.0}={v:.2}ms"))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "{percentile_line}");
    let _ = writeln!(
        out,
        "outliers={} ({:.1}%)",
        s.latency.outliers.count, s.latency.outliers.percentage
    );
    out.push('\n');

    out.push_str("-- Critical I/O --\n");
    for category in &s.categories {
        let _ = writeln!(
            out,
            "{}: mean={}ms",
            category.name,
            fmt_ms(category.mean_critical_io_ms)
        );
    }
    let _ = writeln!(out, "total: mean={}ms", fmt_ms(s.total_io.mean_critical_io_ms));
    let _ = writeln!(
        out,
        "critical_path: mean={}ms",
        fmt_ms(s.critical_path.mean_ms)
    );
    let _ = writeln!(
        out,
        "orchestration_overhead={}ms",
        fmt_ms(s.orchestration_overhead_ms)
    );
    out.push('\n');

    out.push_str("-- AI Tokens --\n");
    let _ = writeln!(
        out,
        "input={} output={} total={}",
        fmt_tokens(s.tokens.mean_input_tokens),
        fmt_tokens(s.tokens.mean_output_tokens),
        fmt_tokens(s.tokens.mean_total_tokens)
    );
    let _ = writeln!(out, "cost={}", fmt_cost(report.ai_cost_per_request));
    out.push('\n');

    let _ = writeln!(out, "-- {} traces analyzed --", s.trace_count);
    out
}

pub fn render_markdown(report: &AnalyzeReport) -> String {
    let s = &report.summary;
    let mut out = String::new();

    out.push_str("# Benchmark Analysis\n\n");

    out.push_str("## AI Token Usage and Cost\n\n");
    out.push_str("| Metric | Value |\n|--------|-------|\n");
    let _ = writeln!(out, "| AI Cost | {} |", fmt_cost(report.ai_cost_per_request));
    let _ = writeln!(
        out,
        "| Input Token Count | {} |",
        fmt_tokens(s.tokens.mean_input_tokens)
    );
    let _ = writeln!(
        out,
        "| Output Token Count | {} |",
        fmt_tokens(s.tokens.mean_output_tokens)
    );
    let _ = writeln!(
        out,
        "| Total Tokens | {} |",
        fmt_tokens(s.tokens.mean_total_tokens)
    );
    out.push('\n');

    out.push_str("## Performance Metrics\n\n");
    out.push_str("| Metric | Value |\n|--------|-------|\n");
    let _ = writeln!(out, "| Indicative Latency | {} |", fmt_latency(s));
    for category in &s.categories {
        let _ = writeln!(
            out,
            "| {} critical I/O | {} |",
            category.name,
            fmt_seconds(category.mean_critical_io_ms)
        );
    }
    let _ = writeln!(
        out,
        "| Total Critical I/O | {} |",
        fmt_seconds(s.total_io.mean_critical_io_ms)
    );
    let _ = writeln!(
        out,
        "| Critical Path | {} |",
        fmt_seconds(s.critical_path.mean_ms)
    );
    let _ = writeln!(
        out,
        "| Orchestration Overhead | {} |",
        fmt_seconds(s.orchestration_overhead_ms)
    );
    let _ = writeln!(out, "| Latency CV | {:.1}% |", s.latency.cv_percent);
    let _ = writeln!(out, "| Test Iterations | {} |", s.latency.stats.count);

    out
}

/// Per-trace detail table; the aggregates live in the other formats.
pub fn render_csv(report: &AnalyzeReport) -> String {
    let s = &report.summary;
    let tokens_by_trace: HashMap<&str, &TokenUsage> = s
        .tokens
        .per_trace
        .iter()
        .map(|u| (u.trace_id.as_str(), u))
        .collect();

    let mut header = vec!["trace_id".to_string()];
    for category in &s.categories {
        header.push(format!("{}_critical_io_ms", category.name));
    }
    header.extend([
        "total_critical_io_ms".to_string(),
        "critical_path_ms".to_string(),
        "input_tokens".to_string(),
        "output_tokens".to_string(),
        "total_tokens".to_string(),
    ]);

    let mut out = header.join(",");
    out.push('\n');

    for (index, total) in s.total_io.per_trace.iter().enumerate() {
        let mut row = vec![total.trace_id.clone()];
        for category in &s.categories {
            row.push(format!("{:.2}", category.per_trace[index].critical_io_ms));
        }
        row.push(format!("{:.2}", total.critical_io_ms));
        row.push(format!(
            "{:.2}",
            s.critical_path.per_trace[index].critical_path_ms
        ));
        match tokens_by_trace.get(total.trace_id.as_str()) {
            Some(usage) => {
                row.push(usage.input_tokens.to_string());
                row.push(usage.output_tokens.to_string());
                row.push(usage.total_tokens.to_string());
            }
            None => row.extend(["".to_string(), "".to_string(), "".to_string()]),
        }
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

pub fn print_console_summary(
    trace_count: usize,
    benchmark_trace_count: usize,
    capture_start: Option<DateTime<Utc>>,
    latencies: &[f64],
) {
    println!("=== Trace Analysis Summary ===");
    println!("Total traces: {trace_count}");
    println!("Benchmark requests: {benchmark_trace_count}");
    if let Some(start) = capture_start {
        println!(
            "Capture start: {}",
            start.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
    }
    println!();

    if latencies.is_empty() {
        println!("no benchmark request timings found");
        return;
    }

    println!("=== Individual Benchmark Request Timings ===");
    for (i, duration) in latencies.iter().enumerate() {
        println!("  {}. {duration:.2}ms", i + 1);
    }
    println!();

    let basic = stats::basic_stats(latencies);
    let cv = stats::coefficient_of_variation(latencies);
    println!("=== Statistics ===");
    println!("  Average: {:.2}ms", basic.mean);
    println!("  Min: {:.2}ms", basic.min);
    println!("  Max: {:.2}ms", basic.max);
    println!("  Range: {:.2}ms", basic.range);
    println!("  Std Dev: {:.2}ms", basic.std_dev);
    println!("  CV: {cv:.1}%");
    println!("  Stability: {}", stability_colored(stats::stability_rating(cv)));
}

pub fn print_spans_human(pattern: &str, hits: &[SpanHit]) {
    for hit in hits {
        println!(
            "trace={} span={} name=\"{}\" duration={:.2}ms",
            hit.trace_id, hit.span_id, hit.name, hit.duration_ms
        );
    }

    let durations: Vec<f64> = hits.iter().map(|h| h.duration_ms).collect();
    let basic = stats::basic_stats(&durations);
    println!(
        "-- {} spans matching \"{pattern}\" (avg {:.2}ms, min {:.2}ms, max {:.2}ms) --",
        hits.len(),
        basic.mean,
        basic.min,
        basic.max
    );
}

fn stability_colored(rating: Stability) -> String {
    match rating {
        Stability::Excellent => rating.label().green().to_string(),
        Stability::Good => rating.label().cyan().to_string(),
        Stability::Fair => rating.label().yellow().to_string(),
        Stability::Poor => rating.label().red().to_string(),
    }
}

fn fmt_ms(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn fmt_seconds(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2} s", v / 1000.0))
        .unwrap_or_else(|| "N/A".to_string())
}

fn fmt_tokens(value: Option<f64>) -> String {
    value
        .map(|v| format!("{} tokens", v.round() as u64))
        .unwrap_or_else(|| "N/A".to_string())
}

fn fmt_cost(value: Option<f64>) -> String {
    match value {
        Some(cost) if cost == 0.0 => "$0.000 / 1K requests".to_string(),
        Some(cost) => format!("${:.3} / 1K requests", cost * 1000.0),
        None => "N/A".to_string(),
    }
}

/// Average alone for a single iteration, `avg ± std_dev (max: ...)` in
/// seconds otherwise.
fn fmt_latency(summary: &RunSummary) -> String {
    let st = &summary.latency.stats;
    if st.count == 0 {
        return "N/A".to_string();
    }
    if st.count == 1 {
        return format!("{:.2} s", st.mean / 1000.0);
    }
    format!(
        "{:.2} ± {:.2} s (max: {:.2} s)",
        st.mean / 1000.0,
        st.std_dev / 1000.0,
        st.max / 1000.0
    )
}

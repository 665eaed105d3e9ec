mod output;
mod telemetry;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracebench_analysis::select::{benchmark_latencies, spans_by_name};
use tracebench_analysis::summarize;
use tracebench_analysis::summary::RunSummary;
use tracebench_core::config::Config;
use tracebench_core::model::trace::Trace;
use tracebench_core::pattern::NamePattern;
use tracebench_core::time::us_to_datetime;
use tracebench_loader::summary::read_sidecar;

use crate::output::AnalyzeReport;

#[derive(Parser, Debug)]
#[command(name = "tracebench")]
#[command(about = "Benchmark trace analyzer for captured span dumps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true, help = "Config file overriding the default lookup")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Human,
    Markdown,
    Csv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Analyze one trace dump and render the full report")]
    Analyze {
        file: PathBuf,
        #[arg(long, help = "Warm-up iterations to exclude (default: sidecar, then config)")]
        warmup: Option<usize>,
        #[arg(long, default_value = "human")]
        format: String,
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    #[command(about = "Quick console summary of benchmark iterations")]
    Summary {
        file: PathBuf,
        #[arg(long)]
        warmup: Option<usize>,
    },
    #[command(about = "List spans matching a name substring")]
    Spans {
        file: PathBuf,
        pattern: String,
        #[arg(long)]
        warmup: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    telemetry::init_cli_tracing();
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Analyze {
            file,
            warmup,
            format,
            output,
        } => {
            let traces = load_traces(&file, warmup, &cfg)?;
            let summary = summarize(&traces, &cfg);
            let report = AnalyzeReport {
                ai_cost_per_request: ai_cost_per_request(&summary, &cfg),
                summary,
            };

            let rendered = if cli.json {
                let mut text = serde_json::to_string_pretty(&report)?;
                text.push('\n');
                text
            } else {
                match parse_format(&format)? {
                    Format::Human => output::render_human(&report),
                    Format::Markdown => output::render_markdown(&report),
                    Format::Csv => output::render_csv(&report),
                }
            };

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent()
                        && !parent.as_os_str().is_empty()
                    {
                        fs::create_dir_all(parent)
                            .with_context(|| format!("create {}", parent.display()))?;
                    }
                    fs::write(&path, rendered)
                        .with_context(|| format!("write report to {}", path.display()))?;
                    eprintln!("report saved to {}", path.display());
                }
                None => print!("{rendered}"),
            }
            Ok(())
        }
        Commands::Summary { file, warmup } => {
            let traces = load_traces(&file, warmup, &cfg)?;
            let benchmark_count = traces
                .iter()
                .filter(|t| t.is_benchmark(&cfg.benchmark_marker))
                .count();
            let latencies = benchmark_latencies(&traces, &cfg.benchmark_marker);
            let capture_start = traces
                .iter()
                .filter_map(Trace::min_timestamp)
                .min()
                .and_then(us_to_datetime);

            if cli.json {
                let payload = serde_json::json!({
                    "trace_count": traces.len(),
                    "benchmark_trace_count": benchmark_count,
                    "capture_start": capture_start,
                    "latencies_ms": latencies,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                output::print_console_summary(
                    traces.len(),
                    benchmark_count,
                    capture_start,
                    &latencies,
                );
            }
            Ok(())
        }
        Commands::Spans {
            file,
            pattern,
            warmup,
        } => {
            let traces = load_traces(&file, warmup, &cfg)?;
            let hits = spans_by_name(&traces, &NamePattern::substring(&pattern));

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                output::print_spans_human(&pattern, &hits);
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(p) => Config::load_from(p).context("load config"),
        None => Config::load().context("load config"),
    }
}

fn load_traces(file: &Path, warmup_flag: Option<usize>, cfg: &Config) -> anyhow::Result<Vec<Trace>> {
    let warmup = warmup_flag
        .or_else(|| read_sidecar(file).map(|s| s.warmup_iterations))
        .unwrap_or(cfg.warmup_iterations);
    let traces = tracebench_loader::load(file, warmup, &cfg.benchmark_marker)
        .with_context(|| format!("load traces from {}", file.display()))?;
    tracing::debug!(traces = traces.len(), warmup, "loaded trace dump");
    Ok(traces)
}

fn parse_format(s: &str) -> anyhow::Result<Format> {
    match s {
        "human" => Ok(Format::Human),
        "markdown" => Ok(Format::Markdown),
        "csv" => Ok(Format::Csv),
        other => anyhow::bail!("invalid format: {other}"),
    }
}

/// Cost per request from configured per-million token prices. None when no
/// price is configured or no token data exists.
fn ai_cost_per_request(summary: &RunSummary, cfg: &Config) -> Option<f64> {
    if cfg.input_token_price_per_million <= 0.0 && cfg.output_token_price_per_million <= 0.0 {
        return None;
    }

    let input = summary.tokens.mean_input_tokens?;
    let output = summary.tokens.mean_output_tokens?;
    Some(
        (input / 1_000_000.0) * cfg.input_token_price_per_million
            + (output / 1_000_000.0) * cfg.output_token_price_per_million,
    )
}

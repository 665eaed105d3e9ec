use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TracebenchError};
use crate::pattern::{BenchmarkMarker, NamePattern};

/// A named group of span-name prefixes ("gmail", "ai", ...) whose spans
/// count as one I/O category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    pub patterns: Vec<String>,
}

impl Category {
    pub fn name_patterns(&self) -> Vec<NamePattern> {
        self.patterns.iter().map(|p| NamePattern::prefix(p)).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub warmup_iterations: usize,
    pub benchmark_marker: BenchmarkMarker,
    pub categories: Vec<Category>,
    pub token_category: String,
    pub input_token_price_per_million: f64,
    pub output_token_price_per_million: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warmup_iterations: 0,
            benchmark_marker: BenchmarkMarker::default(),
            categories: vec![
                Category {
                    name: "gmail".to_string(),
                    patterns: vec!["gmail".to_string()],
                },
                Category {
                    name: "ai".to_string(),
                    patterns: vec!["chat".to_string()],
                },
            ],
            token_category: "ai".to_string(),
            input_token_price_per_million: 0.0,
            output_token_price_per_million: 0.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }

    /// Load with an explicit config file instead of the default lookup.
    /// The file must exist; env overrides still apply on top.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let mut cfg = Self::default();
        let file_overrides = load_file_overrides(path)?.ok_or_else(|| {
            TracebenchError::Config(format!("config file not found: {}", path.display()))
        })?;
        apply_overrides(&mut cfg, file_overrides, "config file")?;
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Union of every category's patterns, the "total critical I/O" view.
    pub fn all_patterns(&self) -> Vec<NamePattern> {
        self.categories
            .iter()
            .flat_map(|c| c.name_patterns())
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    warmup_iterations: Option<usize>,
    benchmark_marker: Option<Vec<String>>,
    categories: Option<Vec<Category>>,
    token_category: Option<String>,
    input_token_price_per_million: Option<f64>,
    output_token_price_per_million: Option<f64>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("TRACEBENCH_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("tracebench/config.toml")
}

fn load_file_overrides(path: &PathBuf) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| TracebenchError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| TracebenchError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> Result<ConfigOverrides> {
    let warmup_iterations = match env::var("TRACEBENCH_WARMUP_ITERATIONS") {
        Ok(v) => Some(v.parse::<usize>().map_err(|e| {
            TracebenchError::Config(format!(
                "bad TRACEBENCH_WARMUP_ITERATIONS in environment: {e}"
            ))
        })?),
        Err(_) => None,
    };

    Ok(ConfigOverrides {
        warmup_iterations,
        benchmark_marker: env::var("TRACEBENCH_BENCHMARK_MARKER")
            .ok()
            .map(|v| parse_marker_list(&v)),
        categories: None,
        token_category: env::var("TRACEBENCH_TOKEN_CATEGORY").ok(),
        input_token_price_per_million: parse_env_price(
            "TRACEBENCH_INPUT_TOKEN_PRICE_PER_MILLION",
        )?,
        output_token_price_per_million: parse_env_price(
            "TRACEBENCH_OUTPUT_TOKEN_PRICE_PER_MILLION",
        )?,
    })
}

fn parse_env_price(var: &str) -> Result<Option<f64>> {
    match env::var(var) {
        Ok(v) => v
            .parse::<f64>()
            .map(Some)
            .map_err(|e| TracebenchError::Config(format!("bad {var} in environment: {e}"))),
        Err(_) => Ok(None),
    }
}

fn parse_marker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.warmup_iterations {
        cfg.warmup_iterations = v;
    }
    if let Some(v) = overrides.benchmark_marker {
        cfg.benchmark_marker = BenchmarkMarker::new(v);
    }
    if let Some(v) = overrides.categories {
        for category in &v {
            if category.name.trim().is_empty() || category.patterns.is_empty() {
                return Err(TracebenchError::Config(format!(
                    "bad category in {source}: name and patterns are required"
                )));
            }
        }
        cfg.categories = v;
    }
    if let Some(v) = overrides.token_category {
        cfg.token_category = v;
    }
    if let Some(v) = overrides.input_token_price_per_million {
        cfg.input_token_price_per_million = v;
    }
    if let Some(v) = overrides.output_token_price_per_million {
        cfg.output_token_price_per_million = v;
    }
    Ok(())
}

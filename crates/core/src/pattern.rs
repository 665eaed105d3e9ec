use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchMode {
    Prefix,
    Substring,
}

/// Case-insensitive matcher over span names. The needle is lower-cased once
/// at construction; span names are lower-cased per match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamePattern {
    needle: String,
    mode: MatchMode,
}

impl NamePattern {
    pub fn prefix(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
            mode: MatchMode::Prefix,
        }
    }

    pub fn substring(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
            mode: MatchMode::Substring,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        match self.mode {
            MatchMode::Prefix => name.starts_with(&self.needle),
            MatchMode::Substring => name.contains(&self.needle),
        }
    }
}

pub fn matches_any(name: &str, patterns: &[NamePattern]) -> bool {
    patterns.iter().any(|p| p.matches(name))
}

/// Identifies the designated benchmark operation: every substring must
/// appear in the span name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BenchmarkMarker {
    pub substrings: Vec<String>,
}

impl Default for BenchmarkMarker {
    fn default() -> Self {
        Self {
            substrings: vec!["http".to_string(), "benchmark/analyze".to_string()],
        }
    }
}

impl BenchmarkMarker {
    pub fn new(substrings: Vec<String>) -> Self {
        Self {
            substrings: substrings.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        !self.substrings.is_empty() && self.substrings.iter().all(|s| name.contains(s))
    }
}

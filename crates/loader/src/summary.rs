use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Sidecar metadata captured next to each trace dump by the benchmark
/// harness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    #[serde(default)]
    pub warmup_iterations: usize,
    #[serde(default = "default_real_iterations")]
    pub real_iterations: usize,
}

fn default_real_iterations() -> usize {
    1
}

/// Read `execution-summary.json` from the dump's directory. Absent or
/// malformed sidecars degrade to None.
pub fn read_sidecar(trace_path: &Path) -> Option<ExecutionSummary> {
    let path = trace_path.parent()?.join("execution-summary.json");
    if !path.exists() {
        return None;
    }

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed reading execution summary");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed parsing execution summary");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_sidecar_next_to_dump() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("raw-traces.json");
        std::fs::write(
            dir.path().join("execution-summary.json"),
            r#"{"warmupIterations": 2, "realIterations": 10}"#,
        )
        .unwrap();

        let summary = read_sidecar(&dump).unwrap();
        assert_eq!(summary.warmup_iterations, 2);
        assert_eq!(summary.real_iterations, 10);
    }

    #[test]
    fn defaults_missing_fields() {
        let summary: ExecutionSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary.warmup_iterations, 0);
        assert_eq!(summary.real_iterations, 1);
    }

    #[test]
    fn absent_or_malformed_sidecar_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("raw-traces.json");
        assert!(read_sidecar(&dump).is_none());

        std::fs::write(dir.path().join("execution-summary.json"), "not json").unwrap();
        assert!(read_sidecar(&dump).is_none());
    }
}

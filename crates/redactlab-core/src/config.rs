//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entity::RedactionMode;

pub const DEFAULT_PORT: u16 = 3010;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 10_000;
/// 4M cells is a 32 MB alignment table.
pub const DEFAULT_MAX_DIFF_CELLS: usize = 4_000_000;
pub const DEFAULT_EXTRACTOR_TIMEOUT_SECS: u64 = 30;

/// Paths to RedactLab data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Extractor provider configuration (`data/extractor-config.json`).
    pub extractor_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            extractor_config_file: root.join("extractor-config.json"),
            root,
        })
    }
}

/// Top-level RedactLab configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactLabConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Upper bound on input length, in characters. Bounds the quadratic
    /// running time of edit distance.
    pub max_text_chars: usize,
    /// Upper bound on the token alignment table, `(m + 1) * (n + 1)` cells
    /// for token counts `m` and `n`. Bounds the diff's memory.
    pub max_diff_cells: usize,
    /// How long the pipeline waits for the semantic extractor.
    pub extractor_timeout_secs: u64,
    /// Whether the extractor should use its slower, more accurate model.
    pub high_accuracy: bool,
    /// Mode used when a request does not name one.
    pub default_mode: RedactionMode,
}

impl RedactLabConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(data_dir: impl AsRef<Path>, lookup: F) -> std::io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let max_text_chars = lookup("REDACTLAB_MAX_TEXT_CHARS")
            .and_then(|v| v.parse().ok())
            .filter(|&v: &usize| v > 0)
            .unwrap_or(DEFAULT_MAX_TEXT_CHARS);
        let max_diff_cells = lookup("REDACTLAB_MAX_DIFF_CELLS")
            .and_then(|v| v.parse().ok())
            .filter(|&v: &usize| v > 0)
            .unwrap_or(DEFAULT_MAX_DIFF_CELLS);
        let extractor_timeout_secs = lookup("REDACTLAB_EXTRACTOR_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EXTRACTOR_TIMEOUT_SECS);
        let high_accuracy = lookup("REDACTLAB_HIGH_ACCURACY")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let default_mode = lookup("REDACTLAB_DEFAULT_MODE")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            max_text_chars,
            max_diff_cells,
            extractor_timeout_secs,
            high_accuracy,
            default_mode,
        })
    }
}

//! Configuration for the verification engine.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CITEPROOF_MAX_PHRASE_BYTES, CITEPROOF_MAX_DOCUMENT_BYTES)
//! 2. Config file (.citeproof/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .citeproof/config.yaml
//! - Falls back to ~/.citeproof/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::safety::SafetyLimits;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".citeproof";
const CONFIG_FILE: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(flatten)]
    pub engine: EngineConfig,
}

/// Tunables for every engine component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub ambiguity: AmbiguitySettings,
    #[serde(default)]
    pub highlight: HighlightSettings,
    #[serde(default)]
    pub safety: SafetyLimits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// ±lines searched by the nearby-lines strategy
    #[serde(default = "default_nearby_line_radius")]
    pub nearby_line_radius: u32,

    /// ±lines searched by the expanded line buffer
    #[serde(default = "default_expanded_line_radius")]
    pub expanded_line_radius: u32,

    /// ±pages searched by the adjacent-pages strategy
    #[serde(default = "default_adjacent_page_radius")]
    pub adjacent_page_radius: u32,

    /// ±pages searched by the expanded window
    #[serde(default = "default_expanded_page_window")]
    pub expanded_page_window: u32,

    /// Leading words used by the key-span fallback
    #[serde(default = "default_key_span_words")]
    pub key_span_words: usize,

    /// Vertical slack, as a fraction of item height, for items to share a line
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: f64,
}

fn default_nearby_line_radius() -> u32 {
    2
}
fn default_expanded_line_radius() -> u32 {
    10
}
fn default_adjacent_page_radius() -> u32 {
    1
}
fn default_expanded_page_window() -> u32 {
    3
}
fn default_key_span_words() -> usize {
    3
}
fn default_line_tolerance() -> f64 {
    0.5
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            nearby_line_radius: default_nearby_line_radius(),
            expanded_line_radius: default_expanded_line_radius(),
            adjacent_page_radius: default_adjacent_page_radius(),
            expanded_page_window: default_expanded_page_window(),
            key_span_words: default_key_span_words(),
            line_tolerance: default_line_tolerance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguitySettings {
    /// Occurrence counts up to this value still rate `medium` confidence
    #[serde(default = "default_medium_max_occurrences")]
    pub medium_max_occurrences: usize,
}

fn default_medium_max_occurrences() -> usize {
    3
}

impl Default for AmbiguitySettings {
    fn default() -> Self {
        Self {
            medium_max_occurrences: default_medium_max_occurrences(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSettings {
    /// Minimum phrase/anchor word-count gap for a separate anchor highlight
    #[serde(default = "default_min_word_difference")]
    pub min_word_difference: usize,

    /// Characters of context kept in the match snippet
    #[serde(default = "default_snippet_window")]
    pub snippet_window: usize,
}

fn default_min_word_difference() -> usize {
    2
}
fn default_snippet_window() -> usize {
    160
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            min_word_difference: default_min_word_difference(),
            snippet_window: default_snippet_window(),
        }
    }
}

/// Resolved configuration and where it came from
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub engine: EngineConfig,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
        .filter(|path| path.exists())
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Apply environment overrides on top of file/default settings
fn apply_env_overrides(engine: &mut EngineConfig) -> Result<()> {
    if let Some(bytes) = env_usize("CITEPROOF_MAX_PHRASE_BYTES")? {
        engine.safety.max_phrase_bytes = bytes;
    }
    if let Some(bytes) = env_usize("CITEPROOF_MAX_DOCUMENT_BYTES")? {
        engine.safety.max_document_bytes = bytes;
    }
    Ok(())
}

fn env_usize(name: &str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: {}", name, value)),
        Err(_) => Ok(None),
    }
}

/// Load configuration from an explicit file, or discover one
pub fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let config_file = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };

    let mut engine = match config_file {
        Some(ref path) => load_config_file(path)?.engine,
        None => EngineConfig::default(),
    };
    apply_env_overrides(&mut engine)?;

    Ok(ResolvedConfig {
        engine,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config(None).map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
search:
  nearby_line_radius: 4
ambiguity:
  medium_max_occurrences: 5
safety:
  max_phrase_bytes: 2048
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.engine.search.nearby_line_radius, 4);
        assert_eq!(config.engine.search.expanded_line_radius, 10);
        assert_eq!(config.engine.ambiguity.medium_max_occurrences, 5);
        assert_eq!(config.engine.highlight.min_word_difference, 2);
        assert_eq!(config.engine.safety.max_phrase_bytes, 2048);
        assert_eq!(config.engine.safety.max_document_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_explicit_path_is_used() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "version: \"1.0\"\nhighlight:\n  snippet_window: 40\n").unwrap();

        let resolved = load_config(Some(&path)).unwrap();
        assert_eq!(resolved.config_file.as_deref(), Some(path.as_path()));
        assert_eq!(resolved.engine.highlight.snippet_window, 40);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_defaults() {
        let engine = EngineConfig::default();
        assert_eq!(engine.search.nearby_line_radius, 2);
        assert_eq!(engine.search.key_span_words, 3);
        assert_eq!(engine.ambiguity.medium_max_occurrences, 3);
        assert_eq!(engine.highlight.snippet_window, 160);
    }
}

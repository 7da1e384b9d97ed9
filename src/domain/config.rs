use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{ConfigTree, TreeError};

/// Configuration of a single book.
///
/// Loaded from JSON, YAML or TOML. Only `chapters` is required; its key
/// order is the order of the book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookConfig {
    /// Title shown at the top of the table of contents.
    pub title: String,

    /// Ordinal every depth of the numbering starts from.
    pub start_chap_num: u32,

    /// Topics the book assumes readers know, separated by `;`.
    assumes: Option<String>,

    /// Whether to skip collecting to-do annotations.
    pub suppress_todo: bool,

    /// Whether to append the gradebook module after the chapters.
    pub gradebook: bool,

    /// Directory holding the module sources.
    source_dir: PathBuf,

    /// Directory the book is written to.
    output_dir: PathBuf,

    /// The chapter tree.
    pub chapters: ConfigTree,

    /// Directory of the file this was loaded from; relative paths resolve
    /// against it.
    base_dir: PathBuf,
}

/// The file as written. `chapters` stays an ordered mapping until the whole
/// document has parsed, so tree errors are reported on their own.
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    title: String,
    #[serde(default)]
    start_chap_num: u32,
    #[serde(default)]
    assumes: Option<String>,
    #[serde(default)]
    suppress_todo: bool,
    #[serde(default = "default_true")]
    gradebook: bool,
    #[serde(default = "default_source_dir")]
    source_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    chapters: Map<String, Value>,
}

/// Errors raised while loading a [`BookConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// The config file.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },

    /// The file is not valid JSON for a book.
    #[error("failed to parse config file {}: {source}", path.display())]
    Json {
        /// The config file.
        path: PathBuf,
        /// The decoding error.
        source: serde_json::Error,
    },

    /// The file is not valid YAML for a book.
    #[error("failed to parse config file {}: {source}", path.display())]
    Yaml {
        /// The config file.
        path: PathBuf,
        /// The decoding error.
        source: serde_yaml::Error,
    },

    /// The file is not valid TOML for a book.
    #[error("failed to parse config file {}: {source}", path.display())]
    Toml {
        /// The config file.
        path: PathBuf,
        /// The decoding error.
        source: toml::de::Error,
    },

    /// The `chapters` mapping does not form a chapter tree.
    #[error("invalid chapter tree in {}: {source}", path.display())]
    Tree {
        /// The config file.
        path: PathBuf,
        /// What is wrong with the tree.
        source: TreeError,
    },
}

impl BookConfig {
    /// Loads a book configuration, choosing the format by file extension
    /// (`.yaml`/`.yml`, `.toml`, anything else is read as JSON).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or its
    /// `chapters` do not form a chapter tree.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map(str::to_ascii_lowercase);

        let document: Document = match extension.as_deref() {
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            _ => serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
        };

        let chapters =
            ConfigTree::try_from(document.chapters).map_err(|source| ConfigError::Tree {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Self {
            title: document.title,
            start_chap_num: document.start_chap_num,
            assumes: document.assumes,
            suppress_todo: document.suppress_todo,
            gradebook: document.gradebook,
            source_dir: document.source_dir,
            output_dir: document.output_dir,
            chapters,
            base_dir: path.parent().map_or_else(PathBuf::new, Path::to_path_buf),
        };

        tracing::debug!(
            modules = config.chapters.module_count(),
            "Loaded book config from {}",
            path.display()
        );

        Ok(config)
    }

    /// Topics the book assumes, trimmed, empty entries dropped.
    #[must_use]
    pub fn assumed_topics(&self) -> Vec<String> {
        self.assumes
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Directory holding the module sources.
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.base_dir.join(&self.source_dir)
    }

    /// Directory the book is written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir)
    }
}

const fn default_true() -> bool {
    true
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("RST/source")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build")
}

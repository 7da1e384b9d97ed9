//! Fact extraction from reStructuredText module sources.
//!
//! This is a line scanner, not an RST parser. It recognises the handful of
//! directives that matter for composing a book:
//!
//! - `figure`, `image` and `odsafig` directives reference images
//! - `inlineav` and `avembed` directives reference exercises
//! - `todo` directives (with an optional `:type:` option) are annotations
//! - `:satisfies:` options list prerequisite topics the module covers
//! - a `.. _label:` target directly above a `figure`, `odsafig`, `table`,
//!   `math` or `topic` directive names a numbered object

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::domain::{ModuleContext, ModuleFactExtractor, ModuleFacts, TodoNote};

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\.\.\s+(?:figure|image|odsafig)::\s+(\S+)").expect("valid regex")
});

static EXERCISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\.\.\s+(inlineav|avembed)::\s+(\S+)").expect("valid regex")
});

static TODO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\.\.\s+(?i:todo)::").expect("valid regex"));

static TODO_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+:type:\s*(.*?)\s*$").expect("valid regex"));

static SATISFIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:satisfies:\s*(.*)$").expect("valid regex"));

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\.\s+_([^:]+):\s*$").expect("valid regex"));

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\.\.\s+(?:figure|odsafig|table|math|topic)::").expect("valid regex")
});

/// Reads module facts from `.rst` files below a source directory.
#[derive(Debug, Clone)]
pub struct RstExtractor {
    source_dir: PathBuf,
    suppress_todo: bool,
}

/// Errors raised while reading a module source.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The module source could not be read.
    #[error("failed to read module source {}", path.display())]
    Read {
        /// The file that was looked for.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },
}

impl RstExtractor {
    /// Creates an extractor reading sources below `source_dir`.
    #[must_use]
    pub const fn new(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            suppress_todo: false,
        }
    }

    /// Skips to-do annotations when `suppress` is set.
    #[must_use]
    pub const fn suppress_todo(mut self, suppress: bool) -> Self {
        self.suppress_todo = suppress;
        self
    }

    /// The source file of a module key; `.rst` is appended when the key has
    /// no extension.
    #[must_use]
    pub fn source_path(&self, key: &str) -> PathBuf {
        let path = self.source_dir.join(key);
        if path.extension().is_some() {
            path
        } else {
            path.with_extension("rst")
        }
    }

    /// Scans module `text` as if it were the source of `module`.
    #[must_use]
    pub fn scan(&self, text: &str, module: &ModuleContext<'_>) -> ModuleFacts {
        let mut facts = ModuleFacts::default();
        let number = module.number();
        let mut numbered = 0;
        let mut pending_label: Option<&str> = None;

        let source: Vec<&str> = text.lines().collect();
        let mut i = 0;
        while i < source.len() {
            let line = source[i];

            if let Some(label) = pending_label.take() {
                if line.trim().is_empty() {
                    pending_label = Some(label);
                } else if NUMBERED_RE.is_match(line) {
                    numbered += 1;
                    facts
                        .references
                        .push((label.to_string(), format!("{number}.{numbered}")));
                }
            }

            if let Some(caps) = LABEL_RE.captures(line) {
                pending_label = caps.get(1).map(|m| m.as_str().trim());
            }

            if let Some(caps) = IMAGE_RE.captures(line) {
                let target = &caps[1];
                let image = target.strip_prefix("Images/").unwrap_or(target);
                facts.images.push(image.to_string());
            }

            if let Some(caps) = EXERCISE_RE.captures(line) {
                // avembed points at a file; the exercise is its stem
                let name = if &caps[1] == "avembed" {
                    Path::new(&caps[2])
                        .file_stem()
                        .and_then(OsStr::to_str)
                        .unwrap_or(&caps[2])
                        .to_string()
                } else {
                    caps[2].to_string()
                };
                if !module.attributes.exercises.contains_key(&name) {
                    facts.missing_exercises.push(name);
                }
            }

            if let Some(caps) = SATISFIES_RE.captures(line) {
                facts.requirements_satisfied.extend(
                    caps[1]
                        .split(';')
                        .map(str::trim)
                        .filter(|topic| !topic.is_empty())
                        .map(ToString::to_string),
                );
            }

            if let Some(caps) = TODO_RE.captures(line) {
                let indent = caps[1].len();
                let end = block_end(&source, i, indent);
                if !self.suppress_todo {
                    facts.todos.push(todo_note(&source[i..end]));
                }
                i = end;
                continue;
            }

            i += 1;
        }

        facts
    }
}

/// Index one past the last line of the directive starting at `start`.
///
/// The block runs while lines are blank or indented deeper than the
/// directive; trailing blank lines are not part of it.
fn block_end(source: &[&str], start: usize, indent: usize) -> usize {
    let mut end = start + 1;
    let mut last_content = start + 1;
    while end < source.len() {
        let line = source[end];
        if line.trim().is_empty() {
            end += 1;
            continue;
        }
        let line_indent = line.len() - line.trim_start().len();
        if line_indent <= indent {
            break;
        }
        end += 1;
        last_content = end;
    }
    last_content
}

fn todo_note(block: &[&str]) -> TodoNote {
    let category = block
        .iter()
        .skip(1)
        .find_map(|line| TODO_TYPE_RE.captures(line))
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    let mut content = block.join("\n");
    content.push('\n');

    TodoNote { category, content }
}

impl ModuleFactExtractor for RstExtractor {
    type Error = ExtractError;

    fn extract(&self, module: &ModuleContext<'_>) -> Result<ModuleFacts, Self::Error> {
        let path = self.source_path(module.key);
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ExtractError::Read { path, source })?;
        Ok(self.scan(&text, module))
    }
}

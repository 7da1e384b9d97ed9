//! Writing a composed book to disk.
//!
//! The [`BookWriter`] renders a [`Composition`] into the files the document
//! toolchain reads: the RST index and to-do page under `source/`, and the
//! reference table and chapter index as JSON next to them.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::domain::{Composition, TocEntry, TodoGroup};

/// Underline characters for section headings, by depth.
const HEADER_CHARS: [char; 8] = ['=', '-', '`', '\'', '.', '*', '+', '^'];

/// Name of the generated to-do page.
pub const TODO_PAGE: &str = "ToDo";

const HORIZONTAL_RULE: &str = "\n----\n";

/// Writes the artifacts of a composition into a book directory.
#[derive(Debug, Clone)]
pub struct BookWriter {
    book_dir: PathBuf,
}

/// Details of the book that are not part of the composition.
#[derive(Debug, Clone, Copy)]
pub struct IndexHeader<'a> {
    /// Book title.
    pub title: &'a str,
    /// Ordinal the numbering starts from.
    pub start_ordinal: u32,
    /// Generation timestamp, already formatted.
    pub generated: &'a str,
}

impl BookWriter {
    /// Creates a writer targeting `book_dir`.
    #[must_use]
    pub const fn new(book_dir: PathBuf) -> Self {
        Self { book_dir }
    }

    /// Directory RST sources are written to.
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.book_dir.join("source")
    }

    /// Writes every artifact, returning the paths written.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or a file cannot be
    /// written.
    pub fn write(
        &self,
        composition: &Composition,
        header: &IndexHeader<'_>,
    ) -> io::Result<Vec<PathBuf>> {
        let source_dir = self.source_dir();
        fs::create_dir_all(&source_dir)?;

        let todos = composition.todos.emit();
        let mut written = Vec::new();

        written.push(write_file(
            &source_dir.join("index.rst"),
            &render_index(composition, header, !todos.is_empty()),
        )?);

        if !todos.is_empty() {
            written.push(write_file(
                &source_dir.join(format!("{TODO_PAGE}.rst")),
                &render_todo(&todos),
            )?);
        }

        written.push(write_file(
            &self.book_dir.join("table.json"),
            &to_json(&composition.references)?,
        )?);
        written.push(write_file(
            &self.book_dir.join("page_chapter.json"),
            &to_json(&composition.chapters)?,
        )?);

        Ok(written)
    }
}

fn write_file(path: &Path, content: &str) -> io::Result<PathBuf> {
    fs::write(path, content)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}

fn to_json<T: serde::Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string(value).map_err(io::Error::other)
}

fn underline(title: &str, depth: usize) -> String {
    let c = HEADER_CHARS
        .get(depth)
        .or(HEADER_CHARS.last())
        .copied()
        .unwrap_or('=');
    c.to_string().repeat(title.chars().count())
}

/// Renders the table of contents as `index.rst`.
#[must_use]
pub fn render_index(
    composition: &Composition,
    header: &IndexHeader<'_>,
    has_todo: bool,
) -> String {
    let mut out = format!(
        ".. Generated {}\n.. start_chap_num: {}\n\n",
        header.generated, header.start_ordinal
    );

    if !header.title.is_empty() {
        out.push_str(&format!(
            "{}\n{}\n\n",
            header.title,
            "=".repeat(header.title.chars().count())
        ));
    }

    for entry in &composition.toc {
        match entry {
            TocEntry::Heading { title, depth } => {
                out.push_str(&format!("\n{title}\n{}\n\n", underline(title, *depth)));
                out.push_str(".. toctree::\n   :numbered:\n   :maxdepth: 3\n\n");
            }
            TocEntry::Module { identity, .. } => {
                out.push_str(&format!("   {identity}\n"));
            }
        }
    }

    out.push_str("\n.. toctree::\n   :maxdepth: 3\n\n");
    for identity in &composition.appendix {
        out.push_str(&format!("   {identity}\n"));
    }
    if has_todo {
        out.push_str(&format!("   {TODO_PAGE}\n"));
    }

    out.push_str("\n* :ref:`genindex`\n* :ref:`search`\n");
    out
}

/// Renders grouped to-do annotations as `ToDo.rst`.
#[must_use]
pub fn render_todo(groups: &[TodoGroup]) -> String {
    let mut out = format!("{TODO_PAGE}\n{}\n\n", "=".repeat(TODO_PAGE.len()));

    for group in groups {
        let category = &group.category;
        out.push_str(&format!(
            "{HORIZONTAL_RULE}\n{category}\n{}\n{HORIZONTAL_RULE}\n\n",
            "=".repeat(category.chars().count())
        ));

        for (module, content) in &group.items {
            let source = format!("source: {module}");
            out.push_str(&format!(
                "{source}\n{}\n\n",
                "-".repeat(source.chars().count())
            ));
            out.push_str(content);
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigTree, Identity, NoFacts, TreeWalker};

    const HEADER: IndexHeader<'static> = IndexHeader {
        title: "Data Structures",
        start_ordinal: 1,
        generated: "2024-01-01 00:00:00",
    };

    fn composition() -> Composition {
        let tree: ConfigTree = serde_json::from_str(
            r#"{
                "Intro": {
                    "Intro/Preface": { "exercises": {} },
                    "Basics": { "Intro/Lists": { "exercises": {} } }
                },
                "Empty": {}
            }"#,
        )
        .unwrap();
        let mut walker = TreeWalker::new(NoFacts, 1);
        walker.walk(&tree).unwrap();
        walker.visit_trailing_module("Gradebook").unwrap();
        walker.finish()
    }

    #[test]
    fn index_lists_headings_and_modules_in_order() {
        let index = render_index(&composition(), &HEADER, false);

        let intro = index.find("\nIntro\n=====\n").unwrap();
        let preface = index.find("   Preface\n").unwrap();
        let basics = index.find("\nBasics\n------\n").unwrap();
        let lists = index.find("   Lists\n").unwrap();
        let gradebook = index.find("   Gradebook\n").unwrap();

        assert!(intro < preface && preface < basics && basics < lists && lists < gradebook);
        assert!(index.starts_with(".. Generated 2024-01-01 00:00:00\n"));
        assert!(index.contains("Data Structures\n===============\n"));
        assert!(!index.contains(TODO_PAGE));
        assert!(index.ends_with("* :ref:`genindex`\n* :ref:`search`\n"));
    }

    #[test]
    fn index_links_todo_page_when_present() {
        let index = render_index(&composition(), &HEADER, true);
        assert!(index.contains("   Gradebook\n   ToDo\n"));
    }

    #[test]
    fn todo_page_has_category_and_source_headers() {
        let id = |key| Identity::from_key(key).unwrap();
        let groups = vec![
            TodoGroup {
                category: "Exercise".to_string(),
                items: vec![
                    (id("Lists"), ".. todo::\n\n   one\n".to_string()),
                    (id("Trees"), ".. todo::\n\n   two\n".to_string()),
                ],
            },
            TodoGroup {
                category: "No Category".to_string(),
                items: vec![(id("Lists"), ".. todo::\n\n   three\n".to_string())],
            },
        ];

        let page = render_todo(&groups);

        let exercise = page.find("\nExercise\n========\n").unwrap();
        let lists = page.find("source: Lists\n-------------\n").unwrap();
        let trees = page.find("source: Trees\n-------------\n").unwrap();
        let none = page.find("\nNo Category\n===========\n").unwrap();
        assert!(exercise < lists && lists < trees && trees < none);
        assert_eq!(page.matches("source: ").count(), 3);
    }

    #[test]
    fn write_emits_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = BookWriter::new(tmp.path().join("book"));

        let written = writer.write(&composition(), &HEADER).unwrap();

        assert_eq!(written.len(), 3);
        assert!(tmp.path().join("book/source/index.rst").exists());
        assert!(!tmp.path().join("book/source/ToDo.rst").exists());

        let table: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(tmp.path().join("book/table.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(table["Preface"], "1.2");
        assert_eq!(table["Lists"], "1.2.2");
        assert_eq!(table["Intro"], "Preface");
        assert_eq!(table["Empty"], -1);
        assert_eq!(table["Gradebook"], "");

        let chapters: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(tmp.path().join("book/page_chapter.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(chapters["Lists"], serde_json::json!(["Basics", "1.2"]));
    }

    #[test]
    fn deep_headings_reuse_last_underline() {
        assert_eq!(underline("abc", 0), "===");
        assert_eq!(underline("abc", 7), "^^^");
        assert_eq!(underline("abc", 12), "^^^");
    }
}

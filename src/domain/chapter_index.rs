use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::Identity;

/// Where a module sits: its enclosing section and that section's numbering.
///
/// Serialized as a `[section, prefix]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "(String, String)")]
pub struct ChapterEntry {
    /// Name of the enclosing section, empty for modules outside any section.
    pub section: String,
    /// Numbering of the module excluding its own final ordinal.
    pub prefix: String,
}

impl From<ChapterEntry> for (String, String) {
    fn from(entry: ChapterEntry) -> Self {
        (entry.section, entry.prefix)
    }
}

/// Per-module chapter membership, consumed when renumbering rendered pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChapterIndex {
    entries: BTreeMap<Identity, ChapterEntry>,
}

impl ChapterIndex {
    /// Records the chapter membership of a module.
    pub fn record(&mut self, module: Identity, section: Option<&Identity>, prefix: String) {
        let section = section.map_or_else(String::new, ToString::to_string);
        self.entries
            .insert(module, ChapterEntry { section, prefix });
    }

    /// Looks up a module.
    #[must_use]
    pub fn get(&self, module: &str) -> Option<&ChapterEntry> {
        self.entries.get(module)
    }

    /// Number of recorded modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

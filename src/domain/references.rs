//! The book-wide cross-reference table.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// What a reference to a section, module or numbered object points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceToken {
    /// Registered but not yet resolved. Sections with no module beneath them
    /// keep this value; consumers treat it as "no target".
    Unresolved,
    /// A section, represented by the first module found inside it.
    FirstModule(String),
    /// A numbering string such as `1.3` or `1.3.2`.
    Number(String),
}

impl ReferenceToken {
    /// Returns `true` for [`ReferenceToken::Unresolved`].
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// The resolved target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Unresolved => None,
            Self::FirstModule(target) | Self::Number(target) => Some(target),
        }
    }
}

/// Serialized as `-1` when unresolved and as a string otherwise, which is the
/// shape the reference directives read from `table.json`.
impl Serialize for ReferenceToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.target() {
            None => serializer.serialize_i64(-1),
            Some(target) => serializer.serialize_str(target),
        }
    }
}

/// Mapping from every section, module and module-local label to its
/// [`ReferenceToken`].
///
/// Writes are last-writer-wins, except for
/// [`resolve_section`](Self::resolve_section) which never replaces a
/// resolved entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReferenceRegistry {
    entries: BTreeMap<String, ReferenceToken>,
}

impl ReferenceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as [`ReferenceToken::Unresolved`], replacing any
    /// earlier entry.
    pub fn register_placeholder(&mut self, name: &str) {
        self.entries
            .insert(name.to_string(), ReferenceToken::Unresolved);
    }

    /// Points an unresolved section entry at `module`.
    ///
    /// Does nothing if the section is already resolved or was never
    /// registered.
    pub fn resolve_section(&mut self, section: &str, module: &str) {
        if let Some(token) = self.entries.get_mut(section) {
            if token.is_unresolved() {
                *token = ReferenceToken::FirstModule(module.to_string());
            }
        }
    }

    /// Sets the numbering string of a module.
    pub fn set_module_number(&mut self, module: &str, number: String) {
        self.entries
            .insert(module.to_string(), ReferenceToken::Number(number));
    }

    /// Overlays bindings contributed by a module, in order.
    ///
    /// Every binding is inserted or overwrites the existing entry, so a later
    /// binding for the same key wins over an earlier one.
    pub fn overlay<I>(&mut self, bindings: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, number) in bindings {
            self.entries.insert(name, ReferenceToken::Number(number));
        }
    }

    /// Looks up a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReferenceToken> {
        self.entries.get(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names still unresolved after the walk, in name order.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, token)| token.is_unresolved())
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(s: &str) -> ReferenceToken {
        ReferenceToken::Number(s.to_string())
    }

    #[test]
    fn placeholder_is_unresolved() {
        let mut registry = ReferenceRegistry::new();
        registry.register_placeholder("Intro");

        assert_eq!(registry.get("Intro"), Some(&ReferenceToken::Unresolved));
        assert_eq!(registry.unresolved().collect::<Vec<_>>(), ["Intro"]);
    }

    #[test]
    fn section_resolves_to_first_module_only() {
        let mut registry = ReferenceRegistry::new();
        registry.register_placeholder("Intro");
        registry.resolve_section("Intro", "Preface");
        registry.resolve_section("Intro", "Lists");

        assert_eq!(
            registry.get("Intro"),
            Some(&ReferenceToken::FirstModule("Preface".to_string()))
        );
    }

    #[test]
    fn resolving_unknown_section_is_a_no_op() {
        let mut registry = ReferenceRegistry::new();
        registry.resolve_section("Missing", "Preface");
        assert!(registry.is_empty());
    }

    #[test]
    fn overlay_overwrites_placeholder() {
        let mut registry = ReferenceRegistry::new();
        registry.register_placeholder("fig-list");
        registry.overlay([("fig-list".to_string(), "1.2.1".to_string())]);

        assert_eq!(registry.get("fig-list"), Some(&number("1.2.1")));
    }

    #[test]
    fn later_overlay_wins() {
        let mut registry = ReferenceRegistry::new();
        registry.overlay([("fig-list".to_string(), "1.2.1".to_string())]);
        registry.overlay([("fig-list".to_string(), "1.3.1".to_string())]);

        assert_eq!(registry.get("fig-list"), Some(&number("1.3.1")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn overlay_overwrites_section_entry() {
        let mut registry = ReferenceRegistry::new();
        registry.register_placeholder("Intro");
        registry.resolve_section("Intro", "Preface");
        registry.overlay([("Intro".to_string(), "4.1".to_string())]);

        assert_eq!(registry.get("Intro"), Some(&number("4.1")));
    }

    #[test]
    fn serializes_unresolved_as_minus_one() {
        let mut registry = ReferenceRegistry::new();
        registry.register_placeholder("Empty");
        registry.register_placeholder("Intro");
        registry.resolve_section("Intro", "Preface");
        registry.set_module_number("Preface", "1.2".to_string());

        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"{"Empty":-1,"Intro":"Preface","Preface":"1.2"}"#);
    }
}

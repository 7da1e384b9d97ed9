//! Collection and grouping of to-do annotations.

use crate::domain::Identity;

/// Label used for annotations declared without a category.
pub const NO_CATEGORY: &str = "No Category";

/// A to-do annotation found in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    /// The module the annotation came from.
    pub module: Identity,
    /// The declared category, possibly empty.
    pub category: String,
    /// The raw annotation text.
    pub content: String,
}

/// One category's run of annotations, in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoGroup {
    /// The category label, with the empty category normalized to
    /// [`NO_CATEGORY`].
    pub category: String,
    /// `(module, content)` pairs.
    pub items: Vec<(Identity, String)>,
}

/// Accumulates annotations during the walk.
#[derive(Debug, Clone, Default)]
pub struct TodoAggregator {
    entries: Vec<TodoEntry>,
}

impl TodoAggregator {
    /// Adds an annotation.
    pub fn add(&mut self, module: Identity, category: String, content: String) {
        self.entries.push(TodoEntry {
            module,
            category,
            content,
        });
    }

    /// Number of collected annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Groups the annotations by category.
    ///
    /// Groups come out in category order; within a group annotations keep
    /// the order they were added in.
    #[must_use]
    pub fn emit(&self) -> Vec<TodoGroup> {
        let mut sorted: Vec<_> = self
            .entries
            .iter()
            .map(|entry| {
                let category = if entry.category.is_empty() {
                    NO_CATEGORY
                } else {
                    entry.category.as_str()
                };
                (category, entry)
            })
            .collect();

        // stable: equal categories keep collection order
        sorted.sort_by_key(|&(category, _)| category);

        let mut groups: Vec<TodoGroup> = Vec::new();
        for (category, entry) in sorted {
            let item = (entry.module.clone(), entry.content.clone());
            match groups.last_mut() {
                Some(group) if group.category == category => group.items.push(item),
                _ => groups.push(TodoGroup {
                    category: category.to_string(),
                    items: vec![item],
                }),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(key: &str) -> Identity {
        Identity::from_key(key).unwrap()
    }

    fn contents(group: &TodoGroup) -> Vec<&str> {
        group.items.iter().map(|(_, c)| c.as_str()).collect()
    }

    #[test]
    fn groups_by_category_preserving_order() {
        let mut todos = TodoAggregator::default();
        todos.add(id("A"), "x".to_string(), "c1".to_string());
        todos.add(id("B"), "y".to_string(), "c2".to_string());
        todos.add(id("C"), "x".to_string(), "c3".to_string());

        let groups = todos.emit();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "x");
        assert_eq!(contents(&groups[0]), ["c1", "c3"]);
        assert_eq!(groups[0].items[1].0, id("C"));
        assert_eq!(groups[1].category, "y");
        assert_eq!(contents(&groups[1]), ["c2"]);
    }

    #[test]
    fn empty_category_is_normalized_before_sorting() {
        let mut todos = TodoAggregator::default();
        todos.add(id("A"), "Style".to_string(), "c1".to_string());
        todos.add(id("B"), String::new(), "c2".to_string());
        todos.add(id("C"), "Exercise".to_string(), "c3".to_string());

        let categories: Vec<_> = todos.emit().into_iter().map(|g| g.category).collect();

        assert_eq!(categories, ["Exercise", NO_CATEGORY, "Style"]);
    }

    #[test]
    fn explicit_no_category_merges_with_empty() {
        let mut todos = TodoAggregator::default();
        todos.add(id("A"), NO_CATEGORY.to_string(), "c1".to_string());
        todos.add(id("B"), String::new(), "c2".to_string());

        let groups = todos.emit();

        assert_eq!(groups.len(), 1);
        assert_eq!(contents(&groups[0]), ["c1", "c2"]);
    }

    #[test]
    fn nothing_collected_emits_nothing() {
        assert!(TodoAggregator::default().emit().is_empty());
    }
}

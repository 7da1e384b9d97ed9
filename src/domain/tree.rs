//! The declared chapter tree.
//!
//! A [`ConfigTree`] is an ordered mapping of keys to [`Node`]s. Key order is
//! document order. A node whose mapping carries an `exercises` key is a
//! module; every other mapping is a section.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key that marks a mapping as a module rather than a section.
const MODULE_MARKER: &str = "exercises";

/// An ordered, nested mapping of sections and modules.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ConfigTree {
    entries: Vec<Entry>,
}

/// One child of a [`ConfigTree`], in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    key: String,
    node: Node,
}

/// A section (interior node) or a module (leaf).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Groups further sections or modules.
    Section(ConfigTree),
    /// A leaf content unit.
    Module(ModuleAttributes),
}

/// Per-module attributes declared in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleAttributes {
    /// Exercises configured for this module, keyed by exercise name.
    ///
    /// Always present (possibly empty); its presence is what makes a node a
    /// module.
    pub exercises: BTreeMap<String, ExerciseAttributes>,

    /// Display name of the module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,

    /// Overrides whether the module can be marked complete.
    #[serde(
        default,
        rename = "dispModComp",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_completion: Option<bool>,
}

/// Configuration for a single exercise inside a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseAttributes {
    /// Display name of the exercise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Points awarded on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    /// Whether completion is needed to complete the module.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Score fraction counted as proficient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Initial visibility of an embedded exercise (`show`, `hide`, `none`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showhide: Option<String>,
    /// Drop the embedded exercise from the rendered module.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<bool>,
}

impl ConfigTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a section.
    #[must_use]
    pub fn section(mut self, key: impl Into<String>, children: Self) -> Self {
        self.entries.push(Entry {
            key: key.into(),
            node: Node::Section(children),
        });
        self
    }

    /// Appends a module.
    #[must_use]
    pub fn module(mut self, key: impl Into<String>, attributes: ModuleAttributes) -> Self {
        self.entries.push(Entry {
            key: key.into(),
            node: Node::Module(attributes),
        });
        self
    }

    /// Children in declared order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Returns `true` if the tree has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts the modules anywhere in the tree.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match &entry.node {
                Node::Module(_) => 1,
                Node::Section(children) => children.module_count(),
            })
            .sum()
    }
}

impl Entry {
    /// The key exactly as declared.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node under this key.
    #[must_use]
    pub const fn node(&self) -> &Node {
        &self.node
    }
}

/// Error produced when a configuration value cannot form a tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A node's value was not a mapping.
    #[error("'{0}' must be a mapping (a section or a module with an 'exercises' key)")]
    NotAMapping(String),

    /// A module's attributes did not match the expected shape.
    #[error("invalid attributes for module '{key}': {source}")]
    Module {
        /// The declared key of the module.
        key: String,
        /// The underlying decoding error.
        source: serde_json::Error,
    },
}

impl TryFrom<Map<String, Value>> for ConfigTree {
    type Error = TreeError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let Value::Object(fields) = value else {
                    return Err(TreeError::NotAMapping(key));
                };

                let node = if fields.contains_key(MODULE_MARKER) {
                    let attributes = serde_json::from_value(Value::Object(fields))
                        .map_err(|source| TreeError::Module {
                            key: key.clone(),
                            source,
                        })?;
                    Node::Module(attributes)
                } else {
                    Node::Section(Self::try_from(fields)?)
                };

                Ok(Entry { key, node })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { entries })
    }
}

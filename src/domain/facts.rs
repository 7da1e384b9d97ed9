//! The seam between the tree walk and whatever reads module sources.

use crate::domain::{Identity, ModuleAttributes, NumberingVector};

/// Everything the walk knows about a module at the moment it is visited.
#[derive(Debug, Clone, Copy)]
pub struct ModuleContext<'a> {
    /// The module's identity.
    pub identity: &'a Identity,
    /// The key exactly as declared in the chapter tree.
    pub key: &'a str,
    /// The declared attributes.
    pub attributes: &'a ModuleAttributes,
    /// Prerequisite topics satisfied by the book so far.
    pub satisfied: &'a [String],
    /// The immediately enclosing section, if any.
    pub section: Option<&'a Identity>,
    /// Depth of the module in the tree, 0 for direct children of the root.
    pub depth: usize,
    /// Numbering state at the time of the visit.
    pub numbering: &'a NumberingVector,
}

impl ModuleContext<'_> {
    /// The module's own numbering string.
    #[must_use]
    pub fn number(&self) -> String {
        self.numbering.module_number()
    }
}

/// An annotation left for authors, as found in a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoNote {
    /// Category label, empty if none was declared.
    pub category: String,
    /// The raw annotation text.
    pub content: String,
}

/// Facts a module contributes to the composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFacts {
    /// Images referenced by the module.
    pub images: Vec<String>,
    /// Exercises referenced in the module but absent from its configuration.
    pub missing_exercises: Vec<String>,
    /// Prerequisite topics the module satisfies.
    pub requirements_satisfied: Vec<String>,
    /// To-do annotations.
    pub todos: Vec<TodoNote>,
    /// Labels the module defines (figures, tables, ...) and their numbers,
    /// in source order.
    pub references: Vec<(String, String)>,
}

/// Supplies the [`ModuleFacts`] of a module.
pub trait ModuleFactExtractor {
    /// Error raised when a module cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the facts of the module described by `module`.
    ///
    /// # Errors
    ///
    /// Implementation defined; any error aborts the walk.
    fn extract(&self, module: &ModuleContext<'_>) -> Result<ModuleFacts, Self::Error>;
}

/// An extractor that reports no facts, for structure-only walks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFacts;

impl ModuleFactExtractor for NoFacts {
    type Error = std::convert::Infallible;

    fn extract(&self, _module: &ModuleContext<'_>) -> Result<ModuleFacts, Self::Error> {
        Ok(ModuleFacts::default())
    }
}

impl<E: ModuleFactExtractor + ?Sized> ModuleFactExtractor for &E {
    type Error = E::Error;

    fn extract(&self, module: &ModuleContext<'_>) -> Result<ModuleFacts, Self::Error> {
        (**self).extract(module)
    }
}

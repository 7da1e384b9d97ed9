//! Composition of a book from its chapter tree.
//!
//! The [`TreeWalker`] visits the tree depth-first in declared order. It
//! numbers every module, fills the reference table and chapter index, and
//! gathers whatever the [`ModuleFactExtractor`] reports for each module. A
//! module identity occurring twice aborts the walk, as does a key from which
//! no name can be derived.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{
    ChapterIndex, ConfigTree, DuplicateGuard, DuplicateIdentity, Identity, InvalidIdentity,
    ModuleAttributes, ModuleContext, ModuleFactExtractor, ModuleFacts, Node, NumberingVector,
    ReferenceRegistry, TodoAggregator,
};

/// One line of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TocEntry {
    /// A section heading, with the key as declared.
    Heading {
        /// The declared key.
        title: String,
        /// Depth of the section, 0 for chapters.
        depth: usize,
    },
    /// A module.
    Module {
        /// The module's identity.
        identity: Identity,
        /// Depth of the module.
        depth: usize,
    },
}

/// Everything produced by a successful walk.
#[derive(Debug, Default)]
pub struct Composition {
    /// Headings and modules in document order.
    pub toc: Vec<TocEntry>,
    /// Modules appended after the chapter tree.
    pub appendix: Vec<Identity>,
    /// The book-wide reference table.
    pub references: ReferenceRegistry,
    /// Chapter membership per module.
    pub chapters: ChapterIndex,
    /// To-do annotations from all modules.
    pub todos: TodoAggregator,
    /// Exercises referenced in modules but missing from the configuration.
    pub missing_exercises: Vec<String>,
    /// Images referenced by modules.
    pub images: Vec<String>,
    /// Prerequisite topics satisfied, including those the book assumes.
    pub satisfied: Vec<String>,
}

impl Composition {
    /// Identities of all modules, tree modules first, in visit order.
    pub fn modules(&self) -> impl Iterator<Item = &Identity> {
        self.toc
            .iter()
            .filter_map(|entry| match entry {
                TocEntry::Module { identity, .. } => Some(identity),
                TocEntry::Heading { .. } => None,
            })
            .chain(&self.appendix)
    }
}

/// Errors that abort a walk.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Two modules share an identity.
    #[error(transparent)]
    Duplicate(#[from] DuplicateIdentity),

    /// A tree key yields no identity.
    #[error(transparent)]
    InvalidKey(#[from] InvalidIdentity),

    /// The extractor failed on a module.
    #[error("failed to extract facts from module '{module}'")]
    Extraction {
        /// The module being visited.
        module: Identity,
        /// The extractor's error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Walks a chapter tree and accumulates a [`Composition`].
#[derive(Debug)]
pub struct TreeWalker<E> {
    extractor: E,
    numbering: NumberingVector,
    sections: Vec<Identity>,
    guard: DuplicateGuard,
    composition: Composition,
}

impl<E: ModuleFactExtractor> TreeWalker<E> {
    /// Creates a walker numbering from `start_ordinal`.
    #[must_use]
    pub fn new(extractor: E, start_ordinal: u32) -> Self {
        Self {
            extractor,
            numbering: NumberingVector::new(start_ordinal),
            sections: Vec::new(),
            guard: DuplicateGuard::default(),
            composition: Composition::default(),
        }
    }

    /// Seeds the satisfied prerequisites with topics the book assumes.
    #[must_use]
    pub fn assuming<I>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.composition.satisfied.extend(topics);
        self
    }

    /// Walks `tree` in document order.
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate module identity, invalid key or
    /// extractor error. The walker should be discarded afterwards.
    #[instrument(level = "debug", skip_all)]
    pub fn walk(&mut self, tree: &ConfigTree) -> Result<(), ComposeError> {
        self.walk_section(tree, 0)
    }

    /// Visits a module outside the chapter tree, such as the gradebook.
    ///
    /// Trailing modules are unnumbered and listed in the appendix.
    ///
    /// # Errors
    ///
    /// Fails like [`walk`](Self::walk).
    pub fn visit_trailing_module(&mut self, key: &str) -> Result<(), ComposeError> {
        let identity = Identity::from_key(key)?;
        self.visit_module(key, &identity, &ModuleAttributes::default(), 0)?;
        self.composition.appendix.push(identity);
        Ok(())
    }

    /// Consumes the walker, returning what was composed.
    #[must_use]
    pub fn finish(self) -> Composition {
        self.composition
    }

    fn walk_section(&mut self, tree: &ConfigTree, depth: usize) -> Result<(), ComposeError> {
        self.numbering.open();

        for entry in tree.entries() {
            let identity = Identity::from_key(entry.key())?;
            self.composition
                .references
                .register_placeholder(identity.as_str());

            match entry.node() {
                Node::Module(attributes) => {
                    self.visit_module(entry.key(), &identity, attributes, depth)?;
                    self.composition.toc.push(TocEntry::Module { identity, depth });
                }
                Node::Section(children) => {
                    info!("{}{}", "  ".repeat(depth), entry.key());
                    self.composition.toc.push(TocEntry::Heading {
                        title: entry.key().to_string(),
                        depth,
                    });
                    self.sections.push(identity);
                    self.walk_section(children, depth + 1)?;
                    self.sections.pop();
                }
            }

            self.numbering.advance();
        }

        self.numbering.close();
        Ok(())
    }

    fn visit_module(
        &mut self,
        key: &str,
        identity: &Identity,
        attributes: &ModuleAttributes,
        depth: usize,
    ) -> Result<(), ComposeError> {
        for section in &self.sections {
            self.composition
                .references
                .resolve_section(section.as_str(), identity.as_str());
        }

        self.guard.admit(identity)?;

        let number = self.numbering.module_number();
        debug!("{}{identity} ({number})", "  ".repeat(depth));

        let context = ModuleContext {
            identity,
            key,
            attributes,
            satisfied: &self.composition.satisfied,
            section: self.sections.last(),
            depth,
            numbering: &self.numbering,
        };
        let facts = self
            .extractor
            .extract(&context)
            .map_err(|source| ComposeError::Extraction {
                module: identity.clone(),
                source: Box::new(source),
            })?;

        self.absorb(identity, facts);

        self.composition.chapters.record(
            identity.clone(),
            self.sections.last(),
            self.numbering.prefix(),
        );
        self.composition
            .references
            .set_module_number(identity.as_str(), number);

        Ok(())
    }

    fn absorb(&mut self, identity: &Identity, facts: ModuleFacts) {
        let ModuleFacts {
            images,
            missing_exercises,
            requirements_satisfied,
            todos,
            references,
        } = facts;

        for note in todos {
            self.composition
                .todos
                .add(identity.clone(), note.category, note.content);
        }
        self.composition.images.extend(images);
        self.composition.missing_exercises.extend(missing_exercises);
        self.composition.satisfied.extend(requirements_satisfied);
        self.composition.references.overlay(references);
    }
}

/// Walks `tree` with `extractor`, numbering from `start_ordinal`.
///
/// # Errors
///
/// See [`TreeWalker::walk`].
pub fn compose<E: ModuleFactExtractor>(
    tree: &ConfigTree,
    start_ordinal: u32,
    extractor: E,
) -> Result<Composition, ComposeError> {
    let mut walker = TreeWalker::new(extractor, start_ordinal);
    walker.walk(tree)?;
    Ok(walker.finish())
}

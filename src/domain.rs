//! Domain model for composing a book.
//!
//! This module knows nothing about the filesystem. It holds the chapter tree,
//! the book configuration, and the walk that numbers modules and builds the
//! reference table.

mod chapter_index;
pub use chapter_index::{ChapterEntry, ChapterIndex};

mod config;
pub use config::{BookConfig, ConfigError};

/// Module fact extraction interface.
pub mod facts;
pub use facts::{ModuleContext, ModuleFactExtractor, ModuleFacts, NoFacts, TodoNote};

mod guard;
pub use guard::{DuplicateGuard, DuplicateIdentity};

mod identity;
pub use identity::{Identity, InvalidIdentity};

pub mod numbering;
pub use numbering::NumberingVector;

pub mod references;
pub use references::{ReferenceRegistry, ReferenceToken};

pub mod todo;
pub use todo::{TodoAggregator, TodoEntry, TodoGroup};

pub mod tree;
pub use tree::{ConfigTree, Entry, ExerciseAttributes, ModuleAttributes, Node, TreeError};

pub mod walker;
pub use walker::{ComposeError, Composition, TocEntry, TreeWalker, compose};

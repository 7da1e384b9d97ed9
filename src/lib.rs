//! Textbook composition
//!
//! A book is declared as a tree of chapters, sections and modules. Walking
//! that tree numbers every module, builds a book-wide cross-reference table
//! and collects what each module reports about itself.

pub mod domain;
pub use domain::{BookConfig, ComposeError, Composition, ConfigTree, Identity, TreeWalker};

/// Reading module sources and writing composed books.
pub mod storage;
pub use storage::{BookWriter, RstExtractor};

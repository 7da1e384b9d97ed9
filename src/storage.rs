//! Filesystem collaborators of the composition: reading module sources and
//! writing the composed book.

pub mod output;
pub mod rst;

pub use output::{BookWriter, IndexHeader};
pub use rst::{ExtractError, RstExtractor};

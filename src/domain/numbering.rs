//! Hierarchical numbering of modules.
//!
//! The [`NumberingVector`] holds one counter per open depth of the tree walk.
//! Each counter records how many siblings at that depth have been fully
//! processed, starting from the book's start ordinal. Counters are wider than
//! the ordinal so that any configured start still leaves room for the
//! siblings and the legacy offset.

/// Per-depth sibling counters shared by the whole traversal.
///
/// The walk opens a depth before visiting its children, advances the
/// innermost counter after each child and closes the depth when the loop is
/// done. Closing discards the counter, so the next descent to that depth is
/// seeded with the start ordinal again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingVector {
    start: u32,
    counters: Vec<u64>,
}

impl NumberingVector {
    /// Creates an empty vector that seeds new depths with `start`.
    #[must_use]
    pub const fn new(start: u32) -> Self {
        Self {
            start,
            counters: Vec::new(),
        }
    }

    /// Opens one more depth, seeded with the start ordinal.
    pub fn open(&mut self) {
        self.counters.push(u64::from(self.start));
    }

    /// Records that another child at the innermost depth is done.
    pub fn advance(&mut self) {
        if let Some(last) = self.counters.last_mut() {
            *last += 1;
        }
    }

    /// Closes the innermost depth.
    pub fn close(&mut self) {
        self.counters.pop();
    }

    /// Number of open depths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Returns `true` if no depth is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// The raw counters, outermost first.
    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.counters
    }

    /// Every counter except the innermost, joined with `.`.
    ///
    /// This is the numbering of the enclosing section of a module visited
    /// now. Empty when fewer than two depths are open.
    #[must_use]
    pub fn prefix(&self) -> String {
        let Some((_, outer)) = self.counters.split_last() else {
            return String::new();
        };
        join(outer)
    }

    /// The numbering string of a module visited now.
    ///
    /// The final component is the innermost counter plus one. Books numbered
    /// by the earlier preprocessor used that offset and published
    /// cross-references depend on it: with start ordinal 1, the first two
    /// modules of the first chapter are `1.2` and `1.3`.
    ///
    /// The prefix is always followed by a separator, so a module directly
    /// under the root is numbered `.N`. With no depth open the number is
    /// empty.
    #[must_use]
    pub fn module_number(&self) -> String {
        let Some(last) = self.counters.last() else {
            return String::new();
        };
        format!("{}.{}", self.prefix(), last + 1)
    }
}

fn join(counters: &[u64]) -> String {
    counters
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn vector(start: u32, counters: &[u64]) -> NumberingVector {
        NumberingVector {
            start,
            counters: counters.to_vec(),
        }
    }

    #[test_case(&[1, 1], "1.2"; "first module of first chapter")]
    #[test_case(&[1, 2], "1.3"; "second module of first chapter")]
    #[test_case(&[2, 1], "2.2"; "first module of second chapter")]
    #[test_case(&[0, 3, 0], "0.3.1"; "nested section from zero")]
    #[test_case(&[4], ".5"; "module at the root")]
    #[test_case(&[], ""; "nothing open")]
    fn module_number(counters: &[u64], expected: &str) {
        assert_eq!(vector(1, counters).module_number(), expected);
    }

    #[test_case(&[1, 2], "1"; "chapter")]
    #[test_case(&[3, 1, 7], "3.1"; "nested")]
    #[test_case(&[1], ""; "root")]
    #[test_case(&[], ""; "empty")]
    fn prefix(counters: &[u64], expected: &str) {
        assert_eq!(vector(1, counters).prefix(), expected);
    }

    #[test]
    fn open_seeds_with_start() {
        let mut numbering = NumberingVector::new(3);
        numbering.open();
        numbering.open();
        assert_eq!(numbering.as_slice(), &[3, 3]);
    }

    #[test]
    fn advance_touches_innermost_only() {
        let mut numbering = NumberingVector::new(1);
        numbering.open();
        numbering.open();
        numbering.advance();
        numbering.advance();
        assert_eq!(numbering.as_slice(), &[1, 3]);
    }

    #[test]
    fn reopened_depth_starts_from_start_again() {
        let mut numbering = NumberingVector::new(1);
        numbering.open();
        numbering.open();
        numbering.advance();
        numbering.close();
        numbering.advance();
        numbering.open();

        assert_eq!(numbering.as_slice(), &[2, 1]);
        assert_eq!(numbering.module_number(), "2.2");
    }

    #[test]
    fn largest_start_ordinal_does_not_overflow() {
        let mut numbering = NumberingVector::new(u32::MAX);
        numbering.open();
        numbering.open();
        assert_eq!(numbering.module_number(), "4294967295.4294967296");

        numbering.advance();
        assert_eq!(numbering.module_number(), "4294967295.4294967297");

        numbering.close();
        numbering.advance();
        assert_eq!(numbering.as_slice(), &[4_294_967_296]);
    }

    #[test]
    fn advance_on_empty_is_a_no_op() {
        let mut numbering = NumberingVector::new(0);
        numbering.advance();
        assert!(numbering.is_empty());
        assert_eq!(numbering.len(), 0);
    }
}

use serde::Serialize;
use std::fmt;

///
/// ErrorTree
/// route-keyed aggregation of validation failures
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ErrorTree {
    entries: Vec<ErrorEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ErrorEntry {
    pub route: String,
    pub message: String,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a failure against a node route like `Order.placed_at`.
    pub fn add(&mut self, route: impl Into<String>, message: impl Into<String>) {
        self.entries.push(ErrorEntry {
            route: route.into(),
            message: message.into(),
        });
    }

    /// Merge another tree's entries, preserving order.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// Collapse into a `Result`, yielding `Err(self)` when any entry exists.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}: {}", entry.route, entry.message)?;
            first = false;
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_ok() {
        assert!(ErrorTree::new().result().is_ok());
    }

    #[test]
    fn entries_render_one_per_line() {
        let mut tree = ErrorTree::new();
        tree.add("A.b", "bad name");
        tree.add("A.c", "duplicate number");

        let text = tree.to_string();
        assert_eq!(text, "A.b: bad name\nA.c: duplicate number");
    }

    #[test]
    fn merge_preserves_order() {
        let mut a = ErrorTree::new();
        a.add("X", "first");
        let mut b = ErrorTree::new();
        b.add("Y", "second");

        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.entries()[1].route, "Y");
    }
}

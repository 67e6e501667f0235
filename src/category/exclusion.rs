//! Known-Incompatible Category Pairs
//!
//! Some pairs can never share an entity (a vault is never a dance element).
//! Domains declare them here so the generator can skip the oracle entirely.

use std::collections::BTreeSet;

use super::CategoryId;

/// Unordered set of category-id pairs that never intersect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionMatrix {
    pairs: BTreeSet<(CategoryId, CategoryId)>,
}

impl ExclusionMatrix {
    /// Empty matrix: nothing is excluded.
    pub const fn new() -> Self {
        Self { pairs: BTreeSet::new() }
    }

    /// Build from `(a, b)` id pairs. Order within a pair does not matter.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut matrix = Self::new();
        for (a, b) in pairs {
            matrix.insert(CategoryId::new(a), CategoryId::new(b));
        }
        matrix
    }

    /// Declare `a` and `b` incompatible.
    pub fn insert(&mut self, a: CategoryId, b: CategoryId) {
        self.pairs.insert(ordered(a, b));
    }

    /// Whether the pair is declared incompatible.
    pub fn forbids(&self, a: &CategoryId, b: &CategoryId) -> bool {
        self.pairs.contains(&ordered(a.clone(), b.clone()))
    }

    /// Number of declared pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no pair is declared.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn ordered(a: CategoryId, b: CategoryId) -> (CategoryId, CategoryId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbids_is_symmetric() {
        let matrix = ExclusionMatrix::from_pairs([("vault", "dance"), ("bars", "dance")]);
        let vault = CategoryId::new("vault");
        let dance = CategoryId::new("dance");
        assert!(matrix.forbids(&vault, &dance));
        assert!(matrix.forbids(&dance, &vault));
        assert!(!matrix.forbids(&vault, &CategoryId::new("floor")));
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_duplicate_pairs_collapse() {
        let matrix = ExclusionMatrix::from_pairs([("a", "b"), ("b", "a")]);
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = ExclusionMatrix::new();
        assert!(matrix.is_empty());
        assert!(!matrix.forbids(&CategoryId::new("a"), &CategoryId::new("b")));
    }
}

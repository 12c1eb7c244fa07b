//! Corpus-wide emotion dimension ordering.
//!
//! Every emotion vector in a run is aligned to one [`DimensionSet`], computed
//! once (normally by the extraction stage) and passed explicitly to every
//! later stage. Nothing downstream infers ordering from the data it happens to
//! see.
//!
//! # Ordering matters numerically
//!
//! The flow field takes finite-difference gradients *across* this ordering,
//! treating neighbouring names as neighbouring grid cells. Discovered sets
//! ([`DimensionSet::from_names`]) are lexicographic by name, which is an
//! artifact of discovery rather than any real adjacency between emotions.
//! [`DimensionSet::in_order`] keeps a caller's explicit ordering instead. Two runs with different dimension sets
//! (one extra label in the middle) therefore produce different dynamics for
//! the dimensions they share.

use core::fmt;

/// Ordered, de-duplicated list of emotion dimension names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionSet {
    names: Vec<String>,
}

impl DimensionSet {
    /// Build a set from any collection of names.
    ///
    /// Names are sorted lexicographically and duplicates removed.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Build a set that keeps `names` in the given order.
    ///
    /// Later duplicates are dropped; the first occurrence keeps its position.
    pub fn in_order<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !kept.contains(&name) {
                kept.push(name);
            }
        }
        Self { names: kept }
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` if no dimension is defined.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Dimension names in vector order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of `name` in vector order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Iterate names in vector order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Display for DimensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names.join(", "))
    }
}

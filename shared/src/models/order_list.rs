//! Display order for one scope
//!
//! Persisted as a bare JSON array of category names.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque, case-sensitive category identifier
pub type CategoryName = String;

/// Ordered, duplicate-free sequence of category names
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderList(Vec<CategoryName>);

impl OrderList {
    /// Wrap names as-is (caller guarantees no duplicates)
    pub fn new(names: Vec<CategoryName>) -> Self {
        Self(names)
    }

    /// Build from arbitrary names, keeping the first occurrence of each
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CategoryName>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &CategoryName| seen.insert(name.clone()))
            .collect();
        Self(names)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryName> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<CategoryName> {
        self.0
    }

    /// Whether this list has no duplicates
    pub fn is_unique(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.0.iter().all(|n| seen.insert(n.as_str()))
    }

    /// Whether this list holds exactly the given names (ignoring order)
    pub fn same_members(&self, live: &[CategoryName]) -> bool {
        let ours: HashSet<&str> = self.0.iter().map(String::as_str).collect();
        let theirs: HashSet<&str> = live.iter().map(String::as_str).collect();
        self.is_unique() && ours == theirs
    }

    /// Move one entry from `from` to `to`, as a drag-and-drop does.
    ///
    /// Returns `None` if either index is out of range.
    pub fn move_item(&self, from: usize, to: usize) -> Option<Self> {
        if from >= self.0.len() || to >= self.0.len() {
            return None;
        }
        let mut names = self.0.clone();
        let item = names.remove(from);
        names.insert(to, item);
        Some(Self(names))
    }
}

impl From<Vec<CategoryName>> for OrderList {
    fn from(names: Vec<CategoryName>) -> Self {
        Self::from_names(names)
    }
}

impl<'a> IntoIterator for &'a OrderList {
    type Item = &'a CategoryName;
    type IntoIter = std::slice::Iter<'a, CategoryName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for OrderList {
    type Item = CategoryName;
    type IntoIter = std::vec::IntoIter<CategoryName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl PartialEq<[&str]> for OrderList {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for OrderList {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

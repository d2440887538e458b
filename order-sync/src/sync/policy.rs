//! Default-order policies
//!
//! A policy is a prioritized list of well-known names followed by a
//! fallback rule for everything else. Each scope has its own.

use std::collections::HashSet;

use shared::models::{CategoryName, OrderList, Scope};

/// Built-in priority for active workflow statuses
pub const ACTIVE_STATUS_PRIORITY: &[&str] = &[
    "Not Started",
    "In Progress",
    "Review",
    "Testing",
    "Blocked",
    "On Hold",
];

/// Built-in priority for archived workflow statuses
pub const ARCHIVE_STATUS_PRIORITY: &[&str] =
    &["Done", "Completed", "Released", "Cancelled", "Archived"];

/// How names outside the priority list are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Order in which the live snapshot lists them
    FirstSeen,
    /// Case-sensitive ascending
    Lexicographic,
}

/// Default display order for one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultOrderPolicy {
    pub priority: Vec<CategoryName>,
    pub fallback: Fallback,
}

impl DefaultOrderPolicy {
    pub fn new<I, S>(priority: I, fallback: Fallback) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CategoryName>,
    {
        Self {
            priority: OrderList::from_names(priority).into_vec(),
            fallback,
        }
    }

    /// Built-in policy for a scope
    pub fn for_scope(scope: Scope) -> Self {
        match scope {
            Scope::StatusActive => Self::new(ACTIVE_STATUS_PRIORITY.iter().copied(), Fallback::FirstSeen),
            Scope::StatusArchive => Self::new(ARCHIVE_STATUS_PRIORITY.iter().copied(), Fallback::FirstSeen),
            Scope::Vertical => Self::new(Vec::<CategoryName>::new(), Fallback::Lexicographic),
        }
    }

    /// Order `names` by this policy
    ///
    /// Prioritized names that are present come first, in priority order;
    /// the rest follow by the fallback rule. Duplicates keep their first
    /// occurrence.
    pub fn arrange(&self, names: &[CategoryName]) -> OrderList {
        let present: HashSet<&str> = names.iter().map(String::as_str).collect();
        let prioritized: HashSet<&str> = self.priority.iter().map(String::as_str).collect();

        let mut ordered: Vec<CategoryName> = self
            .priority
            .iter()
            .filter(|name| present.contains(name.as_str()))
            .cloned()
            .collect();

        let mut rest: Vec<CategoryName> = OrderList::from_names(
            names
                .iter()
                .filter(|name| !prioritized.contains(name.as_str()))
                .cloned(),
        )
        .into_vec();
        if self.fallback == Fallback::Lexicographic {
            rest.sort();
        }

        ordered.extend(rest);
        OrderList::new(ordered)
    }
}

/// Policies for all three scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySet {
    active: DefaultOrderPolicy,
    archive: DefaultOrderPolicy,
    vertical: DefaultOrderPolicy,
}

impl PolicySet {
    pub fn get(&self, scope: Scope) -> &DefaultOrderPolicy {
        match scope {
            Scope::StatusActive => &self.active,
            Scope::StatusArchive => &self.archive,
            Scope::Vertical => &self.vertical,
        }
    }

    /// Replace the policy for one scope
    pub fn with_policy(mut self, scope: Scope, policy: DefaultOrderPolicy) -> Self {
        match scope {
            Scope::StatusActive => self.active = policy,
            Scope::StatusArchive => self.archive = policy,
            Scope::Vertical => self.vertical = policy,
        }
        self
    }
}

impl Default for PolicySet {
    fn default() -> Self {
        Self {
            active: DefaultOrderPolicy::for_scope(Scope::StatusActive),
            archive: DefaultOrderPolicy::for_scope(Scope::StatusArchive),
            vertical: DefaultOrderPolicy::for_scope(Scope::Vertical),
        }
    }
}

//! Order reconciliation
//!
//! Repairs a stored order against the live category set:
//!
//! ```text
//! stored:  [A, B, C]        live: {C, A, D}
//! kept:    [A, C]           (stored order, deleted names dropped)
//! added:   [D]              (new names, arranged by the scope policy)
//! result:  [A, C, D]
//! ```
//!
//! New names are always appended, never interleaved, so an established
//! customization is never reshuffled by a category being created.

mod policy;

pub use policy::{
    ACTIVE_STATUS_PRIORITY, ARCHIVE_STATUS_PRIORITY, DefaultOrderPolicy, Fallback, PolicySet,
};

use std::collections::HashSet;

use shared::models::{CategoryName, OrderList, Scope};

/// Reconcile with the built-in policy for `scope`
pub fn reconcile(stored: Option<&OrderList>, live: &[CategoryName], scope: Scope) -> OrderList {
    reconcile_with(stored, live, &DefaultOrderPolicy::for_scope(scope))
}

/// Reconcile with an explicit default-order policy
///
/// The result holds exactly the distinct names of `live`, with no duplicates.
/// `stored == None` means no record was ever written and yields the default order.
pub fn reconcile_with(
    stored: Option<&OrderList>,
    live: &[CategoryName],
    policy: &DefaultOrderPolicy,
) -> OrderList {
    let live = OrderList::from_names(live.iter().cloned()).into_vec();

    let Some(stored) = stored else {
        return policy.arrange(&live);
    };

    let live_set: HashSet<&str> = live.iter().map(String::as_str).collect();
    let stored_set: HashSet<&str> = stored.iter().map(String::as_str).collect();

    let kept = OrderList::from_names(
        stored
            .iter()
            .filter(|name| live_set.contains(name.as_str()))
            .cloned(),
    );

    let added: Vec<CategoryName> = live
        .iter()
        .filter(|name| !stored_set.contains(name.as_str()))
        .cloned()
        .collect();

    let mut result = kept.into_vec();
    result.extend(policy.arrange(&added));
    OrderList::new(result)
}

/// Default order for the current live set (what a reset produces)
pub fn default_order(live: &[CategoryName], scope: Scope) -> OrderList {
    DefaultOrderPolicy::for_scope(scope).arrange(live)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<CategoryName> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn order(items: &[&str]) -> OrderList {
        OrderList::from_names(items.iter().copied())
    }

    /// A handful of stored/live combinations covering overlap, disjoint and empty cases
    fn cases() -> Vec<(Option<OrderList>, Vec<CategoryName>)> {
        vec![
            (None, names(&["Review", "Zeta", "Not Started"])),
            (Some(order(&[])), names(&["B", "A"])),
            (Some(order(&["A", "B", "C"])), names(&["C", "A", "D"])),
            (Some(order(&["A", "B"])), names(&[])),
            (Some(order(&["X", "Y"])), names(&["P", "Q"])),
            (Some(order(&["Blocked", "Review"])), names(&["Review", "Not Started", "Blocked", "Review"])),
        ]
    }

    #[test]
    fn test_active_status_scenario() {
        let stored = order(&["Not Started", "In Progress", "Review"]);
        let live = names(&["Not Started", "In Progress", "Review", "Blocked"]);
        assert_eq!(
            reconcile(Some(&stored), &live, Scope::StatusActive),
            ["Not Started", "In Progress", "Review", "Blocked"]
        );
    }

    #[test]
    fn test_vertical_deletion_scenario() {
        let stored = order(&["ORDER", "LOYALTY", "PAYMENT"]);
        let live = names(&["ORDER", "PAYMENT"]);
        assert_eq!(
            reconcile(Some(&stored), &live, Scope::Vertical),
            ["ORDER", "PAYMENT"]
        );
    }

    #[test]
    fn test_default_on_empty_history() {
        let live = names(&["PAYMENT", "CSF", "ORDER"]);
        assert_eq!(reconcile(None, &live, Scope::Vertical), ["CSF", "ORDER", "PAYMENT"]);

        let live = names(&["Custom", "Review", "Not Started"]);
        assert_eq!(
            reconcile(None, &live, Scope::StatusActive),
            ["Not Started", "Review", "Custom"]
        );
    }

    #[test]
    fn test_customized_order_survives() {
        let stored = order(&["PAYMENT", "ORDER", "CSF"]);
        let live = names(&["CSF", "ORDER", "PAYMENT"]);
        assert_eq!(
            reconcile(Some(&stored), &live, Scope::Vertical),
            ["PAYMENT", "ORDER", "CSF"]
        );
    }

    #[test]
    fn test_added_names_follow_policy() {
        let stored = order(&["ORDER"]);
        let live = names(&["ZED", "ORDER", "ALPHA"]);
        assert_eq!(
            reconcile(Some(&stored), &live, Scope::Vertical),
            ["ORDER", "ALPHA", "ZED"]
        );

        let stored = order(&["Custom"]);
        let live = names(&["Blocked", "Custom", "Not Started"]);
        assert_eq!(
            reconcile(Some(&stored), &live, Scope::StatusActive),
            ["Custom", "Not Started", "Blocked"]
        );
    }

    #[test]
    fn test_empty_live_yields_empty() {
        for scope in Scope::ALL {
            assert!(reconcile(Some(&order(&["A"])), &[], scope).is_empty());
            assert!(reconcile(None, &[], scope).is_empty());
        }
    }

    #[test]
    fn test_case_change_is_delete_plus_add() {
        let stored = order(&["payment", "ORDER"]);
        let live = names(&["ORDER", "Payment"]);
        assert_eq!(
            reconcile(Some(&stored), &live, Scope::Vertical),
            ["ORDER", "Payment"]
        );
    }

    #[test]
    fn test_duplicate_live_names_are_collapsed() {
        let live = names(&["B", "A", "B"]);
        let result = reconcile(Some(&order(&["B"])), &live, Scope::Vertical);
        assert_eq!(result, ["B", "A"]);
    }

    #[test]
    fn test_duplicate_stored_names_keep_first_position() {
        let stored = OrderList::new(names(&["A", "B", "A"]));
        let result = reconcile(Some(&stored), &names(&["B", "A"]), Scope::Vertical);
        assert_eq!(result, ["A", "B"]);
        assert_ne!(Some(&result), Some(&stored));
    }

    #[test]
    fn test_set_equality_and_uniqueness() {
        for scope in Scope::ALL {
            for (stored, live) in cases() {
                let result = reconcile(stored.as_ref(), &live, scope);
                assert!(result.is_unique(), "{scope}: {result:?}");
                assert!(result.same_members(&live), "{scope}: {result:?} vs {live:?}");
            }
        }
    }

    #[test]
    fn test_idempotent() {
        for scope in Scope::ALL {
            for (stored, live) in cases() {
                let once = reconcile(stored.as_ref(), &live, scope);
                let twice = reconcile(Some(&once), &live, scope);
                assert_eq!(once, twice, "{scope}");
            }
        }
    }

    #[test]
    fn test_relative_order_preserved() {
        let stored = order(&["D", "B", "A", "C"]);
        let live = names(&["A", "B", "C", "E"]);
        let result = reconcile(Some(&stored), &live, Scope::Vertical);
        let pos = |n: &str| result.iter().position(|x| x == n).unwrap();
        assert!(pos("B") < pos("A"));
        assert!(pos("A") < pos("C"));
        assert_eq!(result, ["B", "A", "C", "E"]);
    }

    #[test]
    fn test_append_on_new() {
        for scope in Scope::ALL {
            let stored = order(&["Q", "P"]);
            let live = names(&["P", "Q"]);
            let base = reconcile(Some(&stored), &live, scope);

            let mut grown = live.clone();
            grown.push("New Thing".to_string());
            let next = reconcile(Some(&base), &grown, scope);

            let mut expected = base.into_vec();
            expected.push("New Thing".to_string());
            assert_eq!(next, OrderList::new(expected));
        }
    }

    #[test]
    fn test_default_order_matches_reset_semantics() {
        let live = names(&["PAYMENT", "CSF", "ORDER"]);
        assert_eq!(default_order(&live, Scope::Vertical), ["CSF", "ORDER", "PAYMENT"]);
        assert_eq!(
            default_order(&live, Scope::Vertical),
            reconcile(None, &live, Scope::Vertical)
        );
    }
}

//! Sorted-merge diff between desired and observed resources

use crate::planner::ReconciliationPlan;
use crate::resource::Reconcilable;

/// Compute the plan converging `observed` to `desired`
///
/// Both slices must already be sorted ascending by [`Reconcilable::key`]
/// (see [`sort_for_reconcile`]). The precondition is not checked: unsorted
/// input silently yields a wrong plan, usually one that over-deletes.
/// Duplicate desired entries are not collapsed.
pub fn reconcile<T: Reconcilable>(desired: &[T], observed: &[T]) -> ReconciliationPlan<T> {
    let mut plan = ReconciliationPlan::new();
    let (mut i, mut j) = (0, 0);

    while i < desired.len() && j < observed.len() {
        let (want, have) = (&desired[i], &observed[j]);

        if want.same_resource(have) {
            if !have.is_active() {
                plan.to_reactivate.push(have.clone());
            }
            i += 1;
            j += 1;
        } else if want.sorts_before(have) {
            plan.to_create.push(want.clone());
            i += 1;
        } else {
            plan.to_delete.push(have.clone());
            j += 1;
        }
    }

    plan.to_create.extend_from_slice(&desired[i..]);
    plan.to_delete.extend_from_slice(&observed[j..]);

    log::debug!(
        "reconciled {} desired against {} observed: {} to create, {} to delete, {} to reactivate",
        desired.len(),
        observed.len(),
        plan.to_create.len(),
        plan.to_delete.len(),
        plan.to_reactivate.len()
    );

    plan
}

/// Sort resources into the order [`reconcile`] requires
pub fn sort_for_reconcile<T: Reconcilable>(resources: &mut [T]) {
    resources.sort_by(T::compare);
}

/// Sort both collections, then reconcile them
pub fn plan_changes<T: Reconcilable>(
    mut desired: Vec<T>,
    mut observed: Vec<T>,
) -> ReconciliationPlan<T> {
    sort_for_reconcile(&mut desired);
    sort_for_reconcile(&mut observed);
    reconcile(&desired, &observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Notification, Trigger};

    const INSERT: &str = "changeType == 'INSERT'";
    const UPDATE: &str = "changeType == 'UPDATE'";

    fn trigger(base_object: &str, condition: &str) -> Trigger {
        Trigger {
            base_object: base_object.into(),
            condition: condition.into(),
            ..Default::default()
        }
    }

    fn remote(base_object: &str, condition: &str, id: &str, active: bool) -> Trigger {
        Trigger {
            id: id.into(),
            active,
            ..trigger(base_object, condition)
        }
    }

    #[test]
    fn test_remote_is_empty() {
        let desired = vec![trigger("Subscription", INSERT)];

        let plan = reconcile(&desired, &[]);

        assert_eq!(plan.to_create, desired);
        assert!(plan.to_delete.is_empty());
        assert!(plan.to_reactivate.is_empty());
    }

    #[test]
    fn test_remote_is_greater_than_desired() {
        let desired = vec![trigger("Subscription", UPDATE)];
        let observed = vec![
            remote("Subscription", INSERT, "1", false),
            remote("Subscription", UPDATE, "2", true),
        ];

        let plan = reconcile(&desired, &observed);

        assert!(plan.to_create.is_empty());
        assert_eq!(plan.to_delete, vec![observed[0].clone()]);
        assert!(plan.to_reactivate.is_empty());
    }

    #[test]
    fn test_remote_is_different_than_desired() {
        let desired = vec![trigger("Subscription", INSERT)];
        let observed = vec![remote("Subscription", UPDATE, "1", true)];

        let plan = reconcile(&desired, &observed);

        assert_eq!(plan.to_create, desired);
        assert_eq!(plan.to_delete, observed);
        assert!(plan.to_reactivate.is_empty());
    }

    #[test]
    fn test_inactive_match_is_reactivated() {
        let desired = vec![trigger("Account", INSERT), trigger("Account", UPDATE)];
        let observed = vec![
            remote("Account", INSERT, "1", false),
            remote("Account", UPDATE, "2", true),
        ];

        let plan = reconcile(&desired, &observed);

        assert!(plan.to_create.is_empty());
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.to_reactivate, vec![observed[0].clone()]);
        assert_eq!(plan.to_reactivate[0].id, "1");
    }

    #[test]
    fn test_identical_active_sets_need_nothing() {
        let desired: Vec<Trigger> = [("Account", INSERT), ("Account", UPDATE), ("Invoice", INSERT)]
            .iter()
            .map(|(b, c)| Trigger {
                active: true,
                ..trigger(b, c)
            })
            .collect();

        let plan = reconcile(&desired, &desired);

        assert!(plan.is_empty());
    }

    #[test]
    fn test_interleaved_sets() {
        let desired = vec![
            trigger("Account", INSERT),
            trigger("Invoice", INSERT),
            trigger("Subscription", UPDATE),
            trigger("Usage", INSERT),
        ];
        let observed = vec![
            remote("Account", INSERT, "a", true),
            remote("Contact", INSERT, "c", true),
            remote("Subscription", UPDATE, "s", false),
            remote("Zeta", INSERT, "z", true),
        ];

        let plan = reconcile(&desired, &observed);

        assert_eq!(
            plan.to_create,
            vec![trigger("Invoice", INSERT), trigger("Usage", INSERT)]
        );
        assert_eq!(
            plan.to_delete.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec!["c", "z"]
        );
        assert_eq!(plan.to_reactivate.len(), 1);
        assert_eq!(plan.to_reactivate[0].id, "s");
    }

    #[test]
    fn test_duplicate_desired_entries_are_not_collapsed() {
        let desired = vec![trigger("Account", INSERT), trigger("Account", INSERT)];
        let observed = vec![remote("Account", INSERT, "1", true)];

        let plan = reconcile(&desired, &observed);

        assert_eq!(plan.to_create, vec![trigger("Account", INSERT)]);
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn test_every_element_is_accounted_for() {
        let desired = vec![
            trigger("A", "1"),
            trigger("B", "1"),
            trigger("B", "2"),
            trigger("D", "1"),
        ];
        let observed = vec![
            remote("A", "1", "a1", false),
            remote("B", "2", "b2", true),
            remote("C", "1", "c1", true),
            remote("D", "1", "d1", false),
            remote("E", "1", "e1", false),
        ];

        let plan = reconcile(&desired, &observed);

        for want in &desired {
            let matched = observed.iter().any(|have| want.same_resource(have));
            assert_eq!(!matched, plan.to_create.contains(want), "{want}");
        }
        for have in &observed {
            let matched = desired.iter().any(|want| want.same_resource(have));
            assert_eq!(!matched, plan.to_delete.contains(have), "{have}");
            assert_eq!(
                matched && !have.active,
                plan.to_reactivate.contains(have),
                "{have}"
            );
        }
    }

    #[test]
    fn test_plan_changes_sorts_input() {
        let desired = vec![trigger("Subscription", INSERT), trigger("Account", INSERT)];
        let observed = vec![
            remote("Subscription", INSERT, "2", true),
            remote("Account", INSERT, "1", true),
        ];

        let plan = plan_changes(desired, observed);

        assert!(plan.is_empty());
    }

    #[test]
    fn test_notifications_diff_by_profile_and_event() {
        let notification = |profile: &str, event: &str, id: &str| Notification {
            id: id.into(),
            active: true,
            communication_profile_id: profile.into(),
            event_type_name: event.into(),
            ..Default::default()
        };

        let desired = vec![
            notification("111", "znt-Account-onInsert", ""),
            notification("222", "znt-Account-onInsert", ""),
        ];
        let observed = vec![
            notification("111", "znt-Account-onInsert", "n1"),
            notification("111", "znt-Account-onUpdate", "n2"),
        ];

        let plan = plan_changes(desired.clone(), observed);

        assert_eq!(plan.to_create, vec![desired[1].clone()]);
        assert_eq!(plan.to_delete.len(), 1);
        assert_eq!(plan.to_delete[0].id, "n2");
        assert!(plan.to_reactivate.is_empty());
    }
}

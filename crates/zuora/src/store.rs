//! Adapters exposing a [`Backend`] as per-resource [`RemoteStore`]s.

use crate::backend::Backend;
use anyhow::Result;
use reconcile::{Notification, RemoteStore, Trigger};

/// Trigger writer backed by a [`Backend`].
pub struct TriggerStore<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> TriggerStore<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: Backend + ?Sized> RemoteStore<Trigger> for TriggerStore<'_, B> {
    fn insert(&self, resource: &Trigger) -> Result<String> {
        Ok(self.backend.insert_trigger(resource)?)
    }

    fn destroy(&self, id: &str) -> Result<()> {
        Ok(self.backend.destroy_trigger(id)?)
    }
}

/// Notification writer backed by a [`Backend`].
pub struct NotificationStore<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> NotificationStore<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: Backend + ?Sized> RemoteStore<Notification> for NotificationStore<'_, B> {
    fn insert(&self, resource: &Notification) -> Result<String> {
        Ok(self.backend.insert_notification(resource)?)
    }

    fn destroy(&self, id: &str) -> Result<()> {
        Ok(self.backend.destroy_notification(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::error::Error as ApiError;
    use reconcile::{
        Error, EventType, ExecuteOptions, MANAGED_NOTIFICATION_DESCRIPTION,
        MANAGED_TRIGGER_DESCRIPTION, Operation, execute_simple, plan_changes,
    };

    fn trigger(base: &str, op: &str, condition: &str) -> Trigger {
        Trigger {
            active: true,
            base_object: base.into(),
            condition: condition.into(),
            description: MANAGED_TRIGGER_DESCRIPTION.into(),
            event_type: EventType {
                name: reconcile::event_name(base, op),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn notification(event: &str, profile: &str) -> Notification {
        Notification {
            active: true,
            communication_profile_id: profile.into(),
            description: MANAGED_NOTIFICATION_DESCRIPTION.into(),
            event_type_name: event.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_trigger_store_creates_and_deletes() {
        let backend = MockBackend::new();
        backend.add_trigger(Trigger {
            id: "old-1".into(),
            ..trigger("Invoice", "delete", "changeType == 'DELETE'")
        });

        let desired = vec![trigger("Account", "insert", "changeType == 'INSERT'")];
        let plan = plan_changes(desired, backend.fetch_managed_triggers().unwrap());
        let store = TriggerStore::new(&backend);

        let summary = execute_simple(&plan, &store, &ExecuteOptions::default()).unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.deleted, 1);
        assert_eq!(
            backend.calls(),
            vec![
                "insert trigger znt-Account-onInsert",
                "destroy trigger znt-Invoice-onDelete",
            ]
        );

        // Converged: a second pass has nothing to do.
        let again = plan_changes(
            vec![trigger("Account", "insert", "changeType == 'INSERT'")],
            backend.fetch_managed_triggers().unwrap(),
        );
        assert!(again.is_empty());
    }

    #[test]
    fn test_notification_store_creates() {
        let backend = MockBackend::new();
        let desired = vec![
            notification("znt-Account-onInsert", "p-1"),
            notification("znt-Account-onInsert", "p-2"),
        ];
        let plan = plan_changes(desired, Vec::new());
        let store = NotificationStore::new(&backend);

        let summary = execute_simple(&plan, &store, &ExecuteOptions::default()).unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(backend.notifications().len(), 2);
        assert!(backend.notifications().iter().all(|n| n.id.starts_with("mock-")));
    }

    #[test]
    fn test_backend_error_surfaces_as_apply_failure() {
        let backend = MockBackend::new();
        backend.fail_inserts_matching("onUpdate");

        let desired = vec![
            trigger("Account", "insert", "changeType == 'INSERT'"),
            trigger("Account", "update", "changeType == 'UPDATE'"),
        ];
        let plan = plan_changes(desired, Vec::new());
        let store = TriggerStore::new(&backend);

        let err = execute_simple(&plan, &store, &ExecuteOptions::default()).unwrap_err();
        match err {
            Error::ApplyFailed {
                operation,
                summary,
                message,
                ..
            } => {
                assert_eq!(operation, Operation::Create);
                assert_eq!(summary.created, 1);
                assert!(message.contains("HTTP 500"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_destroy_of_unknown_id_is_not_found() {
        let backend = MockBackend::new();
        let store = NotificationStore::new(&backend);

        let err = store.destroy("missing").unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert!(matches!(api, ApiError::Api { status: 404, .. }));
    }

    #[test]
    fn test_dry_run_leaves_backend_untouched() {
        let backend = MockBackend::new();
        let plan = plan_changes(
            vec![trigger("Account", "insert", "changeType == 'INSERT'")],
            Vec::new(),
        );
        let store = TriggerStore::new(&backend);

        let summary = execute_simple(&plan, &store, &ExecuteOptions { dry_run: true }).unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(backend.calls().is_empty());
    }
}

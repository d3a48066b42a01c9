//! Backend trait and implementations for reading and writing remote state.
//!
//! The primary implementation is [`http::HttpBackend`], which talks to a
//! Zuora tenant over HTTPS.
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use zuora::backend::{Backend, MockBackend};
//! use reconcile::{Trigger, MANAGED_TRIGGER_DESCRIPTION};
//!
//! let mock = MockBackend::new();
//! mock.add_trigger(Trigger {
//!     id: "t-1".to_string(),
//!     description: MANAGED_TRIGGER_DESCRIPTION.to_string(),
//!     ..Default::default()
//! });
//! mock.add_trigger(Trigger { id: "t-2".to_string(), ..Default::default() });
//!
//! assert_eq!(mock.fetch_triggers().unwrap().len(), 2);
//! assert_eq!(mock.fetch_managed_triggers().unwrap().len(), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use reconcile::{Notification, Profile, ProfileIndex, Trigger};
use std::sync::{Arc, Mutex, MutexGuard};

/// Reader and writer of remote triggers, notifications and profiles.
///
/// Collections are returned in no particular order; callers sort before
/// reconciling.
pub trait Backend: Send + Sync {
    /// Fetch every event trigger, following pagination.
    fn fetch_triggers(&self) -> Result<Vec<Trigger>>;

    /// Fetch every notification definition, following pagination.
    fn fetch_notifications(&self) -> Result<Vec<Notification>>;

    /// Fetch every communication profile.
    fn fetch_profiles(&self) -> Result<Vec<Profile>>;

    /// Create a trigger, returning its assigned id.
    fn insert_trigger(&self, trigger: &Trigger) -> Result<String>;

    /// Delete a trigger by id.
    fn destroy_trigger(&self, id: &str) -> Result<()>;

    /// Create a notification definition, returning its assigned id.
    fn insert_notification(&self, notification: &Notification) -> Result<String>;

    /// Delete a notification definition by id.
    fn destroy_notification(&self, id: &str) -> Result<()>;

    /// Triggers carrying the managed marker.
    fn fetch_managed_triggers(&self) -> Result<Vec<Trigger>> {
        let triggers = self.fetch_triggers()?;
        let total = triggers.len();
        let managed: Vec<_> = triggers.into_iter().filter(Trigger::is_managed).collect();
        log::debug!("{} of {} remote triggers are managed", managed.len(), total);
        Ok(managed)
    }

    /// Notifications carrying the managed marker.
    fn fetch_managed_notifications(&self) -> Result<Vec<Notification>> {
        let notifications = self.fetch_notifications()?;
        let total = notifications.len();
        let managed: Vec<_> = notifications
            .into_iter()
            .filter(Notification::is_managed)
            .collect();
        log::debug!(
            "{} of {} remote notifications are managed",
            managed.len(),
            total
        );
        Ok(managed)
    }

    /// Profile ids by name.
    fn profile_index(&self) -> Result<ProfileIndex> {
        Ok(self.fetch_profiles()?.into_iter().collect())
    }
}

#[derive(Debug, Default)]
struct MockState {
    triggers: Vec<Trigger>,
    notifications: Vec<Notification>,
    profiles: Vec<Profile>,
    next_id: usize,
    fail_insert_matching: Option<String>,
    calls: Vec<String>,
}

impl MockState {
    fn assign_id(&mut self) -> String {
        self.next_id += 1;
        format!("mock-{}", self.next_id)
    }

    fn check_insert(&self, label: &str) -> Result<()> {
        match &self.fail_insert_matching {
            Some(pattern) if label.contains(pattern.as_str()) => {
                Err(Error::api(500, format!("mock insert failure for {label}")))
            }
            _ => Ok(()),
        }
    }
}

/// In-memory backend for testing without network access.
///
/// Inserted resources get ids `mock-1`, `mock-2`, ... and are stored as
/// active; every mutation is recorded in [`MockBackend::calls`].
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Add a remote trigger.
    pub fn add_trigger(&self, trigger: Trigger) {
        self.state().triggers.push(trigger);
    }

    /// Add a remote notification.
    pub fn add_notification(&self, notification: Notification) {
        self.state().notifications.push(notification);
    }

    /// Add a communication profile.
    pub fn add_profile(&self, id: impl Into<String>, name: impl Into<String>) {
        self.state().profiles.push(Profile {
            id: id.into(),
            name: name.into(),
        });
    }

    /// Make inserts fail for resources whose display form contains `pattern`.
    pub fn fail_inserts_matching(&self, pattern: impl Into<String>) {
        self.state().fail_insert_matching = Some(pattern.into());
    }

    /// Mutations performed so far, e.g. `insert trigger znt-Account-onInsert`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Current remote triggers.
    #[must_use]
    pub fn triggers(&self) -> Vec<Trigger> {
        self.state().triggers.clone()
    }

    /// Current remote notifications.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }
}

impl Backend for MockBackend {
    fn fetch_triggers(&self) -> Result<Vec<Trigger>> {
        Ok(self.triggers())
    }

    fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        Ok(self.notifications())
    }

    fn fetch_profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.state().profiles.clone())
    }

    fn insert_trigger(&self, trigger: &Trigger) -> Result<String> {
        let mut state = self.state();
        state.check_insert(&trigger.event_type.name)?;
        let id = state.assign_id();
        state
            .calls
            .push(format!("insert trigger {}", trigger.event_type.name));
        state.triggers.push(Trigger {
            id: id.clone(),
            active: true,
            ..trigger.clone()
        });
        Ok(id)
    }

    fn destroy_trigger(&self, id: &str) -> Result<()> {
        let mut state = self.state();
        let index = state
            .triggers
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::api(404, format!("trigger {id} not found")))?;
        let removed = state.triggers.remove(index);
        state
            .calls
            .push(format!("destroy trigger {}", removed.event_type.name));
        Ok(())
    }

    fn insert_notification(&self, notification: &Notification) -> Result<String> {
        let mut state = self.state();
        let label = notification.to_string();
        state.check_insert(&label)?;
        let id = state.assign_id();
        state.calls.push(format!("insert notification {label}"));
        state.notifications.push(Notification {
            id: id.clone(),
            active: true,
            ..notification.clone()
        });
        Ok(id)
    }

    fn destroy_notification(&self, id: &str) -> Result<()> {
        let mut state = self.state();
        let index = state
            .notifications
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::api(404, format!("notification {id} not found")))?;
        let removed = state.notifications.remove(index);
        state.calls.push(format!("destroy notification {removed}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use reconcile::{EventType, MANAGED_NOTIFICATION_DESCRIPTION};

    fn trigger(name: &str) -> Trigger {
        Trigger {
            base_object: "Account".into(),
            condition: format!("name == '{name}'"),
            event_type: EventType {
                name: name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_mock_backend_new() {
        let mock = MockBackend::new();
        assert!(mock.fetch_triggers().unwrap().is_empty());
        assert!(mock.fetch_profiles().unwrap().is_empty());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_insert_assigns_ids_and_activates() {
        let mock = MockBackend::new();

        let first = mock.insert_trigger(&trigger("znt-Account-onInsert")).unwrap();
        let second = mock.insert_trigger(&trigger("znt-Account-onUpdate")).unwrap();

        assert_eq!(first, "mock-1");
        assert_eq!(second, "mock-2");
        let stored = mock.triggers();
        assert!(stored.iter().all(|t| t.active));
        assert_eq!(stored[1].id, "mock-2");
    }

    #[test]
    fn test_destroy_removes_and_records() {
        let mock = MockBackend::new();
        let id = mock.insert_trigger(&trigger("znt-Account-onInsert")).unwrap();

        mock.destroy_trigger(&id).unwrap();

        assert!(mock.triggers().is_empty());
        assert_eq!(
            mock.calls(),
            vec![
                "insert trigger znt-Account-onInsert",
                "destroy trigger znt-Account-onInsert"
            ]
        );
    }

    #[test]
    fn test_destroy_unknown_id_is_not_found() {
        let mock = MockBackend::new();
        let err = mock.destroy_notification("missing").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_insert_failure_injection() {
        let mock = MockBackend::new();
        mock.fail_inserts_matching("onUpdate");

        assert!(mock.insert_trigger(&trigger("znt-Account-onInsert")).is_ok());
        let err = mock
            .insert_trigger(&trigger("znt-Account-onUpdate"))
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(mock.triggers().len(), 1);
    }

    #[test]
    fn test_managed_notifications_filter() {
        let mock = MockBackend::new();
        mock.add_notification(Notification {
            id: "n-1".into(),
            description: MANAGED_NOTIFICATION_DESCRIPTION.into(),
            ..Default::default()
        });
        mock.add_notification(Notification {
            id: "n-2".into(),
            description: "hand made".into(),
            ..Default::default()
        });

        let managed = mock.fetch_managed_notifications().unwrap();

        assert_eq!(managed.len(), 1);
        assert_eq!(managed[0].id, "n-1");
    }

    #[test]
    fn test_profile_index() {
        let mock = MockBackend::new();
        mock.add_profile("123", "Profile A");
        mock.add_profile("456", "Profile B");

        let index = mock.profile_index().unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve("Profile B").unwrap(), "456");
        assert!(index.resolve("Profile C").is_err());
    }
}

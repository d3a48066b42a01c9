//! Comparison contract for reconcilable resources
//!
//! A reconcilable resource knows which logical remote object it denotes
//! (its [`ResourceKey`]), whether that object is active, and the id the
//! remote system assigned to it.

use crate::types::{Notification, Trigger};
use std::cmp::Ordering;
use std::fmt;

/// Identity of a logical resource
///
/// Ordered by `primary`, then `secondary`. Two resources with equal keys
/// denote the same remote object regardless of id or activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey<'a> {
    pub primary: &'a str,
    pub secondary: &'a str,
}

impl<'a> ResourceKey<'a> {
    pub fn new(primary: &'a str, secondary: &'a str) -> Self {
        Self { primary, secondary }
    }
}

/// Core trait for resources the reconciler can diff
///
/// # Example
///
/// ```
/// use reconcile::{Reconcilable, ResourceKey, Trigger};
///
/// let a = Trigger { base_object: "Account".into(), condition: "x".into(), ..Default::default() };
/// let b = Trigger { id: "remote-1".into(), active: true, ..a.clone() };
/// assert!(a.same_resource(&b));
/// assert_eq!(a.key(), ResourceKey::new("Account", "x"));
/// ```
pub trait Reconcilable: Clone + fmt::Debug + fmt::Display {
    /// Resource type category, used for display and logging
    fn resource_type(&self) -> &'static str;

    /// The comparison key
    fn key(&self) -> ResourceKey<'_>;

    /// Whether the resource is active remotely
    fn is_active(&self) -> bool;

    /// Id assigned by the remote system, empty for desired resources
    fn remote_id(&self) -> &str;

    /// True iff both denote the same logical resource
    fn same_resource(&self, other: &Self) -> bool {
        self.key() == other.key()
    }

    /// Total order consistent with [`Reconcilable::same_resource`]
    fn sorts_before(&self, other: &Self) -> bool {
        self.key() < other.key()
    }

    /// Compare two resources by key
    fn compare(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Reconcilable for Trigger {
    fn resource_type(&self) -> &'static str {
        "trigger"
    }

    fn key(&self) -> ResourceKey<'_> {
        ResourceKey::new(&self.base_object, &self.condition)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn remote_id(&self) -> &str {
        &self.id
    }
}

impl Reconcilable for Notification {
    fn resource_type(&self) -> &'static str {
        "notification"
    }

    fn key(&self) -> ResourceKey<'_> {
        ResourceKey::new(&self.communication_profile_id, &self.event_type_name)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn remote_id(&self) -> &str {
        &self.id
    }
}

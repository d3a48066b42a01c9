//! # Reconcile
//!
//! Converges the managed event triggers and notifications of a remote tenant
//! to a declared template.
//!
//! ## Core Concepts
//!
//! - **Template**: the desired state, expanded into canonical [`Trigger`]s and
//!   [`Notification`]s
//! - **Reconcilable**: a resource with a comparison key, an activity flag and
//!   a remote id
//! - **ReconciliationPlan**: what to create, delete and reactivate
//! - **Executor**: applies a plan through a [`RemoteStore`], creates before
//!   deletes
//!
//! ## Example
//!
//! ```
//! use reconcile::{plan_changes, ProfileIndex, Profile, Template};
//!
//! let template: Template = r#"{
//!     "profiles": ["Default"],
//!     "notifications": [{
//!         "baseObject": "Account",
//!         "triggers": [{ "name": "insert", "condition": "changeType == 'INSERT'" }]
//!     }]
//! }"#.parse()?;
//!
//! let plan = plan_changes(template.expand_triggers(), Vec::new());
//! assert_eq!(plan.to_create.len(), 1);
//!
//! let profiles: ProfileIndex = [Profile { id: "p-1".into(), name: "Default".into() }]
//!     .into_iter()
//!     .collect();
//! let notifications = template.expand_notifications(&profiles)?;
//! assert_eq!(notifications[0].communication_profile_id, "p-1");
//! # Ok::<(), reconcile::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! - [`RemoteStore`]: writes one resource type to the remote system
//! - [`ProgressCallback`]: receives progress updates
//! - [`ConfirmCallback`]: handles user confirmations

pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod template;
pub mod types;

// Re-export main types at crate root
pub use context::{
    AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback, RemoteStore,
};
pub use diff::{plan_changes, reconcile, sort_for_reconcile};
pub use error::{Error, Operation, Result};
pub use executor::{
    check_remote_ids, create_phase, delete_phase, execute, execute_simple, report_reactivations,
};
pub use planner::{PlanSummary, ReconciliationPlan};
pub use resource::{Reconcilable, ResourceKey};
pub use template::{
    NotificationSpec, ProfileIndex, Template, TriggerDefinition, TriggerDefinitions, event_name,
};
pub use types::{
    ApplyResult, Callout, CalloutAuth, EventType, ExecuteOptions, ExecuteSummary,
    MANAGED_EVENT_DESCRIPTION, MANAGED_NOTIFICATION_DESCRIPTION, MANAGED_TAG,
    MANAGED_TRIGGER_DESCRIPTION, Notification, Profile, Trigger,
};

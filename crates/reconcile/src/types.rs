//! Core types for managed triggers and notifications

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag prefixed to every event name owned by this tool
pub const MANAGED_TAG: &str = "znt";

/// Description carried by every managed trigger
pub const MANAGED_TRIGGER_DESCRIPTION: &str = "trigger managed by znt";

/// Description carried by every managed event type
pub const MANAGED_EVENT_DESCRIPTION: &str = "event managed by znt";

/// Description carried by every managed notification and its callout
pub const MANAGED_NOTIFICATION_DESCRIPTION: &str = "notification managed by znt";

/// Descriptor of a triggerable event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventType {
    pub description: String,
    pub display_name: String,
    /// Globally unique, e.g. `znt-Account-onInsert`
    pub name: String,
}

/// An event trigger registration, either desired or observed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trigger {
    /// Remote id, empty until the trigger exists remotely
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub active: bool,
    /// The monitored entity (e.g. `Account`)
    pub base_object: String,
    /// Boolean expression evaluated on change events
    pub condition: String,
    pub description: String,
    pub event_type: EventType,
}

impl Trigger {
    /// Whether this trigger carries the managed marker
    pub fn is_managed(&self) -> bool {
        self.description == MANAGED_TRIGGER_DESCRIPTION
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} when {})",
            self.event_type.name, self.base_object, self.condition
        )
    }
}

/// Credentials the remote system uses when firing a callout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalloutAuth {
    pub domain: String,
    pub password: String,
    pub preemptive: bool,
    pub username: String,
}

/// HTTP callout fired by a notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Callout {
    pub active: bool,
    pub callout_auth: CalloutAuth,
    #[serde(rename = "calloutBaseurl", alias = "calloutBaseURL")]
    pub callout_base_url: String,
    /// Placeholder name to templated value, e.g. `AccountName -> <Account.Name>`
    pub callout_params: BTreeMap<String, String>,
    pub callout_retry: bool,
    pub description: String,
    pub event_type_name: String,
    pub http_method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub required_auth: bool,
}

/// Binds a callout to one communication profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notification {
    pub active: bool,
    pub callout: Callout,
    pub callout_active: bool,
    #[serde(rename = "communicationProfileId", alias = "communicationProfileID")]
    pub communication_profile_id: String,
    pub description: String,
    pub event_type_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
}

impl Notification {
    /// Whether this notification carries the managed marker
    pub fn is_managed(&self) -> bool {
        self.description == MANAGED_NOTIFICATION_DESCRIPTION
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (profile {})",
            self.event_type_name, self.communication_profile_id
        )
    }
}

/// A communication profile in the remote tenant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "Id", alias = "id")]
    pub id: String,
    #[serde(rename = "ProfileName", alias = "name")]
    pub name: String,
}

/// Outcome of applying a single planned change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// Resource was created remotely with the given id
    Created { id: String },
    /// Resource was destroyed remotely
    Deleted,
    /// Resource exists but is inactive; reported, not mutated
    ReactivationPending,
    /// Nothing was sent to the remote system
    Skipped { reason: String },
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub deleted: usize,
    pub reactivation_pending: usize,
    pub skipped: usize,
}

impl ExecuteSummary {
    /// Total number of remote changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.deleted
    }

    /// Total number of items processed
    pub fn total(&self) -> usize {
        self.created + self.deleted + self.reactivation_pending + self.skipped
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &ExecuteSummary) {
        self.created += other.created;
        self.deleted += other.deleted;
        self.reactivation_pending += other.reactivation_pending;
        self.skipped += other.skipped;
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::Created { .. } => self.created += 1,
            ApplyResult::Deleted => self.deleted += 1,
            ApplyResult::ReactivationPending => self.reactivation_pending += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

impl fmt::Display for ExecuteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} deleted, {} awaiting reactivation, {} skipped",
            self.created, self.deleted, self.reactivation_pending, self.skipped
        )
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't make changes, just report what would happen
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_decodes_remote_json() {
        let json = r#"{
            "id": "2c92c0f9",
            "active": false,
            "baseObject": "Account",
            "condition": "changeType == 'INSERT'",
            "description": "trigger managed by znt",
            "eventType": {
                "name": "znt-Account-onInsert",
                "displayName": "znt-Account-onInsert",
                "description": "event managed by znt"
            }
        }"#;

        let trigger: Trigger = serde_json::from_str(json).unwrap();
        assert_eq!(trigger.id, "2c92c0f9");
        assert!(!trigger.active);
        assert_eq!(trigger.base_object, "Account");
        assert_eq!(trigger.event_type.display_name, "znt-Account-onInsert");
        assert!(trigger.is_managed());
    }

    #[test]
    fn test_trigger_without_id_omits_it() {
        let trigger = Trigger {
            base_object: "Account".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&trigger).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["baseObject"], "Account");
    }

    #[test]
    fn test_notification_wire_names() {
        let json = r#"{
            "id": "n-1",
            "communicationProfileId": "123",
            "eventTypeName": "znt-Account-onInsert",
            "callout": { "calloutBaseurl": "https://example.com/callout" }
        }"#;

        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.communication_profile_id, "123");
        assert_eq!(
            notification.callout.callout_base_url,
            "https://example.com/callout"
        );
        assert!(!notification.is_managed());

        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value["communicationProfileId"], "123");
        assert_eq!(value["callout"]["calloutBaseurl"], "https://example.com/callout");
    }

    #[test]
    fn test_profile_decodes_query_record() {
        let profile: Profile =
            serde_json::from_str(r#"{"Id": "abc", "ProfileName": "Default Profile"}"#).unwrap();
        assert_eq!(profile.id, "abc");
        assert_eq!(profile.name, "Default Profile");
    }

    #[test]
    fn test_summary_add_and_merge() {
        let mut summary = ExecuteSummary::default();
        summary.add_result(&ApplyResult::Created { id: "1".into() });
        summary.add_result(&ApplyResult::Deleted);
        summary.add_result(&ApplyResult::ReactivationPending);

        let mut other = ExecuteSummary::default();
        other.add_result(&ApplyResult::Skipped {
            reason: "Dry run".into(),
        });
        summary.merge(&other);

        assert_eq!(summary.total_changes(), 2);
        assert_eq!(summary.total(), 4);
        assert_eq!(
            summary.to_string(),
            "1 created, 1 deleted, 1 awaiting reactivation, 1 skipped"
        );
    }
}

//! Template parsing and expansion into desired-state resources
//!
//! A template declares a base callout, the communication profiles to
//! notify, and per base object the operations to trigger on. Expansion turns
//! it into the canonical triggers and notifications the remote tenant should
//! hold.

use crate::error::{Error, Result};
use crate::types::{
    Callout, EventType, MANAGED_EVENT_DESCRIPTION, MANAGED_NOTIFICATION_DESCRIPTION,
    MANAGED_TAG, MANAGED_TRIGGER_DESCRIPTION, Notification, Profile, Trigger,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// The desired-state document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Template {
    /// Defaults shared by every generated callout
    pub callout: Callout,
    /// Communication profile names, in notification order
    pub profiles: Vec<String>,
    pub notifications: Vec<NotificationSpec>,
}

/// Triggers and callout parameters for one base object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSpec {
    pub base_object: String,
    pub triggers: TriggerDefinitions,
    pub callout_params: BTreeMap<String, String>,
}

/// Operation/condition pairs, as a list or as a legacy mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerDefinitions {
    /// `[{"name": "insert", "condition": "..."}]`
    Ordered(Vec<TriggerDefinition>),
    /// `{"insert": "..."}`, iterated by operation name
    Mapping(BTreeMap<String, String>),
}

impl Default for TriggerDefinitions {
    fn default() -> Self {
        Self::Ordered(Vec::new())
    }
}

impl TriggerDefinitions {
    /// `(operation, condition)` pairs in declaration order
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        match self {
            Self::Ordered(defs) => defs
                .iter()
                .map(|d| (d.name.as_str(), d.condition.as_str()))
                .collect(),
            Self::Mapping(map) => map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(defs) => defs.len(),
            Self::Mapping(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single trigger declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    /// Operation, e.g. `insert`
    pub name: String,
    pub condition: String,
}

/// Communication profile ids by name
#[derive(Debug, Clone, Default)]
pub struct ProfileIndex {
    ids: HashMap<String, String>,
}

impl ProfileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile; a later profile with the same name wins
    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.ids.insert(name.into(), id.into());
    }

    /// Look up the id of a profile by name
    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.ids
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnresolvedProfile {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<Profile> for ProfileIndex {
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        let mut index = Self::new();
        for profile in iter {
            index.insert(profile.name, profile.id);
        }
        index
    }
}

/// Event name owned by this tool, e.g. `znt-Account-onInsert`
pub fn event_name(base_object: &str, operation: &str) -> String {
    format!("{MANAGED_TAG}-{base_object}-on{}", capitalize(operation))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl NotificationSpec {
    /// Triggers for this base object, in declaration order
    pub fn triggers(&self) -> Vec<Trigger> {
        self.triggers
            .pairs()
            .into_iter()
            .map(|(operation, condition)| {
                let name = event_name(&self.base_object, operation);
                Trigger {
                    id: String::new(),
                    active: true,
                    base_object: self.base_object.clone(),
                    condition: condition.to_string(),
                    description: MANAGED_TRIGGER_DESCRIPTION.to_string(),
                    event_type: EventType {
                        description: MANAGED_EVENT_DESCRIPTION.to_string(),
                        display_name: name.clone(),
                        name,
                    },
                }
            })
            .collect()
    }
}

impl Template {
    /// Parse a template from a JSON reader
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a template from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::parse(std::io::BufReader::new(file))
    }

    /// Desired triggers, sorted by event name
    pub fn expand_triggers(&self) -> Vec<Trigger> {
        let mut triggers: Vec<Trigger> = self
            .notifications
            .iter()
            .flat_map(NotificationSpec::triggers)
            .collect();
        triggers.sort_by(|a, b| a.event_type.name.cmp(&b.event_type.name));
        triggers
    }

    /// Desired notifications, one per base object × trigger × profile
    ///
    /// Order is base object, then trigger, then profile, each as declared. Fails
    /// with [`Error::UnresolvedProfile`] before producing anything if a
    /// listed profile is unknown.
    pub fn expand_notifications(&self, profiles: &ProfileIndex) -> Result<Vec<Notification>> {
        let profile_ids = self
            .profiles
            .iter()
            .map(|name| profiles.resolve(name))
            .collect::<Result<Vec<_>>>()?;

        let mut notifications = Vec::new();
        for spec in &self.notifications {
            for trigger in spec.triggers() {
                let name = &trigger.event_type.name;
                let callout = Callout {
                    active: true,
                    callout_params: spec.callout_params.clone(),
                    callout_retry: true,
                    description: MANAGED_NOTIFICATION_DESCRIPTION.to_string(),
                    event_type_name: name.clone(),
                    http_method: "POST".to_string(),
                    name: name.clone(),
                    required_auth: true,
                    ..self.callout.clone()
                };

                for profile_id in &profile_ids {
                    notifications.push(Notification {
                        active: true,
                        callout: callout.clone(),
                        callout_active: true,
                        communication_profile_id: (*profile_id).to_string(),
                        description: MANAGED_NOTIFICATION_DESCRIPTION.to_string(),
                        event_type_name: name.clone(),
                        id: String::new(),
                        name: name.clone(),
                    });
                }
            }
        }

        Ok(notifications)
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

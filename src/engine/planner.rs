//! Plan construction from a template and the tenant's managed resources

use anyhow::{Context, Result};
use reconcile::{Notification, PlanSummary, ReconciliationPlan, Template, Trigger, plan_changes};
use std::path::Path;
use zuora::Backend;

use crate::cli::ResourceFilter;

/// Resource types covered by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Triggers,
    Notifications,
}

impl Scope {
    pub fn includes_triggers(self) -> bool {
        matches!(self, Scope::All | Scope::Triggers)
    }

    pub fn includes_notifications(self) -> bool {
        matches!(self, Scope::All | Scope::Notifications)
    }
}

impl From<Option<ResourceFilter>> for Scope {
    fn from(filter: Option<ResourceFilter>) -> Self {
        match filter {
            None => Scope::All,
            Some(ResourceFilter::Triggers) => Scope::Triggers,
            Some(ResourceFilter::Notifications) => Scope::Notifications,
        }
    }
}

/// Trigger and notification plans for one run
#[derive(Debug, Default)]
pub struct Plans {
    pub triggers: ReconciliationPlan<Trigger>,
    pub notifications: ReconciliationPlan<Notification>,
}

impl Plans {
    pub fn summary(&self) -> PlanSummary {
        let mut summary = self.triggers.summary();
        summary.merge(self.notifications.summary());
        summary
    }

    /// Remote state already matches the template
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty() && self.notifications.is_empty()
    }

    pub fn has_mutations(&self) -> bool {
        self.triggers.has_mutations() || self.notifications.has_mutations()
    }
}

/// Read and parse a template file
pub fn load_template(path: &Path) -> Result<Template> {
    Template::from_path(path).with_context(|| format!("Could not load template {}", path.display()))
}

/// Diff the template against the managed resources of the tenant
///
/// Profiles are only fetched when notifications are in scope; every profile
/// named by the template must exist before anything is planned.
pub fn build_plans<B: Backend + ?Sized>(
    template: &Template,
    backend: &B,
    scope: Scope,
) -> Result<Plans> {
    let mut plans = Plans::default();

    if scope.includes_triggers() {
        let desired = template.expand_triggers();
        let observed = backend
            .fetch_managed_triggers()
            .context("Could not fetch event triggers")?;
        log::info!(
            "{} desired triggers, {} managed remote triggers",
            desired.len(),
            observed.len()
        );
        plans.triggers = plan_changes(desired, observed);
    }

    if scope.includes_notifications() {
        let profiles = backend
            .profile_index()
            .context("Could not fetch communication profiles")?;
        let desired = template.expand_notifications(&profiles)?;
        let observed = backend
            .fetch_managed_notifications()
            .context("Could not fetch notification definitions")?;
        log::info!(
            "{} desired notifications, {} managed remote notifications",
            desired.len(),
            observed.len()
        );
        plans.notifications = plan_changes(desired, observed);
    }

    Ok(plans)
}

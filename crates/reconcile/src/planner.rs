//! Reconciliation plan - the changes needed to converge one resource type

use serde::{Deserialize, Serialize};

/// Changes needed to converge the remote state of one resource type
///
/// Built once per run, consumed once by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationPlan<T> {
    /// Desired resources with no remote counterpart
    pub to_create: Vec<T>,
    /// Remote resources absent from the desired set
    pub to_delete: Vec<T>,
    /// Remote resources that match but are inactive
    pub to_reactivate: Vec<T>,
}

impl<T> ReconciliationPlan<T> {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            to_create: Vec::new(),
            to_delete: Vec::new(),
            to_reactivate: Vec::new(),
        }
    }

    /// Total number of planned entries
    pub fn total(&self) -> usize {
        self.to_create.len() + self.to_delete.len() + self.to_reactivate.len()
    }

    /// Check if the remote state already matches
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Check if applying would mutate the remote system
    pub fn has_mutations(&self) -> bool {
        !self.to_create.is_empty() || !self.to_delete.is_empty()
    }

    /// Counts per category
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            additions: self.to_create.len(),
            removals: self.to_delete.len(),
            reactivations: self.to_reactivate.len(),
        }
    }
}

impl<T> Default for ReconciliationPlan<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Plan summary statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub additions: usize,
    pub removals: usize,
    pub reactivations: usize,
}

impl PlanSummary {
    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.reactivations
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: PlanSummary) {
        self.additions += other.additions;
        self.removals += other.removals;
        self.reactivations += other.reactivations;
    }
}

//! Plan display

use colored::Colorize;
use reconcile::{Reconcilable, ReconciliationPlan};

use super::planner::Plans;

/// Kind of planned change, as rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Create,
    Delete,
    Reactivate,
}

impl Change {
    fn symbol(self) -> colored::ColoredString {
        match self {
            Change::Create => "+".green(),
            Change::Delete => "-".red(),
            Change::Reactivate => "~".yellow(),
        }
    }

    fn note(self) -> &'static str {
        match self {
            Change::Create => "(will create)",
            Change::Delete => "(will delete)",
            Change::Reactivate => "(inactive, not reactivated)",
        }
    }
}

/// Planned changes in display order: creates, deletes, then reactivations
pub fn plan_entries<T: Reconcilable>(plan: &ReconciliationPlan<T>) -> Vec<(Change, String)> {
    let creates = plan.to_create.iter().map(|r| (Change::Create, r.to_string()));
    let deletes = plan.to_delete.iter().map(|r| (Change::Delete, r.to_string()));
    let reactivations = plan
        .to_reactivate
        .iter()
        .map(|r| (Change::Reactivate, r.to_string()));
    creates.chain(deletes).chain(reactivations).collect()
}

fn display_plan<T: Reconcilable>(title: &str, plan: &ReconciliationPlan<T>) {
    let entries = plan_entries(plan);
    if entries.is_empty() {
        return;
    }

    println!("│ {}", title.bold());
    for (change, label) in &entries {
        println!("│   {} {} {}", change.symbol(), label, change.note().dimmed());
    }
    println!("│");
}

/// Display both plans in a user-friendly format
pub fn display_plans(plans: &Plans) {
    if plans.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Reconciliation Plan".bold()
    );
    println!("│");

    display_plan("Event triggers", &plans.triggers);
    display_plan("Notifications", &plans.notifications);

    let summary = plans.summary();
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} to create, {} to delete, {} inactive",
        summary.additions.to_string().green(),
        summary.removals.to_string().red(),
        summary.reactivations.to_string().yellow()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

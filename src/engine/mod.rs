//! Reconciliation engine for znt
//!
//! The engine orchestrates:
//! 1. Planning - Expand the template and diff it against the tenant
//! 2. Display - Render what would change
//! 3. Executing - Apply both plans in a safe order with confirmation

pub mod differ;
pub mod executor;
pub mod planner;

pub use differ::display_plans;
pub use executor::{ApplyOptions, DialoguerConfirm, apply, print_summary};
pub use planner::{Scope, build_plans, load_template};

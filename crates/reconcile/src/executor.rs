//! Plan executor - applies a reconciliation plan through a remote store
//!
//! Creates always run before deletes so a managed resource is never briefly
//! missing. The first failing remote call aborts the run; nothing already
//! applied is rolled back; re-running reconciliation converges.

use crate::context::{AutoConfirm, ConfirmCallback, NoProgress, ProgressCallback, RemoteStore};
use crate::error::{Error, Operation, Result};
use crate::planner::ReconciliationPlan;
use crate::resource::Reconcilable;
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary};

/// Execute a plan with the given options and callbacks
///
/// # Arguments
/// * `plan` - The reconciliation plan to apply
/// * `store` - Writer for the plan's resource type
/// * `opts` - Execution options
/// * `progress` - Progress callback
/// * `confirm` - Asked once before the first mutation (not on dry run)
///
/// # Returns
/// Summary of execution results, or [`Error::ApplyFailed`] carrying the
/// progress made before the failure
pub fn execute<T, S, P, C>(
    plan: &ReconciliationPlan<T>,
    store: &S,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    T: Reconcilable,
    S: RemoteStore<T> + ?Sized,
    P: ProgressCallback,
    C: ConfirmCallback,
{
    if plan.is_empty() {
        return Ok(ExecuteSummary::default());
    }

    let mut summary = ExecuteSummary::default();

    if plan.has_mutations() {
        if opts.dry_run {
            skip_all(plan, "Dry run", progress, &mut summary);
            return Ok(summary);
        }

        check_remote_ids(&plan.to_delete)?;

        let confirmed = confirm
            .confirm("Apply changes?")
            .map_err(|e| Error::Confirmation(format!("{e:#}")))?;
        if !confirmed {
            skip_all(plan, "Declined", progress, &mut summary);
            return Ok(summary);
        }

        create_phase(&plan.to_create, store, progress, &mut summary)?;
        delete_phase(&plan.to_delete, store, progress, &mut summary)?;
    }

    report_reactivations(&plan.to_reactivate, progress, &mut summary);

    Ok(summary)
}

/// Simple execution without callbacks
pub fn execute_simple<T, S>(
    plan: &ReconciliationPlan<T>,
    store: &S,
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary>
where
    T: Reconcilable,
    S: RemoteStore<T> + ?Sized,
{
    execute(plan, store, opts, &mut NoProgress, &mut AutoConfirm)
}

/// Insert every resource, stopping at the first failure
pub fn create_phase<T, S, P>(
    resources: &[T],
    store: &S,
    progress: &mut P,
    summary: &mut ExecuteSummary,
) -> Result<()>
where
    T: Reconcilable,
    S: RemoteStore<T> + ?Sized,
    P: ProgressCallback,
{
    if resources.is_empty() {
        return Ok(());
    }

    progress.on_phase_start(Operation::Create, resources.len());
    for resource in resources {
        let label = resource.to_string();
        progress.on_resource_start(Operation::Create, &label);

        let id = store
            .insert(resource)
            .map_err(|e| apply_failed(Operation::Create, resource, &*summary, &e))?;
        log::info!("created {} {} ({})", resource.resource_type(), label, id);

        let result = ApplyResult::Created { id };
        summary.add_result(&result);
        progress.on_resource_complete(&label, &result);
    }
    progress.on_phase_complete();

    Ok(())
}

/// Destroy every resource, stopping at the first failure
///
/// Every resource must carry its remote id; only observed resources belong
/// in a delete list. Ids are checked before the first destroy.
pub fn delete_phase<T, S, P>(
    resources: &[T],
    store: &S,
    progress: &mut P,
    summary: &mut ExecuteSummary,
) -> Result<()>
where
    T: Reconcilable,
    S: RemoteStore<T> + ?Sized,
    P: ProgressCallback,
{
    if resources.is_empty() {
        return Ok(());
    }

    check_remote_ids(resources)?;

    progress.on_phase_start(Operation::Delete, resources.len());
    for resource in resources {
        let label = resource.to_string();
        let id = resource.remote_id();
        progress.on_resource_start(Operation::Delete, &label);
        store
            .destroy(id)
            .map_err(|e| apply_failed(Operation::Delete, resource, &*summary, &e))?;
        log::info!("deleted {} {} ({})", resource.resource_type(), label, id);

        let result = ApplyResult::Deleted;
        summary.add_result(&result);
        progress.on_resource_complete(&label, &result);
    }
    progress.on_phase_complete();

    Ok(())
}

/// Record inactive matches without mutating them
pub fn report_reactivations<T, P>(resources: &[T], progress: &mut P, summary: &mut ExecuteSummary)
where
    T: Reconcilable,
    P: ProgressCallback,
{
    for resource in resources {
        log::warn!(
            "{} {} exists but is inactive; it is not reactivated automatically",
            resource.resource_type(),
            resource
        );
        let result = ApplyResult::ReactivationPending;
        summary.add_result(&result);
        progress.on_resource_complete(&resource.to_string(), &result);
    }
}

/// Fail with [`Error::MissingRemoteId`] if any resource lacks a remote id
///
/// Run before the first remote call so a malformed delete list never leaves
/// a run half applied.
pub fn check_remote_ids<T: Reconcilable>(resources: &[T]) -> Result<()> {
    match resources.iter().find(|r| r.remote_id().is_empty()) {
        Some(resource) => Err(Error::MissingRemoteId {
            resource_type: resource.resource_type(),
            resource: resource.to_string(),
        }),
        None => Ok(()),
    }
}

fn skip_all<T, P>(
    plan: &ReconciliationPlan<T>,
    reason: &str,
    progress: &mut P,
    summary: &mut ExecuteSummary,
) where
    T: Reconcilable,
    P: ProgressCallback,
{
    let skipped = ApplyResult::Skipped {
        reason: reason.to_string(),
    };
    for resource in plan.to_create.iter().chain(&plan.to_delete) {
        summary.add_result(&skipped);
        progress.on_resource_complete(&resource.to_string(), &skipped);
    }
    for resource in &plan.to_reactivate {
        summary.add_result(&ApplyResult::ReactivationPending);
        progress.on_resource_complete(&resource.to_string(), &ApplyResult::ReactivationPending);
    }
}

fn apply_failed<T: Reconcilable>(
    operation: Operation,
    resource: &T,
    summary: &ExecuteSummary,
    error: &anyhow::Error,
) -> Error {
    Error::ApplyFailed {
        operation,
        resource_type: resource.resource_type(),
        resource: resource.to_string(),
        summary: summary.clone(),
        message: format!("{error:#}"),
    }
}

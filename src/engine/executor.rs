//! Apply both plans against the tenant with confirmation and progress

use colored::Colorize;
use reconcile::{
    AutoDecline, ConfirmCallback, ExecuteOptions, ExecuteSummary, ProgressCallback,
    check_remote_ids, create_phase, delete_phase, execute, report_reactivations,
};
use zuora::{Backend, NotificationStore, TriggerStore};

use super::planner::Plans;

/// Options for an apply run
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Skip confirmation prompts
    pub yes: bool,
}

/// Interactive confirmation on the terminal
pub struct DialoguerConfirm;

impl ConfirmCallback for DialoguerConfirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        Ok(confirmed)
    }
}

/// Apply the trigger and notification plans
///
/// Order: trigger creates, notification creates, notification deletes,
/// trigger deletes. A notification never points at a missing event and a
/// trigger is only removed once nothing managed refers to it. The first
/// failing call stops the run with [`reconcile::Error::ApplyFailed`] holding
/// everything done so far. Delete lists are checked for remote ids before
/// anything is sent.
pub fn apply<B, P, C>(
    plans: &Plans,
    backend: &B,
    opts: &ApplyOptions,
    progress: &mut P,
    confirm: &mut C,
) -> reconcile::Result<ExecuteSummary>
where
    B: Backend + ?Sized,
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let triggers = TriggerStore::new(backend);
    let notifications = NotificationStore::new(backend);
    let mut summary = ExecuteSummary::default();

    if plans.has_mutations() && !opts.dry_run {
        check_remote_ids(&plans.triggers.to_delete)?;
        check_remote_ids(&plans.notifications.to_delete)?;
    }

    if plans.has_mutations() && (opts.dry_run || !proceed(plans, opts, confirm)?) {
        let skip = ExecuteOptions {
            dry_run: opts.dry_run,
        };
        summary.merge(&execute(
            &plans.triggers,
            &triggers,
            &skip,
            progress,
            &mut AutoDecline,
        )?);
        summary.merge(&execute(
            &plans.notifications,
            &notifications,
            &skip,
            progress,
            &mut AutoDecline,
        )?);
        return Ok(summary);
    }

    create_phase(&plans.triggers.to_create, &triggers, progress, &mut summary)?;
    create_phase(
        &plans.notifications.to_create,
        &notifications,
        progress,
        &mut summary,
    )?;
    delete_phase(
        &plans.notifications.to_delete,
        &notifications,
        progress,
        &mut summary,
    )?;
    delete_phase(&plans.triggers.to_delete, &triggers, progress, &mut summary)?;

    report_reactivations(&plans.triggers.to_reactivate, progress, &mut summary);
    report_reactivations(&plans.notifications.to_reactivate, progress, &mut summary);

    Ok(summary)
}

fn proceed<C: ConfirmCallback>(
    plans: &Plans,
    opts: &ApplyOptions,
    confirm: &mut C,
) -> reconcile::Result<bool> {
    if opts.yes {
        return Ok(true);
    }

    let summary = plans.summary();
    let prompt = format!(
        "Create {} and delete {} remote resources?",
        summary.additions, summary.removals
    );
    confirm
        .confirm(&prompt)
        .map_err(|e| reconcile::Error::Confirmation(format!("{e:#}")))
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary, dry_run: bool) {
    println!();
    if dry_run {
        println!("  {} Dry run - no changes made", "ℹ".blue());
    } else if summary.total_changes() > 0 {
        println!("  {} Tenant updated", "✓".green().bold());
    } else if summary.skipped > 0 {
        println!("  {} Aborted", "✗".red());
    } else {
        println!("  {} Nothing to apply", "✓".green());
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.deleted > 0 {
        println!("    • {} resources deleted", summary.deleted);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.reactivation_pending > 0 {
        println!(
            "    • {} {}",
            summary.reactivation_pending,
            "inactive resources need reactivation in the tenant".yellow()
        );
    }
}

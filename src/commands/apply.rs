//! `znt apply` - converge the tenant to the template

use anyhow::Result;

use crate::Context;
use crate::cli::ApplyArgs;
use crate::engine::{self, ApplyOptions, DialoguerConfirm, Scope};
use crate::progress::ApplyProgress;
use crate::ui;

pub fn run(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let template = engine::load_template(&args.template.template)?;
    let backend = super::connect(ctx)?;

    let plans = engine::build_plans(&template, &backend, Scope::All)?;
    engine::display_plans(&plans);
    if plans.is_empty() {
        return Ok(());
    }

    let opts = ApplyOptions {
        dry_run: args.dry_run,
        yes: args.yes,
    };
    let mut progress = ApplyProgress::new(ctx.quiet);

    match engine::apply(&plans, &backend, &opts, &mut progress, &mut DialoguerConfirm) {
        Ok(summary) => {
            log::info!("apply finished: {}", summary);
            engine::print_summary(&summary, opts.dry_run);
            Ok(())
        }
        Err(err) => {
            if let Some(partial) = err.partial_summary() {
                ui::error("Apply stopped; changes made so far are kept");
                engine::print_summary(partial, false);
                ui::dim("Run 'znt apply' again to finish converging.");
            }
            Err(err.into())
        }
    }
}

//! `znt verify` - check the tenant matches the template

use anyhow::{Result, bail};

use crate::Context;
use crate::cli::TemplateArgs;
use crate::engine::{self, Scope};
use crate::ui;

pub fn run(ctx: &Context, args: &TemplateArgs) -> Result<()> {
    let template = engine::load_template(&args.template)?;
    let backend = super::connect(ctx)?;

    let plans = engine::build_plans(&template, &backend, Scope::All)?;
    let summary = plans.summary();
    if !summary.has_changes() {
        ui::success("Triggers and notifications match the template");
        return Ok(());
    }

    engine::display_plans(&plans);
    bail!(
        "tenant differs from the template ({} missing, {} extra, {} inactive)",
        summary.additions,
        summary.removals,
        summary.reactivations
    )
}

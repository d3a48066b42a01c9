//! `znt plan` - show what apply would change

use anyhow::Result;

use crate::Context;
use crate::cli::PlanArgs;
use crate::engine::{self, Scope};
use crate::ui;

pub fn run(ctx: &Context, args: &PlanArgs) -> Result<()> {
    let template = engine::load_template(&args.template.template)?;
    let backend = super::connect(ctx)?;

    let scope = Scope::from(args.only);
    let plans = engine::build_plans(&template, &backend, scope)?;
    engine::display_plans(&plans);

    let reactivations = plans.summary().reactivations;
    if reactivations > 0 {
        ui::warn(&format!(
            "{reactivations} inactive resources match the template; znt does not reactivate them"
        ));
    }

    if plans.has_mutations() && !ctx.quiet {
        println!();
        ui::dim("Run 'znt apply' with the same template to make these changes.");
    }

    Ok(())
}

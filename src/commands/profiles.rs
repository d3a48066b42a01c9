//! `znt profiles` - list communication profiles

use anyhow::{Context as AnyhowContext, Result};
use zuora::Backend;

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let backend = super::connect(ctx)?;
    let mut profiles = backend
        .fetch_profiles()
        .context("Could not fetch communication profiles")?;
    profiles.sort_by(|a, b| a.name.cmp(&b.name));

    ui::header("Communication Profiles");
    if profiles.is_empty() {
        ui::dim("(none)");
        return Ok(());
    }
    for profile in &profiles {
        ui::kv(&profile.name, &profile.id);
    }
    if ctx.verbose > 0 {
        println!();
        ui::info(&format!("{} profiles", profiles.len()));
    }

    Ok(())
}

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "znt")]
#[command(version)]
#[command(about = "Reconcile Zuora event triggers and notifications with a template", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file (defaults to <config dir>/config.toml)
    #[arg(long, global = true, env = "ZNT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the changes needed to match the template
    Plan(PlanArgs),

    /// Create and delete remote resources to match the template
    Apply(ApplyArgs),

    /// Fail when the remote state differs from the template
    Verify(TemplateArgs),

    /// List communication profiles of the tenant
    Profiles,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser)]
pub struct TemplateArgs {
    /// Template file (JSON)
    #[arg(short, long)]
    pub template: PathBuf,
}

#[derive(Parser)]
pub struct PlanArgs {
    #[command(flatten)]
    pub template: TemplateArgs,

    /// Only plan one resource type
    #[arg(long, value_enum)]
    pub only: Option<ResourceFilter>,
}

#[derive(Parser)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub template: TemplateArgs,

    /// Dry run - show what would be done
    #[arg(short, long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceFilter {
    Triggers,
    Notifications,
}

//! Apply progress display backed by indicatif.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reconcile::{ApplyResult, Operation, ProgressCallback};

use crate::ui;

const LABEL_WIDTH: usize = 50;

/// Shows one progress bar per apply phase and a line per finished resource.
pub struct ApplyProgress {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl ApplyProgress {
    pub fn new(quiet: bool) -> Self {
        Self { bar: None, quiet }
    }

    fn print(&self, line: &str) {
        if self.quiet {
            return;
        }
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }
}

fn phase_bar(operation: Operation, len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("  {spinner:.green} {prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb.set_prefix(match operation {
        Operation::Create => "Creating",
        Operation::Delete => "Deleting",
    });
    pb
}

/// One-line description of a finished resource
fn result_line(resource: &str, result: &ApplyResult) -> String {
    match result {
        ApplyResult::Created { id } => {
            format!("    {} {} {}", "+".green(), resource, format!("({id})").dimmed())
        }
        ApplyResult::Deleted => format!("    {} {}", "-".red(), resource),
        ApplyResult::ReactivationPending => format!(
            "    {} {} {}",
            "~".yellow(),
            resource,
            "(inactive, reactivate it in the tenant)".dimmed()
        ),
        ApplyResult::Skipped { reason } => {
            format!("    {} {} {}", "⊘".dimmed(), resource, format!("({reason})").dimmed())
        }
    }
}

impl ProgressCallback for ApplyProgress {
    fn on_phase_start(&mut self, operation: Operation, count: usize) {
        self.bar = Some(if self.quiet {
            ProgressBar::hidden()
        } else {
            phase_bar(operation, count)
        });
    }

    fn on_resource_start(&mut self, _operation: Operation, resource: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(ui::truncate(resource, LABEL_WIDTH));
        }
    }

    fn on_resource_complete(&mut self, resource: &str, result: &ApplyResult) {
        self.print(&result_line(resource, result));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_phase_complete(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

use std::path::Path;

use crate::{
    apply::{Report, apply_plan},
    config::load_config,
    error::Error,
    plan::build_plan,
};

pub struct ConvertOptions<'a> {
    pub config: &'a str,
    pub root: &'a str,
    pub dry_run: bool,
    pub json: bool,
    pub jobs: usize,
}

/// Load config, plan against `root`, then apply (or just report for a dry run).
pub async fn run_convert(opts: ConvertOptions<'_>) -> Result<Report, Error> {
    let config = load_config(opts.config).await?;
    let root = Path::new(opts.root);

    // The config file may itself end in `.ts` and live inside the tree.
    let protected: Vec<_> = std::fs::canonicalize(opts.config).into_iter().collect();

    tracing::debug!(root = %root.display(), dry_run = opts.dry_run, "planning");
    let plan = build_plan(root, &config, &protected)?;
    tracing::debug!(
        renames = plan.renames.len(),
        removals = plan.removals.len(),
        skipped = plan.skipped.len(),
        "plan ready"
    );
    if plan.is_empty() {
        tracing::info!(root = %root.display(), "nothing to convert");
    }

    let report = if opts.dry_run {
        Report::dry_run(plan)
    } else {
        apply_plan(plan, opts.jobs).await
    };
    finish(report, opts.json)
}

/// Print `report` and turn recorded failures into an error for the exit code.
fn finish(report: Report, json: bool) -> Result<Report, Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.is_clean() {
        return Err(Error::Error(format!(
            "{} operation(s) failed",
            report.failed.len()
        )));
    }
    Ok(report)
}

fn print_report(report: &Report) {
    let verb = if report.dry_run { "would " } else { "" };
    for r in &report.renamed {
        println!("{verb}rename {} -> {}", r.from.display(), r.to.display());
    }
    for path in &report.removed {
        println!("{verb}remove {}", path.display());
    }
    for s in &report.skipped {
        println!("skip {} ({})", s.path.display(), s.reason);
    }
    for f in &report.failed {
        println!("failed {}: {}", f.path.display(), f.error);
    }
    println!(
        "{} renamed, {} removed, {} skipped",
        report.renamed.len(),
        report.removed.len(),
        report.skipped.len()
    );
}

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use futures::{StreamExt, stream};
use serde::Serialize;
use tokio::fs::{remove_file, rename, symlink_metadata};

use crate::{
    plan::{Plan, Rename, SkipReason, Skipped},
    utils::{lossy_path, resolve::sort_paths},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a conversion, or of a dry run when `dry_run` is set.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub dry_run: bool,
    pub renamed: Vec<Rename>,
    #[serde(serialize_with = "lossy_path::serialize_vec")]
    pub removed: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
    pub failed: Vec<Failure>,
}

impl Report {
    pub fn dry_run(plan: Plan) -> Self {
        Self {
            dry_run: true,
            renamed: plan.renames,
            removed: plan.removals,
            skipped: plan.skipped,
            failed: vec![],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Done,
    Skipped(SkipReason),
    Failed(std::io::Error),
}

/// Carry out `plan`: all renames first, then all removals, at most `jobs` at a time.
///
/// Individual failures are recorded in the report and do not stop the run.
pub async fn apply_plan(plan: Plan, jobs: usize) -> Report {
    let jobs = jobs.max(1);
    let mut report = Report {
        skipped: plan.skipped,
        ..Report::default()
    };

    let renamed: Vec<(Rename, Outcome)> = stream::iter(plan.renames)
        .map(|r| async move {
            let outcome = rename_one(&r).await;
            (r, outcome)
        })
        .buffer_unordered(jobs)
        .collect()
        .await;

    for (r, outcome) in renamed {
        match outcome {
            Outcome::Done => {
                tracing::info!(from = %r.from.display(), to = %r.to.display(), "renamed");
                report.renamed.push(r);
            }
            Outcome::Skipped(reason) => {
                tracing::warn!(path = %r.from.display(), %reason, "rename skipped");
                report.skipped.push(Skipped {
                    path: r.from,
                    reason,
                });
            }
            Outcome::Failed(err) => {
                tracing::error!(path = %r.from.display(), %err, "rename failed");
                report.failed.push(Failure {
                    path: r.from,
                    error: err.to_string(),
                });
            }
        }
    }

    let removed: Vec<(PathBuf, Outcome)> = stream::iter(plan.removals)
        .map(|path| async move {
            let outcome = remove_one(&path).await;
            (path, outcome)
        })
        .buffer_unordered(jobs)
        .collect()
        .await;

    for (path, outcome) in removed {
        match outcome {
            Outcome::Done => {
                tracing::info!(path = %path.display(), "removed");
                report.removed.push(path);
            }
            Outcome::Skipped(reason) => {
                tracing::debug!(path = %path.display(), %reason, "removal skipped");
                report.skipped.push(Skipped { path, reason });
            }
            Outcome::Failed(err) => {
                tracing::error!(path = %path.display(), %err, "removal failed");
                report.failed.push(Failure {
                    path,
                    error: err.to_string(),
                });
            }
        }
    }

    sort_paths(&mut report.renamed, |r| r.from.as_path());
    sort_paths(&mut report.removed, |p| p.as_path());
    sort_paths(&mut report.skipped, |s| s.path.as_path());
    sort_paths(&mut report.failed, |f| f.path.as_path());
    report
}

async fn rename_one(r: &Rename) -> Outcome {
    // The tree may have changed since planning; never overwrite.
    if symlink_metadata(&r.to).await.is_ok() {
        return Outcome::Skipped(SkipReason::DestinationExists(r.to.clone()));
    }
    match rename(&r.from, &r.to).await {
        Ok(()) => Outcome::Done,
        Err(err) if err.kind() == ErrorKind::NotFound => Outcome::Skipped(SkipReason::Missing),
        Err(err) => Outcome::Failed(err),
    }
}

async fn remove_one(path: &Path) -> Outcome {
    match remove_file(path).await {
        Ok(()) => Outcome::Done,
        Err(err) if err.kind() == ErrorKind::NotFound => Outcome::Skipped(SkipReason::Missing),
        Err(err) => Outcome::Failed(err),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, read_to_string, write};

    use super::*;
    use crate::{config::Config, plan::build_plan};

    fn tree(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (file, content) in files {
            let path = dir.path().join(file);
            create_dir_all(path.parent().unwrap()).unwrap();
            write(path, content).unwrap();
        }
        dir
    }

    async fn convert(root: &Path) -> Report {
        let plan = build_plan(root, &Config::default(), &[]).unwrap();
        apply_plan(plan, 4).await
    }

    #[tokio::test]
    async fn converts_vite_project() {
        let dir = tree(&[
            ("tsconfig.json", "{}"),
            ("tsconfig.node.json", "{}"),
            ("src/App.tsx", "export default function App() {}"),
            ("src/lib/api.ts", "export const base = '/api';"),
            ("src/vite-env.d.ts", "/// <reference types=\"vite/client\" />"),
            ("src/types.d.ts", "declare const x: number;"),
            ("node_modules/dep/index.ts", ""),
        ]);
        let root = dir.path();

        let report = convert(root).await;

        assert!(report.is_clean());
        assert!(!report.dry_run);
        assert_eq!(report.renamed.len(), 2);
        assert_eq!(report.removed.len(), 3);
        assert_eq!(
            read_to_string(root.join("src/App.jsx")).unwrap(),
            "export default function App() {}"
        );
        assert!(root.join("src/lib/api.js").exists());
        assert!(!root.join("src/App.tsx").exists());
        assert!(!root.join("src/lib/api.ts").exists());
        assert!(!root.join("tsconfig.json").exists());
        assert!(!root.join("tsconfig.node.json").exists());
        assert!(!root.join("src/vite-env.d.ts").exists());
        assert!(root.join("src/types.d.ts").exists());
        assert!(root.join("node_modules/dep/index.ts").exists());
    }

    #[tokio::test]
    async fn second_run_changes_nothing() {
        let dir = tree(&[("a.ts", ""), ("b.tsx", ""), ("tsconfig.json", "{}")]);
        let first = convert(dir.path()).await;
        assert_eq!(first.renamed.len(), 2);

        let second = convert(dir.path()).await;
        assert!(second.renamed.is_empty());
        assert!(second.removed.is_empty());
        assert!(second.skipped.is_empty());
        assert!(dir.path().join("a.js").exists());
        assert!(dir.path().join("b.jsx").exists());
    }

    #[tokio::test]
    async fn never_overwrites_existing_destination() {
        let dir = tree(&[("util.ts", "ts"), ("util.js", "js")]);
        let report = convert(dir.path()).await;
        assert!(report.renamed.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(read_to_string(dir.path().join("util.js")).unwrap(), "js");
        assert_eq!(read_to_string(dir.path().join("util.ts")).unwrap(), "ts");
    }

    #[tokio::test]
    async fn destination_created_after_planning_is_skipped() {
        let dir = tree(&[("late.ts", "ts")]);
        let plan = build_plan(dir.path(), &Config::default(), &[]).unwrap();
        write(dir.path().join("late.js"), "js").unwrap();

        let report = apply_plan(plan, 1).await;
        assert!(report.renamed.is_empty());
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::DestinationExists(dir.path().join("late.js"))
        );
        assert_eq!(read_to_string(dir.path().join("late.js")).unwrap(), "js");
    }

    #[tokio::test]
    async fn vanished_files_are_reported_not_failed() {
        let dir = tree(&[("gone.ts", ""), ("tsconfig.json", "{}")]);
        let plan = build_plan(dir.path(), &Config::default(), &[]).unwrap();
        std::fs::remove_file(dir.path().join("gone.ts")).unwrap();
        std::fs::remove_file(dir.path().join("tsconfig.json")).unwrap();

        let report = apply_plan(plan, 2).await;
        assert!(report.is_clean());
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.iter().all(|s| s.reason == SkipReason::Missing));
    }

    #[test]
    fn dry_run_report_mirrors_plan() {
        let dir = tree(&[("x.ts", ""), ("tsconfig.app.json", "{}")]);
        let plan = build_plan(dir.path(), &Config::default(), &[]).unwrap();
        let report = Report::dry_run(plan);
        assert!(report.dry_run);
        assert_eq!(report.renamed.len(), 1);
        assert_eq!(report.removed.len(), 1);
        assert!(dir.path().join("x.ts").exists());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dryRun"], true);
        assert!(json["renamed"][0]["to"].as_str().unwrap().ends_with("x.js"));
    }
}

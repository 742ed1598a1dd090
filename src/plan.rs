use std::{
    collections::HashSet,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use path_clean::PathClean;
use serde::Serialize;

use crate::{
    config::Config,
    error::Error,
    utils::{
        lossy_path,
        rename::renamed_file_name,
        resolve::{resolve_within, sort_paths},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub from: PathBuf,
    #[serde(serialize_with = "lossy_path::serialize")]
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "path")]
pub enum SkipReason {
    /// Rename destination is already on disk.
    DestinationExists(#[serde(serialize_with = "lossy_path::serialize")] PathBuf),
    /// An earlier rename in the plan claims the same destination.
    DuplicateDestination(#[serde(serialize_with = "lossy_path::serialize")] PathBuf),
    /// The config file driving this run.
    Protected,
    /// Removal target is a directory.
    NotAFile,
    /// Removal target vanished before it could be deleted.
    Missing,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DestinationExists(p) => write!(f, "{} already exists", p.display()),
            SkipReason::DuplicateDestination(p) => {
                write!(f, "{} is already the target of another rename", p.display())
            }
            SkipReason::Protected => write!(f, "config file"),
            SkipReason::NotAFile => write!(f, "not a file"),
            SkipReason::Missing => write!(f, "no longer exists"),
        }
    }
}

/// Everything a conversion would do, computed before touching the tree.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Plan {
    pub renames: Vec<Rename>,
    #[serde(serialize_with = "lossy_path::serialize_vec")]
    pub removals: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty() && self.removals.is_empty()
    }
}

/// Walk `root` and work out which files to rename and which config files to delete.
///
/// `protected` holds canonical paths that must never be renamed, such as the
/// config file itself when it lives inside the tree.
pub fn build_plan(root: &Path, config: &Config, protected: &[PathBuf]) -> Result<Plan, Error> {
    if !root.is_dir() {
        return Err(Error::Error(format!("{} is not a directory", root.display())));
    }

    let mut plan = Plan::default();
    let mut candidates = Vec::new();

    for result in walker(root, config).build() {
        let dent = match result {
            Ok(dent) => dent,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable entry");
                continue;
            }
        };
        if !is_rename_candidate(&dent) {
            continue;
        }
        let Some(new_name) = renamed_file_name(dent.file_name(), &config.rules) else {
            continue;
        };

        let from = dent.into_path();
        if is_protected(&from, protected) {
            tracing::debug!(path = %from.display(), "leaving config file in place");
            plan.skipped.push(Skipped {
                path: from,
                reason: SkipReason::Protected,
            });
            continue;
        }
        let to = from.with_file_name(new_name);
        candidates.push(Rename { from, to });
    }

    sort_paths(&mut candidates, |r| r.from.as_path());

    let mut claimed = HashSet::new();
    for rename in candidates {
        if fs::symlink_metadata(&rename.to).is_ok() {
            plan.skipped.push(Skipped {
                reason: SkipReason::DestinationExists(rename.to),
                path: rename.from,
            });
        } else if !claimed.insert(rename.to.clone()) {
            plan.skipped.push(Skipped {
                reason: SkipReason::DuplicateDestination(rename.to),
                path: rename.from,
            });
        } else {
            plan.renames.push(rename);
        }
    }

    let sources: HashSet<PathBuf> = plan.renames.iter().map(|r| r.from.clean()).collect();
    let mut removals = Vec::new();
    let mut removal_skips = Vec::new();
    for entry in &config.remove {
        let path = resolve_within(root, entry)
            .ok_or_else(|| Error::Config(format!("remove entry {entry:?} escapes the root")))?;
        if sources.contains(&path) {
            tracing::debug!(path = %path.display(), "removal target is renamed first");
            continue;
        }
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => removal_skips.push(Skipped {
                path,
                reason: SkipReason::NotAFile,
            }),
            Ok(_) => {
                if !removals.contains(&path) {
                    removals.push(path);
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    plan.removals = removals;
    plan.skipped.extend(removal_skips);
    sort_paths(&mut plan.skipped, |s| s.path.as_path());

    Ok(plan)
}

fn walker(root: &Path, config: &Config) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);
    builder.hidden(false);
    builder.parents(false);
    builder.follow_links(false);
    builder.git_global(false);
    builder.require_git(false);
    builder.ignore(config.respect_gitignore);
    builder.git_ignore(config.respect_gitignore);
    builder.git_exclude(config.respect_gitignore);

    let skip_dirs = config.skip_dirs.clone();
    builder.filter_entry(move |dent| {
        if dent.depth() == 0 || !dent.file_type().is_some_and(|ft| ft.is_dir()) {
            return true;
        }
        let name = dent.file_name().to_string_lossy();
        !skip_dirs.iter().any(|skip| *skip == name)
    });
    builder
}

/// Regular files, and symlinks unless they point at a directory. Links are
/// renamed themselves; their targets are left alone.
fn is_rename_candidate(dent: &ignore::DirEntry) -> bool {
    match dent.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => !fs::metadata(dent.path()).is_ok_and(|m| m.is_dir()),
        _ => false,
    }
}

fn is_protected(path: &Path, protected: &[PathBuf]) -> bool {
    !protected.is_empty()
        && fs::canonicalize(path).is_ok_and(|canonical| protected.contains(&canonical))
}

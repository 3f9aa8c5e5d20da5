//! Duplicate chart resolution.
//!
//! For each group of songs sharing a sha256, one path is kept (the primary)
//! and every other copy is folded into the primary's folder:
//! - a copy in the same folder is just deleted
//! - a copy in another folder has its whole folder merged into the
//!   primary's folder and then removed
//!
//! Failures are per pair and never stop the run. Dry runs skip the mutation
//! but produce the same outcomes, so the logs and counts can be compared.

use indicatif::ProgressBar;
use rustc_hash::FxHashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::fs_ops::LibraryFs;
use crate::models::{DuplicateGroup, DuplicateGroups, DuplicateOutcome, ResolveReport};
use crate::safety::validate_merge;

/// First path, in group order, lying under any configured root.
pub fn select_primary<'a>(paths: &'a [PathBuf], roots: &[PathBuf]) -> Option<&'a Path> {
    paths
        .iter()
        .find(|path| roots.iter().any(|root| path.starts_with(root)))
        .map(PathBuf::as_path)
}

pub struct Resolver<'a, F: LibraryFs> {
    roots: &'a [PathBuf],
    /// Folders a merge may never remove
    protected: Vec<PathBuf>,
    fs: &'a F,
    dry_run: bool,
}

/// Mutable state for one run. Tracks what this run has removed so that later
/// paths inside a merged folder are reported missing in dry runs as well.
#[derive(Default)]
struct RunState {
    report: ResolveReport,
    removed_files: FxHashSet<PathBuf>,
    removed_dirs: FxHashSet<PathBuf>,
}

impl RunState {
    fn record(&mut self, outcome: DuplicateOutcome, progress: &ProgressBar) {
        self.report.outcomes.push(outcome);
        progress.inc(1);
    }

    fn is_gone(&self, path: &Path) -> bool {
        self.removed_files.contains(path)
            || path.ancestors().any(|dir| self.removed_dirs.contains(dir))
    }
}

impl<'a, F: LibraryFs> Resolver<'a, F> {
    pub fn new(roots: &'a [PathBuf], fs: &'a F, dry_run: bool) -> Self {
        Self {
            roots,
            protected: roots.to_vec(),
            fs,
            dry_run,
        }
    }

    /// Also refuse merges that would remove `folder`.
    pub fn protect(mut self, folder: impl Into<PathBuf>) -> Self {
        self.protected.push(folder.into());
        self
    }

    /// Process every group, advancing `progress` once per duplicate path.
    pub fn run(&self, groups: &DuplicateGroups, progress: &ProgressBar) -> ResolveReport {
        let mut state = RunState::default();
        for group in groups {
            self.resolve_group(group, &mut state, progress);
        }
        state.report
    }

    fn resolve_group(&self, group: &DuplicateGroup, state: &mut RunState, progress: &ProgressBar) {
        let Some(primary) = select_primary(&group.paths, self.roots) else {
            error!(
                "{}: no primary determinable, no path is under a configured root. skipped.",
                group.sha256
            );
            state.report.unresolved.push(group.sha256.clone());
            for path in &group.paths[1..] {
                state.record(DuplicateOutcome::Unresolved { path: path.clone() }, progress);
            }
            return;
        };

        let mut primary_seen = false;
        for dup_path in &group.paths {
            if dup_path == primary && !primary_seen {
                primary_seen = true;
                continue;
            }
            let outcome = self.resolve_duplicate(dup_path, primary, state);
            state.record(outcome, progress);
        }
    }

    fn resolve_duplicate(
        &self,
        dup_path: &Path,
        primary: &Path,
        state: &mut RunState,
    ) -> DuplicateOutcome {
        if dup_path == primary {
            info!("{} is listed twice for the same file. skipped.", dup_path.display());
            return DuplicateOutcome::Alias {
                path: dup_path.to_path_buf(),
            };
        }

        if state.is_gone(dup_path) || !self.fs.exists(dup_path) {
            warn!("Path:{}, does not exist. skipped.", dup_path.display());
            return DuplicateOutcome::Missing {
                path: dup_path.to_path_buf(),
            };
        }

        let src_dir = parent_dir(dup_path);
        let dst_dir = parent_dir(primary);

        if src_dir == dst_dir {
            // The copy being deleted may be the last one left
            if state.is_gone(primary) || !self.fs.exists(primary) {
                let reason = format!("primary {} does not exist", primary.display());
                return self.deny(src_dir, dst_dir, reason, state);
            }
            match self.mutate(|| self.fs.remove_file(dup_path)) {
                Ok(()) => {
                    info!(
                        "{} removed as the same file exists in the same folder.",
                        dup_path.display()
                    );
                    state.removed_files.insert(dup_path.to_path_buf());
                    DuplicateOutcome::Removed {
                        path: dup_path.to_path_buf(),
                    }
                }
                Err(err) => self.deny(src_dir, dst_dir, describe(&err), state),
            }
        } else {
            let protected: Vec<&Path> = self.protected.iter().map(PathBuf::as_path).collect();
            if let Err(err) = validate_merge(&src_dir, &dst_dir, &protected) {
                return self.deny(src_dir, dst_dir, err.to_string(), state);
            }
            match self.mutate(|| self.fs.merge_dir(&src_dir, &dst_dir)) {
                Ok(()) => {
                    info!("{} merged to {}", src_dir.display(), dst_dir.display());
                    state.removed_dirs.insert(src_dir.clone());
                    DuplicateOutcome::Merged {
                        source: src_dir,
                        destination: dst_dir,
                    }
                }
                Err(err) => self.deny(src_dir, dst_dir, describe(&err), state),
            }
        }
    }

    fn mutate(&self, op: impl FnOnce() -> io::Result<()>) -> io::Result<()> {
        if self.dry_run {
            Ok(())
        } else {
            op()
        }
    }

    fn deny(
        &self,
        src_dir: PathBuf,
        dst_dir: PathBuf,
        reason: String,
        state: &mut RunState,
    ) -> DuplicateOutcome {
        error!("path:{}, {}. skipped.", src_dir.display(), reason);
        state
            .report
            .denied
            .entry((src_dir.clone(), dst_dir.clone()))
            .or_insert(reason);
        DuplicateOutcome::Denied {
            source: src_dir,
            destination: dst_dir,
        }
    }
}

pub const UNRESOLVED_HEADER: &str =
    "E: No configured root folder holds the following charts. Left untouched.";
pub const DENIED_HEADER: &str = "E: Cannot move following directories. Please move manually.";

/// Write the end-of-run lists: unresolved hashes, then denied pairs with
/// their reason. Writes nothing when both are empty.
pub fn write_summary<W: Write>(out: &mut W, report: &ResolveReport) -> io::Result<()> {
    if !report.unresolved.is_empty() {
        writeln!(out, "{}", console::style(UNRESOLVED_HEADER).red())?;
        for sha256 in &report.unresolved {
            writeln!(out, "{}", sha256)?;
        }
    }

    if !report.denied.is_empty() {
        writeln!(out, "{}", console::style(DENIED_HEADER).red())?;
        for ((src, dst), reason) in &report.denied {
            writeln!(out, "{} -> {} ({})", src.display(), dst.display(), reason)?;
        }
    }
    Ok(())
}

fn describe(err: &io::Error) -> String {
    if err.kind() == io::ErrorKind::PermissionDenied {
        "permission denied".to_string()
    } else {
        err.to_string()
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

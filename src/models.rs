//! Core data models for the BMS library tools.
//!
//! This module contains the song records read from `songdata.db`, the
//! duplicate groups built from them, and the candidate folders shown by the
//! folder opener.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ============================================================================
// Type Aliases
// ============================================================================

/// Index mapping sha256 to group index in `Vec<DuplicateGroup>`
pub type HashIndex = FxHashMap<String, usize>;

/// Index mapping a resolved folder to its index in `Vec<CandidateFolder>`
pub type FolderIndex = FxHashMap<PathBuf, usize>;

// ============================================================================
// Song Models
// ============================================================================

/// Raw song row from the `song` table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongRecord {
    pub sha256: String,
    pub title: String,
    pub path: PathBuf,
}

/// Songs sharing one content hash, in database order.
/// Always holds at least two paths when produced by the duplicate query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub sha256: String,
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Duplicate groups ordered by first appearance, with O(1) lookup by hash.
#[derive(Clone, Debug, Default)]
pub struct DuplicateGroups {
    groups: Vec<DuplicateGroup>,
    index: HashIndex,
}

impl DuplicateGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to the group for `sha256`, creating the group on first sight.
    pub fn push(&mut self, sha256: &str, path: PathBuf) {
        match self.index.get(sha256) {
            Some(&idx) => self.groups[idx].paths.push(path),
            None => {
                self.index.insert(sha256.to_string(), self.groups.len());
                self.groups.push(DuplicateGroup {
                    sha256: sha256.to_string(),
                    paths: vec![path],
                });
            }
        }
    }

    pub fn get(&self, sha256: &str) -> Option<&DuplicateGroup> {
        self.index.get(sha256).map(|&idx| &self.groups[idx])
    }

    /// Total number of paths that are not the kept copy: sum of (len - 1).
    pub fn duplicate_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a DuplicateGroups {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

// ============================================================================
// Resolver Results
// ============================================================================

/// What happened to a single non-primary path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DuplicateOutcome {
    /// Path no longer exists on disk
    Missing { path: PathBuf },
    /// Redundant file removed from the primary's own folder
    Removed { path: PathBuf },
    /// Source folder merged into the primary's folder and removed
    Merged { source: PathBuf, destination: PathBuf },
    /// Copy or delete failed; left for manual handling
    Denied { source: PathBuf, destination: PathBuf },
    /// Another row for the primary's own file
    Alias { path: PathBuf },
    /// Group had no path under any configured root
    Unresolved { path: PathBuf },
}

/// `source -> destination` folder pairs that could not be merged, with the
/// first reason seen for each pair.
pub type DeniedMerges = BTreeMap<(PathBuf, PathBuf), String>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub outcomes: Vec<DuplicateOutcome>,
    pub denied: DeniedMerges,
    /// Hashes of groups for which no primary could be determined
    pub unresolved: Vec<String>,
}

impl ResolveReport {
    /// Number of duplicate paths processed, whatever their outcome.
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }
}

// ============================================================================
// Folder Opener Models
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateFolder {
    pub folder: PathBuf,
    pub titles: Vec<String>,
}

impl CandidateFolder {
    /// Title shown for the folder in the menu
    pub fn representative(&self) -> &str {
        self.titles.first().map(String::as_str).unwrap_or("")
    }

    /// Matching charts beyond the representative one
    pub fn other_count(&self) -> usize {
        self.titles.len().saturating_sub(1)
    }
}

/// Folders holding songs matched by one search, in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct CandidateFolders {
    folders: Vec<CandidateFolder>,
    index: FolderIndex,
}

impl CandidateFolders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, folder: PathBuf, title: String) {
        match self.index.get(&folder) {
            Some(&idx) => self.folders[idx].titles.push(title),
            None => {
                self.index.insert(folder.clone(), self.folders.len());
                self.folders.push(CandidateFolder {
                    folder,
                    titles: vec![title],
                });
            }
        }
    }

    pub fn get(&self, idx: usize) -> Option<&CandidateFolder> {
        self.folders.get(idx)
    }

    pub fn folder(&self, idx: usize) -> Option<&Path> {
        self.folders.get(idx).map(|c| c.folder.as_path())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateFolder> {
        self.folders.iter()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

//! Filesystem mutations used by the duplicate resolver.
//!
//! The resolver only talks to [`LibraryFs`], so tests can swap in a
//! filesystem that refuses particular operations.

use std::fs;
use std::io;
use std::path::Path;

pub trait LibraryFs {
    fn exists(&self, path: &Path) -> bool;

    /// Delete a single file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Copy `src` into `dst` recursively, then remove `src`.
    /// Existing files in `dst` are kept unless `src` has a file of the same name.
    fn merge_dir(&self, src: &Path, dst: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl LibraryFs for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn merge_dir(&self, src: &Path, dst: &Path) -> io::Result<()> {
        copy_dir_merge(src, dst)?;
        fs::remove_dir_all(src)
    }
}

/// Recursive copy that merges into an existing destination tree.
pub fn copy_dir_merge(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dst_child = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_merge(&entry.path(), &dst_child)?;
        } else {
            fs::copy(entry.path(), &dst_child)?;
        }
    }
    Ok(())
}

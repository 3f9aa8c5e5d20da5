//! Library layout: locating the config and song database under a library root.
//!
//! The three lookups here are preconditions. Callers treat any error from
//! [`Library::locate`] as fatal and do no work.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LibraryError, Result};

/// Config filenames in lookup order; the first that exists wins.
pub const CONFIG_CANDIDATES: &[&str] = &["config_sys.json", "config.json"];

pub const DATABASE_FILE: &str = "songdata.db";

/// The subset of the player config this crate reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryConfig {
    /// Preferred storage folders, most-preferred first
    pub bmsroot: Vec<PathBuf>,
}

impl LibraryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|source| LibraryError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A validated library root with its config and database paths.
#[derive(Debug, Clone)]
pub struct Library {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
}

impl Library {
    /// Check the root, config and database exist, in that order.
    pub fn locate(root: &Path) -> Result<Self> {
        let root = open_root(root)?;
        let config_path = find_config(&root)?;
        let db_path = database_path(&root)?;
        Ok(Self {
            root,
            config_path,
            db_path,
        })
    }

    /// Load `bmsroot`, resolving relative entries against the library root.
    pub fn root_folders(&self) -> Result<Vec<PathBuf>> {
        let config = LibraryConfig::load(&self.config_path)?;
        Ok(config
            .bmsroot
            .iter()
            .map(|p| self.resolve(p))
            .collect())
    }

    /// Anchor a path from the config or database at the library root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_against(&self.root, path)
    }
}

pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Make the root absolute; it must exist.
/// Symlinks are kept as given so that root-relative paths and absolute config
/// entries written through the same link still line up.
pub fn open_root(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(LibraryError::PathNotFound(root.to_path_buf()));
    }
    Ok(std::path::absolute(root)?)
}

pub fn find_config(root: &Path) -> Result<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            LibraryError::ConfigNotFound(CONFIG_CANDIDATES.iter().map(|s| s.to_string()).collect())
        })
}

pub fn database_path(root: &Path) -> Result<PathBuf> {
    let db_path = root.join(DATABASE_FILE);
    if !db_path.is_file() {
        return Err(LibraryError::DatabaseNotFound(db_path));
    }
    Ok(db_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = Library::locate(&missing).unwrap_err();
        assert!(matches!(err, LibraryError::PathNotFound(p) if p == missing));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_not_resolved() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path(), &link).unwrap();
        assert_eq!(open_root(&link).unwrap(), link);
    }

    #[test]
    fn test_missing_config() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join(DATABASE_FILE), "");
        let err = Library::locate(dir.path()).unwrap_err();
        assert!(matches!(err, LibraryError::ConfigNotFound(_)));
        assert!(err.to_string().contains("config_sys.json, config.json"));
    }

    #[test]
    fn test_missing_database() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("config.json"), r#"{"bmsroot": []}"#);
        let err = Library::locate(dir.path()).unwrap_err();
        assert!(matches!(err, LibraryError::DatabaseNotFound(_)));
    }

    #[test]
    fn test_config_sys_preferred_over_legacy() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("config.json"), r#"{"bmsroot": ["legacy"]}"#);
        touch(&dir.path().join("config_sys.json"), r#"{"bmsroot": ["primary"]}"#);
        touch(&dir.path().join(DATABASE_FILE), "");

        let library = Library::locate(dir.path()).unwrap();
        assert!(library.config_path.ends_with("config_sys.json"));
        let roots = library.root_folders().unwrap();
        assert_eq!(roots, vec![library.root.join("primary")]);
    }

    #[test]
    fn test_absolute_roots_kept() {
        let dir = TempDir::new().unwrap();
        touch(
            &dir.path().join("config.json"),
            r#"{"bmsroot": ["/srv/bms", "songs"], "player": 1}"#,
        );
        touch(&dir.path().join(DATABASE_FILE), "");

        let library = Library::locate(dir.path()).unwrap();
        let roots = library.root_folders().unwrap();
        assert_eq!(roots[0], PathBuf::from("/srv/bms"));
        assert_eq!(roots[1], library.root.join("songs"));
    }

    #[test]
    fn test_malformed_config() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("config.json"), r#"{"bmsroot": "not-a-list"}"#);
        touch(&dir.path().join(DATABASE_FILE), "");

        let library = Library::locate(dir.path()).unwrap();
        let err = library.root_folders().unwrap_err();
        assert!(matches!(err, LibraryError::Config { .. }));
    }
}

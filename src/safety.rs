//! Safety checks to prevent accidental folder deletion.
//!
//! A merge removes its whole source folder afterwards. These checks stop a
//! merge whose source would take a configured root, the library itself, or
//! the destination down with it.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that merging `src` into `dst` and then removing `src` is safe.
///
/// Checks:
/// - Source cannot be empty (a chart path with no parent)
/// - Source cannot be, or contain, any protected folder
/// - Destination cannot lie inside the source
///
/// # Arguments
/// * `src` - Folder that will be copied and then removed
/// * `dst` - Folder receiving the copy
/// * `protected` - Configured root folders and the library root
pub fn validate_merge(src: &Path, dst: &Path, protected: &[&Path]) -> Result<()> {
    if src.as_os_str().is_empty() {
        bail!("Safety check failed: chart has no containing folder");
    }

    for folder in protected {
        if folder.starts_with(src) {
            bail!(
                "Safety check failed: '{}' is or contains protected folder '{}'",
                src.display(),
                folder.display()
            );
        }
    }

    if dst.starts_with(src) {
        bail!(
            "Safety check failed: destination '{}' is inside source '{}'",
            dst.display(),
            src.display()
        );
    }

    Ok(())
}

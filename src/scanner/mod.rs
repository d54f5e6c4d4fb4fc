//! Directory listing for one reconciliation level

use crate::types::MirrorError;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

/// Immediate children of one directory, split into file names and
/// subdirectory names.
///
/// Names are compared byte-exact as `OsString`, so non-UTF-8 entries are
/// handled and comparison follows native Unix case semantics. `BTreeSet`
/// keeps iteration sorted, which makes pass logs and tests deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    /// Non-directory entries (regular files, symlinks, special files).
    pub files: BTreeSet<OsString>,
    /// Subdirectory entries.
    pub dirs: BTreeSet<OsString>,
}

/// List the immediate children of `dir` and classify them.
///
/// Anything that is not a directory counts as a file name, so stale
/// symlinks or special files in the copy tree are still matched for
/// deletion. Symlinks are not followed when classifying, which keeps the
/// recursion from entering linked directory cycles.
///
/// # Errors
/// Any enumeration failure fails the whole listing. A partial source
/// listing would classify live copy entries as stale and delete them, so
/// the caller skips the directory instead.
pub fn list_dir(dir: &Path) -> Result<DirListing, MirrorError> {
    let mut listing = DirListing::default();

    let entries = fs::read_dir(dir).map_err(|e| MirrorError::entry("list directory", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| MirrorError::entry("list directory", dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| MirrorError::entry("list directory", dir, e))?;

        if file_type.is_dir() {
            listing.dirs.insert(entry.file_name());
        } else {
            listing.files.insert(entry.file_name());
        }
    }

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let listing = list_dir(temp_dir.path()).expect("list_dir should succeed on empty dir");
        assert!(listing.files.is_empty(), "Should have no files");
        assert!(listing.dirs.is_empty(), "Should have no dirs");
    }

    #[test]
    fn test_list_classifies_files_and_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        fs::write(root.join("a.txt"), b"a").expect("Failed to create a.txt");
        fs::write(root.join("b.txt"), b"b").expect("Failed to create b.txt");
        fs::create_dir(root.join("sub")).expect("Failed to create sub");

        let listing = list_dir(root).expect("list_dir should succeed");

        assert_eq!(listing.files.len(), 2, "Should have 2 files");
        assert!(listing.files.contains(OsString::from("a.txt").as_os_str()));
        assert!(listing.files.contains(OsString::from("b.txt").as_os_str()));
        assert_eq!(listing.dirs.len(), 1, "Should have 1 dir");
        assert!(listing.dirs.contains(OsString::from("sub").as_os_str()));
    }

    #[test]
    fn test_list_does_not_recurse() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        fs::create_dir(root.join("sub")).expect("Failed to create sub");
        fs::write(root.join("sub/nested.txt"), b"nested").expect("Failed to create nested.txt");

        let listing = list_dir(root).expect("list_dir should succeed");

        assert!(listing.files.is_empty(), "Nested files should not appear");
        assert_eq!(listing.dirs.len(), 1);
    }

    #[test]
    fn test_list_iteration_is_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        fs::write(root.join("zebra.txt"), b"z").expect("Failed to create zebra.txt");
        fs::write(root.join("alpha.txt"), b"a").expect("Failed to create alpha.txt");
        fs::write(root.join("mango.txt"), b"m").expect("Failed to create mango.txt");

        let listing = list_dir(root).expect("list_dir should succeed");
        let names: Vec<&OsString> = listing.files.iter().collect();

        assert_eq!(
            names,
            vec![
                &OsString::from("alpha.txt"),
                &OsString::from("mango.txt"),
                &OsString::from("zebra.txt")
            ]
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_list_symlink_counts_as_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        fs::create_dir(root.join("real_dir")).expect("Failed to create real_dir");
        std::os::unix::fs::symlink(root.join("real_dir"), root.join("dir_link"))
            .expect("Failed to create symlink");

        let listing = list_dir(root).expect("list_dir should succeed");

        assert!(
            listing.files.contains(OsString::from("dir_link").as_os_str()),
            "Symlink should be classified as a file, not followed"
        );
        assert!(listing.dirs.contains(OsString::from("real_dir").as_os_str()));
    }

    #[test]
    fn test_list_missing_directory_is_entry_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing");

        let result = list_dir(&missing);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.is_entry_error());
        assert!(error.to_string().contains("list directory"));
    }
}

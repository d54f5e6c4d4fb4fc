//! Filesystem mutations used by the reconciler

use crate::types::MirrorError;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

/// Copy `src` to `dest` verbatim.
///
/// The destination is opened with `create_new`, so the copy fails if an
/// entry already exists there; callers delete first. Content is streamed
/// through a 128KB buffer and synced to disk before the handle closes.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(MirrorError)` - entry error naming the side that failed
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64, MirrorError> {
    let mut reader = File::open(src).map_err(|e| MirrorError::entry("copy file", src, e))?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(|e| MirrorError::entry("copy file", dest, e))?;

    match stream_to(&mut reader, &mut writer) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            // Never leave a half-written destination behind.
            drop(writer);
            let _ = fs::remove_file(dest);
            Err(MirrorError::entry("copy file", dest, e))
        }
    }
}

fn stream_to(reader: &mut File, writer: &mut File) -> std::io::Result<u64> {
    // 128KB buffer
    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer)?;

        if bytes_read == 0 {
            break; // EOF
        }

        writer.write_all(&buffer[0..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    writer.sync_all()?;
    Ok(total_bytes)
}

/// Delete one file entry from the copy tree.
///
/// `NotFound` counts as success: the entry is already gone, which is the
/// state the mirror wants.
pub fn delete_file(path: &Path) -> Result<(), MirrorError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MirrorError::entry("delete file", path, e)),
    }
}

/// Delete a directory and everything under it.
///
/// `NotFound` counts as success, as for [`delete_file`].
pub fn delete_dir_tree(path: &Path) -> Result<(), MirrorError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MirrorError::entry("delete directory", path, e)),
    }
}

/// Create one empty directory.
///
/// The parent exists by the reconciler's recursion invariant, so this is a
/// single-level create. `AlreadyExists` counts as success.
pub fn create_dir(path: &Path) -> Result<(), MirrorError> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(MirrorError::entry("create directory", path, e)),
    }
}

//! Hashing utilities

use crate::types::MirrorError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compute the Blake3 hash of a file
///
/// The file is streamed in 64KB chunks for memory efficiency. Errors carry
/// the path so the logged line names the entry that failed.
///
/// # Arguments
/// * `file_path` - Path to the file to hash
///
/// # Returns
/// * `Ok([u8; 32])` - 32-byte Blake3 hash
/// * `Err(MirrorError)` - entry error if the file cannot be read
///
/// # Example
/// ```no_run
/// use doppel::hash::hash_file;
/// use std::path::Path;
///
/// let hash = hash_file(Path::new("file.txt"))?;
/// # Ok::<(), doppel::types::MirrorError>(())
/// ```
pub fn hash_file(file_path: &Path) -> Result<[u8; 32], MirrorError> {
    let mut file =
        File::open(file_path).map_err(|e| MirrorError::entry("hash file", file_path, e))?;

    let mut hasher = blake3::Hasher::new();

    // Stream file in 64KB chunks (memory efficient)
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| MirrorError::entry("hash file", file_path, e))?;

        if bytes_read == 0 {
            break; // EOF
        }

        hasher.update(&buffer[0..bytes_read]);
    }

    let hash = hasher.finalize();
    Ok(*hash.as_bytes())
}

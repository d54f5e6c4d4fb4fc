//! File content equality

use crate::config::CompareMode;
use crate::hash::hash_file;
use crate::types::MirrorError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Decide whether two existing files have equal content.
///
/// 1. **Size check** (metadata only, no content I/O): different sizes mean
///    different content, so unequal files of different length are decided
///    without opening either file.
/// 2. **`CompareMode::ByteByByte`**: stream both files in lock-step through
///    buffered readers and stop at the first differing block. Equal only if
///    both streams reach EOF together. Exact, but reads both files fully
///    when they are equal.
/// 3. **`CompareMode::Hash`** (default): compute a Blake3 digest of each
///    file and compare digests. Always reads both files fully, and carries
///    the theoretical false-equal risk of a digest collision. Byte mode is
///    the exact alternative when that risk is unacceptable.
///
/// Both files are opened read-only; nothing is written.
///
/// # Errors
/// Stat/open/read failures (a file vanished between listing and comparison,
/// permission denied) are returned as entry errors; the caller skips the
/// entry for this pass.
pub fn files_equal(a: &Path, b: &Path, mode: CompareMode) -> Result<bool, MirrorError> {
    let size_a = fs_len(a)?;
    let size_b = fs_len(b)?;

    if size_a != size_b {
        return Ok(false);
    }

    match mode {
        CompareMode::ByteByByte => bytes_equal(a, b),
        CompareMode::Hash => Ok(hash_file(a)? == hash_file(b)?),
    }
}

fn fs_len(path: &Path) -> Result<u64, MirrorError> {
    let metadata =
        std::fs::metadata(path).map_err(|e| MirrorError::entry("stat file", path, e))?;
    Ok(metadata.len())
}

/// Lock-step block comparison of two files.
///
/// The readers may return blocks of different lengths, so each round
/// compares the overlapping prefix and consumes exactly that much from both
/// sides.
fn bytes_equal(a: &Path, b: &Path) -> Result<bool, MirrorError> {
    let file_a = File::open(a).map_err(|e| MirrorError::entry("compare file", a, e))?;
    let file_b = File::open(b).map_err(|e| MirrorError::entry("compare file", b, e))?;

    let mut reader_a = BufReader::with_capacity(64 * 1024, file_a);
    let mut reader_b = BufReader::with_capacity(64 * 1024, file_b);

    loop {
        let chunk_a = reader_a
            .fill_buf()
            .map_err(|e| MirrorError::entry("compare file", a, e))?;
        let chunk_b = reader_b
            .fill_buf()
            .map_err(|e| MirrorError::entry("compare file", b, e))?;

        if chunk_a.is_empty() || chunk_b.is_empty() {
            // Equal only if both hit EOF on the same byte.
            return Ok(chunk_a.is_empty() && chunk_b.is_empty());
        }

        let len = chunk_a.len().min(chunk_b.len());
        if chunk_a[..len] != chunk_b[..len] {
            return Ok(false);
        }

        reader_a.consume(len);
        reader_b.consume(len);
    }
}

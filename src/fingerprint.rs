//! Content fingerprinting module
//!
//! Computes the OpenSubtitles movie hash: a cheap content fingerprint built
//! from the file size plus a 64-bit wraparound sum of the first and last 64KB
//! of the file, interpreted as little-endian 64-bit words. The hash is a
//! federated lookup key shared with the subtitle service, so the algorithm
//! must match the published one bit-for-bit.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Size of each hashed window (and the read granularity boundary)
const WINDOW_SIZE: u64 = 65536;

/// Files smaller than two windows cannot be hashed
const MIN_FILE_SIZE: u64 = WINDOW_SIZE * 2;

/// Computes the OpenSubtitles hash of a video file
///
/// Returns the hash as a 16-digit lowercase hex string, or `None` when the
/// file is smaller than 128KB or cannot be read. A `None` is not an error
/// condition: the caller falls back to text-based search.
pub(crate) fn compute_fingerprint(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let size = file.metadata().ok()?.len();

    if size < MIN_FILE_SIZE {
        return None;
    }

    let mut hash = size;
    hash = hash.wrapping_add(sum_window(&mut file)?);

    file.seek(SeekFrom::Start(size - WINDOW_SIZE)).ok()?;
    hash = hash.wrapping_add(sum_window(&mut file)?);

    Some(format!("{:016x}", hash))
}

/// Reads one 64KB window and sums it as little-endian 64-bit words
///
/// Wrapping addition gives the same truncation to 64 bits that the reference
/// algorithm applies after each word.
fn sum_window(file: &mut File) -> Option<u64> {
    let mut buffer = [0u8; WINDOW_SIZE as usize];
    file.read_exact(&mut buffer).ok()?;

    let mut sum: u64 = 0;
    for word in buffer.chunks_exact(8) {
        // chunks_exact(8) always yields 8-byte slices
        let bytes: [u8; 8] = word.try_into().ok()?;
        sum = sum.wrapping_add(u64::from_le_bytes(bytes));
    }
    Some(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video.mkv");
        fs::write(&path, bytes).unwrap();
        (dir, path)
    }

    #[test]
    fn test_known_vector_all_zero() {
        // Every word sums to zero, so the hash is just the file size.
        let (_dir, path) = write_file(&[0u8; 131072]);
        assert_eq!(compute_fingerprint(&path).unwrap(), "0000000000020000");
    }

    #[test]
    fn test_known_vector_all_ff() {
        // Each 0xFF..FF word is a wrapping -1; 16384 words subtract 16384
        // from the size: 131072 - 16384 = 0x1c000.
        let (_dir, path) = write_file(&[0xFFu8; 131072]);
        assert_eq!(compute_fingerprint(&path).unwrap(), "000000000001c000");
    }

    #[test]
    fn test_deterministic() {
        let bytes: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let (_dir, path) = write_file(&bytes);

        let first = compute_fingerprint(&path).unwrap();
        let second = compute_fingerprint(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 16);
    }

    #[test]
    fn test_changes_with_leading_bytes() {
        let mut bytes: Vec<u8> = vec![7u8; 200_000];
        let (_dir, path) = write_file(&bytes);
        let original = compute_fingerprint(&path).unwrap();

        bytes[0] = 8;
        fs::write(&path, &bytes).unwrap();
        assert_ne!(compute_fingerprint(&path).unwrap(), original);
    }

    #[test]
    fn test_changes_with_trailing_bytes() {
        let mut bytes: Vec<u8> = vec![7u8; 200_000];
        let (_dir, path) = write_file(&bytes);
        let original = compute_fingerprint(&path).unwrap();

        let last = bytes.len() - 1;
        bytes[last] = 8;
        fs::write(&path, &bytes).unwrap();
        assert_ne!(compute_fingerprint(&path).unwrap(), original);
    }

    #[test]
    fn test_middle_bytes_do_not_affect_hash() {
        let mut bytes: Vec<u8> = vec![7u8; 300_000];
        let (_dir, path) = write_file(&bytes);
        let original = compute_fingerprint(&path).unwrap();

        bytes[150_000] = 8;
        fs::write(&path, &bytes).unwrap();
        assert_eq!(compute_fingerprint(&path).unwrap(), original);
    }

    #[test]
    fn test_small_file_returns_none() {
        let (_dir, path) = write_file(&[1u8; 131071]);
        assert!(compute_fingerprint(&path).is_none());
    }

    #[test]
    fn test_missing_file_returns_none() {
        assert!(compute_fingerprint(Path::new("/nonexistent/video.mkv")).is_none());
    }
}

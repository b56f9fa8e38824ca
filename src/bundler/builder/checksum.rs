//! Artifact checksum calculation.
//!
//! SHA-256 digests of bundle archives and the `.sha256` sidecar files the
//! client uses to verify a download.

use crate::bundler::error::{Error, ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read buffer size for hashing.
const CHUNK_SIZE: usize = 8192;

/// Path of the sidecar for `file`: its file name with `.sha256` appended.
pub fn checksum_path(file: &Path) -> PathBuf {
    let mut name = file.file_name().unwrap_or_default().to_os_string();
    name.push(".sha256");
    file.with_file_name(name)
}

/// Calculates the SHA-256 checksum of a single file.
///
/// Reads the file in 8KB chunks so archives of any size are hashed in
/// bounded memory.
///
/// # Returns
///
/// * `Ok(String)` - Lowercase hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If the file cannot be read
pub fn calculate_sha256(file_path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(file_path).fs_context("opening file for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file
            .read(&mut buffer)
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hashes `file` and writes the digest as the sole content of its sidecar.
///
/// Returns the sidecar path.
pub fn write_checksum(file: &Path) -> Result<PathBuf> {
    let digest = calculate_sha256(file)?;
    let sidecar = checksum_path(file);

    std::fs::write(&sidecar, &digest).fs_context("writing checksum file", &sidecar)?;
    log::info!("SHA256 {} -> {}", digest, sidecar.display());
    Ok(sidecar)
}

/// Checks `archive` against its sidecar and returns the verified digest.
///
/// # Errors
///
/// [`Error::ChecksumMismatch`] when the digests differ, or a filesystem error
/// when either file cannot be read.
pub fn verify(archive: &Path) -> Result<String> {
    let sidecar = checksum_path(archive);
    let expected = std::fs::read_to_string(&sidecar)
        .fs_context("reading checksum file", &sidecar)?
        .trim()
        .to_lowercase();
    let actual = calculate_sha256(archive)?;

    if expected != actual {
        return Err(Error::ChecksumMismatch { expected, actual });
    }

    log::info!("Verified {} ({})", archive.display(), actual);
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sidecar_name_appends_extension() {
        assert_eq!(
            checksum_path(Path::new("/out/en-nl-bundle.tar.gz")),
            PathBuf::from("/out/en-nl-bundle.tar.gz.sha256")
        );
    }

    #[test]
    fn known_digest() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("abc.bin");
        std::fs::write(&file, b"abc").unwrap();

        assert_eq!(
            calculate_sha256(&file).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_spans_multiple_chunks() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("big.bin");
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        std::fs::write(&file, &data).unwrap();

        assert_eq!(calculate_sha256(&file).unwrap(), hex::encode(Sha256::digest(&data)));
    }

    #[test]
    fn digest_is_stable_and_detects_single_byte_change() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bundle.tar.gz");
        std::fs::write(&file, b"archive bytes").unwrap();

        let first = calculate_sha256(&file).unwrap();
        assert_eq!(first, calculate_sha256(&file).unwrap());

        std::fs::write(&file, b"archive bytez").unwrap();
        assert_ne!(first, calculate_sha256(&file).unwrap());
    }

    #[test]
    fn write_then_verify() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bundle.tar.gz");
        std::fs::write(&file, b"archive bytes").unwrap();

        let sidecar = write_checksum(&file).unwrap();
        let content = std::fs::read_to_string(&sidecar).unwrap();
        assert_eq!(content.len(), 64);
        assert!(content.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(verify(&file).unwrap(), content);
    }

    #[test]
    fn verify_detects_tampering() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bundle.tar.gz");
        std::fs::write(&file, b"archive bytes").unwrap();
        write_checksum(&file).unwrap();

        std::fs::write(&file, b"tampered").unwrap();
        assert!(matches!(verify(&file).unwrap_err(), Error::ChecksumMismatch { .. }));
    }
}

//! File system utilities for bundling.
//!
//! Merging of model directories into the staging directory and idempotent
//! cleanup. Everything here is blocking; a failure partway through a copy
//! leaves the destination partially populated.

use crate::bundler::error::{Error, ErrorExt, Result};
use crate::metadata::directory_name;
use std::{
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path)?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    std::fs::create_dir_all(path).fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
///
/// No-op when `path` does not exist or is not a directory. Any other failure
/// is returned to the caller.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Ok(());
    }

    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            log::debug!("Removed directory {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks on platforms that support them. Fails if the source
/// path is not a directory or doesn't exist. Never modifies `from`.
pub fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a directory")));
    }

    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).fs_context("creating destination parent", parent)?;
    }

    let mut files = 0usize;
    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target =
                std::fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
            if entry.path().is_dir() {
                symlink_dir(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
            } else {
                symlink_file(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
            }
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path).fs_context("copying file", &dest_path)?;
            files += 1;
        }
    }

    log::debug!(
        "Copied {} file(s) from {} to {}",
        files,
        from.display(),
        to.display()
    );
    Ok(())
}

/// Copies every source directory into `destination/<directory name>/`.
///
/// Each source keeps its own folder, whether one or many are merged, so the
/// directory names recorded in the manifest always match archive entries.
/// Returns the staged directories in input order.
pub fn merge_dirs<P: AsRef<Path>>(sources: &[P], destination: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(destination).fs_context("creating staging directory", destination)?;

    let mut staged = Vec::with_capacity(sources.len());
    for source in sources {
        let source = source.as_ref();
        let target = destination.join(directory_name(source)?);
        copy_dir(source, &target)?;
        staged.push(target);
    }

    log::info!(
        "Merged {} model directories into {}",
        staged.len(),
        destination.display()
    );
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn copy_dir_preserves_nested_structure() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("src");
        write(&src.join("metadata.json"), "{}");
        write(&src.join("tokenizer/vocab.spm"), "vocab");

        let dst = root.path().join("out/model");
        copy_dir(&src, &dst).unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("metadata.json")).unwrap(), "{}");
        assert_eq!(std::fs::read_to_string(dst.join("tokenizer/vocab.spm")).unwrap(), "vocab");
        assert!(src.join("tokenizer/vocab.spm").exists());
    }

    #[test]
    fn copy_dir_rejects_missing_source() {
        let root = TempDir::new().unwrap();
        let err = copy_dir(&root.path().join("nope"), &root.path().join("out")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn copy_dir_keeps_symlinks() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("src");
        write(&src.join("model.onnx"), "weights");
        std::os::unix::fs::symlink("model.onnx", src.join("latest.onnx")).unwrap();

        let dst = root.path().join("dst");
        copy_dir(&src, &dst).unwrap();

        let link = dst.join("latest.onnx");
        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_link(&link).unwrap(), Path::new("model.onnx"));
    }

    #[test]
    fn merge_nests_each_source_under_its_name() {
        let root = TempDir::new().unwrap();
        let a = root.path().join("in/en-nl");
        let b = root.path().join("in/nl-en");
        write(&a.join("metadata.json"), "a");
        write(&b.join("metadata.json"), "b");

        let staging = root.path().join("staging");
        let staged = merge_dirs(&[&a, &b], &staging).unwrap();

        assert_eq!(staged, vec![staging.join("en-nl"), staging.join("nl-en")]);
        assert_eq!(std::fs::read_to_string(staging.join("nl-en/metadata.json")).unwrap(), "b");
    }

    #[test]
    fn single_source_is_nested_too() {
        let root = TempDir::new().unwrap();
        let voice = root.path().join("amy");
        write(&voice.join("model.onnx"), "x");

        let staging = root.path().join("staging");
        merge_dirs(&[&voice], &staging).unwrap();

        assert!(staging.join("amy/model.onnx").is_file());
        assert!(!staging.join("model.onnx").exists());
    }

    #[test]
    fn remove_dir_all_is_idempotent() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("gone");
        write(&dir.join("file"), "x");

        remove_dir_all(&dir).unwrap();
        assert!(!dir.exists());
        remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn remove_dir_all_ignores_regular_files() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("archive.tar.gz");
        write(&file, "x");

        remove_dir_all(&file).unwrap();
        assert!(file.exists());
    }

    #[test]
    fn create_dir_all_with_erase_clears_stale_content() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("staging");
        write(&dir.join("stale.txt"), "old");

        create_dir_all(&dir, true).unwrap();
        assert!(dir.is_dir());
        assert!(!dir.join("stale.txt").exists());
    }
}

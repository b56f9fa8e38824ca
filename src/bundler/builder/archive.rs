//! Deterministic `.tar.gz` packaging of staged entries.

use crate::bundler::error::{Context, ErrorExt, Result};
use flate2::{Compression, write::GzEncoder};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Packs `files` into a gzip-compressed tarball at `output_archive`.
///
/// `files` is the pre-enumerated list of top-level entries; each lands in
/// the archive under its base name only, so the tarball extracts flatly no
/// matter where it was built. Directory contents are walked in file-name
/// order and headers carry no timestamps or ownership, making the output
/// byte-identical for identical input.
pub fn bundle_files<P: AsRef<Path>>(files: &[P], output_archive: &Path) -> Result<PathBuf> {
    let file = std::fs::File::create(output_archive)
        .fs_context("creating archive", output_archive)?;

    let writer = write_archive(files, BufWriter::new(file))?;
    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .fs_context("flushing archive", output_archive)?;
    file.sync_all().fs_context("syncing archive", output_archive)?;

    log::info!(
        "Bundled {} entr{} into {}",
        files.len(),
        if files.len() == 1 { "y" } else { "ies" },
        output_archive.display()
    );
    Ok(output_archive.to_path_buf())
}

/// Writes the tarball to any writer and returns the writer once the gzip
/// stream is finished.
pub fn write_archive<P: AsRef<Path>, W: Write>(files: &[P], writer: W) -> Result<W> {
    let encoder = GzEncoder::new(writer, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);
    builder.follow_symlinks(false);

    for file in files {
        append_entry(&mut builder, file.as_ref())?;
    }

    let encoder = builder.into_inner().fs_context("finishing tar stream", "<archive>")?;
    let writer = encoder.finish().fs_context("finishing gzip stream", "<archive>")?;
    Ok(writer)
}

fn append_entry<W: Write>(builder: &mut tar::Builder<W>, entry_path: &Path) -> Result<()> {
    let name = entry_path
        .file_name()
        .context(format!("{} has no file name", entry_path.display()))?;

    for entry in WalkDir::new(entry_path).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let rel = entry.path().strip_prefix(entry_path)?;
        let arcname = if rel.as_os_str().is_empty() {
            PathBuf::from(name)
        } else {
            Path::new(name).join(rel)
        };

        if entry.file_type().is_dir() {
            builder
                .append_dir(&arcname, entry.path())
                .fs_context("adding directory to archive", entry.path())?;
        } else {
            builder
                .append_path_with_name(entry.path(), &arcname)
                .fs_context("adding file to archive", entry.path())?;
        }
        log::debug!("Archived {}", arcname.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn entry_names(archive: &Path) -> Vec<String> {
        let file = std::fs::File::open(archive).unwrap();
        let mut tar = tar::Archive::new(GzDecoder::new(file));
        tar.entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().trim_end_matches('/').to_string())
            .collect()
    }

    fn staging(root: &TempDir) -> PathBuf {
        let staging = root.path().join("deep/staging/dir");
        std::fs::create_dir_all(staging.join("en-nl/tokenizer")).unwrap();
        std::fs::write(staging.join("metadata.json"), "{}").unwrap();
        std::fs::write(staging.join("en-nl/encoder.onnx"), b"weights").unwrap();
        std::fs::write(staging.join("en-nl/tokenizer/vocab.spm"), b"vocab").unwrap();
        staging
    }

    #[test]
    fn entries_are_rooted_at_base_names() {
        let root = TempDir::new().unwrap();
        let staging = staging(&root);
        let archive = root.path().join("out.tar.gz");

        let files = [staging.join("en-nl"), staging.join("metadata.json")];
        assert_eq!(bundle_files(&files, &archive).unwrap(), archive);

        let names = entry_names(&archive);
        assert_eq!(
            names,
            vec![
                "en-nl",
                "en-nl/encoder.onnx",
                "en-nl/tokenizer",
                "en-nl/tokenizer/vocab.spm",
                "metadata.json",
            ]
        );
        let top_level: BTreeSet<_> = names.iter().map(|n| n.split('/').next().unwrap()).collect();
        assert_eq!(top_level, BTreeSet::from(["en-nl", "metadata.json"]));
    }

    #[test]
    fn extraction_restores_content() {
        let root = TempDir::new().unwrap();
        let staging = staging(&root);
        let archive = root.path().join("out.tar.gz");
        bundle_files(&[staging.join("en-nl")], &archive).unwrap();

        let target = root.path().join("extracted");
        let file = std::fs::File::open(&archive).unwrap();
        tar::Archive::new(GzDecoder::new(file)).unpack(&target).unwrap();

        assert_eq!(std::fs::read(target.join("en-nl/tokenizer/vocab.spm")).unwrap(), b"vocab");
    }

    #[test]
    fn identical_input_gives_identical_bytes() {
        let root = TempDir::new().unwrap();
        let staging = staging(&root);
        let files = [staging.join("metadata.json"), staging.join("en-nl")];

        let first = root.path().join("a.tar.gz");
        let second = root.path().join("b.tar.gz");
        bundle_files(&files, &first).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        std::fs::write(staging.join("metadata.json"), "{}").unwrap();
        bundle_files(&files, &second).unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }
}

//! @acp:module "Archive Extractor"
//! @acp:summary "Unpack a zip archive into a directory tree"
//! @acp:domain core
//! @acp:layer service

use std::fs::{self, File};
use std::io;
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

use super::{ArchiveEntry, EntryKind};
use crate::error::{DocfillError, Result};

/// Extract every entry of `archive_path` under `dest_dir`, in archive order.
///
/// Ancestor directories are always created explicitly, so archives whose
/// file entries come before (or without) their directory entries unpack
/// correctly. Entry names that would land outside `dest_dir` are rejected.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<Vec<ArchiveEntry>> {
    tracing::info!(
        "Extracting {} into {}",
        archive_path.display(),
        dest_dir.display()
    );

    let read_error = |source: ZipError| DocfillError::ArchiveRead {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(|e| read_error(ZipError::Io(e)))?;
    let mut archive = ZipArchive::new(file).map_err(read_error)?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(read_error)?;

        let relative = file
            .enclosed_name()
            .ok_or_else(|| DocfillError::UnsafeEntryName {
                name: file.name().to_string(),
            })?;
        let outpath = dest_dir.join(&relative);

        if file.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| DocfillError::fs("create directory", &outpath, e))?;
            tracing::debug!("  dir  {}", file.name());
            entries.push(ArchiveEntry {
                name: file.name().to_string(),
                kind: EntryKind::Directory,
            });
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DocfillError::fs("create parent directory", parent, e))?;
        }

        let mut outfile =
            File::create(&outpath).map_err(|e| DocfillError::fs("create file", &outpath, e))?;
        let size = io::copy(&mut file, &mut outfile)
            .map_err(|e| DocfillError::fs("extract file", &outpath, e))?;

        tracing::debug!("  file {} ({} bytes)", file.name(), size);
        entries.push(ArchiveEntry {
            name: file.name().to_string(),
            kind: EntryKind::File {
                path: outpath,
                size,
            },
        });
    }

    Ok(entries)
}

/// Read one entry of an archive as UTF-8 text without extracting the rest
pub fn read_text_entry(archive_path: &Path, entry: &Path) -> Result<String> {
    let read_error = |source: ZipError| DocfillError::ArchiveRead {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(|e| read_error(ZipError::Io(e)))?;
    let mut archive = ZipArchive::new(file).map_err(read_error)?;

    let name = super::entry_name(entry, false);
    let mut zipped = match archive.by_name(&name) {
        Ok(zipped) => zipped,
        Err(ZipError::FileNotFound) => {
            return Err(DocfillError::PayloadMissing {
                path: archive_path.join(entry),
            })
        }
        Err(e) => return Err(read_error(e)),
    };

    let mut bytes = Vec::new();
    io::Read::read_to_end(&mut zipped, &mut bytes)
        .map_err(|e| read_error(ZipError::Io(e)))?;
    String::from_utf8(bytes).map_err(|e| DocfillError::Encoding {
        path: archive_path.join(entry),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, Option<&[u8]>)]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            match content {
                Some(bytes) => {
                    zip.start_file(*name, options).unwrap();
                    zip.write_all(bytes).unwrap();
                }
                None => zip.add_directory(*name, options).unwrap(),
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("t.docx");
        write_zip(
            &archive,
            &[
                ("word/", None),
                ("word/document.xml", Some(b"<w:document/>")),
                ("[Content_Types].xml", Some(b"<Types/>")),
            ],
        );

        let dest = dir.path().join("out");
        let entries = extract(&archive, &dest).unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_dir());
        assert_eq!(
            fs::read_to_string(dest.join("word/document.xml")).unwrap(),
            "<w:document/>"
        );
        assert!(dest.join("[Content_Types].xml").is_file());
    }

    #[test]
    fn test_extract_without_directory_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("t.docx");
        write_zip(&archive, &[("a/b/c/deep.txt", Some(b"deep"))]);

        let dest = dir.path().join("out");
        extract(&archive, &dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("a/b/c/deep.txt")).unwrap(), "deep");
    }

    #[test]
    fn test_extract_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract(&dir.path().join("missing.docx"), dir.path()).unwrap_err();
        assert!(matches!(err, DocfillError::ArchiveRead { .. }));
    }

    #[test]
    fn test_read_text_entry() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("t.docx");
        write_zip(&archive, &[("word/document.xml", Some(b"&lt;x/&gt"))]);

        assert_eq!(
            read_text_entry(&archive, Path::new("word/document.xml")).unwrap(),
            "&lt;x/&gt"
        );
        assert!(matches!(
            read_text_entry(&archive, Path::new("word/missing.xml")),
            Err(DocfillError::PayloadMissing { .. })
        ));
    }

    #[test]
    fn test_extract_rejects_escaping_entry() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.docx");
        write_zip(
            &archive,
            &[
                ("word/document.xml", Some(b"<w:document/>")),
                ("../../evil.txt", Some(b"gotcha")),
            ],
        );

        let dest = dir.path().join("a/b/ws");
        fs::create_dir_all(&dest).unwrap();
        let err = extract(&archive, &dest).unwrap_err();

        assert!(matches!(err, DocfillError::UnsafeEntryName { ref name } if name == "../../evil.txt"));
        assert_eq!(err.kind(), crate::error::ErrorKind::ArchiveRead);
        assert!(!dir.path().join("a/evil.txt").exists());
        assert!(!dir.path().join("evil.txt").exists());
        assert!(!dest.join("evil.txt").exists());
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.docx");
        fs::write(&archive, b"definitely not a zip file").unwrap();

        let err = extract(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, DocfillError::ArchiveRead { .. }));
    }
}

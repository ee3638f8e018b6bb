// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Direct filesystem backend for platforms without a mandatory shared index.
//
// Documents are plain files in a fixed public directory: the display name is
// the file name, the MIME type is inferred from the extension, and deletion
// removes the file itself.  Nothing outside the managed directory is ever
// touched.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{DEFAULT_DOCUMENT_NAME, DocumentHandle, DocumentKind, DocumentRecord, StorageProfile};

use crate::gateway::StorageIndexGateway;

/// Storage backend that writes straight into the public documents directory.
pub struct DirectStore {
    documents_dir: PathBuf,
}

impl DirectStore {
    /// Bind to the public documents directory, creating it if absent.
    #[instrument(skip_all, fields(dir = %documents_dir.as_ref().display()))]
    pub fn create(documents_dir: impl AsRef<Path>) -> Result<Self> {
        let documents_dir = documents_dir.as_ref().to_path_buf();
        fs::create_dir_all(&documents_dir).map_err(|e| {
            ScanwerkError::StorageUnavailable(format!("create documents directory: {e}"))
        })?;

        info!("documents directory ready");
        Ok(Self { documents_dir })
    }

    /// First free destination for `name`, suffixing ` (n)` before the
    /// extension on collision (`scan.pdf` → `scan (1).pdf`).
    fn unique_destination(&self, name: &str) -> PathBuf {
        let candidate = self.documents_dir.join(name);
        if !candidate.exists() {
            return candidate;
        }

        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let ext = Path::new(name).extension().and_then(|e| e.to_str());

        let mut n = 1u32;
        loop {
            let file_name = match ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            let candidate = self.documents_dir.join(file_name);
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Whether a handle's path is one of ours.  Anything outside the managed
    /// directory is refused rather than deleted.
    fn is_managed(&self, path: &Path) -> bool {
        path.starts_with(&self.documents_dir)
    }
}

impl StorageIndexGateway for DirectStore {
    #[instrument(skip(self, source))]
    fn register(
        &self,
        source: &mut dyn Read,
        suggested_name: &str,
        mime_type: &str,
    ) -> Result<DocumentHandle> {
        // The directory may have been removed since startup (unmounted
        // storage, external file manager).
        fs::create_dir_all(&self.documents_dir).map_err(|e| {
            ScanwerkError::StorageUnavailable(format!("create documents directory: {e}"))
        })?;

        // File-system-level name handling: only the final segment counts,
        // and listing is extension-driven, so the name must carry the
        // extension matching its MIME type.
        let name = Path::new(suggested_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_DOCUMENT_NAME);
        let name = match DocumentKind::from_mime(mime_type) {
            Some(kind) => kind.qualify_name(name),
            None => name.to_string(),
        };

        let dest = self.unique_destination(&name);
        let mut file = File::create(&dest).map_err(|e| {
            ScanwerkError::StorageUnavailable(format!("create {}: {e}", dest.display()))
        })?;

        match io::copy(source, &mut file) {
            Ok(bytes) => {
                info!(dest = %dest.display(), bytes, "document written");
                Ok(DocumentHandle::Direct(dest))
            }
            Err(e) => {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&dest)
                    && cleanup.kind() != io::ErrorKind::NotFound
                {
                    warn!(error = %cleanup, "could not remove partial file after failed copy");
                }
                Err(ScanwerkError::CopyFailed(format!("{}: {e}", dest.display())))
            }
        }
    }

    #[instrument(skip(self))]
    fn list_by_mime_type(&self, mime_type: &str) -> Result<Vec<DocumentRecord>> {
        let wanted = DocumentKind::from_mime(mime_type);

        let entries = match fs::read_dir(&self.documents_dir) {
            Ok(entries) => entries,
            // A directory that does not exist yet simply has no documents.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let kind = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(DocumentKind::from_extension);
            if kind != wanted || kind.is_none() {
                continue;
            }
            let Some(display_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            records.push(DocumentRecord {
                display_name: display_name.to_string(),
                handle: DocumentHandle::Direct(path),
            });
        }

        debug!(count = records.len(), "listed documents");
        Ok(records)
    }

    #[instrument(skip(self), fields(handle = %handle))]
    fn deregister(&self, handle: &DocumentHandle) -> Result<bool> {
        let DocumentHandle::Direct(path) = handle else {
            warn!("handle from the indexed profile presented to the direct backend");
            return Ok(false);
        };
        if !self.is_managed(path) {
            warn!("refusing to delete a path outside the documents directory");
            return Ok(false);
        }

        match fs::remove_file(path) {
            Ok(()) => {
                info!("document deleted");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("entry already gone");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, handle: &DocumentHandle) -> Result<PathBuf> {
        let DocumentHandle::Direct(path) = handle else {
            warn!(handle = %handle, "handle from the indexed profile presented to the direct backend");
            return Err(ScanwerkError::EntryNotFound);
        };
        if self.is_managed(path) && path.is_file() {
            Ok(path.clone())
        } else {
            Err(ScanwerkError::EntryNotFound)
        }
    }

    fn profile(&self) -> StorageProfile {
        StorageProfile::Direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PDF: &str = "application/pdf";

    fn test_store() -> (tempfile::TempDir, DirectStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DirectStore::create(dir.path().join("Documents")).expect("create");
        (dir, store)
    }

    struct InterruptedReader {
        sent: bool,
    }

    impl Read for InterruptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "scan stream interrupted",
                ))
            } else {
                self.sent = true;
                buf[..4].copy_from_slice(b"%PDF");
                Ok(4)
            }
        }
    }

    #[test]
    fn register_writes_into_the_documents_directory() {
        let (_dir, store) = test_store();

        let mut source = Cursor::new(b"%PDF-1.4 receipt".to_vec());
        let handle = store.register(&mut source, "receipt.pdf", PDF).expect("register");

        let DocumentHandle::Direct(path) = &handle else {
            panic!("direct backend must mint direct handles");
        };
        assert_eq!(fs::read(path).expect("read back"), b"%PDF-1.4 receipt");
        assert_eq!(store.resolve(&handle).expect("resolve"), *path);
    }

    #[test]
    fn missing_directory_lists_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DirectStore::create(dir.path().join("Documents")).expect("create");
        fs::remove_dir_all(dir.path().join("Documents")).expect("remove");

        assert!(store.list_by_mime_type(PDF).expect("list").is_empty());
    }

    #[test]
    fn listing_filters_extensions_case_insensitively() {
        let (_dir, store) = test_store();

        fs::write(store.documents_dir.join("UPPER.PDF"), b"%PDF").expect("write");
        fs::write(store.documents_dir.join("lower.pdf"), b"%PDF").expect("write");
        fs::write(store.documents_dir.join("notes.txt"), b"hi").expect("write");

        let mut names: Vec<String> = store
            .list_by_mime_type(PDF)
            .expect("list")
            .into_iter()
            .map(|r| r.display_name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["UPPER.PDF".to_string(), "lower.pdf".to_string()]);
    }

    #[test]
    fn colliding_names_are_suffixed_not_overwritten() {
        let (_dir, store) = test_store();

        let mut first = Cursor::new(b"one".to_vec());
        let mut second = Cursor::new(b"two".to_vec());
        let mut third = Cursor::new(b"three".to_vec());
        store.register(&mut first, "scan.pdf", PDF).expect("first");
        store.register(&mut second, "scan.pdf", PDF).expect("second");
        store.register(&mut third, "scan.pdf", PDF).expect("third");

        let mut names: Vec<String> = store
            .list_by_mime_type(PDF)
            .expect("list")
            .into_iter()
            .map(|r| r.display_name)
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "scan (1).pdf".to_string(),
                "scan (2).pdf".to_string(),
                "scan.pdf".to_string()
            ]
        );
        assert_eq!(
            fs::read(store.documents_dir.join("scan.pdf")).expect("read"),
            b"one"
        );
    }

    #[test]
    fn extensionless_names_are_qualified_for_their_mime_type() {
        let (_dir, store) = test_store();

        let mut source = Cursor::new(b"%PDF".to_vec());
        store.register(&mut source, "receipt", PDF).expect("register");

        let records = store.list_by_mime_type(PDF).expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "receipt.pdf");
    }

    #[test]
    fn deregister_is_idempotent() {
        let (_dir, store) = test_store();

        let mut source = Cursor::new(b"%PDF".to_vec());
        let handle = store.register(&mut source, "scan.pdf", PDF).expect("register");

        assert!(store.deregister(&handle).expect("first delete"));
        assert!(!store.deregister(&handle).expect("second delete"));
        assert!(store.list_by_mime_type(PDF).expect("list").is_empty());
    }

    #[test]
    fn paths_outside_the_documents_directory_are_refused() {
        let (dir, store) = test_store();

        let outside = dir.path().join("elsewhere.pdf");
        fs::write(&outside, b"%PDF").expect("write");

        let handle = DocumentHandle::Direct(outside.clone());
        assert!(!store.deregister(&handle).expect("deregister"));
        assert!(outside.exists(), "foreign file must be left alone");
        assert!(matches!(
            store.resolve(&handle),
            Err(ScanwerkError::EntryNotFound)
        ));
    }

    #[test]
    fn interrupted_copy_leaves_no_file_behind() {
        let (_dir, store) = test_store();

        let mut source = InterruptedReader { sent: false };
        let err = store
            .register(&mut source, "receipt.pdf", PDF)
            .expect_err("copy must fail");
        assert!(matches!(err, ScanwerkError::CopyFailed(_)));
        assert!(store.list_by_mime_type(PDF).expect("list").is_empty());
    }

    #[test]
    fn foreign_profile_handle_is_treated_as_absent() {
        let (_dir, store) = test_store();

        let foreign = DocumentHandle::Indexed(42);
        assert!(!store.deregister(&foreign).expect("deregister"));
        assert!(matches!(
            store.resolve(&foreign),
            Err(ScanwerkError::EntryNotFound)
        ));
    }
}

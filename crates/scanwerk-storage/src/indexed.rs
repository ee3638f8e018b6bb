// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared media index backend, backed by SQLite.
//
// The catalog stores document metadata (display name, MIME type, relative
// path, size) addressed by index-assigned row ids; the bytes themselves live
// in an index-owned blob directory, named by row id.  Deregistration goes
// through the catalog, which owns the on-disk cleanup.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument, warn};

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{DocumentHandle, DocumentRecord, StorageProfile};

use crate::gateway::StorageIndexGateway;

/// SQLite schema for the document catalog.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        display_name TEXT NOT NULL,
        mime_type TEXT NOT NULL,
        relative_path TEXT NOT NULL,
        size_bytes INTEGER NOT NULL DEFAULT 0,
        added_at TEXT NOT NULL
    )
"#;

/// Relative path prefix recorded for new entries, mirroring the public
/// documents collection the platform index files them under.
const DOCUMENTS_COLLECTION: &str = "Documents";

/// Storage backend that registers documents with the shared media index.
///
/// All methods are synchronous because `rusqlite` does not support async
/// natively.  In an async context, wrap calls in `tokio::task::spawn_blocking`.
pub struct IndexedStore {
    /// The open SQLite connection to the catalog.
    conn: Connection,
    /// Directory where the index materialises document bytes, named by row id.
    blob_root: PathBuf,
}

impl IndexedStore {
    /// Open (or create) the shared index at the given catalog path and blob
    /// directory.
    ///
    /// Applies WAL journal mode for better concurrent-read behaviour on
    /// mobile devices and creates the catalog table if it does not exist.
    /// Any failure here means the platform's indexed profile is unavailable.
    #[instrument(skip_all, fields(catalog = %catalog_path.as_ref().display()))]
    pub fn open(
        catalog_path: impl AsRef<std::path::Path>,
        blob_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let blob_root = blob_root.into();
        fs::create_dir_all(&blob_root)
            .map_err(|e| ScanwerkError::StorageUnavailable(format!("create blob store: {e}")))?;

        let conn = Connection::open(catalog_path.as_ref())
            .map_err(|e| ScanwerkError::StorageUnavailable(format!("open catalog: {e}")))?;

        // WAL mode is better for concurrent readers (UI thread + background
        // persist) and survives unclean shutdowns more gracefully.
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| ScanwerkError::Index(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| ScanwerkError::Index(format!("create table: {e}")))?;

        info!("storage index opened");
        Ok(Self { conn, blob_root })
    }

    /// Open an in-memory catalog with an on-disk blob directory (tests).
    pub fn open_in_memory(blob_root: impl Into<PathBuf>) -> Result<Self> {
        let blob_root = blob_root.into();
        fs::create_dir_all(&blob_root)
            .map_err(|e| ScanwerkError::StorageUnavailable(format!("create blob store: {e}")))?;

        let conn = Connection::open_in_memory()
            .map_err(|e| ScanwerkError::StorageUnavailable(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| ScanwerkError::Index(format!("create table: {e}")))?;

        debug!("in-memory storage index opened");
        Ok(Self { conn, blob_root })
    }

    /// Where the index keeps the bytes for a given row id.
    fn blob_path(&self, id: i64) -> PathBuf {
        self.blob_root.join(id.to_string())
    }

    /// Drop a catalog row and its blob after a failed registration, keeping
    /// whichever error got us here.
    fn discard_partial_entry(&self, id: i64) {
        if let Err(e) = self.conn.execute("DELETE FROM documents WHERE id = ?1", params![id]) {
            warn!(id, error = %e, "could not remove catalog row for failed registration");
        }
        if let Err(e) = fs::remove_file(self.blob_path(id))
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(id, error = %e, "could not remove partial blob for failed registration");
        }
    }
}

impl StorageIndexGateway for IndexedStore {
    #[instrument(skip(self, source))]
    fn register(
        &self,
        source: &mut dyn Read,
        suggested_name: &str,
        mime_type: &str,
    ) -> Result<DocumentHandle> {
        // Only the final path segment is honoured — the index assigns the
        // actual on-disk location.
        let display_name = std::path::Path::new(suggested_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(suggested_name);
        let relative_path = format!("{DOCUMENTS_COLLECTION}/{display_name}");
        let added_at = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO documents (display_name, mime_type, relative_path, size_bytes, added_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![display_name, mime_type, relative_path, added_at],
            )
            .map_err(|e| ScanwerkError::StorageUnavailable(format!("allocate entry: {e}")))?;
        let id = self.conn.last_insert_rowid();

        let blob = self.blob_path(id);
        let mut dest = match File::create(&blob) {
            Ok(file) => file,
            Err(e) => {
                self.discard_partial_entry(id);
                return Err(ScanwerkError::StorageUnavailable(format!(
                    "open blob for writing: {e}"
                )));
            }
        };

        match io::copy(source, &mut dest) {
            Ok(bytes) => {
                if let Err(e) = self.conn.execute(
                    "UPDATE documents SET size_bytes = ?1 WHERE id = ?2",
                    params![bytes as i64, id],
                ) {
                    warn!(id, error = %e, "could not record document size");
                }
                info!(id, bytes, "document registered");
                Ok(DocumentHandle::Indexed(id))
            }
            Err(e) => {
                drop(dest);
                self.discard_partial_entry(id);
                Err(ScanwerkError::CopyFailed(format!("{display_name}: {e}")))
            }
        }
    }

    #[instrument(skip(self))]
    fn list_by_mime_type(&self, mime_type: &str) -> Result<Vec<DocumentRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, display_name FROM documents WHERE mime_type = ?1")
            .map_err(|e| ScanwerkError::Index(format!("prepare list: {e}")))?;

        let records = stmt
            .query_map(params![mime_type], |row| {
                Ok(DocumentRecord {
                    handle: DocumentHandle::Indexed(row.get(0)?),
                    display_name: row.get(1)?,
                })
            })
            .map_err(|e| ScanwerkError::Index(format!("query list: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ScanwerkError::Index(format!("collect rows: {e}")))?;

        debug!(count = records.len(), "listed documents");
        Ok(records)
    }

    #[instrument(skip(self), fields(handle = %handle))]
    fn deregister(&self, handle: &DocumentHandle) -> Result<bool> {
        let DocumentHandle::Indexed(id) = handle else {
            warn!("handle from the direct profile presented to the shared index");
            return Ok(false);
        };

        let rows = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id])
            .map_err(|e| ScanwerkError::Index(format!("delete entry: {e}")))?;

        if rows == 0 {
            debug!("entry already gone");
            return Ok(false);
        }

        // The index owns on-disk cleanup for its entries.
        if let Err(e) = fs::remove_file(self.blob_path(*id))
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(error = %e, "catalog row removed but blob cleanup failed");
        }

        info!("document deregistered");
        Ok(true)
    }

    fn resolve(&self, handle: &DocumentHandle) -> Result<PathBuf> {
        let DocumentHandle::Indexed(id) = handle else {
            warn!(handle = %handle, "handle from the direct profile presented to the shared index");
            return Err(ScanwerkError::EntryNotFound);
        };

        let registered: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM documents WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ScanwerkError::Index(format!("resolve entry: {e}")))?;

        let path = self.blob_path(*id);
        match registered {
            Some(_) if path.is_file() => Ok(path),
            _ => Err(ScanwerkError::EntryNotFound),
        }
    }

    fn profile(&self) -> StorageProfile {
        StorageProfile::Indexed
    }
}

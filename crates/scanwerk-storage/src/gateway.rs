// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The storage-index gateway contract and the startup capability probe.
//
// Upstream components are backend-agnostic: whether documents live in the
// platform's shared media index or in a plain public directory is decided
// exactly once, at startup, and hidden behind this trait from then on.

use std::io::Read;
use std::path::PathBuf;

use tracing::{info, warn};

use scanwerk_core::config::StorageConfig;
use scanwerk_core::error::Result;
use scanwerk_core::types::{DocumentHandle, DocumentRecord, StorageProfile};

use crate::direct::DirectStore;
use crate::indexed::IndexedStore;

/// Sole point of contact with the platform-managed document storage.
///
/// The external index is shared with other applications and the operating
/// system; implementations take no locks over it and rely on the platform's
/// per-operation atomicity. Callers must tolerate entries appearing and
/// disappearing between calls — a stale handle deregisters to `Ok(false)`
/// and resolves to `EntryNotFound`, never to a panic.
pub trait StorageIndexGateway: Send {
    /// Allocate a new storage location for a document with the given name and
    /// MIME type, stream all bytes from `source` into it, and return the
    /// resulting handle.
    ///
    /// Fails with `StorageUnavailable` if no location can be allocated, or
    /// `CopyFailed` if the byte copy is interrupted (the partial entry is
    /// cleaned up best-effort before the error is returned).
    fn register(
        &self,
        source: &mut dyn Read,
        suggested_name: &str,
        mime_type: &str,
    ) -> Result<DocumentHandle>;

    /// Every entry matching the given MIME type.
    ///
    /// Returns an empty vec — never an error — when the index is not yet
    /// initialised or the documents directory does not exist.
    fn list_by_mime_type(&self, mime_type: &str) -> Result<Vec<DocumentRecord>>;

    /// Remove the entry and its backing bytes.
    ///
    /// Returns whether exactly one entry was removed. An entry that is
    /// already gone — or a handle minted by the other backend — is a no-op
    /// reporting `Ok(false)`, consistent with idempotent-delete semantics.
    fn deregister(&self, handle: &DocumentHandle) -> Result<bool>;

    /// Re-resolve a handle to an openable location on disk.
    ///
    /// Validity is checked at call time, never cached: a handle whose entry
    /// has been removed (by us or by any other application) yields
    /// `EntryNotFound`.
    fn resolve(&self, handle: &DocumentHandle) -> Result<PathBuf>;

    /// Which storage profile this backend implements.
    fn profile(&self) -> StorageProfile;
}

/// Probe platform storage capability and select a backend.
///
/// Newer platforms mandate the shared index for write compliance; older ones
/// lack it and require direct filesystem access. The probe tries to open the
/// shared index and falls back to the public documents directory if the index
/// cannot be brought up. Decided once at process start — never re-evaluated
/// per call.
pub fn detect_gateway(config: &StorageConfig) -> Result<Box<dyn StorageIndexGateway>> {
    match IndexedStore::open(config.index_db_path(), config.index_blob_dir()) {
        Ok(store) => {
            info!("shared storage index available");
            Ok(Box::new(store))
        }
        Err(e) => {
            warn!(error = %e, "shared storage index unavailable, using public documents directory");
            let store = DirectStore::create(config.documents_dir.clone())?;
            Ok(Box::new(store))
        }
    }
}

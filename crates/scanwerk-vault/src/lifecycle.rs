// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The two user-facing state transitions: "document scanned" and "delete
// requested", plus the open-for-viewing passthrough.
//
// The subsystem is stateless between calls — the only persistent state lives
// in the external index, and every operation ends by re-deriving the listing
// from it.  Byte copies and index queries block on I/O, so they run under
// `spawn_blocking` rather than on the caller's thread.

use std::sync::{Arc, Mutex};

use tokio::task;
use tracing::{debug, info, instrument, warn};

use scanwerk_bridge::{DocumentScanner, DocumentViewer};
use scanwerk_core::config::StorageConfig;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{DocumentHandle, DocumentKind, DocumentListing, ScanOptions, ScanResult};
use scanwerk_storage::{StorageIndexGateway, detect_gateway};

use crate::inventory::DocumentInventory;
use crate::store::DocumentStore;
use crate::SharedGateway;

/// Ties store, inventory, and gateway together for the interactive layer.
///
/// Cheaply cloneable; all clones share one gateway. The caller owns the
/// displayed snapshot and replaces it with whatever listing these methods
/// return — no push notifications from storage to UI are modelled.
#[derive(Clone)]
pub struct DocumentLifecycleController {
    gateway: SharedGateway,
    store: DocumentStore,
    inventory: DocumentInventory,
    scan_options: ScanOptions,
}

impl DocumentLifecycleController {
    /// Wrap an already-selected storage backend.
    pub fn new(gateway: Box<dyn StorageIndexGateway>) -> Self {
        let gateway: SharedGateway = Arc::new(Mutex::new(gateway));
        Self {
            store: DocumentStore::new(Arc::clone(&gateway)),
            inventory: DocumentInventory::new(Arc::clone(&gateway)),
            gateway,
            scan_options: ScanOptions::default(),
        }
    }

    /// Probe platform storage capability and wrap the selected backend.
    /// Call once at startup.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        detect_gateway(config).map(Self::new)
    }

    /// Replace the scanner flow configuration.
    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scan_options = options;
        self
    }

    /// The inventory, for callers that only need to read.
    pub fn inventory(&self) -> &DocumentInventory {
        &self.inventory
    }

    /// A document came back from the scanner: persist it, then return the
    /// fresh listing.
    ///
    /// If persistence fails the error is surfaced and no listing is returned
    /// — the caller keeps its displayed snapshot exactly as it was before
    /// the attempt.
    #[instrument(skip_all)]
    pub async fn on_document_scanned(&self, scan: ScanResult) -> Result<DocumentListing> {
        let store = self.store.clone();
        let handle = task::spawn_blocking(move || store.persist(scan))
            .await
            .map_err(join_error)??;

        info!(handle = %handle, "scan persisted");
        self.refresh_listing().await
    }

    /// The user asked to delete a document: deregister it best-effort, then
    /// return the fresh listing unconditionally.
    ///
    /// Deletion is always "successful enough" to refresh — an entry that was
    /// already gone (deleted externally, or a second tap on the same row) is
    /// a no-op, and even a failed deregistration only logs.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn on_delete_requested(&self, handle: DocumentHandle) -> Result<DocumentListing> {
        let gateway = Arc::clone(&self.gateway);
        let outcome = task::spawn_blocking(move || {
            let gateway = gateway.lock().expect("gateway lock poisoned");
            gateway.deregister(&handle)
        })
        .await
        .map_err(join_error)?;

        match outcome {
            Ok(true) => debug!("document removed"),
            Ok(false) => debug!("document was already gone"),
            Err(e) => warn!(error = %e, "deregistration failed"),
        }

        self.refresh_listing().await
    }

    /// Drive the scanner collaborator end-to-end.
    ///
    /// Returns `Ok(None)` when the user cancels the scan flow — nothing was
    /// stored and the displayed listing needs no refresh.
    pub async fn scan_and_store(
        &self,
        scanner: &dyn DocumentScanner,
    ) -> Result<Option<DocumentListing>> {
        match scanner.start_scan(&self.scan_options)? {
            Some(scan) => self.on_document_scanned(scan).await.map(Some),
            None => {
                debug!("scan cancelled by user");
                Ok(None)
            }
        }
    }

    /// Open a stored document in an external viewer.
    ///
    /// The handle is re-resolved at call time; a document deleted since the
    /// listing was taken surfaces as `EntryNotFound`.
    pub fn on_open_requested(
        &self,
        handle: &DocumentHandle,
        viewer: &dyn DocumentViewer,
    ) -> Result<()> {
        let path = {
            let gateway = self.gateway.lock().expect("gateway lock poisoned");
            gateway.resolve(handle)?
        };
        viewer.view_document(&path, DocumentKind::Pdf.mime_type())
    }

    async fn refresh_listing(&self) -> Result<DocumentListing> {
        let inventory = self.inventory.clone();
        task::spawn_blocking(move || inventory.list())
            .await
            .map_err(join_error)?
    }
}

fn join_error(e: task::JoinError) -> ScanwerkError {
    ScanwerkError::Internal(format!("storage task: {e}"))
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Always-fresh snapshot of stored documents.

use tracing::debug;

use scanwerk_core::error::Result;
use scanwerk_core::types::{DocumentKind, DocumentListing};

use crate::SharedGateway;

/// Produces the current listing of stored documents on demand.
///
/// Deliberately uncached: the index changes outside this application's
/// lifetime (file manager deletions, other apps), and no invalidation signal
/// exists, so every call re-derives the full set from the external index.
#[derive(Clone)]
pub struct DocumentInventory {
    gateway: SharedGateway,
}

impl DocumentInventory {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    /// A fresh handle → display-name mapping of every stored PDF document.
    pub fn list(&self) -> Result<DocumentListing> {
        let records = {
            let gateway = self.gateway.lock().expect("gateway lock poisoned");
            gateway.list_by_mime_type(DocumentKind::Pdf.mime_type())?
        };

        debug!(count = records.len(), "inventory refreshed");
        Ok(records
            .into_iter()
            .map(|record| (record.handle, record.display_name))
            .collect())
    }
}

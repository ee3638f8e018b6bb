// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Turning a transient scan result into a durable document.

use tracing::{debug, instrument};

use scanwerk_core::error::Result;
use scanwerk_core::types::{DEFAULT_DOCUMENT_NAME, DocumentHandle, DocumentKind, ScanResult};

use crate::SharedGateway;

/// Persists scanner output through the storage gateway.
#[derive(Clone)]
pub struct DocumentStore {
    gateway: SharedGateway,
}

impl DocumentStore {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    /// Copy the scan result's bytes into long-term storage and register the
    /// copy with the index.
    ///
    /// The suggested file name is derived from the scan result's locator,
    /// falling back to `"document.pdf"` when none can be derived. On success
    /// exactly one new entry is visible in the index; on failure the error is
    /// propagated and no entry survives the attempt.
    #[instrument(skip_all, fields(locator = ?scan.locator()))]
    pub fn persist(&self, scan: ScanResult) -> Result<DocumentHandle> {
        let (mut source, locator) = scan.into_parts();
        let name = derive_display_name(locator.as_deref());
        debug!(name = %name, "persisting scan result");

        let gateway = self.gateway.lock().expect("gateway lock poisoned");
        gateway.register(&mut *source, &name, DocumentKind::Pdf.mime_type())
    }
}

/// Last segment of the scanner's locator, qualified with the PDF extension;
/// the default literal name when the locator yields nothing usable.
fn derive_display_name(locator: Option<&str>) -> String {
    let name = locator
        .map(|l| l.split_once("://").map_or(l, |(_, rest)| rest))
        .map(|l| l.trim_end_matches('/'))
        .and_then(|l| l.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_DOCUMENT_NAME);
    DocumentKind::Pdf.qualify_name(name)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use std::path::Path;

use scanwerk_core::error::Result;
use scanwerk_core::types::{ScanOptions, ScanResult};

/// Unified bridge that groups all native capabilities this engine consumes.
pub trait ScannerBridge: DocumentScanner + DocumentViewer {
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;
}

/// Launch the platform's document scanning flow.
pub trait DocumentScanner: Send + Sync {
    /// Start a scan with the given options and block until the flow ends.
    ///
    /// Returns `Ok(None)` if the user cancelled, `Ok(Some(..))` with the
    /// scanner's transient output on success, and `Scanner(reason)` if the
    /// flow could not run at all.
    fn start_scan(&self, options: &ScanOptions) -> Result<Option<ScanResult>>;
}

/// Open a stored document in an external viewer.
pub trait DocumentViewer: Send + Sync {
    /// Ask the platform to display the document, granting the receiving
    /// component read permission on it.
    fn view_document(&self, path: &Path, mime_type: &str) -> Result<()>;
}

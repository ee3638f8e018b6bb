// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Every trait method returns `PlatformUnavailable` — real implementations
// come from the embedding application's SDK bindings.

use std::path::Path;

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{ScanOptions, ScanResult};

use crate::traits::*;

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl ScannerBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl DocumentScanner for StubBridge {
    fn start_scan(&self, _options: &ScanOptions) -> Result<Option<ScanResult>> {
        tracing::warn!("DocumentScanner::start_scan called on stub bridge");
        Err(ScanwerkError::PlatformUnavailable)
    }
}

impl DocumentViewer for StubBridge {
    fn view_document(&self, _path: &Path, _mime_type: &str) -> Result<()> {
        tracing::warn!("DocumentViewer::view_document called on stub bridge");
        Err(ScanwerkError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_reports_platform_unavailable() {
        let bridge = StubBridge;
        assert!(matches!(
            bridge.start_scan(&ScanOptions::default()),
            Err(ScanwerkError::PlatformUnavailable)
        ));
        assert!(matches!(
            bridge.view_document(Path::new("/Documents/a.pdf"), "application/pdf"),
            Err(ScanwerkError::PlatformUnavailable)
        ));
        assert_eq!(bridge.platform_name(), "Desktop (stub)");
    }

    #[test]
    fn platform_dispatch_returns_the_stub_off_mobile() {
        let bridge = crate::platform_bridge();
        assert_eq!(bridge.platform_name(), "Desktop (stub)");
        assert!(matches!(
            bridge.start_scan(&ScanOptions::default()),
            Err(ScanwerkError::PlatformUnavailable)
        ));
    }
}

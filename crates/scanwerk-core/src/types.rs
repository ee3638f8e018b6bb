// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk document engine.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Display name used when nothing can be derived from a scan result.
pub const DEFAULT_DOCUMENT_NAME: &str = "document.pdf";

/// Which storage-access strategy a backend implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageProfile {
    /// Entries live in the platform's shared media index, addressed by
    /// index-assigned numeric identifiers.
    Indexed,
    /// Entries are plain files in a fixed public documents directory.
    Direct,
}

/// Opaque reference to a stored document.
///
/// Carries the backend discriminator together with the backend-specific
/// identifier, so a handle can never be silently replayed against the wrong
/// backend. Validity is never cached — a handle is only as good as the entry
/// behind it, and every dereference re-resolves through the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentHandle {
    /// Row id assigned by the shared storage index.
    Indexed(i64),
    /// Absolute path inside the public documents directory.
    Direct(PathBuf),
}

impl DocumentHandle {
    /// The backend this handle belongs to.
    pub fn profile(&self) -> StorageProfile {
        match self {
            Self::Indexed(_) => StorageProfile::Indexed,
            Self::Direct(_) => StorageProfile::Direct,
        }
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed(id) => write!(f, "index:{id}"),
            Self::Direct(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// Display-facing projection of one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub handle: DocumentHandle,
    /// Human-readable file name. Not guaranteed unique.
    pub display_name: String,
}

/// The listing shown to the interactive layer: handle → display name.
///
/// Keyed and unordered from the consumer's perspective.
pub type DocumentListing = HashMap<DocumentHandle, String>;

/// Supported document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    /// Page images, for scanner configurations that emit JPEG instead of PDF.
    Jpeg,
}

impl DocumentKind {
    /// MIME type string used by the storage index.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Canonical file extension (lowercase, without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpeg => "jpg",
        }
    }

    /// Infer document kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Infer document kind from a MIME type.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Append this kind's extension unless `name` already carries a matching
    /// one (case-insensitively, `.jpeg` counts for JPEG).
    pub fn qualify_name(&self, name: &str) -> String {
        let current = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension);
        if current == Some(*self) {
            name.to_string()
        } else {
            format!("{name}.{}", self.extension())
        }
    }
}

/// Scanner flow configuration, handed to the platform scanner at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Allow importing pages from the photo gallery instead of the camera.
    pub allow_gallery_import: bool,
    /// What the scanner should emit.
    pub result_format: DocumentKind,
    /// Scanner UI mode.
    pub mode: ScannerMode,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            allow_gallery_import: true,
            result_format: DocumentKind::Pdf,
            mode: ScannerMode::Full,
        }
    }
}

/// Feature tiers of the platform scanner UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScannerMode {
    /// Capture and crop only.
    Base,
    /// Capture, crop, and image filters.
    BaseWithFilter,
    /// Everything, including cleaning and editing tools.
    Full,
}

/// Transient output of the scanner collaborator.
///
/// Holds the scan's byte stream plus the origin locator the scanner reported
/// (used only to derive a display name). A scan result has no persistent
/// identity of its own — it is consumed exactly once by `persist` and then
/// gone, which is why the consuming APIs take it by value.
pub struct ScanResult {
    reader: Box<dyn Read + Send>,
    locator: Option<String>,
}

impl ScanResult {
    /// Wrap the temporary file the scanner wrote its output to.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self {
            reader: Box::new(file),
            locator: Some(path.display().to_string()),
        })
    }

    /// Wrap an arbitrary byte stream with an optional origin locator.
    pub fn from_reader(reader: impl Read + Send + 'static, locator: Option<String>) -> Self {
        Self {
            reader: Box::new(reader),
            locator,
        }
    }

    /// The origin locator reported by the scanner, if any.
    pub fn locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    /// Consume the scan result, yielding its stream and locator.
    pub fn into_parts(self) -> (Box<dyn Read + Send>, Option<String>) {
        (self.reader, self.locator)
    }
}

impl fmt::Debug for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanResult")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn extension_inference_is_case_insensitive() {
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("pdf"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_extension("JPEG"),
            Some(DocumentKind::Jpeg)
        );
        assert_eq!(DocumentKind::from_extension("docx"), None);
    }

    #[test]
    fn qualify_name_appends_only_when_needed() {
        assert_eq!(DocumentKind::Pdf.qualify_name("receipt.pdf"), "receipt.pdf");
        assert_eq!(DocumentKind::Pdf.qualify_name("receipt.PDF"), "receipt.PDF");
        assert_eq!(DocumentKind::Pdf.qualify_name("receipt"), "receipt.pdf");
        assert_eq!(
            DocumentKind::Pdf.qualify_name("receipt.jpg"),
            "receipt.jpg.pdf"
        );
        assert_eq!(DocumentKind::Jpeg.qualify_name("page.jpeg"), "page.jpeg");
    }

    #[test]
    fn handle_carries_backend_discriminator() {
        let indexed = DocumentHandle::Indexed(42);
        let direct = DocumentHandle::Direct(PathBuf::from("/Documents/a.pdf"));
        assert_eq!(indexed.profile(), StorageProfile::Indexed);
        assert_eq!(direct.profile(), StorageProfile::Direct);
        assert_eq!(indexed.to_string(), "index:42");
    }

    #[test]
    fn handle_serialization_is_stable_across_the_ffi_boundary() {
        // The embedding app ships handles over FFI as JSON — the enum tag and
        // payload must survive a round trip unchanged.
        let handle = DocumentHandle::Indexed(7);
        let json = serde_json::to_string(&handle).expect("serialize");
        let back: DocumentHandle = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(handle, back);
    }

    #[test]
    fn scan_result_is_consumed_into_stream_and_locator() {
        let scan = ScanResult::from_reader(
            Cursor::new(b"%PDF-1.4".to_vec()),
            Some("content://scans/17/receipt.pdf".into()),
        );
        assert_eq!(scan.locator(), Some("content://scans/17/receipt.pdf"));

        let (mut reader, locator) = scan.into_parts();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).expect("read");
        assert_eq!(bytes, b"%PDF-1.4");
        assert_eq!(locator.as_deref(), Some("content://scans/17/receipt.pdf"));
    }

    #[test]
    fn scan_result_from_file_records_the_locator() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan-output.pdf");
        std::fs::write(&path, b"%PDF-1.4").expect("write");

        let scan = ScanResult::from_file(&path).expect("open");
        assert_eq!(scan.locator(), Some(path.display().to_string().as_str()));
    }
}

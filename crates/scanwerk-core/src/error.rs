// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
#[derive(Debug, Error)]
pub enum ScanwerkError {
    // -- Storage / persistence --
    /// The storage index or documents directory could not be allocated,
    /// created, or opened (revoked permission, missing external storage).
    /// Not retried automatically.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The byte copy from the scan stream to the destination was interrupted.
    /// The partially written entry is removed best-effort before this is
    /// returned.
    #[error("document copy failed: {0}")]
    CopyFailed(String),

    /// A handle was dereferenced whose underlying entry is gone.
    ///
    /// Deregistering an already-absent entry is NOT this error — that path
    /// reports a soft `false`.
    #[error("document entry not found")]
    EntryNotFound,

    #[error("storage index error: {0}")]
    Index(String),

    // -- Scanner collaborator --
    #[error("scanner failed: {0}")]
    Scanner(String),

    // -- Infrastructure --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Internal(String),

    // -- Platform bridge --
    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwerkError>;

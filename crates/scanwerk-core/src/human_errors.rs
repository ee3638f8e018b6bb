// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the scanning UI.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity levels drive how the UI presents the failure.

use crate::error::ScanwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A retry is likely to succeed.
    Transient,
    /// User must do something (grant permission, free up space).
    ActionRequired,
    /// Cannot be fixed by retrying or user action.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the system should auto-retry.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanwerkError` into a `HumanError` the scan screen can show.
pub fn humanize_error(err: &ScanwerkError) -> HumanError {
    match err {
        ScanwerkError::StorageUnavailable(_) => HumanError {
            message: "Your documents folder can't be reached.".into(),
            suggestion: "Check that the app has storage permission and that your device's storage isn't full, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanwerkError::CopyFailed(_) => HumanError {
            message: "Saving the scan was interrupted.".into(),
            suggestion: "Nothing was kept from the failed attempt. Scan the document again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanwerkError::EntryNotFound => HumanError {
            message: "That document is no longer there.".into(),
            suggestion: "It may have been deleted by another app. Pull to refresh the list.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanwerkError::Index(_) => HumanError {
            message: "The document index had a problem.".into(),
            suggestion: "Try closing and reopening the app. Your saved documents should still be there.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanwerkError::Scanner(_) => HumanError {
            message: "The scanner couldn't start.".into(),
            suggestion: "Make sure the camera isn't in use by another app, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Refresh the list and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission for that file.".into(),
                    suggestion: "Grant the app storage access in your device settings.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        ScanwerkError::Internal(_) => HumanError {
            message: "The app had an internal problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanwerkError::PlatformUnavailable => HumanError {
            message: "Scanning isn't available on this device.".into(),
            suggestion: "Document scanning needs a phone or tablet with a camera.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

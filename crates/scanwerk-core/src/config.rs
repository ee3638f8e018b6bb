// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storage location configuration.
//
// The subsystem persists no configuration of its own — the embedding
// application constructs a `StorageConfig` once at startup and hands it to
// the capability probe. On mobile the platform bridge supplies the real
// public directories; the defaults below cover desktop and CI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where documents live, for both storage profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Public documents directory used by the direct profile.
    pub documents_dir: PathBuf,
    /// Directory where the shared index keeps its catalog and owned blobs.
    pub index_dir: PathBuf,
}

impl StorageConfig {
    /// Root both profiles under one directory (tests, sandboxed installs).
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            documents_dir: root.join("Documents"),
            index_dir: root.join("index"),
        }
    }

    /// Path of the shared index catalog database.
    pub fn index_db_path(&self) -> PathBuf {
        self.index_dir.join("index.db")
    }

    /// Directory where the shared index materialises document bytes.
    pub fn index_blob_dir(&self) -> PathBuf {
        self.index_dir.join("store")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::at(data_dir())
    }
}

/// Return the application data directory.
///
/// On desktop this uses a conventional location. On mobile the platform
/// bridge should provide the documents directory instead.
fn data_dir() -> PathBuf {
    dirs_fallback().join("scanwerk")
}

fn dirs_fallback() -> PathBuf {
    // Try XDG data dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    PathBuf::from("/tmp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_config_keeps_profiles_apart() {
        let config = StorageConfig::at("/data/app");
        assert_eq!(config.documents_dir, PathBuf::from("/data/app/Documents"));
        assert_eq!(config.index_db_path(), PathBuf::from("/data/app/index/index.db"));
        assert_eq!(config.index_blob_dir(), PathBuf::from("/data/app/index/store"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-storage — Document storage backends for Scanwerk.
//
// Provides the `StorageIndexGateway` contract (the sole point of contact with
// platform-managed document storage), the shared-index backend, the direct
// filesystem backend, and the one-shot capability probe that selects between
// them at startup.

pub mod direct;
pub mod gateway;
pub mod indexed;

pub use direct::DirectStore;
pub use gateway::{StorageIndexGateway, detect_gateway};
pub use indexed::IndexedStore;

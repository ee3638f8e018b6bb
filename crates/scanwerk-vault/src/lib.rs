// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-vault — Document persistence and inventory for Scanwerk.
//
// Turns transient scanner output into durable documents through the storage
// gateway, produces always-fresh listings, and exposes the two user-facing
// state transitions (scanned, delete requested) as an async service layer.

use std::sync::{Arc, Mutex};

use scanwerk_storage::StorageIndexGateway;

pub mod inventory;
pub mod lifecycle;
pub mod store;

pub use inventory::DocumentInventory;
pub use lifecycle::DocumentLifecycleController;
pub use store::DocumentStore;

/// The gateway as shared by the service layer.
///
/// The backends are `Send` but not `Sync` (rusqlite), so the gateway is
/// wrapped in `Arc<Mutex<..>>` for safe sharing across the task pool.
/// Contention is minimal: the interactive layer issues one persistence
/// operation at a time.
pub type SharedGateway = Arc<Mutex<Box<dyn StorageIndexGateway>>>;

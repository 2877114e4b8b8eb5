// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

//! Session persistence and the injected state owner.

pub mod app_store;
pub mod state_file;

pub use app_store::AppStore;
pub use state_file::{Snapshot, StateFile, StoreError, WriteDurability, DEFAULT_STATE_FILE};

// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

//! Praxis: a terminal console for a small clinic.
//!
//! The core is a tab workspace: views open into deduplicated tabs, focus
//! follows deterministic rules, the active role gates which features are
//! offered, and the whole session snapshots to a JSON state file that is
//! replayed once after the first paint.
//!
//! - [`model`] — views, tab session, roles, typed ids.
//! - [`ops`] — pure `(state, op) -> state` transitions.
//! - [`store`] — the state owner plus file persistence.
//! - [`api`] — the REST fetch layer (dummyjson.com demo backend).
//! - [`tui`] — the interactive terminal shell.

pub mod api;
pub mod model;
pub mod ops;
pub mod store;
pub mod tui;

// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

//! Core data model.
//!
//! A session is an ordered set of open views (tabs) plus the focused view id;
//! the role state gates which view kinds navigation offers.

pub mod ids;
pub mod role;
pub mod session;
pub mod view;

pub use ids::{Id, IdError, ViewId};
pub use role::{ParseRoleError, Role, RolePatch, RoleState, UserProfile};
pub use session::{default_view, TabSession};
pub use view::{derive_view_id, OpenRequest, ParseViewKindError, View, ViewKind};

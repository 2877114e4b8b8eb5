// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

use super::ids::ViewId;
use super::view::{derive_view_id, View, ViewKind};

/// The ordered collection of open views plus the focused view id.
///
/// Invariants, upheld by the reducers in [`crate::ops`]:
/// - `open_views` is never empty (the last view cannot be closed);
/// - no two views share an id;
/// - `focused_id` always names a member of `open_views`.
///
/// Insertion order is significant: it is the left-to-right display order and
/// the basis of the close-fallback focus rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSession {
    open_views: Vec<View>,
    focused_id: ViewId,
}

impl Default for TabSession {
    fn default() -> Self {
        let view = default_view();
        let focused_id = view.id().clone();
        Self {
            open_views: vec![view],
            focused_id,
        }
    }
}

/// The seed view every session starts from (and resets back to).
pub fn default_view() -> View {
    View::new(
        derive_view_id(ViewKind::Dashboard, None),
        ViewKind::Dashboard,
        "Dashboard",
        None,
    )
}

impl TabSession {
    /// Builds a session from parts, assuming the caller already upholds the
    /// invariants. Used by the reducers; not a public constructor.
    pub(crate) fn from_parts(open_views: Vec<View>, focused_id: ViewId) -> Self {
        debug_assert!(!open_views.is_empty());
        debug_assert!(open_views.iter().any(|view| view.id() == &focused_id));
        Self {
            open_views,
            focused_id,
        }
    }

    pub fn open_views(&self) -> &[View] {
        &self.open_views
    }

    pub fn focused_id(&self) -> &ViewId {
        &self.focused_id
    }

    pub fn focused_view(&self) -> &View {
        self.open_views
            .iter()
            .find(|view| view.id() == &self.focused_id)
            .expect("focused id always names an open view")
    }

    pub fn contains(&self, view_id: &ViewId) -> bool {
        self.open_views.iter().any(|view| view.id() == view_id)
    }

    pub fn position(&self, view_id: &ViewId) -> Option<usize> {
        self.open_views.iter().position(|view| view.id() == view_id)
    }

    pub fn focused_position(&self) -> usize {
        self.position(&self.focused_id)
            .expect("focused id always names an open view")
    }
}

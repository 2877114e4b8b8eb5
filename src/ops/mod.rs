// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

//! Pure transition functions for the tab session and role state.
//!
//! Every transition is a pure `(state, op) -> new state` function. There is
//! deliberately no error channel: closing or focusing a just-removed tab
//! under rapid interaction is expected, not exceptional, so invalid ids are
//! absorbed as no-ops and the invariants (non-empty session, unique ids,
//! focused id always present) hold across any op sequence.

use crate::model::{OpenRequest, Role, RolePatch, RoleState, TabSession, View, ViewId};

/// A tab-session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabOp {
    /// Open a view, or focus the existing one with the same derived id.
    Open(OpenRequest),
    /// Close a view. No-op on the last remaining view or an unknown id.
    Close { view_id: ViewId },
    /// Focus a view if present; unknown ids are ignored.
    Focus { view_id: ViewId },
    /// Replace the session with the single default dashboard view.
    Reset,
    /// Overlay a persisted snapshot wholesale. Ignored when `open_views` is
    /// empty; an unmatched `focused_id` falls back to the first view.
    Hydrate {
        open_views: Vec<View>,
        focused_id: Option<ViewId>,
    },
}

pub fn apply_tab_op(session: &TabSession, op: &TabOp) -> TabSession {
    match op {
        TabOp::Open(request) => open(session, request),
        TabOp::Close { view_id } => close(session, view_id),
        TabOp::Focus { view_id } => focus(session, view_id),
        TabOp::Reset => TabSession::default(),
        TabOp::Hydrate {
            open_views,
            focused_id,
        } => hydrate(session, open_views, focused_id.as_ref()),
    }
}

fn open(session: &TabSession, request: &OpenRequest) -> TabSession {
    let view_id = request.view_id();
    if session.contains(&view_id) {
        // Already open: no new view, just move focus.
        return TabSession::from_parts(session.open_views().to_vec(), view_id);
    }

    let mut open_views = session.open_views().to_vec();
    open_views.push(request.clone().into_view());
    TabSession::from_parts(open_views, view_id)
}

fn close(session: &TabSession, view_id: &ViewId) -> TabSession {
    if session.open_views().len() == 1 {
        // The last view can never be closed.
        return session.clone();
    }
    let Some(removed_index) = session.position(view_id) else {
        return session.clone();
    };

    let mut open_views = session.open_views().to_vec();
    open_views.remove(removed_index);

    let focused_id = if session.focused_id() == view_id {
        // Removing index i of a focused view selects index max(i-1, 0) of
        // the resulting list: the predecessor, else the new first view.
        let fallback_index = removed_index.saturating_sub(1);
        open_views[fallback_index].id().clone()
    } else {
        session.focused_id().clone()
    };

    TabSession::from_parts(open_views, focused_id)
}

fn focus(session: &TabSession, view_id: &ViewId) -> TabSession {
    if !session.contains(view_id) {
        return session.clone();
    }
    TabSession::from_parts(session.open_views().to_vec(), view_id.clone())
}

fn hydrate(session: &TabSession, open_views: &[View], focused_id: Option<&ViewId>) -> TabSession {
    if open_views.is_empty() {
        // Malformed/empty snapshots never clobber the current state.
        return session.clone();
    }

    let focused_id = focused_id
        .filter(|id| open_views.iter().any(|view| view.id() == *id))
        .cloned()
        .unwrap_or_else(|| open_views[0].id().clone());

    TabSession::from_parts(open_views.to_vec(), focused_id)
}

/// A role-state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleOp {
    SetRole(Role),
    /// Overlay only the fields present in the persisted snapshot.
    Hydrate(RolePatch),
}

pub fn apply_role_op(state: &RoleState, op: &RoleOp) -> RoleState {
    match op {
        RoleOp::SetRole(role) => RoleState::new(*role, state.user().clone()),
        RoleOp::Hydrate(patch) => {
            let role = patch.role.unwrap_or(state.role());
            let user = patch.user.clone().unwrap_or_else(|| state.user().clone());
            RoleState::new(role, user)
        }
    }
}

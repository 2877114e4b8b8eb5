// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

use crate::model::{OpenRequest, Role, RolePatch, RoleState, TabSession, ViewId};
use crate::ops::{apply_role_op, apply_tab_op, RoleOp, TabOp};

use super::state_file::StateFile;

/// The injected state owner the UI dispatches into.
///
/// Holds the tab session, the role state, and the persistence adapter. Every
/// mutating entry point applies the pure op(s) from [`crate::ops`] and then
/// writes a fresh snapshot; persistence failures are absorbed into
/// `last_store_error` for the UI to drain as a toast, never propagated.
///
/// Never a module-level singleton: tests and alternative hosts instantiate
/// their own.
#[derive(Debug)]
pub struct AppStore {
    session: TabSession,
    role: RoleState,
    state_file: StateFile,
    hydrated: bool,
    last_store_error: Option<String>,
}

impl AppStore {
    pub fn new(state_file: StateFile) -> Self {
        Self {
            session: TabSession::default(),
            role: RoleState::default(),
            state_file,
            hydrated: false,
            last_store_error: None,
        }
    }

    pub fn session(&self) -> &TabSession {
        &self.session
    }

    pub fn role_state(&self) -> &RoleState {
        &self.role
    }

    pub fn role(&self) -> Role {
        self.role.role()
    }

    pub fn hydrated(&self) -> bool {
        self.hydrated
    }

    /// The most recent persistence failure, if any; draining it clears it.
    pub fn take_store_error(&mut self) -> Option<String> {
        self.last_store_error.take()
    }

    pub fn open_view(&mut self, request: OpenRequest) {
        self.apply_tab(TabOp::Open(request));
    }

    pub fn close_view(&mut self, view_id: ViewId) {
        self.apply_tab(TabOp::Close { view_id });
    }

    pub fn focus_view(&mut self, view_id: ViewId) {
        self.apply_tab(TabOp::Focus { view_id });
    }

    /// The compound role-switch protocol: reset the session first, then
    /// assign the role, then persist once.
    ///
    /// The order matters: a view kind not permitted under the new role must
    /// never remain open, focused, or captured in a snapshot written under
    /// that role. Returns the confirmation line for the UI toast.
    pub fn switch_role(&mut self, role: Role) -> String {
        self.session = apply_tab_op(&self.session, &TabOp::Reset);
        self.role = apply_role_op(&self.role, &RoleOp::SetRole(role));
        self.persist();
        format!("Role switched to {role}. All tabs have been reset.")
    }

    /// One-shot hydration: overlay the persisted snapshot, if any, onto the
    /// in-memory defaults.
    ///
    /// Must run after the first render pass and at most once; later calls
    /// are no-ops. Both overlays (tabs, then role) apply back-to-back with
    /// no persistence write in between, so a half-applied state can never be
    /// captured. Returns whether a snapshot was applied.
    pub fn hydrate_once(&mut self) -> bool {
        if self.hydrated {
            return false;
        }
        self.hydrated = true;

        let Some(snapshot) = self.state_file.load() else {
            return false;
        };

        self.session = apply_tab_op(
            &self.session,
            &TabOp::Hydrate {
                open_views: snapshot.open_views,
                focused_id: snapshot.focused_id,
            },
        );
        self.role = apply_role_op(
            &self.role,
            &RoleOp::Hydrate(RolePatch {
                role: snapshot.role,
                user: snapshot.user,
            }),
        );
        true
    }

    fn apply_tab(&mut self, op: TabOp) {
        let next = apply_tab_op(&self.session, &op);
        if next == self.session {
            // Absorbed no-op (unknown id, last-view close, duplicate open of
            // the focused view): nothing changed, nothing to persist.
            return;
        }
        self.session = next;
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(err) = self.state_file.save(&self.session, &self.role) {
            self.last_store_error = Some(format!("State not saved: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppStore;
    use crate::model::{derive_view_id, OpenRequest, Role, TabSession, ViewKind};
    use crate::store::StateFile;

    fn detached_store() -> AppStore {
        AppStore::new(StateFile::detached())
    }

    #[test]
    fn open_close_focus_flow_through_the_reducers() {
        let mut store = detached_store();
        store.open_view(OpenRequest::nav(ViewKind::Patients, "Patients"));
        store.open_view(OpenRequest::detail(ViewKind::PatientDetail, "Patient: Ada", 42, None));
        assert_eq!(store.session().open_views().len(), 3);

        store.focus_view(derive_view_id(ViewKind::Patients, None));
        assert_eq!(store.session().focused_id().as_str(), "patients");

        store.close_view(derive_view_id(ViewKind::Patients, None));
        assert_eq!(store.session().focused_id().as_str(), "dashboard");
    }

    #[test]
    fn switch_role_resets_the_session_and_reports_it() {
        let mut store = detached_store();
        store.open_view(OpenRequest::nav(ViewKind::Invoices, "Invoices"));

        let toast = store.switch_role(Role::Clinician);
        assert_eq!(store.session(), &TabSession::default());
        assert_eq!(store.role(), Role::Clinician);
        assert!(toast.contains("Clinician"));
        assert!(toast.contains("reset"));
    }

    #[test]
    fn hydrate_once_is_guarded() {
        let mut store = detached_store();
        assert!(!store.hydrate_once());
        assert!(store.hydrated());
        assert!(!store.hydrate_once());
    }

    #[test]
    fn detached_store_reports_no_persistence_errors() {
        let mut store = detached_store();
        store.open_view(OpenRequest::nav(ViewKind::Patients, "Patients"));
        assert_eq!(store.take_store_error(), None);
    }
}

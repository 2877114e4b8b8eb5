// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{Snapshot, StateFile, WriteDurability, DEFAULT_STATE_FILE};
use crate::model::{
    derive_view_id, OpenRequest, Role, RoleState, TabSession, UserProfile, View, ViewKind,
};
use crate::ops::{apply_tab_op, TabOp};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("praxis-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct StateFileTestCtx {
    _tmp: TempDir,
    state_path: std::path::PathBuf,
    state_file: StateFile,
}

impl StateFileTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let state_path = tmp.path().join(DEFAULT_STATE_FILE);
        let state_file = StateFile::new(&state_path);
        Self { _tmp: tmp, state_path, state_file }
    }
}

#[fixture]
fn ctx() -> StateFileTestCtx {
    StateFileTestCtx::new("state-file")
}

fn workspace_session() -> TabSession {
    let session = TabSession::default();
    let session = apply_tab_op(
        &session,
        &TabOp::Open(OpenRequest::nav(ViewKind::Patients, "Patients")),
    );
    apply_tab_op(
        &session,
        &TabOp::Open(OpenRequest::detail(
            ViewKind::PatientDetail,
            "Patient: Ada",
            42,
            Some(serde_json::json!({"id": 42, "firstName": "Ada"})),
        )),
    )
}

#[rstest]
fn save_then_load_round_trips_the_defined_shape(ctx: StateFileTestCtx) {
    let session = workspace_session();
    let role = RoleState::new(
        Role::Clinician,
        UserProfile {
            name: "Grace Hopper".to_owned(),
            email: "grace@clinic.com".to_owned(),
        },
    );

    ctx.state_file.save(&session, &role).expect("save snapshot");
    let snapshot = ctx.state_file.load().expect("snapshot present");

    assert_eq!(snapshot.open_views, session.open_views().to_vec());
    assert_eq!(snapshot.focused_id.as_ref(), Some(session.focused_id()));
    assert_eq!(snapshot.role, Some(Role::Clinician));
    assert_eq!(snapshot.user.as_ref().map(|user| user.name.as_str()), Some("Grace Hopper"));
}

#[rstest]
fn save_overwrites_the_previous_snapshot(ctx: StateFileTestCtx) {
    let role = RoleState::default();
    ctx.state_file.save(&workspace_session(), &role).expect("first save");
    ctx.state_file.save(&TabSession::default(), &role).expect("second save");

    let snapshot = ctx.state_file.load().expect("snapshot present");
    assert_eq!(snapshot.open_views.len(), 1);
    assert_eq!(snapshot.open_views[0].kind(), ViewKind::Dashboard);
}

#[rstest]
fn load_reports_no_snapshot_when_the_file_is_missing(ctx: StateFileTestCtx) {
    assert_eq!(ctx.state_file.load(), None);
}

#[rstest]
fn load_tolerates_truncated_json(ctx: StateFileTestCtx) {
    std::fs::write(&ctx.state_path, b"{\"tabs\": {\"openVi").unwrap();
    assert_eq!(ctx.state_file.load(), None);
}

#[rstest]
fn load_discards_a_snapshot_with_no_views(ctx: StateFileTestCtx) {
    std::fs::write(
        &ctx.state_path,
        br#"{"tabs": {"openViews": [], "activeTabId": "dashboard"}}"#,
    )
    .unwrap();
    assert_eq!(ctx.state_file.load(), None);
}

#[rstest]
fn load_discards_a_snapshot_with_an_unknown_view_kind(ctx: StateFileTestCtx) {
    std::fs::write(
        &ctx.state_path,
        br#"{"tabs": {"openViews": [
            {"id": "dashboard", "type": "dashboard", "title": "Dashboard"},
            {"id": "settings", "type": "settings", "title": "Settings"}
        ], "activeTabId": "dashboard"}}"#,
    )
    .unwrap();
    assert_eq!(ctx.state_file.load(), None);
}

#[rstest]
fn load_tolerates_a_missing_auth_section(ctx: StateFileTestCtx) {
    std::fs::write(
        &ctx.state_path,
        br#"{"tabs": {"openViews": [
            {"id": "patients", "type": "patients", "title": "Patients"}
        ], "activeTabId": "patients"}}"#,
    )
    .unwrap();

    let snapshot = ctx.state_file.load().expect("snapshot present");
    assert_eq!(snapshot.role, None);
    assert_eq!(snapshot.user, None);
    assert_eq!(snapshot.focused_id, Some(derive_view_id(ViewKind::Patients, None)));
}

#[rstest]
fn load_drops_an_unparseable_role_but_keeps_the_tabs(ctx: StateFileTestCtx) {
    std::fs::write(
        &ctx.state_path,
        br#"{"tabs": {"openViews": [
            {"id": "dashboard", "type": "dashboard", "title": "Dashboard"}
        ]}, "auth": {"role": "Janitor", "user": {"name": "A", "email": "a@clinic.com"}}}"#,
    )
    .unwrap();

    let snapshot = ctx.state_file.load().expect("snapshot present");
    assert_eq!(snapshot.role, None);
    assert_eq!(snapshot.user.as_ref().map(|user| user.name.as_str()), Some("A"));
    assert_eq!(snapshot.focused_id, None);
}

#[rstest]
fn payload_survives_the_round_trip(ctx: StateFileTestCtx) {
    let session = workspace_session();
    ctx.state_file.save(&session, &RoleState::default()).expect("save snapshot");

    let snapshot = ctx.state_file.load().expect("snapshot present");
    let detail: &View = snapshot
        .open_views
        .iter()
        .find(|view| view.kind() == ViewKind::PatientDetail)
        .expect("detail view");
    assert_eq!(
        detail.payload().and_then(|payload| payload.get("firstName")),
        Some(&serde_json::json!("Ada"))
    );
}

#[test]
fn detached_state_file_is_a_noop() {
    let state_file = StateFile::detached();
    state_file
        .save(&workspace_session(), &RoleState::default())
        .expect("detached save is a no-op");
    assert_eq!(state_file.load(), None);
}

#[rstest]
fn durable_mode_writes_the_same_shape(ctx: StateFileTestCtx) {
    let state_file = StateFile::new(&ctx.state_path).with_durability(WriteDurability::Durable);
    let session = workspace_session();
    state_file.save(&session, &RoleState::default()).expect("durable save");

    let snapshot: Snapshot = ctx.state_file.load().expect("snapshot present");
    assert_eq!(snapshot.open_views, session.open_views().to_vec());
}

#[cfg(unix)]
#[rstest]
fn save_refuses_to_write_through_a_symlink(ctx: StateFileTestCtx) {
    let target = ctx.state_path.with_file_name("elsewhere.json");
    std::fs::write(&target, b"{}").unwrap();
    std::os::unix::fs::symlink(&target, &ctx.state_path).unwrap();

    let err = ctx
        .state_file
        .save(&TabSession::default(), &RoleState::default())
        .expect_err("symlink refused");
    assert!(err.to_string().contains("symlink"));
}

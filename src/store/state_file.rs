// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{Role, RoleState, TabSession, UserProfile, View, ViewId, ViewKind};

/// Default snapshot file name, the durable-store "key".
pub const DEFAULT_STATE_FILE: &str = "praxis-state.json";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::SymlinkRefused { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to
    /// stable storage where possible. Exact guarantees are
    /// platform/filesystem-dependent.
    Durable,
}

/// What a successful `load` hands back: the persisted session plus whatever
/// role/identity fields the snapshot carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub open_views: Vec<View>,
    pub focused_id: Option<ViewId>,
    pub role: Option<Role>,
    pub user: Option<UserProfile>,
}

/// File-backed persistence for the session snapshot.
///
/// The adapter is a capability: hosts without durable storage construct it
/// [`detached`](StateFile::detached), in which case `save` is a no-op and
/// `load` reports "no snapshot". Reads never propagate errors; a missing,
/// truncated, or schema-drifted file simply loads as `None` so the defaults
/// stand.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: Option<PathBuf>,
    durability: WriteDurability,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            durability: WriteDurability::default(),
        }
    }

    /// An adapter without a storage capability; save/load degrade to no-ops.
    pub fn detached() -> Self {
        Self {
            path: None,
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Serializes the session + role state to the snapshot file.
    ///
    /// Best-effort: the caller absorbs the error into its status surface;
    /// in-memory state stays authoritative either way.
    pub fn save(&self, session: &TabSession, role: &RoleState) -> Result<(), StoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let snapshot_json = snapshot_to_json(session, role);
        let snapshot_str =
            serde_json::to_string_pretty(&snapshot_json).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        write_atomic(path, format!("{snapshot_str}\n").as_bytes(), self.durability)
    }

    /// Reads the snapshot file, tolerating absence and damage.
    ///
    /// Returns `None` on a missing file, unreadable bytes, parse failure, or
    /// a shape that fails validation (most importantly: an empty or missing
    /// view list). The persisted value may come from an older incompatible
    /// version, so drift is expected, never an error.
    pub fn load(&self) -> Option<Snapshot> {
        let path = self.path.as_deref()?;
        let snapshot_str = fs::read_to_string(path).ok()?;
        let snapshot_json: SnapshotJson = serde_json::from_str(&snapshot_str).ok()?;
        snapshot_from_json(snapshot_json)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotJson {
    #[serde(default)]
    tabs: Option<TabsJson>,
    #[serde(default)]
    auth: Option<AuthJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TabsJson {
    #[serde(default, rename = "openViews")]
    open_views: Vec<ViewJson>,
    #[serde(default, rename = "activeTabId")]
    active_tab_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ViewJson {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    title: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthJson {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    user: Option<UserJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserJson {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

fn snapshot_to_json(session: &TabSession, role: &RoleState) -> SnapshotJson {
    let open_views = session
        .open_views()
        .iter()
        .map(|view| ViewJson {
            id: view.id().to_string(),
            kind: view.kind().as_str().to_owned(),
            title: view.title().to_owned(),
            data: view.payload().cloned(),
        })
        .collect();

    SnapshotJson {
        tabs: Some(TabsJson {
            open_views,
            active_tab_id: Some(session.focused_id().to_string()),
        }),
        auth: Some(AuthJson {
            role: Some(role.role().as_str().to_owned()),
            user: Some(UserJson {
                name: role.user().name.clone(),
                email: role.user().email.clone(),
            }),
        }),
    }
}

fn snapshot_from_json(snapshot_json: SnapshotJson) -> Option<Snapshot> {
    let tabs = snapshot_json.tabs?;
    if tabs.open_views.is_empty() {
        return None;
    }

    // Any unparseable view discards the whole snapshot rather than a single
    // view, keeping the restored session exactly what was persisted.
    let mut open_views = Vec::with_capacity(tabs.open_views.len());
    for view_json in tabs.open_views {
        open_views.push(view_from_json(view_json)?);
    }

    let focused_id = tabs
        .active_tab_id
        .and_then(|raw| ViewId::new(raw).ok());

    let (role, user) = match snapshot_json.auth {
        Some(auth) => {
            let role = auth.role.and_then(|raw| raw.parse::<Role>().ok());
            let user = auth.user.map(|user| UserProfile {
                name: user.name,
                email: user.email,
            });
            (role, user)
        }
        None => (None, None),
    };

    Some(Snapshot {
        open_views,
        focused_id,
        role,
        user,
    })
}

fn view_from_json(view_json: ViewJson) -> Option<View> {
    let kind = view_json.kind.parse::<ViewKind>().ok()?;
    let id = ViewId::new(view_json.id).ok()?;
    Some(View::new(id, kind, view_json.title, view_json.data))
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("state");
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp-{}", std::process::id()));

    let mut tmp = fs::File::create(&tmp_path).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    let write_result = tmp
        .write_all(contents)
        .and_then(|()| match durability {
            WriteDurability::BestEffort => Ok(()),
            WriteDurability::Durable => tmp.sync_all(),
        });
    if let Err(source) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }
    drop(tmp);

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        // Flush the rename itself where the platform allows; failures here
        // do not invalidate the write.
        if let Some(parent) = path.parent() {
            if let Ok(dir) = fs::File::open(parent) {
                let _ = dir.sync_all();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;

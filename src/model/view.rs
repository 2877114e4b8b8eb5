// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use super::ids::ViewId;
use super::role::Role;

/// The closed set of view kinds the console can render.
///
/// The kind determines which renderer consumes the view and whether the view
/// is offered in navigation for the active role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewKind {
    Dashboard,
    Patients,
    PatientDetail,
    Invoices,
    InvoiceDetail,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Patients => "patients",
            Self::PatientDetail => "patient-detail",
            Self::Invoices => "invoices",
            Self::InvoiceDetail => "invoice-detail",
        }
    }

    /// Whether a role may be offered this kind in navigation.
    ///
    /// Invoice views are Manager-only; everything else is visible to all
    /// roles. Presentation evaluates this; the session store never does.
    pub fn permitted_for(self, role: Role) -> bool {
        match self {
            Self::Invoices | Self::InvoiceDetail => role == Role::Manager,
            Self::Dashboard | Self::Patients | Self::PatientDetail => true,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = ParseViewKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Self::Dashboard),
            "patients" => Ok(Self::Patients),
            "patient-detail" => Ok(Self::PatientDetail),
            "invoices" => Ok(Self::Invoices),
            "invoice-detail" => Ok(Self::InvoiceDetail),
            _ => Err(ParseViewKindError {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseViewKindError {
    value: String,
}

impl fmt::Display for ParseViewKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown view kind {:?}", self.value)
    }
}

impl std::error::Error for ParseViewKindError {}

/// One logical tab in the session.
///
/// The `payload` is an opaque snapshot captured at open time (e.g. the table
/// row that was clicked). It is a hint only: detail views render it while the
/// fresh fetch resolves and must never treat it as a source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    id: ViewId,
    kind: ViewKind,
    title: String,
    payload: Option<serde_json::Value>,
}

impl View {
    pub fn new(
        id: ViewId,
        kind: ViewKind,
        title: impl Into<String>,
        payload: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            payload,
        }
    }

    pub fn id(&self) -> &ViewId {
        &self.id
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }
}

/// The open-view request contract from navigation into the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub kind: ViewKind,
    pub title: String,
    pub entity_id: Option<u64>,
    pub payload: Option<serde_json::Value>,
}

impl OpenRequest {
    pub fn nav(kind: ViewKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            entity_id: None,
            payload: None,
        }
    }

    pub fn detail(
        kind: ViewKind,
        title: impl Into<String>,
        entity_id: u64,
        payload: Option<serde_json::Value>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            entity_id: Some(entity_id),
            payload,
        }
    }

    /// The deterministic tab id: `kind` alone, or `kind-entityId`.
    ///
    /// Opening the same kind+entity twice always derives the same id, which
    /// is what makes the id a natural deduplication key.
    pub fn view_id(&self) -> ViewId {
        derive_view_id(self.kind, self.entity_id)
    }

    pub fn into_view(self) -> View {
        let id = self.view_id();
        View::new(id, self.kind, self.title, self.payload)
    }
}

pub fn derive_view_id(kind: ViewKind, entity_id: Option<u64>) -> ViewId {
    let raw = match entity_id {
        Some(entity_id) => format!("{}-{entity_id}", kind.as_str()),
        None => kind.as_str().to_owned(),
    };
    ViewId::new(raw).expect("derived view id is a valid id segment")
}

#[cfg(test)]
mod tests {
    use super::{derive_view_id, OpenRequest, ViewKind};
    use crate::model::Role;

    #[test]
    fn view_id_without_entity_is_the_kind() {
        assert_eq!(derive_view_id(ViewKind::Patients, None).as_str(), "patients");
    }

    #[test]
    fn view_id_with_entity_appends_the_entity() {
        assert_eq!(
            derive_view_id(ViewKind::PatientDetail, Some(42)).as_str(),
            "patient-detail-42"
        );
    }

    #[test]
    fn open_request_derives_the_same_id_every_time() {
        let a = OpenRequest::detail(ViewKind::InvoiceDetail, "Invoice", 7, None);
        let b = OpenRequest::detail(ViewKind::InvoiceDetail, "Invoice #7", 7, None);
        assert_eq!(a.view_id(), b.view_id());
    }

    #[test]
    fn invoices_are_manager_only() {
        assert!(ViewKind::Invoices.permitted_for(Role::Manager));
        assert!(!ViewKind::Invoices.permitted_for(Role::Clinician));
        assert!(!ViewKind::InvoiceDetail.permitted_for(Role::Clinician));
        assert!(ViewKind::Patients.permitted_for(Role::Clinician));
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            ViewKind::Dashboard,
            ViewKind::Patients,
            ViewKind::PatientDetail,
            ViewKind::Invoices,
            ViewKind::InvoiceDetail,
        ] {
            assert_eq!(kind.as_str().parse::<ViewKind>(), Ok(kind));
        }
        assert!("settings".parse::<ViewKind>().is_err());
    }
}

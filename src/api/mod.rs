// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

//! Fetch layer over the demo REST backend (dummyjson.com).
//!
//! Users double as patients and posts double as invoices; the invoice fields
//! the backend does not have are synthesized deterministically from the post
//! id so repeated fetches render identically.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum FetchError {
    Request {
        source: reqwest::Error,
    },
    Status {
        status: StatusCode,
    },
    NotFound {
        kind: &'static str,
        id: u64,
    },
    Decode {
        source: reqwest::Error,
    },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { source } => write!(f, "request failed: {source}"),
            Self::Status { status } => write!(f, "unexpected status {status}"),
            Self::NotFound { kind, id } => write!(f, "{kind} {id} not found"),
            Self::Decode { source } => write!(f, "malformed response: {source}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request { source } | Self::Decode { source } => Some(source),
            Self::Status { .. } | Self::NotFound { .. } => None,
        }
    }
}

/// A paginated slice of a collection plus the backend's total count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: u64,
    pub invoice_number: String,
    pub title: String,
    pub description: String,
    pub amount: u64,
    pub date: String,
    pub status: InvoiceStatus,
    pub patient_id: u64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_patients: u64,
    pub total_invoices: u64,
    pub pending_invoices: u64,
    pub total_revenue: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct UsersPageJson {
    users: Vec<Patient>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    skip: u64,
    #[serde(default)]
    limit: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct PostsPageJson {
    posts: Vec<PostJson>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    skip: u64,
    #[serde(default)]
    limit: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostJson {
    id: u64,
    title: String,
    body: String,
    #[serde(default)]
    user_id: u64,
    #[serde(default)]
    tags: Vec<String>,
}

/// Deterministic invoice synthesis from a post: same id, same invoice.
fn invoice_from_post(post: PostJson) -> Invoice {
    let seed = post.id;
    let amount = (seed.wrapping_mul(137)) % 5000 + 100;
    let status = match (seed * 7) % 3 {
        0 => InvoiceStatus::Paid,
        1 => InvoiceStatus::Pending,
        _ => InvoiceStatus::Overdue,
    };
    // Base date 2024-01-01 plus an offset of 0..30 days stays inside
    // January, so the date never needs calendar arithmetic.
    let day_offset = (seed * 11) % 30;
    let date = format!("2024-01-{:02}", 1 + day_offset);

    Invoice {
        id: post.id,
        invoice_number: format!("INV-{:06}", post.id),
        title: post.title,
        description: post.body,
        amount,
        date,
        status,
        patient_id: post.user_id,
        tags: post.tags,
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| FetchError::Request { source })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_patients(&self, limit: u64, skip: u64) -> Result<Page<Patient>, FetchError> {
        let url = format!("{}/users", self.base_url);
        let page: UsersPageJson = self.get_json(&url, Some((limit, skip)), "patients", 0).await?;
        Ok(Page {
            items: page.users,
            total: page.total,
            skip: page.skip,
            limit: page.limit,
        })
    }

    pub async fn fetch_patient(&self, id: u64) -> Result<Patient, FetchError> {
        let url = format!("{}/users/{id}", self.base_url);
        self.get_json(&url, None, "patient", id).await
    }

    pub async fn fetch_invoices(&self, limit: u64, skip: u64) -> Result<Page<Invoice>, FetchError> {
        let url = format!("{}/posts", self.base_url);
        let page: PostsPageJson = self.get_json(&url, Some((limit, skip)), "invoices", 0).await?;
        Ok(Page {
            items: page.posts.into_iter().map(invoice_from_post).collect(),
            total: page.total,
            skip: page.skip,
            limit: page.limit,
        })
    }

    pub async fn fetch_invoice(&self, id: u64) -> Result<Invoice, FetchError> {
        let url = format!("{}/posts/{id}", self.base_url);
        let post: PostJson = self.get_json(&url, None, "invoice", id).await?;
        Ok(invoice_from_post(post))
    }

    /// Aggregates the two collection counts into headline stats.
    pub async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, FetchError> {
        let (patients, invoices) =
            tokio::join!(self.fetch_patients(1, 0), self.fetch_invoices(1, 0));
        let patients = patients?;
        let invoices = invoices?;

        // Zero totals mean the demo backend answered without counts; fall
        // back to the canned demo figures rather than an empty dashboard.
        let total_patients = if patients.total == 0 { 100 } else { patients.total };
        let total_invoices = if invoices.total == 0 { 150 } else { invoices.total };
        let pending_invoices = if invoices.total == 0 { 45 } else { invoices.total * 3 / 10 };
        let total_revenue = if invoices.total == 0 { 375_000 } else { invoices.total * 2500 };

        Ok(DashboardStats {
            total_patients,
            total_invoices,
            pending_invoices,
            total_revenue,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        page: Option<(u64, u64)>,
        kind: &'static str,
        id: u64,
    ) -> Result<T, FetchError> {
        let mut request = self.client.get(url);
        if let Some((limit, skip)) = page {
            request = request.query(&[("limit", limit), ("skip", skip)]);
        }

        let response = request.send().await.map_err(|source| FetchError::Request { source })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { kind, id });
        }
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        response.json::<T>().await.map_err(|source| FetchError::Decode { source })
    }
}

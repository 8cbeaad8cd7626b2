//! Dashboard aggregates and authenticated session payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts served by `GET /dashboard/summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_pumps: u64,
    /// Pump count keyed by status wire name.
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    /// Pump count keyed by institution name.
    #[serde(default)]
    pub by_institution: BTreeMap<String, u64>,
}

impl DashboardSummary {
    /// Share of pumps in `status`, in percent. Zero when the inventory is empty.
    #[must_use]
    pub fn status_share(&self, status: &str) -> f64 {
        if self.total_pumps == 0 {
            return 0.0;
        }
        let count = self.by_status.get(status).copied().unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let share = count as f64 * 100.0 / self.total_pumps as f64;
        share
    }
}

/// Body sent with `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
}

/// `data` payload of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

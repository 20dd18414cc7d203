//! Dashboard counters

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_clients: u64,
    #[serde(default)]
    pub active_jobs: u64,
    #[serde(default)]
    pub jobs_due_today: u64,
    #[serde(default)]
    pub pending_quotes: u64,
    #[serde(default)]
    pub total_employees: u64,
}

//! Driving port for the admin dashboard.

use async_trait::async_trait;

use crate::domain::{Caller, DashboardStats, Error};

/// Domain use-case port for reporting rollups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Point-in-time stats. Admin only.
    async fn stats(&self, caller: &Caller) -> Result<DashboardStats, Error>;
}

//! Admin dashboard rollups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PopularArticle, Requester, TicketId, TicketPriority, TicketStatus};

/// Number of entries in each dashboard top list.
pub const DASHBOARD_LIST_LIMIT: usize = 5;

/// Ticket counts grouped by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketStatusCounts {
    pub open: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub closed: i64,
}

impl TicketStatusCounts {
    /// Sum over every status.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.open + self.in_progress + self.resolved + self.closed
    }

    /// Increment the counter for `status`.
    pub fn record(&mut self, status: TicketStatus, count: i64) {
        match status {
            TicketStatus::Open => self.open += count,
            TicketStatus::InProgress => self.in_progress += count,
            TicketStatus::Resolved => self.resolved += count,
            TicketStatus::Closed => self.closed += count,
        }
    }
}

/// Recent ticket entry on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentTicket {
    #[schema(value_type = String)]
    pub id: TicketId,
    pub title: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub user: Requester,
}

/// Point-in-time reporting snapshot.
///
/// Closed tickets count towards `total_tickets` but have no counter of their
/// own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tickets: i64,
    pub open_tickets: i64,
    pub in_progress_tickets: i64,
    pub resolved_tickets: i64,
    pub total_users: i64,
    /// Published articles only.
    pub total_articles: i64,
    pub popular_articles: Vec<PopularArticle>,
    pub recent_tickets: Vec<RecentTicket>,
}

//! Admin dashboard aggregation.
//!
//! Sub-queries run concurrently and are not a consistent cut: writes landing
//! between them can make counters disagree slightly with the lists.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ArticleRepository, DashboardQuery, TicketRepository, UserRepository};
use crate::domain::service_error_mapping::{
    map_article_repository_error, map_ticket_repository_error, map_user_repository_error,
};
use crate::domain::{Caller, DASHBOARD_LIST_LIMIT, DashboardStats, Error};

/// Read-only rollups over tickets, users and articles.
#[derive(Clone)]
pub struct DashboardService<T, U, A> {
    tickets: Arc<T>,
    users: Arc<U>,
    articles: Arc<A>,
}

impl<T, U, A> DashboardService<T, U, A> {
    /// Create the aggregator.
    pub fn new(tickets: Arc<T>, users: Arc<U>, articles: Arc<A>) -> Self {
        Self {
            tickets,
            users,
            articles,
        }
    }
}

#[async_trait]
impl<T, U, A> DashboardQuery for DashboardService<T, U, A>
where
    T: TicketRepository,
    U: UserRepository,
    A: ArticleRepository,
{
    async fn stats(&self, caller: &Caller) -> Result<DashboardStats, Error> {
        caller.require_admin()?;

        let (counts, recent_tickets, total_users, total_articles, popular_articles) = tokio::try_join!(
            async {
                self.tickets
                    .status_counts()
                    .await
                    .map_err(map_ticket_repository_error)
            },
            async {
                self.tickets
                    .recent(DASHBOARD_LIST_LIMIT)
                    .await
                    .map_err(map_ticket_repository_error)
            },
            async { self.users.count().await.map_err(map_user_repository_error) },
            async {
                self.articles
                    .count_published()
                    .await
                    .map_err(map_article_repository_error)
            },
            async {
                self.articles
                    .most_viewed(DASHBOARD_LIST_LIMIT)
                    .await
                    .map_err(map_article_repository_error)
            },
        )?;

        Ok(DashboardStats {
            total_tickets: counts.total(),
            open_tickets: counts.open,
            in_progress_tickets: counts.in_progress,
            resolved_tickets: counts.resolved,
            total_users,
            total_articles,
            popular_articles,
            recent_tickets,
        })
    }
}

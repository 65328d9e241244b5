//! Port for knowledge-base article persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticleSummary, PopularArticle,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Repository connection could not be established.
        Connection => "article repository connection failed",
        /// Query or mutation failed during execution.
        Query => "article repository query failed",
        /// The store did not answer within the configured bound.
        Timeout => "article repository timed out",
    }
}

/// Driven port for articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Published articles passing `filter`, newest first.
    async fn list_published(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleSummary>, ArticleRepositoryError>;

    /// Atomically add one view to a published article and return it.
    ///
    /// Returns `None` when the article is missing or unpublished; in that
    /// case nothing is written.
    async fn record_view(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Number of published articles.
    async fn count_published(&self) -> Result<i64, ArticleRepositoryError>;

    /// Number of articles regardless of publication state.
    async fn count_all(&self) -> Result<i64, ArticleRepositoryError>;

    /// Published articles ordered by views, highest first.
    async fn most_viewed(&self, limit: usize)
    -> Result<Vec<PopularArticle>, ArticleRepositoryError>;

    /// Insert a new article.
    async fn insert(
        &self,
        id: &ArticleId,
        draft: &ArticleDraft,
        created_at: DateTime<Utc>,
    ) -> Result<(), ArticleRepositoryError>;
}

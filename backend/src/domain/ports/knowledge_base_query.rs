//! Driving port for public knowledge-base reads.

use async_trait::async_trait;

use crate::domain::{Article, ArticleFilter, ArticleId, ArticleSummary, Error};

/// Domain use-case port for browsing articles. No caller is required.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnowledgeBaseQuery: Send + Sync {
    /// Published articles matching `filter`, newest first.
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<ArticleSummary>, Error>;

    /// Read a published article, counting the view.
    async fn get_article(&self, id: ArticleId) -> Result<Article, Error>;
}

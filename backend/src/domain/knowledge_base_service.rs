//! Knowledge-base service: published-only listing and view-counted reads.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{ArticleRepository, KnowledgeBaseQuery};
use crate::domain::service_error_mapping::map_article_repository_error;
use crate::domain::{Article, ArticleFilter, ArticleId, ArticleSummary, Error};

/// Public knowledge-base reads.
#[derive(Clone)]
pub struct KnowledgeBaseService<A> {
    articles: Arc<A>,
}

impl<A> KnowledgeBaseService<A> {
    /// Create the service over an article repository.
    pub fn new(articles: Arc<A>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl<A> KnowledgeBaseQuery for KnowledgeBaseService<A>
where
    A: ArticleRepository,
{
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<ArticleSummary>, Error> {
        self.articles
            .list_published(filter)
            .await
            .map_err(map_article_repository_error)
    }

    async fn get_article(&self, id: ArticleId) -> Result<Article, Error> {
        // The increment is the read: a single atomic store operation limited
        // to published rows.
        let article = self
            .articles
            .record_view(&id)
            .await
            .map_err(map_article_repository_error)?
            .ok_or_else(|| Error::not_found("Article not found"))?;
        debug!(article_id = %id, views = article.views, "article viewed");
        Ok(article)
    }
}

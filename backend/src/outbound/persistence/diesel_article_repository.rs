//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticleSummary, PopularArticle,
};
use crate::outbound::deadline::bounded;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ArticleRow, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{article_from_row, contains_pattern};
use super::schema::{articles, users};

/// Diesel-backed implementation of the article repository port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ArticleRepositoryError {
    map_basic_pool_error(error, ArticleRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ArticleRepositoryError {
    map_basic_diesel_error(
        error,
        ArticleRepositoryError::query,
        ArticleRepositoryError::connection,
    )
}

fn to_article(row: ArticleRow, author: &str) -> Result<Article, ArticleRepositoryError> {
    article_from_row(row, author).map_err(ArticleRepositoryError::query)
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn list_published(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleSummary>, ArticleRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let mut query = articles::table
                    .inner_join(users::table)
                    .filter(articles::published.eq(true))
                    .select((ArticleRow::as_select(), users::name))
                    .order((articles::created_at.desc(), articles::id.desc()))
                    .into_boxed();
                if let Some(category) = filter.category() {
                    query = query.filter(articles::category.eq(category.to_owned()));
                }
                if let Some(search) = filter.search() {
                    let pattern = contains_pattern(search);
                    query = query.filter(
                        articles::title
                            .ilike(pattern.clone())
                            .or(articles::content.ilike(pattern.clone()))
                            .or(articles::tags.ilike(pattern)),
                    );
                }

                let rows: Vec<(ArticleRow, String)> =
                    query.load(&mut conn).await.map_err(map_diesel_error)?;
                rows.into_iter()
                    .map(|(row, author)| to_article(row, &author).map(ArticleSummary::from))
                    .collect()
            },
            ArticleRepositoryError::timeout,
        )
        .await
    }

    async fn record_view(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let updated = diesel::update(
                    articles::table
                        .filter(articles::id.eq(id.as_uuid()))
                        .filter(articles::published.eq(true)),
                )
                .set(articles::views.eq(articles::views + 1_i64))
                .returning(ArticleRow::as_returning())
                .get_result::<ArticleRow>(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
                let Some(row) = updated else {
                    return Ok(None);
                };

                let author: String = users::table
                    .find(row.author_id)
                    .select(users::name)
                    .first(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                to_article(row, &author).map(Some)
            },
            ArticleRepositoryError::timeout,
        )
        .await
    }

    async fn count_published(&self) -> Result<i64, ArticleRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                articles::table
                    .filter(articles::published.eq(true))
                    .count()
                    .get_result::<i64>(&mut conn)
                    .await
                    .map_err(map_diesel_error)
            },
            ArticleRepositoryError::timeout,
        )
        .await
    }

    async fn count_all(&self) -> Result<i64, ArticleRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                articles::table
                    .count()
                    .get_result::<i64>(&mut conn)
                    .await
                    .map_err(map_diesel_error)
            },
            ArticleRepositoryError::timeout,
        )
        .await
    }

    async fn most_viewed(
        &self,
        limit: usize,
    ) -> Result<Vec<PopularArticle>, ArticleRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<(uuid::Uuid, String, i64)> = articles::table
                    .filter(articles::published.eq(true))
                    .order((articles::views.desc(), articles::created_at.desc()))
                    .limit(sql_limit(limit))
                    .select((articles::id, articles::title, articles::views))
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(rows
                    .into_iter()
                    .map(|(id, title, views)| PopularArticle {
                        id: ArticleId::from_uuid(id),
                        title,
                        views,
                    })
                    .collect())
            },
            ArticleRepositoryError::timeout,
        )
        .await
    }

    async fn insert(
        &self,
        id: &ArticleId,
        draft: &ArticleDraft,
        created_at: DateTime<Utc>,
    ) -> Result<(), ArticleRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let tags = draft.joined_tags();
                let row = NewArticleRow {
                    id: *id.as_uuid(),
                    title: &draft.title,
                    content: &draft.content,
                    category: &draft.category,
                    tags: &tags,
                    published: draft.published,
                    views: draft.views,
                    created_at,
                    updated_at: created_at,
                    author_id: *draft.author_id.as_uuid(),
                };
                diesel::insert_into(articles::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            },
            ArticleRepositoryError::timeout,
        )
        .await
    }
}

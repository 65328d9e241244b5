//! Public knowledge-base handlers.
//!
//! ```text
//! GET /api/v1/knowledge-base?search=vpn&category=Network
//! GET /api/v1/knowledge-base/{id}
//! ```
//!
//! Both endpoints are public; only published articles are ever returned.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Article, ArticleFilter, ArticleId, ArticleSummary, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_path_id;

/// Query string for article listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleListQuery {
    /// Case-insensitive substring matched against title, content and tags.
    pub search: Option<String>,
    /// Exact category name.
    pub category: Option<String>,
}

impl From<&ArticleListQuery> for ArticleFilter {
    fn from(query: &ArticleListQuery) -> Self {
        Self::new(query.search.as_deref(), query.category.as_deref())
    }
}

/// List published articles, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/knowledge-base",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "Matching published articles", body = [ArticleSummary]),
        (status = 503, description = "Service unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["knowledge-base"],
    operation_id = "listArticles",
    security([])
)]
#[get("/knowledge-base")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    query: web::Query<ArticleListQuery>,
) -> ApiResult<web::Json<Vec<ArticleSummary>>> {
    let filter = ArticleFilter::from(&*query);
    let articles = state.knowledge_base.list_articles(&filter).await?;
    Ok(web::Json(articles))
}

/// Read a published article. Every successful read counts as a view.
#[utoipa::path(
    get,
    path = "/api/v1/knowledge-base/{id}",
    params(("id" = String, Path, description = "Article identifier")),
    responses(
        (status = 200, description = "Article with its updated view count", body = Article),
        (status = 404, description = "Article not found or unpublished", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["knowledge-base"],
    operation_id = "getArticle",
    security([])
)]
#[get("/knowledge-base/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Article>> {
    let id: ArticleId = parse_path_id(&path, "Article not found")?;
    let article = state.knowledge_base.get_article(id).await?;
    Ok(web::Json(article))
}

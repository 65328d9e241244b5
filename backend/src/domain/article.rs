//! Knowledge-base articles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ArticleId, DisplayName, UserId};

/// Author name attached to article responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArticleAuthor {
    #[schema(value_type = String)]
    pub name: DisplayName,
}

/// Full article, including its raw content body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[schema(value_type = String)]
    pub id: ArticleId,
    pub title: String,
    /// Stored text, returned unmodified.
    pub content: String,
    pub category: String,
    /// Comma-joined tag list, e.g. `vpn,network,connection`.
    pub tags: String,
    pub published: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub author_id: UserId,
    pub author: ArticleAuthor,
}

/// Listing shape without the content body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    #[schema(value_type = String)]
    pub id: ArticleId,
    pub title: String,
    pub category: String,
    pub tags: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub author: ArticleAuthor,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            category: article.category,
            tags: article.tags,
            views: article.views,
            created_at: article.created_at,
            author: article.author,
        }
    }
}

/// Entry in the dashboard's most-viewed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PopularArticle {
    #[schema(value_type = String)]
    pub id: ArticleId,
    pub title: String,
    pub views: i64,
}

/// New article, as inserted by demo seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub published: bool,
    /// Starting view count.
    pub views: i64,
    pub author_id: UserId,
}

impl ArticleDraft {
    /// Tags in their stored comma-joined form.
    #[must_use]
    pub fn joined_tags(&self) -> String {
        self.tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Published-article listing filter.
///
/// Empty values are treated as absent. Anything else is used verbatim,
/// surrounding whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    search: Option<String>,
    category: Option<String>,
}

impl ArticleFilter {
    /// Build a filter from optional query parameters.
    #[must_use]
    pub fn new(search: Option<&str>, category: Option<&str>) -> Self {
        let clean = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_owned);
        Self {
            search: clean(search),
            category: clean(category),
        }
    }

    /// Case-insensitive substring to look for in title, content or tags.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Exact category to match.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether `article` passes this filter. Unpublished articles never do.
    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        if !article.published {
            return false;
        }
        if let Some(category) = self.category() {
            if article.category != category {
                return false;
            }
        }
        match self.search() {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [&article.title, &article.content, &article.tags]
                    .into_iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn vpn_article() -> Article {
        let now = Utc::now();
        Article {
            id: ArticleId::random(),
            title: "Connecting from home".to_owned(),
            content: "Install the client first.".to_owned(),
            category: "Network".to_owned(),
            tags: "vpn,network,connection".to_owned(),
            published: true,
            views: 0,
            created_at: now,
            updated_at: now,
            author_id: UserId::random(),
            author: ArticleAuthor {
                name: DisplayName::new("IT Support").expect("name"),
            },
        }
    }

    #[rstest]
    #[case(Some("VPN"), None, true)]
    #[case(Some("client"), None, true)]
    #[case(Some("HOME"), None, true)]
    #[case(Some("printer"), None, false)]
    #[case(None, Some("Network"), true)]
    #[case(None, Some("network"), false)]
    #[case(Some("vpn"), Some("Account"), false)]
    #[case(Some(""), Some(""), true)]
    #[case(Some(" client"), None, true)]
    #[case(Some(" vpn"), None, false)]
    fn filter_matches(
        vpn_article: Article,
        #[case] search: Option<&str>,
        #[case] category: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(
            ArticleFilter::new(search, category).matches(&vpn_article),
            expected
        );
    }

    #[rstest]
    fn unpublished_articles_never_match(mut vpn_article: Article) {
        vpn_article.published = false;
        assert!(!ArticleFilter::default().matches(&vpn_article));
        assert!(!ArticleFilter::new(Some("vpn"), None).matches(&vpn_article));
    }

    #[rstest]
    fn draft_tags_are_comma_joined() {
        let draft = ArticleDraft {
            title: "t".to_owned(),
            content: "c".to_owned(),
            category: "Network".to_owned(),
            tags: vec!["vpn".to_owned(), " network ".to_owned(), String::new()],
            published: true,
            views: 0,
            author_id: UserId::random(),
        };
        assert_eq!(draft.joined_tags(), "vpn,network");
    }
}

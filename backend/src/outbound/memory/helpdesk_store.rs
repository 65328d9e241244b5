//! Mutex-guarded relational state implementing the repository ports.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, TicketRepository, TicketRepositoryError,
    TicketScope, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Article, ArticleAuthor, ArticleDraft, ArticleFilter, ArticleId, ArticleSummary, Attachment,
    Comment, CommentAuthor, CommentWithAuthor, NewUser, PopularArticle, RecentTicket, Requester,
    Ticket, TicketDetails, TicketId, TicketStatus, TicketStatusCounts, TicketWithRequester, User,
    UserId,
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    tickets: HashMap<TicketId, Ticket>,
    /// Insertion order doubles as the tie-break for equal timestamps.
    comments: Vec<Comment>,
    attachments: Vec<Attachment>,
    articles: HashMap<ArticleId, Article>,
}

impl State {
    fn requester(&self, user_id: &UserId) -> Result<Requester, String> {
        self.users
            .get(user_id)
            .map(|user| Requester {
                name: user.name.clone(),
                email: user.email.clone(),
            })
            .ok_or_else(|| format!("user {user_id} referenced by ticket is missing"))
    }

    fn tickets_newest_first(&self) -> Vec<&Ticket> {
        let mut tickets: Vec<&Ticket> = self.tickets.values().collect();
        tickets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        tickets
    }

    fn details(&self, ticket: &Ticket) -> Result<TicketDetails, String> {
        let mut comments = self
            .comments
            .iter()
            .filter(|comment| comment.ticket_id == ticket.id)
            .map(|comment| {
                let author = self
                    .users
                    .get(&comment.user_id)
                    .ok_or_else(|| format!("comment author {} is missing", comment.user_id))?;
                Ok(CommentWithAuthor {
                    comment: comment.clone(),
                    user: CommentAuthor {
                        name: author.name.clone(),
                    },
                })
            })
            .collect::<Result<Vec<_>, String>>()?;
        comments.sort_by_key(|comment| comment.comment.created_at);

        let attachments = self
            .attachments
            .iter()
            .filter(|attachment| attachment.ticket_id == ticket.id)
            .cloned()
            .collect();

        Ok(TicketDetails {
            ticket: ticket.clone(),
            user: self.requester(&ticket.user_id)?,
            comments,
            attachments,
        })
    }
}

/// In-memory implementation of the user, ticket and article repositories.
#[derive(Debug, Default)]
pub struct InMemoryHelpdeskStore {
    state: Mutex<State>,
}

impl InMemoryHelpdeskStore {
    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    /// Change an article's publication flag. Returns whether it existed.
    ///
    /// Publishing is an editorial action outside the public knowledge-base
    /// surface; this hook lets demos and tests toggle visibility.
    pub fn set_published(&self, id: &ArticleId, published: bool) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        match state.articles.get_mut(id) {
            Some(article) => {
                article.published = published;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryHelpdeskStore {
    async fn upsert_by_email(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if let Some(existing) = state.users.values().find(|stored| stored.email == user.email) {
            return Ok(existing.clone());
        }
        let created = User {
            id: UserId::random(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn count(&self) -> Result<i64, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(i64::try_from(state.users.len()).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl TicketRepository for InMemoryHelpdeskStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut state = self.lock().map_err(TicketRepositoryError::query)?;
        if !state.users.contains_key(&ticket.user_id) {
            return Err(TicketRepositoryError::query(
                "referenced record does not exist",
            ));
        }
        state.tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn exists(&self, id: &TicketId) -> Result<bool, TicketRepositoryError> {
        let state = self.lock().map_err(TicketRepositoryError::query)?;
        Ok(state.tickets.contains_key(id))
    }

    async fn update_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<TicketWithRequester>, TicketRepositoryError> {
        let mut state = self.lock().map_err(TicketRepositoryError::query)?;
        let Some(ticket) = state.tickets.get_mut(id) else {
            return Ok(None);
        };
        ticket.status = status;
        ticket.updated_at = updated_at;
        let ticket = ticket.clone();
        let user = state
            .requester(&ticket.user_id)
            .map_err(TicketRepositoryError::query)?;
        Ok(Some(TicketWithRequester { ticket, user }))
    }

    async fn list_details(
        &self,
        scope: TicketScope,
    ) -> Result<Vec<TicketDetails>, TicketRepositoryError> {
        let state = self.lock().map_err(TicketRepositoryError::query)?;
        state
            .tickets_newest_first()
            .into_iter()
            .filter(|ticket| match scope {
                TicketScope::OwnedBy(owner) => ticket.user_id == owner,
                TicketScope::All => true,
            })
            .map(|ticket| state.details(ticket).map_err(TicketRepositoryError::query))
            .collect()
    }

    async fn insert_attachment(
        &self,
        attachment: &Attachment,
    ) -> Result<(), TicketRepositoryError> {
        let mut state = self.lock().map_err(TicketRepositoryError::query)?;
        if !state.tickets.contains_key(&attachment.ticket_id) {
            return Err(TicketRepositoryError::query(
                "referenced record does not exist",
            ));
        }
        if state
            .attachments
            .iter()
            .any(|stored| stored.filepath == attachment.filepath)
        {
            return Err(TicketRepositoryError::query("duplicate record"));
        }
        state.attachments.push(attachment.clone());
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), TicketRepositoryError> {
        let mut state = self.lock().map_err(TicketRepositoryError::query)?;
        if !state.tickets.contains_key(&comment.ticket_id)
            || !state.users.contains_key(&comment.user_id)
        {
            return Err(TicketRepositoryError::query(
                "referenced record does not exist",
            ));
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn status_counts(&self) -> Result<TicketStatusCounts, TicketRepositoryError> {
        let state = self.lock().map_err(TicketRepositoryError::query)?;
        let mut counts = TicketStatusCounts::default();
        for ticket in state.tickets.values() {
            counts.record(ticket.status, 1);
        }
        Ok(counts)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<RecentTicket>, TicketRepositoryError> {
        let state = self.lock().map_err(TicketRepositoryError::query)?;
        state
            .tickets_newest_first()
            .into_iter()
            .take(limit)
            .map(|ticket| {
                Ok(RecentTicket {
                    id: ticket.id,
                    title: ticket.title.clone(),
                    status: ticket.status,
                    priority: ticket.priority,
                    created_at: ticket.created_at,
                    user: state
                        .requester(&ticket.user_id)
                        .map_err(TicketRepositoryError::query)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryHelpdeskStore {
    async fn list_published(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleSummary>, ArticleRepositoryError> {
        let state = self.lock().map_err(ArticleRepositoryError::query)?;
        let mut matching: Vec<&Article> = state
            .articles
            .values()
            .filter(|article| filter.matches(article))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matching
            .into_iter()
            .cloned()
            .map(ArticleSummary::from)
            .collect())
    }

    async fn record_view(&self, id: &ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut state = self.lock().map_err(ArticleRepositoryError::query)?;
        match state.articles.get_mut(id) {
            Some(article) if article.published => {
                article.views += 1;
                Ok(Some(article.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn count_published(&self) -> Result<i64, ArticleRepositoryError> {
        let state = self.lock().map_err(ArticleRepositoryError::query)?;
        let published = state
            .articles
            .values()
            .filter(|article| article.published)
            .count();
        Ok(i64::try_from(published).unwrap_or(i64::MAX))
    }

    async fn count_all(&self) -> Result<i64, ArticleRepositoryError> {
        let state = self.lock().map_err(ArticleRepositoryError::query)?;
        Ok(i64::try_from(state.articles.len()).unwrap_or(i64::MAX))
    }

    async fn most_viewed(
        &self,
        limit: usize,
    ) -> Result<Vec<PopularArticle>, ArticleRepositoryError> {
        let state = self.lock().map_err(ArticleRepositoryError::query)?;
        let mut published: Vec<&Article> = state
            .articles
            .values()
            .filter(|article| article.published)
            .collect();
        published.sort_by(|a, b| {
            b.views
                .cmp(&a.views)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(published
            .into_iter()
            .take(limit)
            .map(|article| PopularArticle {
                id: article.id,
                title: article.title.clone(),
                views: article.views,
            })
            .collect())
    }

    async fn insert(
        &self,
        id: &ArticleId,
        draft: &ArticleDraft,
        created_at: DateTime<Utc>,
    ) -> Result<(), ArticleRepositoryError> {
        let mut state = self.lock().map_err(ArticleRepositoryError::query)?;
        let author = state
            .users
            .get(&draft.author_id)
            .map(|user| ArticleAuthor {
                name: user.name.clone(),
            })
            .ok_or_else(|| ArticleRepositoryError::query("referenced record does not exist"))?;
        state.articles.insert(
            *id,
            Article {
                id: *id,
                title: draft.title.clone(),
                content: draft.content.clone(),
                category: draft.category.clone(),
                tags: draft.joined_tags(),
                published: draft.published,
                views: draft.views,
                created_at,
                updated_at: created_at,
                author_id: draft.author_id,
                author,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, EmailAddress, Role, TicketPriority};
    use rstest::{fixture, rstest};

    fn new_user(email: &str, name: &str, role: Role) -> NewUser {
        NewUser {
            email: EmailAddress::new(email).expect("email"),
            name: DisplayName::new(name).expect("name"),
            role,
        }
    }

    #[fixture]
    fn store() -> InMemoryHelpdeskStore {
        InMemoryHelpdeskStore::default()
    }

    fn ticket(owner: UserId, created_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id: TicketId::random(),
            title: "Monitor flickers".to_owned(),
            description: "Second screen".to_owned(),
            status: TicketStatus::Open,
            priority: TicketPriority::Low,
            created_at,
            updated_at: created_at,
            user_id: owner,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_keeps_the_first_name_and_role(store: InMemoryHelpdeskStore) {
        let first = store
            .upsert_by_email(&new_user("a@company.com", "First", Role::Admin))
            .await
            .expect("insert");
        let second = store
            .upsert_by_email(&new_user("a@company.com", "Second", Role::User))
            .await
            .expect("upsert");

        assert_eq!(first, second);
        assert_eq!(UserRepository::count(&store).await.expect("count"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn tickets_require_an_existing_owner(store: InMemoryHelpdeskStore) {
        let err = TicketRepository::insert(&store, &ticket(UserId::random(), Utc::now()))
            .await
            .expect_err("missing owner");
        assert!(matches!(err, TicketRepositoryError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn listings_are_newest_first_and_scoped(store: InMemoryHelpdeskStore) {
        let owner = store
            .upsert_by_email(&new_user("o@company.com", "Owner", Role::User))
            .await
            .expect("owner");
        let other = store
            .upsert_by_email(&new_user("x@company.com", "Other", Role::User))
            .await
            .expect("other");
        let now = Utc::now();
        let older = ticket(owner.id, now - chrono::Duration::minutes(5));
        let newer = ticket(owner.id, now);
        let foreign = ticket(other.id, now);
        for t in [&older, &newer, &foreign] {
            TicketRepository::insert(&store, t).await.expect("insert");
        }

        let own = store
            .list_details(TicketScope::OwnedBy(owner.id))
            .await
            .expect("own");
        let ids: Vec<TicketId> = own.iter().map(|details| details.ticket.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        let all = store.list_details(TicketScope::All).await.expect("all");
        assert_eq!(all.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn views_only_increment_for_published_articles(store: InMemoryHelpdeskStore) {
        let author = store
            .upsert_by_email(&new_user("kb@company.com", "KB", Role::Admin))
            .await
            .expect("author");
        let id = ArticleId::random();
        let draft = ArticleDraft {
            title: "Draft".to_owned(),
            content: "Body".to_owned(),
            category: "Misc".to_owned(),
            tags: Vec::new(),
            published: false,
            views: 0,
            author_id: author.id,
        };
        ArticleRepository::insert(&store, &id, &draft, Utc::now())
            .await
            .expect("insert");

        assert!(store.record_view(&id).await.expect("view").is_none());
        assert!(store.set_published(&id, true));
        let viewed = store.record_view(&id).await.expect("view").expect("article");
        assert_eq!(viewed.views, 1);
    }
}

//! PostgreSQL-backed `TicketRepository` implementation using Diesel ORM.
//!
//! Listings load tickets joined with their requester, then fetch comments and
//! attachments for the whole page with one `IN` query each.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{TicketRepository, TicketRepositoryError, TicketScope};
use crate::domain::{
    Attachment, Comment, CommentAuthor, CommentId, CommentWithAuthor, DisplayName, RecentTicket,
    Ticket, TicketDetails, TicketId, TicketStatus, TicketStatusCounts, TicketWithRequester, UserId,
};
use crate::outbound::deadline::bounded;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    AttachmentRow, CommentRow, NewAttachmentRow, NewTicketRow, RequesterRow, TicketRow,
};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{attachment_from_row, requester_from_row, ticket_from_row};
use super::schema::{attachments, comments, tickets, users};

/// Diesel-backed implementation of the ticket repository port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TicketRepositoryError {
    map_basic_pool_error(error, TicketRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TicketRepositoryError {
    map_basic_diesel_error(
        error,
        TicketRepositoryError::query,
        TicketRepositoryError::connection,
    )
}

fn ticket_with_requester(
    row: TicketRow,
    requester: RequesterRow,
) -> Result<TicketWithRequester, TicketRepositoryError> {
    Ok(TicketWithRequester {
        ticket: ticket_from_row(row).map_err(TicketRepositoryError::query)?,
        user: requester_from_row(requester).map_err(TicketRepositoryError::query)?,
    })
}

type TicketJoinRow = (TicketRow, RequesterRow);

async fn load_comments(
    conn: &mut AsyncPgConnection,
    ticket_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<CommentWithAuthor>>, TicketRepositoryError> {
    let rows: Vec<(CommentRow, String)> = comments::table
        .inner_join(users::table)
        .filter(comments::ticket_id.eq_any(ticket_ids))
        .order((comments::created_at.asc(), comments::id.asc()))
        .select((CommentRow::as_select(), users::name))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut grouped: HashMap<Uuid, Vec<CommentWithAuthor>> = HashMap::new();
    for (row, author) in rows {
        let name = DisplayName::new(&author)
            .map_err(|err| TicketRepositoryError::query(format!("stored name invalid: {err}")))?;
        grouped
            .entry(row.ticket_id)
            .or_default()
            .push(CommentWithAuthor {
                comment: Comment {
                    id: CommentId::from_uuid(row.id),
                    content: row.content,
                    created_at: row.created_at,
                    ticket_id: TicketId::from_uuid(row.ticket_id),
                    user_id: UserId::from_uuid(row.user_id),
                },
                user: CommentAuthor { name },
            });
    }
    Ok(grouped)
}

async fn load_attachments(
    conn: &mut AsyncPgConnection,
    ticket_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Attachment>>, TicketRepositoryError> {
    let rows: Vec<AttachmentRow> = attachments::table
        .filter(attachments::ticket_id.eq_any(ticket_ids))
        .order((attachments::created_at.asc(), attachments::id.asc()))
        .select(AttachmentRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut grouped: HashMap<Uuid, Vec<Attachment>> = HashMap::new();
    for row in rows {
        let ticket_id = row.ticket_id;
        let attachment = attachment_from_row(row).map_err(TicketRepositoryError::query)?;
        grouped.entry(ticket_id).or_default().push(attachment);
    }
    Ok(grouped)
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = NewTicketRow {
                    id: *ticket.id.as_uuid(),
                    title: &ticket.title,
                    description: &ticket.description,
                    status: ticket.status.as_str(),
                    priority: ticket.priority.as_str(),
                    created_at: ticket.created_at,
                    updated_at: ticket.updated_at,
                    user_id: *ticket.user_id.as_uuid(),
                };
                diesel::insert_into(tickets::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            },
            TicketRepositoryError::timeout,
        )
        .await
    }

    async fn exists(&self, id: &TicketId) -> Result<bool, TicketRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                diesel::select(diesel::dsl::exists(tickets::table.find(id.as_uuid())))
                    .get_result::<bool>(&mut conn)
                    .await
                    .map_err(map_diesel_error)
            },
            TicketRepositoryError::timeout,
        )
        .await
    }

    async fn update_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<TicketWithRequester>, TicketRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let updated = diesel::update(tickets::table.find(id.as_uuid()))
                    .set((
                        tickets::status.eq(status.as_str()),
                        tickets::updated_at.eq(updated_at),
                    ))
                    .returning(TicketRow::as_returning())
                    .get_result::<TicketRow>(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                let Some(row) = updated else {
                    return Ok(None);
                };

                let requester = users::table
                    .find(row.user_id)
                    .select((users::name, users::email))
                    .first::<RequesterRow>(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                ticket_with_requester(row, requester).map(Some)
            },
            TicketRepositoryError::timeout,
        )
        .await
    }

    async fn list_details(
        &self,
        scope: TicketScope,
    ) -> Result<Vec<TicketDetails>, TicketRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let mut query = tickets::table
                    .inner_join(users::table)
                    .select((TicketRow::as_select(), (users::name, users::email)))
                    .order((tickets::created_at.desc(), tickets::id.desc()))
                    .into_boxed();
                if let TicketScope::OwnedBy(owner) = scope {
                    query = query.filter(tickets::user_id.eq(*owner.as_uuid()));
                }
                let rows: Vec<TicketJoinRow> =
                    query.load(&mut conn).await.map_err(map_diesel_error)?;

                let ids: Vec<Uuid> = rows.iter().map(|(ticket, _)| ticket.id).collect();
                let mut comments_by_ticket = load_comments(&mut conn, &ids).await?;
                let mut attachments_by_ticket = load_attachments(&mut conn, &ids).await?;

                rows.into_iter()
                    .map(|(row, requester)| -> Result<TicketDetails, TicketRepositoryError> {
                        let ticket_id = row.id;
                        let TicketWithRequester { ticket, user } =
                            ticket_with_requester(row, requester)?;
                        Ok(TicketDetails {
                            ticket,
                            user,
                            comments: comments_by_ticket.remove(&ticket_id).unwrap_or_default(),
                            attachments: attachments_by_ticket
                                .remove(&ticket_id)
                                .unwrap_or_default(),
                        })
                    })
                    .collect()
            },
            TicketRepositoryError::timeout,
        )
        .await
    }

    async fn insert_attachment(
        &self,
        attachment: &Attachment,
    ) -> Result<(), TicketRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = NewAttachmentRow {
                    id: *attachment.id.as_uuid(),
                    filename: &attachment.filename,
                    filepath: attachment.filepath.as_ref(),
                    mimetype: &attachment.mimetype,
                    size: attachment.size,
                    ticket_id: *attachment.ticket_id.as_uuid(),
                };
                diesel::insert_into(attachments::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            },
            TicketRepositoryError::timeout,
        )
        .await
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), TicketRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = CommentRow {
                    id: *comment.id.as_uuid(),
                    content: comment.content.clone(),
                    created_at: comment.created_at,
                    ticket_id: *comment.ticket_id.as_uuid(),
                    user_id: *comment.user_id.as_uuid(),
                };
                diesel::insert_into(comments::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            },
            TicketRepositoryError::timeout,
        )
        .await
    }

    async fn status_counts(&self) -> Result<TicketStatusCounts, TicketRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<(String, i64)> = tickets::table
                    .group_by(tickets::status)
                    .select((tickets::status, count_star()))
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                let mut counts = TicketStatusCounts::default();
                for (raw, count) in rows {
                    let status: TicketStatus = raw.parse().map_err(|err| {
                        TicketRepositoryError::query(format!("stored status invalid: {err}"))
                    })?;
                    counts.record(status, count);
                }
                Ok(counts)
            },
            TicketRepositoryError::timeout,
        )
        .await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<RecentTicket>, TicketRepositoryError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<TicketJoinRow> = tickets::table
                    .inner_join(users::table)
                    .select((TicketRow::as_select(), (users::name, users::email)))
                    .order((tickets::created_at.desc(), tickets::id.desc()))
                    .limit(i64::try_from(limit).unwrap_or(i64::MAX))
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                rows.into_iter()
                    .map(|(row, requester)| -> Result<RecentTicket, TicketRepositoryError> {
                        let TicketWithRequester { ticket, user } =
                            ticket_with_requester(row, requester)?;
                        Ok(RecentTicket {
                            id: ticket.id,
                            title: ticket.title,
                            status: ticket.status,
                            priority: ticket.priority,
                            created_at: ticket.created_at,
                            user,
                        })
                    })
                    .collect()
            },
            TicketRepositoryError::timeout,
        )
        .await
    }
}

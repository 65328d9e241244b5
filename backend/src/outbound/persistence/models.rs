//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! reach the domain. Conversions into domain types validate stored strings and
//! report malformed rows as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{articles, attachments, comments, tickets, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

/// Requester columns joined onto ticket queries.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct RequesterRow {
    pub name: String,
    pub email: String,
}

/// Row struct for reading from the tickets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
}

/// Insertable struct for creating ticket records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tickets)]
pub(crate) struct NewTicketRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub priority: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
}

/// Row struct for reading from the attachments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttachmentRow {
    pub id: Uuid,
    pub filename: String,
    pub filepath: String,
    pub mimetype: String,
    pub size: i64,
    pub ticket_id: Uuid,
}

/// Insertable struct for creating attachment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attachments)]
pub(crate) struct NewAttachmentRow<'a> {
    pub id: Uuid,
    pub filename: &'a str,
    pub filepath: &'a str,
    pub mimetype: &'a str,
    pub size: i64,
    pub ticket_id: Uuid,
}

/// Row struct for reading from the articles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
    pub published: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
}

/// Insertable struct for creating article records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub category: &'a str,
    pub tags: &'a str,
    pub published: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
}

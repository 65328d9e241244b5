//! Conversions from Diesel rows into validated domain types.
//!
//! Failures return a message; each repository wraps it in its own query
//! error so malformed rows never reach the domain.

use crate::domain::{
    Article, ArticleAuthor, ArticleId, Attachment, AttachmentId, DisplayName, EmailAddress,
    Requester, StorageKey, Ticket, TicketId, User, UserId,
};

use super::models::{ArticleRow, AttachmentRow, RequesterRow, TicketRow, UserRow};

fn display_name(raw: &str) -> Result<DisplayName, String> {
    DisplayName::new(raw).map_err(|err| format!("stored name invalid: {err}"))
}

fn email(raw: &str) -> Result<EmailAddress, String> {
    EmailAddress::new(raw).map_err(|err| format!("stored email invalid: {err}"))
}

pub(crate) fn user_from_row(row: UserRow) -> Result<User, String> {
    Ok(User {
        id: UserId::from_uuid(row.id),
        email: email(&row.email)?,
        name: display_name(&row.name)?,
        role: row
            .role
            .parse()
            .map_err(|err| format!("stored role invalid: {err}"))?,
    })
}

pub(crate) fn requester_from_row(row: RequesterRow) -> Result<Requester, String> {
    Ok(Requester {
        name: display_name(&row.name)?,
        email: email(&row.email)?,
    })
}

pub(crate) fn ticket_from_row(row: TicketRow) -> Result<Ticket, String> {
    Ok(Ticket {
        id: TicketId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        status: row
            .status
            .parse()
            .map_err(|err| format!("stored status invalid: {err}"))?,
        priority: row
            .priority
            .parse()
            .map_err(|err| format!("stored priority invalid: {err}"))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
        user_id: UserId::from_uuid(row.user_id),
    })
}

pub(crate) fn attachment_from_row(row: AttachmentRow) -> Result<Attachment, String> {
    Ok(Attachment {
        id: AttachmentId::from_uuid(row.id),
        filename: row.filename,
        filepath: StorageKey::parse(&row.filepath)
            .map_err(|err| format!("stored attachment key invalid: {err}"))?,
        mimetype: row.mimetype,
        size: row.size,
        ticket_id: TicketId::from_uuid(row.ticket_id),
    })
}

pub(crate) fn article_from_row(row: ArticleRow, author_name: &str) -> Result<Article, String> {
    Ok(Article {
        id: ArticleId::from_uuid(row.id),
        title: row.title,
        content: row.content,
        category: row.category,
        tags: row.tags,
        published: row.published,
        views: row.views,
        created_at: row.created_at,
        updated_at: row.updated_at,
        author_id: UserId::from_uuid(row.author_id),
        author: ArticleAuthor {
            name: display_name(author_name)?,
        },
    })
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

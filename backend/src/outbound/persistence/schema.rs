//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. `diesel
//! print-schema` against a migrated database regenerates them.

diesel::table! {
    /// Help-desk users. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        /// `USER` or `ADMIN`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets.
    tickets (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        /// `OPEN`, `IN_PROGRESS`, `RESOLVED` or `CLOSED`.
        status -> Varchar,
        /// `LOW`, `MEDIUM`, `HIGH` or `URGENT`.
        priority -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        user_id -> Uuid,
    }
}

diesel::table! {
    /// Replies on tickets.
    comments (id) {
        id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
        ticket_id -> Uuid,
        user_id -> Uuid,
    }
}

diesel::table! {
    /// Files uploaded with a ticket.
    attachments (id) {
        id -> Uuid,
        /// Original filename.
        filename -> Varchar,
        /// Storage key inside the uploads directory.
        filepath -> Varchar,
        mimetype -> Varchar,
        size -> Int8,
        ticket_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Knowledge-base articles.
    articles (id) {
        id -> Uuid,
        title -> Varchar,
        content -> Text,
        category -> Varchar,
        /// Comma-joined tags.
        tags -> Varchar,
        published -> Bool,
        views -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        author_id -> Uuid,
    }
}

diesel::joinable!(tickets -> users (user_id));
diesel::joinable!(comments -> tickets (ticket_id));
diesel::joinable!(comments -> users (user_id));
diesel::joinable!(attachments -> tickets (ticket_id));
diesel::joinable!(articles -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, tickets, comments, attachments, articles);

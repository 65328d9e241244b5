//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod knowledge_base;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod uploads;
pub mod users;
mod validation;

use actix_web::web;

pub use error::ApiResult;

use validation::malformed_body_error;

/// Register every `/api/v1` handler on `cfg`.
///
/// Callers wrap the scope with session middleware and provide
/// [`state::HttpState`] as app data. JSON bodies that fail to deserialize
/// are answered with the usual error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use helpdesk::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| actix_web::Error::from(malformed_body_error(err))),
    )
    .service(users::sign_in)
    .service(users::sign_out)
    .service(users::current_caller)
    .service(tickets::create_ticket)
    .service(tickets::list_own_tickets)
    .service(tickets::add_comment)
    .service(admin::list_all_tickets)
    .service(admin::update_ticket_status)
    .service(admin::dashboard)
    .service(knowledge_base::list_articles)
    .service(knowledge_base::get_article)
    .service(uploads::download_attachment);
}

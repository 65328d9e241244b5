//! HTTP server assembly for the help-desk binary.
//!
//! The `/api/v1` scope sits behind the cookie session; health probes and the
//! debug-only Swagger UI do not.

mod config;
mod session_settings;
mod state_builders;

pub use config::{AppConfig, ServerConfig};
pub use session_settings::{BuildMode, session_settings};

use session_settings::SessionSettings;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use helpdesk::Trace;
#[cfg(debug_assertions)]
use helpdesk::doc::ApiDoc;
use helpdesk::inbound::http::configure_api;
use helpdesk::inbound::http::health::{HealthState, live, ready};
use helpdesk::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Everything one worker needs to build its `App`.
#[derive(Clone)]
struct Workers {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

impl Workers {
    fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let api = web::scope("/api/v1")
            .wrap(self.session.middleware())
            .configure(configure_api);

        let app = App::new()
            .app_data(self.health_state.clone())
            .app_data(self.http_state.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    }
}

/// Bind the help-desk HTTP server.
///
/// Wires the adapters selected by `config`, seeds demo data when enabled and
/// flips `health_state` to ready once the listener is bound. The returned
/// [`Server`] must be awaited to serve requests.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the uploads directory cannot be opened,
/// seeding fails, or binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config).await?;
    let workers = Workers {
        health_state: health_state.clone(),
        http_state,
        session: config.session,
    };

    let server = HttpServer::new(move || workers.app())
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

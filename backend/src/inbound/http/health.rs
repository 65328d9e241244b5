//! Liveness and readiness probes.
//!
//! The server moves through three phases: starting (live, not ready),
//! serving (live and ready) and draining (live, no longer ready). Draining
//! is terminal.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpResponse, HttpResponseBuilder, get, web};
use tracing::debug;

const STARTING: u8 = 0;
const SERVING: u8 = 1;
const DRAINING: u8 = 2;

/// Probe state shared between the bootstrap code and the probe handlers.
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            phase: AtomicU8::new(STARTING),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting traffic. Has no effect once draining.
    pub fn mark_ready(&self) {
        if let Err(phase) =
            self.phase
                .compare_exchange(STARTING, SERVING, Ordering::AcqRel, Ordering::Acquire)
        {
            debug!(phase, "readiness left unchanged");
        }
    }

    /// Withdraw readiness ahead of shutdown.
    pub fn mark_draining(&self) {
        self.phase.store(DRAINING, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.phase.load(Ordering::Acquire) == SERVING
    }

    pub fn is_draining(&self) -> bool {
        self.phase.load(Ordering::Acquire) == DRAINING
    }
}

fn probe(ok: bool) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    no_store(&mut response).finish()
}

fn no_store(builder: &mut HttpResponseBuilder) -> &mut HttpResponseBuilder {
    builder.insert_header(CacheControl(vec![CacheDirective::NoStore]))
}

/// 200 while serving, 503 while starting or draining.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Accepting help-desk traffic"),
        (status = 503, description = "Starting up or draining")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready())
}

/// 200 for as long as the process runs.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Process is alive"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    probe(true)
}

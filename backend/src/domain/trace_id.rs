//! Correlation identifier carried by every help-desk request.
//!
//! The id sits in Tokio task-local storage: error payloads and log lines pick
//! it up via [`TraceId::current`] without it being passed down through the
//! services. Spawned tasks do not inherit it; wrap them in
//! [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request across logs, error bodies and the
/// `trace-id` response header.
///
/// ```
/// use helpdesk::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id = TraceId::generate();
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept an id supplied by a caller or proxy.
    ///
    /// Surrounding whitespace is ignored. Anything that is not a UUID, and
    /// the nil UUID, is refused so the request gets a fresh id instead.
    #[must_use]
    pub fn from_header(raw: &str) -> Option<Self> {
        match raw.trim().parse::<Self>() {
            Ok(id) if !id.0.is_nil() => Some(id),
            _ => None,
        }
    }

    /// Id bound to the running task, if the request is traced.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

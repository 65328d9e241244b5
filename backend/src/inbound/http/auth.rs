//! Caller resolution for protected handlers.
//!
//! The session only stores a user id; every protected request looks the user
//! up so role changes and deleted accounts take effect immediately.

use tracing::warn;

use crate::domain::{Caller, Error};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Resolve the signed-in [`Caller`] or fail with `401 Unauthorized`.
///
/// A session naming a user that no longer exists is purged.
pub async fn require_caller(state: &HttpState, session: &SessionContext) -> ApiResult<Caller> {
    let user_id = session.require_user_id()?;
    match state.identity.resolve_caller(&user_id).await? {
        Some(caller) => Ok(caller),
        None => {
            warn!(%user_id, "session references unknown user");
            session.purge();
            Err(Error::unauthorized("login required"))
        }
    }
}

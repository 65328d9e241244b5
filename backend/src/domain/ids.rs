//! UUID-backed identifiers for help-desk entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be a valid UUID")]
pub struct IdParseError {
    kind: &'static str,
}

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its string form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdParseError> {
                raw.as_ref().parse()
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| IdParseError { kind: $kind })
            }
        }
    };
}

define_uuid_id!(
    /// Stable user identifier.
    UserId,
    "user"
);
define_uuid_id!(
    /// Support ticket identifier.
    TicketId,
    "ticket"
);
define_uuid_id!(
    /// Ticket comment identifier.
    CommentId,
    "comment"
);
define_uuid_id!(
    /// Ticket attachment identifier.
    AttachmentId,
    "attachment"
);
define_uuid_id!(
    /// Knowledge-base article identifier.
    ArticleId,
    "article"
);

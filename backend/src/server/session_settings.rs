//! Session cookie settings derived from [`AppConfig`].
//!
//! Debug builds tolerate missing toggles and fall back to a generated key.
//! Release builds insist on a readable key of at least 64 bytes.

use std::path::PathBuf;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use super::config::AppConfig;

const SESSION_KEY_MIN_LEN: usize = 64;
const SESSION_COOKIE_NAME: &str = "helpdesk_session";
const SESSION_TTL_HOURS: i64 = 8;
const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode used when validating session settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub const fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie session settings.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Private, HTTP-only cookie session lasting one working day.
    pub(crate) fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("invalid session same-site policy '{value}'; expected {expected}")]
    InvalidSameSite {
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("same-site None requires secure session cookies")]
    InsecureSameSiteNone,
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Derive session settings from the loaded configuration.
///
/// # Errors
///
/// Returns [`SessionConfigError`] when a release build is misconfigured or
/// the key file cannot be used.
pub fn session_settings(
    config: &AppConfig,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if config.session_allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let cookie_secure = config.session_cookie_secure;
    let same_site = same_site(config.session_same_site.as_deref(), mode, cookie_secure)?;
    let key = session_key(config.session_key_file(), mode, config.session_allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = value else {
        return Ok(if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        });
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("same-site None without secure cookies; browsers may reject the session");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
            expected: SAME_SITE_EXPECTED,
        }),
    }
}

fn session_key(
    path: PathBuf,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn config() -> AppConfig {
        AppConfig {
            bind_addr: None,
            database_url: None,
            db_pool_size: None,
            uploads_dir: None,
            store_timeout_ms: None,
            max_upload_bytes: None,
            seed_demo: false,
            session_key_file: Some(PathBuf::from("/nonexistent/helpdesk/session_key")),
            session_cookie_secure: true,
            session_same_site: None,
            session_allow_ephemeral: false,
        }
    }

    fn key_file(dir: &TempDir, len: usize) -> PathBuf {
        let path = dir.path().join("session_key");
        std::fs::write(&path, vec![b'k'; len]).expect("write key");
        path
    }

    #[rstest]
    fn debug_build_generates_a_key_when_file_missing(config: AppConfig) {
        let settings = session_settings(&config, BuildMode::Debug).expect("debug settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn release_build_requires_the_key_file(config: AppConfig) {
        let err = session_settings(&config, BuildMode::Release)
            .err()
            .expect("missing key must fail");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn release_build_rejects_short_keys(mut config: AppConfig) {
        let dir = TempDir::new().expect("temp dir");
        config.session_key_file = Some(key_file(&dir, 16));

        let err = session_settings(&config, BuildMode::Release)
            .err()
            .expect("short key must fail");
        assert!(matches!(
            err,
            SessionConfigError::KeyTooShort {
                length: 16,
                min_len: 64,
                ..
            }
        ));
    }

    #[rstest]
    fn release_build_accepts_long_keys(mut config: AppConfig) {
        let dir = TempDir::new().expect("temp dir");
        config.session_key_file = Some(key_file(&dir, 64));

        let settings = session_settings(&config, BuildMode::Release).expect("valid settings");
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    fn release_build_refuses_ephemeral_keys(mut config: AppConfig) {
        config.session_allow_ephemeral = true;
        let err = session_settings(&config, BuildMode::Release)
            .err()
            .expect("ephemeral must fail");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    #[case(BuildMode::Release, false)]
    #[case(BuildMode::Debug, true)]
    fn same_site_none_needs_secure_cookies(
        mut config: AppConfig,
        #[case] mode: BuildMode,
        #[case] accepted: bool,
    ) {
        let dir = TempDir::new().expect("temp dir");
        config.session_key_file = Some(key_file(&dir, 64));
        config.session_cookie_secure = false;
        config.session_same_site = Some("None".to_owned());

        let result = session_settings(&config, mode);
        assert_eq!(result.is_ok(), accepted);
    }

    #[rstest]
    fn unknown_same_site_is_rejected(mut config: AppConfig) {
        config.session_same_site = Some("sometimes".to_owned());
        let err = session_settings(&config, BuildMode::Debug)
            .err()
            .expect("invalid policy must fail");
        assert!(matches!(err, SessionConfigError::InvalidSameSite { .. }));
    }

    #[actix_rt::test]
    async fn middleware_issues_private_http_only_cookies() {
        use actix_session::Session;
        use actix_web::{App, HttpResponse, test, web};

        let settings = SessionSettings {
            key: Key::generate(),
            cookie_secure: true,
            same_site: SameSite::Strict,
        };
        let app = test::init_service(App::new().wrap(settings.middleware()).route(
            "/",
            web::get().to(|session: Session| async move {
                session
                    .insert("user_id", "u-1")
                    .map(|()| HttpResponse::Ok().finish())
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("session cookie issued");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert!(!cookie.value().contains("u-1"), "private cookies are encrypted");
    }
}

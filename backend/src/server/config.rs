//! Application configuration loaded via OrthoConfig and the server settings
//! derived from it.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use helpdesk::domain::DEFAULT_MAX_UPLOAD_BYTES;
use helpdesk::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use super::session_settings::SessionSettings;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_UPLOADS_DIR: &str = "uploads";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_DB_POOL_SIZE: u32 = 10;
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";

/// Runtime configuration for the help-desk server.
///
/// Values are layered from configuration files, `HELPDESK_*` environment
/// variables and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HELPDESK")]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Directory holding uploaded attachments.
    pub uploads_dir: Option<PathBuf>,
    /// Upper bound for a single persistence or file-store call.
    pub store_timeout_ms: Option<u64>,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Seed demo users, articles and tickets on startup.
    #[ortho_config(default = false)]
    pub seed_demo: bool,
    /// File containing the cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Whether session cookies carry the `Secure` attribute.
    #[ortho_config(default = true)]
    pub session_cookie_secure: bool,
    /// `SameSite` policy for session cookies (`Strict`, `Lax` or `None`).
    pub session_same_site: Option<String>,
    /// Permit a generated session key when the key file cannot be read.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
}

impl AppConfig {
    /// Return the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the configured pool size.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE)
    }

    /// Return the uploads directory.
    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR))
    }

    /// Return the store timeout as a [`Duration`].
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms.unwrap_or(DEFAULT_STORE_TIMEOUT_MS))
    }

    /// Return the upload size cap.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Return the session key path.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }
}

/// Settings required to construct the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) uploads_dir: PathBuf,
    pub(crate) store_timeout: Duration,
    pub(crate) max_upload_bytes: usize,
    pub(crate) seed_demo: bool,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and a bind
    /// address. Storage defaults match [`AppConfig`].
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            seed_demo: false,
            db_pool: None,
        }
    }

    /// Apply the storage settings from the loaded application config.
    #[must_use]
    pub fn with_storage(mut self, config: &AppConfig) -> Self {
        self.uploads_dir = config.uploads_dir();
        self.store_timeout = config.store_timeout();
        self.max_upload_bytes = config.max_upload_bytes();
        self.seed_demo = config.seed_demo;
        self
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server runs against the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the attachments directory.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "used by server construction tests")
    )]
    #[must_use]
    pub fn with_uploads_dir(mut self, dir: PathBuf) -> Self {
        self.uploads_dir = dir;
        self
    }
}

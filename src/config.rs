use std::fmt;

use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use url::Url;

use crate::db::{DatabaseName, ResetError};

pub const DEFAULT_MAINTENANCE_DATABASE: &str = "postgres";

/// Raw, possibly partial settings as they arrive from flags and environment
///
/// Every field is optional; [`ResetConfig::resolve`] fills the gaps from
/// `database_url` and then from PostgreSQL client defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub target_database: Option<String>,
    pub maintenance_database: Option<String>,
}

/// Fully resolved settings for one reset run
#[derive(Clone)]
pub struct ResetConfig {
    connect_options: PgConnectOptions,
    pub target_database: DatabaseName,
    pub maintenance_database: DatabaseName,
}

impl ResetConfig {
    /// Precedence: explicit override, then the matching `database_url`
    /// component, then the client default. The URL path names the target.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ResetError> {
        let (mut options, url_database) = match overrides.database_url.as_deref() {
            Some(url) => {
                let parsed = Url::parse(url)
                    .map_err(|e| ResetError::Config(format!("invalid database URL: {e}")))?;
                let options = PgConnectOptions::from_url(&parsed)
                    .map_err(|e| ResetError::Config(format!("invalid database URL: {e}")))?;
                // sqlx seeds the database from PGDATABASE when the URL has none
                let database = if url_names_database(&parsed) {
                    options.get_database().map(str::to_owned)
                } else {
                    None
                };
                (options, database)
            }
            None => (PgConnectOptions::new(), None),
        };

        if let Some(host) = overrides.host.as_deref() {
            options = options.host(host);
        }
        if let Some(port) = overrides.port {
            options = options.port(port);
        }
        if let Some(username) = overrides.username.as_deref() {
            options = options.username(username);
        }
        if let Some(password) = overrides.password.as_deref() {
            options = options.password(password);
        }

        let target = overrides
            .target_database
            .or(url_database)
            .ok_or_else(|| {
                ResetError::Config(
                    "no target database: set RESET_TARGET_DB or put a database name in DATABASE_URL"
                        .to_string(),
                )
            })?;
        let target_database = DatabaseName::parse(target)?;

        let maintenance_database = DatabaseName::parse(
            overrides
                .maintenance_database
                .unwrap_or_else(|| DEFAULT_MAINTENANCE_DATABASE.to_string()),
        )?;

        if target_database == maintenance_database {
            return Err(ResetError::Config(format!(
                "target database '{target_database}' is also the maintenance database"
            )));
        }

        let connect_options = options.database(maintenance_database.as_str());

        Ok(Self {
            connect_options,
            target_database,
            maintenance_database,
        })
    }

    /// Options for the administrative session (points at the maintenance database)
    pub fn connect_options(&self) -> &PgConnectOptions {
        &self.connect_options
    }

    pub fn host(&self) -> &str {
        self.connect_options.get_host()
    }

    pub fn port(&self) -> u16 {
        self.connect_options.get_port()
    }

    pub fn username(&self) -> &str {
        self.connect_options.get_username()
    }
}

/// Whether the URL itself carries a database name, as its path or a `dbname` parameter
fn url_names_database(url: &Url) -> bool {
    let has_path = !url.path().trim_matches('/').is_empty();
    let has_param = url
        .query_pairs()
        .any(|(key, value)| key == "dbname" && !value.is_empty());
    has_path || has_param
}

// Hand-written so the password never ends up in a log line
impl fmt::Debug for ResetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetConfig")
            .field("host", &self.host())
            .field("port", &self.port())
            .field("username", &self.username())
            .field("target_database", &self.target_database.as_str())
            .field("maintenance_database", &self.maintenance_database.as_str())
            .finish_non_exhaustive()
    }
}

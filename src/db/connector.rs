use sqlx::{Connection, PgConnection};
use tracing::{debug, info, instrument};

use crate::config::ResetConfig;
use crate::db::ResetError;

/// The single administrative session a reset runs on
///
/// Outside an explicit transaction every statement on a `PgConnection`
/// commits on its own, which is what `CREATE DATABASE` and `DROP DATABASE`
/// need. Nothing here ever opens a transaction.
pub struct AdminSession {
    conn: PgConnection,
}

impl AdminSession {
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    /// Backend process id serving this session
    pub async fn backend_pid(&mut self) -> Result<i32, ResetError> {
        let pid: i32 = sqlx::query_scalar("SELECT pg_backend_pid()")
            .fetch_one(&mut self.conn)
            .await?;
        Ok(pid)
    }

    /// Graceful shutdown of the session
    pub async fn close(self) -> Result<(), ResetError> {
        self.conn.close().await?;
        debug!("Administrative session closed");
        Ok(())
    }
}

/// Open the administrative session against the maintenance database
///
/// Every failure here is reported as [`ResetError::Connection`], whether the
/// server is unreachable, the credentials are rejected, or the maintenance
/// database does not exist.
#[instrument(skip(config), fields(
    host = %config.host(),
    port = config.port(),
    user = %config.username(),
    maintenance_db = %config.maintenance_database,
))]
pub async fn connect(config: &ResetConfig) -> Result<AdminSession, ResetError> {
    debug!("Opening administrative session");

    let conn = PgConnection::connect_with(config.connect_options())
        .await
        .map_err(ResetError::Connection)?;

    info!(
        "Connected to {}:{} as {}",
        config.host(),
        config.port(),
        config.username()
    );
    Ok(AdminSession { conn })
}

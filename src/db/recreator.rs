use sqlx::PgConnection;
use tracing::{debug, info, instrument};

use crate::db::{DatabaseName, ResetError};

#[instrument(skip(conn), fields(database = %target))]
pub async fn database_exists(
    conn: &mut PgConnection,
    target: &DatabaseName,
) -> Result<bool, ResetError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(target.as_str())
            .fetch_one(&mut *conn)
            .await?;

    debug!("Database {} exists: {}", target, exists);
    Ok(exists)
}

/// `DROP DATABASE IF EXISTS`; dropping an absent database is a no-op
///
/// Sent over the simple query protocol because the server refuses to run
/// database DDL inside a transaction block.
#[instrument(skip(conn), fields(database = %target))]
pub async fn drop_database(
    conn: &mut PgConnection,
    target: &DatabaseName,
) -> Result<(), ResetError> {
    let sql = format!("DROP DATABASE IF EXISTS {}", target.quoted());
    sqlx::raw_sql(&sql).execute(&mut *conn).await?;

    info!("Dropped database {} (if it existed)", target);
    Ok(())
}

/// `CREATE DATABASE` with server defaults (template1, owner = current role)
#[instrument(skip(conn), fields(database = %target))]
pub async fn create_database(
    conn: &mut PgConnection,
    target: &DatabaseName,
) -> Result<(), ResetError> {
    let sql = format!("CREATE DATABASE {}", target.quoted());
    sqlx::raw_sql(&sql).execute(&mut *conn).await?;

    info!("Created database {}", target);
    Ok(())
}


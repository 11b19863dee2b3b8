use sqlx::PgConnection;
use tracing::{debug, info, instrument};

use crate::db::{DatabaseName, ResetError};

/// Ask the server to end every other backend attached to `target`
///
/// Returns how many backends were signalled. The calling session is always
/// excluded, and a database nobody is attached to (or one that does not
/// exist) simply yields 0.
#[instrument(skip(conn), fields(database = %target))]
pub async fn terminate_sessions(
    conn: &mut PgConnection,
    target: &DatabaseName,
) -> Result<u64, ResetError> {
    let signalled: Vec<bool> = sqlx::query_scalar(
        r#"
        SELECT pg_terminate_backend(pid)
        FROM pg_stat_activity
        WHERE datname = $1
          AND pid <> pg_backend_pid()
        "#,
    )
    .bind(target.as_str())
    .fetch_all(&mut *conn)
    .await?;

    let attached = signalled.len();
    // false means the backend had already exited by the time it was signalled
    let terminated = signalled.into_iter().filter(|ok| *ok).count() as u64;

    if attached == 0 {
        debug!("No sessions attached to {}", target);
    } else {
        info!(
            "Terminated {} of {} sessions attached to {}",
            terminated, attached, target
        );
    }

    Ok(terminated)
}

/// Number of backends currently attached to `target`, excluding this one
#[instrument(skip(conn), fields(database = %target))]
pub async fn count_sessions(
    conn: &mut PgConnection,
    target: &DatabaseName,
) -> Result<i64, ResetError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM pg_stat_activity
        WHERE datname = $1
          AND pid <> pg_backend_pid()
        "#,
    )
    .bind(target.as_str())
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

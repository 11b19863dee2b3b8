/// Everything that can stop a reset
#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Permission denied: {0}")]
    Permission(#[source] sqlx::Error),

    #[error("Invalid database name: {0}")]
    Name(String),

    #[error("Database name rejected by server: {0}")]
    NameRejected(#[source] sqlx::Error),

    #[error("Database still has active sessions: {0}")]
    SessionsRemain(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

/// Coarse category of a server-reported SQLSTATE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlStateClass {
    InsufficientPrivilege,
    InvalidName,
    ObjectInUse,
    Connection,
    Other,
}

pub fn classify_sqlstate(code: &str) -> SqlStateClass {
    match code {
        "42501" => SqlStateClass::InsufficientPrivilege,
        // invalid_name, name_too_long
        "42602" | "42622" => SqlStateClass::InvalidName,
        "55006" => SqlStateClass::ObjectInUse,
        // class 08 is connection_exception, class 28 is invalid_authorization_specification,
        // 3D000 is invalid_catalog_name (the database we tried to connect to is gone)
        c if c.starts_with("08") || c.starts_with("28") || c == "3D000" => {
            SqlStateClass::Connection
        }
        _ => SqlStateClass::Other,
    }
}

impl From<sqlx::Error> for ResetError {
    fn from(err: sqlx::Error) -> Self {
        let class = match &err {
            sqlx::Error::Database(db_err) => db_err
                .code()
                .map(|code| classify_sqlstate(&code))
                .unwrap_or(SqlStateClass::Other),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => SqlStateClass::Connection,
            _ => SqlStateClass::Other,
        };

        match class {
            SqlStateClass::InsufficientPrivilege => ResetError::Permission(err),
            SqlStateClass::InvalidName => ResetError::NameRejected(err),
            SqlStateClass::ObjectInUse => ResetError::SessionsRemain(err),
            SqlStateClass::Connection => ResetError::Connection(err),
            SqlStateClass::Other => ResetError::Database(err),
        }
    }
}

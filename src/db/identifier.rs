use std::fmt;

use crate::db::ResetError;

/// Longest identifier PostgreSQL keeps without truncation (NAMEDATALEN - 1)
pub const MAX_IDENTIFIER_BYTES: usize = 63;

/// A database name that is safe to hand to `DROP DATABASE` / `CREATE DATABASE`
///
/// The server would silently truncate an over-long name, which could make a
/// reset drop a different database than the one requested, so those are
/// rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseName(String);

impl DatabaseName {
    pub fn parse(name: impl Into<String>) -> Result<Self, ResetError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ResetError::Name("database name is empty".to_string()));
        }
        if name.len() > MAX_IDENTIFIER_BYTES {
            return Err(ResetError::Name(format!(
                "database name '{name}' is {} bytes, the limit is {MAX_IDENTIFIER_BYTES}",
                name.len()
            )));
        }
        if name.contains('\0') {
            return Err(ResetError::Name(
                "database name contains a NUL character".to_string(),
            ));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Quoted form for interpolation into DDL
    ///
    /// ```
    /// use db_reset::db::DatabaseName;
    ///
    /// let name = DatabaseName::parse("app").unwrap();
    /// assert_eq!(name.quoted(), "\"app\"");
    ///
    /// let odd = DatabaseName::parse("my\"db").unwrap();
    /// assert_eq!(odd.quoted(), "\"my\"\"db\"");
    /// ```
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0.replace('"', "\"\""))
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

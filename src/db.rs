pub mod connector;
pub mod error;
pub mod identifier;
pub mod recreator;
pub mod terminator;

pub use connector::AdminSession;
pub use error::ResetError;
pub use identifier::DatabaseName;

pub mod error;
pub mod health;
pub mod poem;
pub mod summary;
pub mod translate;

/// Header carrying the client session whose poem board a request updates.
pub const SESSION_HEADER: &str = "x-session-id";

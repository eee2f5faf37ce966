// Request extractors / middleware
pub mod auth;

pub use auth::*;

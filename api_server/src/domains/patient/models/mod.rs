// Patient domain models
pub mod auth;
pub mod jwt;
pub mod patient;

pub use auth::*;
pub use jwt::*;
pub use patient::*;

// External clients
pub mod email;

pub use email::*;

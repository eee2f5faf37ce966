// Patient domain services
pub mod jwt_service;
pub mod password;
pub mod patient_service;
pub mod state;

pub use jwt_service::*;
pub use patient_service::*;
pub use state::*;

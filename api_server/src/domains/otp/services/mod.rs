// OTP domain services
pub mod cleanup_scheduler;
pub mod otp_service;
pub mod state;

pub use cleanup_scheduler::*;
pub use otp_service::*;
pub use state::*;

// OTP domain models
pub mod otp;

pub use otp::*;

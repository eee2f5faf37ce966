// Domain modules
pub mod patient;
pub mod otp;

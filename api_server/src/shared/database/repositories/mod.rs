// All repositories module
pub mod patient;
pub mod otp;
pub mod memory;

// Re-export all repositories for convenience
pub use patient::*;
pub use otp::*;
pub use memory::*;

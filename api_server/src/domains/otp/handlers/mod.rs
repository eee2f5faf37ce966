pub mod otp_handler;

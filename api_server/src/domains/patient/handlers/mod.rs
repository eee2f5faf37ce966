pub mod patient_handler;

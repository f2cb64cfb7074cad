pub mod error;
pub mod json_fix;
pub mod logger;
pub mod monitor;
pub mod validation;

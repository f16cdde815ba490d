//! # Phone OTP Core
//!
//! Core business logic for one-time codes bound to a phone number.
//! This crate contains the OTP record entity, the typed failure taxonomy,
//! the store/clock/code-generator seams and the lifecycle service that
//! issues, resends and verifies codes.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;

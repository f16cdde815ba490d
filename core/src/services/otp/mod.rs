//! OTP lifecycle service module
//!
//! This module provides the complete one-time code workflow:
//! - Code generation from the operating system CSPRNG
//! - Issuing and resending with a resend throttle
//! - Verification with a bounded attempt budget and expiry
//! - A per-phone-number atomic store contract the service runs every operation through

mod clock;
mod code_generator;
mod config;
mod service;
mod traits;
mod types;


pub use clock::SystemClock;
pub use code_generator::SecureCodeGenerator;
pub use config::OtpServiceConfig;
pub use service::OtpService;
pub use traits::{Clock, CodeGenerator, OtpStore, StoreAction};
pub use types::{IssuedCode, OtpStatus, VerifiedCode};

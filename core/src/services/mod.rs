//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Clock, CodeGenerator, IssuedCode, OtpService, OtpServiceConfig, OtpStatus, OtpStore,
    SecureCodeGenerator, StoreAction, SystemClock, VerifiedCode,
};

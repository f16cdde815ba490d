//! Cache module for OTP record storage
//!
//! Process-local storage only; a restart discards all outstanding codes.

pub mod memory_store;


pub use memory_store::InMemoryOtpStore;

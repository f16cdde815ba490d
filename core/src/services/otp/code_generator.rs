//! Cryptographically secure code generation

use rand::{rngs::OsRng, Rng};

use super::traits::CodeGenerator;

/// Generates codes from the operating system CSPRNG
///
/// Each digit is drawn uniformly from 0-9, so every code of the requested
/// length (leading zeros included) is equally likely.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureCodeGenerator;

impl CodeGenerator for SecureCodeGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}

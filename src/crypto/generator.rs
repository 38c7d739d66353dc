//! Random password generation for new credential records.

use rand::Rng;
use zeroize::Zeroizing;

use crate::errors::{PassVaultError, Result};

/// Characters a generated password is drawn from.
pub const CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+~`|}{[]:;?><,./-=";

/// Length used when none is configured.
pub const DEFAULT_LENGTH: usize = 24;

/// Shortest password we are willing to generate.
pub const MIN_LENGTH: usize = 8;

/// Longest password we are willing to generate.
pub const MAX_LENGTH: usize = 256;

/// Generate a password of `length` characters sampled uniformly from `CHARSET`.
pub fn generate_password(length: usize) -> Result<Zeroizing<String>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(PassVaultError::InvalidRequest(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH} (got {length})"
        )));
    }

    let mut rng = rand::rng();
    let mut password = Zeroizing::new(String::with_capacity(length));
    for _ in 0..length {
        let idx = rng.random_range(0..CHARSET.len());
        password.push(char::from(CHARSET[idx]));
    }
    Ok(password)
}

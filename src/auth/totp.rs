//! Time-based one-time code derivation (RFC 6238 over HMAC-SHA1).

use std::time::{SystemTime, UNIX_EPOCH};

use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Code validity window.
const STEP_SECS: u64 = 30;
/// Emitted code length.
const DIGITS: u32 = 6;

/// Errors from code derivation.
#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    /// The shared secret is not valid base32.
    #[error("two-factor secret is not valid base32")]
    InvalidSecret,
}

/// Derives the 6-digit code for the time step containing `at`.
///
/// The secret is base32 (RFC 4648); case, whitespace, and `=` padding are
/// tolerated.
///
/// # Errors
///
/// Returns [`TotpError::InvalidSecret`] when the secret cannot be decoded.
pub fn derive_code(secret: &str, at: SystemTime) -> Result<String, TotpError> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .collect::<String>()
        .to_ascii_uppercase();
    let key = BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|_| TotpError::InvalidSecret)?;

    let elapsed = at.duration_since(UNIX_EPOCH).unwrap_or_default();
    let counter = elapsed.as_secs() / STEP_SECS;

    let mut mac =
        Hmac::<Sha1>::new_from_slice(&key).map_err(|_| TotpError::InvalidSecret)?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // dynamic truncation per RFC 4226 §5.3
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    let code = binary % 10_u32.pow(DIGITS);

    Ok(format!("{code:06}"))
}

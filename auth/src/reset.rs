use chrono::Duration;
use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per reset token, before hex encoding.
pub const RESET_TOKEN_BYTES: usize = 32;

/// How long a reset token stays redeemable.
pub fn reset_token_ttl() -> Duration {
    Duration::hours(1)
}

/// Generate an opaque password-reset token.
///
/// 32 bytes from the operating system RNG, hex-encoded (64 characters).
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

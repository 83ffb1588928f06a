//! Bearer tokens for the proxy: HMAC-SHA256 over an expiry payload.
//!
//! Format: `base64url(exp_unix_secs) . base64url(hmac(secret, payload))`.
//! Verification recomputes the tag and checks the expiry; there are no
//! claims beyond the expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Issued tokens are valid for seven days.
pub const TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

fn unix_secs(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

fn mac(secret: &str) -> HmacSha256 {
    // HMAC accepts keys of any length.
    HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key")
}

/// Issue a token expiring `TOKEN_TTL` after `now`.
pub fn issue(secret: &str, now: SystemTime) -> String {
    let exp = unix_secs(now + TOKEN_TTL).to_string();
    let payload = B64.encode(exp.as_bytes());
    let mut m = mac(secret);
    m.update(payload.as_bytes());
    let tag = B64.encode(m.finalize().into_bytes());
    format!("{payload}.{tag}")
}

/// Check signature and expiry.
pub fn verify(secret: &str, token: &str, now: SystemTime) -> bool {
    let Some((payload, tag)) = token.split_once('.') else {
        return false;
    };
    let Ok(tag_bytes) = B64.decode(tag) else {
        return false;
    };

    let mut m = mac(secret);
    m.update(payload.as_bytes());
    if m.verify_slice(&tag_bytes).is_err() {
        return false;
    }

    let Ok(exp_bytes) = B64.decode(payload) else {
        return false;
    };
    let Some(exp) = std::str::from_utf8(&exp_bytes)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    else {
        return false;
    };
    unix_secs(now) < exp
}

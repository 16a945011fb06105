//! Asset key naming.
//!
//! Every stored asset gets a name made of 32 bytes from the OS-seeded CSPRNG,
//! base64url encoded without padding, plus an extension taken from the media
//! subtype. Collisions are not checked for.

use base64::Engine;
use rand::RngCore;

const NAME_ENTROPY_BYTES: usize = 32;
const FALLBACK_EXTENSION: &str = ".bin";

/// Relative path for a new asset of `media_type`, e.g. `Xk3...q9w.mp4`.
///
/// Callers prefix it with a store namespace (such as a category directory).
pub fn asset_path(media_type: &str) -> String {
    let mut bytes = [0u8; NAME_ENTROPY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let name = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
    format!("{}{}", name, extension_for(media_type))
}

/// Extension for `media_type`: `.` plus the subtype when the value has exactly
/// one `/`, `.bin` otherwise.
pub fn extension_for(media_type: &str) -> String {
    let parts: Vec<&str> = media_type.split('/').collect();
    if parts.len() != 2 {
        return FALLBACK_EXTENSION.to_string();
    }
    format!(".{}", parts[1])
}

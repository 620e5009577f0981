use rand::rngs::OsRng;
use rand::RngCore;

/// Opaque one-time token: 32 bytes from the OS CSPRNG, hex-encoded.
/// Used for both verification and reset links.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

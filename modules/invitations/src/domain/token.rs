use rand::RngCore;

/// Length of the raw invitation token in bytes (256 bits of entropy).
pub const TOKEN_BYTES: usize = 32;

/// Generate an invitation token: 32 random bytes, hex-encoded. The token is
/// the sole credential for the accept/decline transition, so it must be
/// unguessable.
pub fn generate_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

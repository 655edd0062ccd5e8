//! Share-token generation
//!
//! Tokens are short random strings; a user-supplied value takes precedence
//! and generation only runs when the request carried none.

use rand::Rng;

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 8;

/// Generates a random share token of lowercase letters and digits.
pub fn generate_share_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

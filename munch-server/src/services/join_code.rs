use rand::Rng;

const JOIN_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const JOIN_CODE_LENGTH: usize = 6;

/// Draws a code of `length` characters uniformly from `[A-Z0-9]`.
///
/// Codes are not unique by construction; the `groups.join_code` constraint decides.
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| JOIN_CODE_CHARSET[rng.random_range(0..JOIN_CODE_CHARSET.len())] as char)
        .collect()
}

/// Canonical form of a code typed by a user.
pub fn normalize(join_code: &str) -> String {
    join_code.trim().to_ascii_uppercase()
}

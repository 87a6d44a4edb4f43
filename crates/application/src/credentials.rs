use rand::Rng;

/// Hard cap on generated password length imposed by the portal.
pub const MAX_GENERATED_PASSWORD_LENGTH: usize = 13;

const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Generates a random password of exactly `length` characters.
///
/// Callers cap `length` at [`MAX_GENERATED_PASSWORD_LENGTH`] before the
/// value reaches the portal.
#[must_use]
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let index = rng.gen_range(0..PASSWORD_ALPHABET.len());
            PASSWORD_ALPHABET[index] as char
        })
        .collect()
}

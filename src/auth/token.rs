/// Opaque security-token generation
///
/// Reset tokens and generated passwords are security tokens, not unique ids,
/// so draws come from the OS random source rather than a general-purpose
/// PRNG. No uniqueness registry is kept; at the default length the collision
/// probability is negligible.
use rand::{rngs::OsRng, Rng};

/// Default length for reset tokens and generated passwords
pub const DEFAULT_TOKEN_LENGTH: usize = 44;

/// ASCII letters, digits, and punctuation
const TOKEN_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789\
      !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// ASCII letters, digits, and the password policy's special characters
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789@$!%*?&";

fn draw(charset: &[u8], length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..charset.len());
            charset[idx] as char
        })
        .collect()
}

/// Generate an opaque reset token
pub fn random_token(length: usize) -> String {
    draw(TOKEN_CHARSET, length)
}

/// Generate a password that satisfies the policy charset
pub fn generate_password(length: usize) -> String {
    draw(PASSWORD_CHARSET, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        assert_eq!(random_token(DEFAULT_TOKEN_LENGTH).len(), DEFAULT_TOKEN_LENGTH);
        assert_eq!(random_token(16).len(), 16);
    }

    #[test]
    fn test_token_charset() {
        let token = random_token(256);
        assert!(token.bytes().all(|b| TOKEN_CHARSET.contains(&b)));
    }

    #[test]
    fn test_password_charset() {
        let password = generate_password(256);
        assert!(password.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let a = random_token(DEFAULT_TOKEN_LENGTH);
        let b = random_token(DEFAULT_TOKEN_LENGTH);
        assert_ne!(a, b);
    }
}

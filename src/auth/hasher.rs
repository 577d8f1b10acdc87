/// Salted one-way password hashing
///
/// The digest contract is fixed for stored-hash compatibility: BLAKE3 of
/// `plaintext || salt`, base64-encoded and truncated to 43 ASCII characters.
/// The salt is a process-wide configuration secret shared by all credentials.
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Length of the stored digest string
pub const DIGEST_LEN: usize = 43;

/// Deterministic salted password hasher
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    salt: String,
}

impl PasswordHasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Hash a plaintext password into the fixed-length digest string
    pub fn hash(&self, plaintext: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(plaintext.as_bytes());
        hasher.update(self.salt.as_bytes());
        let digest = hasher.finalize();

        let mut encoded = STANDARD.encode(digest.as_bytes());
        encoded.truncate(DIGEST_LEN);
        encoded
    }

    /// Verify a plaintext password against a stored digest
    ///
    /// Both sides are re-hashed before comparison; `blake3::Hash` equality
    /// runs in constant time, so the comparison does not leak a matching
    /// prefix length through timing.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let computed = self.hash(plaintext);
        blake3::hash(computed.as_bytes()) == blake3::hash(stored.as_bytes())
    }
}

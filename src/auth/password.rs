use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

pub const DEFAULT_ITERATIONS: u32 = 600_000;

const METHOD_PREFIX: &str = "pbkdf2";
const DIGEST_NAME: &str = "sha256";
const SALT_LENGTH: usize = 16;
const DIGEST_LENGTH: usize = 32;

/// Salted PBKDF2-HMAC-SHA256 password hashing.
///
/// Hashes are stored as `pbkdf2:sha256:<iterations>$<salt>$<hex digest>`, the
/// layout werkzeug produces, so accounts created by older deployments still verify.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_iterations(iterations: u32) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::Config(
                "pbkdf2 iterations must be greater than zero".to_string(),
            ));
        }
        Ok(Self { iterations })
    }

    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hashes a password with a fresh random salt.
    #[must_use]
    pub fn hash(&self, password: &str) -> String {
        let salt = generate_salt();
        let digest = derive(password, &salt, self.iterations);
        format!(
            "{METHOD_PREFIX}:{DIGEST_NAME}:{}${salt}${}",
            self.iterations,
            hex::encode(digest)
        )
    }

    /// Verifies a password against a stored hash.
    /// The iteration count is taken from the stored hash, not from `self`.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool> {
        let parsed = ParsedHash::parse(stored)?;
        let digest = derive(password, parsed.salt, parsed.iterations);
        Ok(bool::from(digest.as_slice().ct_eq(parsed.digest.as_slice())))
    }
}

struct ParsedHash<'a> {
    iterations: u32,
    salt: &'a str,
    digest: Vec<u8>,
}

impl<'a> ParsedHash<'a> {
    fn parse(stored: &'a str) -> Result<Self> {
        let mut parts = stored.splitn(3, '$');
        let (Some(method), Some(salt), Some(hex_digest)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected method$salt$digest"));
        };

        let mut method_parts = method.split(':');
        if method_parts.next() != Some(METHOD_PREFIX) {
            return Err(malformed("unsupported method"));
        }
        if method_parts.next() != Some(DIGEST_NAME) {
            return Err(malformed("unsupported digest"));
        }
        let iterations = match method_parts.next() {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| malformed("invalid iteration count"))?,
            None => DEFAULT_ITERATIONS,
        };
        if method_parts.next().is_some() {
            return Err(malformed("unexpected method segment"));
        }

        if salt.is_empty() {
            return Err(malformed("empty salt"));
        }

        let digest = hex::decode(hex_digest).map_err(|_| malformed("digest is not hex"))?;
        if digest.len() != DIGEST_LENGTH {
            return Err(malformed("wrong digest length"));
        }

        Ok(Self {
            iterations,
            salt,
            digest,
        })
    }
}

fn malformed(reason: &str) -> Error {
    Error::PasswordHash(format!("malformed password hash: {reason}"))
}

fn derive(password: &str, salt: &str, iterations: u32) -> [u8; DIGEST_LENGTH] {
    let mut out = [0u8; DIGEST_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut out);
    out
}

fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect()
}

// ============================
// backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are scrypt PHC strings (`$scrypt$ln=..,r=..,p=..$salt$hash`). Each
//! hash carries its own salt and cost, so verification always uses the
//! parameters it was created with.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use thiserror::Error;
use zeroize::Zeroize;

/// Lowest accepted scrypt `log_n`
pub const MIN_HASH_COST: u8 = 4;

/// Highest accepted scrypt `log_n` (1 GiB of memory per hash at r = 8)
pub const MAX_HASH_COST: u8 = 20;

/// scrypt's recommended `log_n`
pub const DEFAULT_HASH_COST: u8 = 17;

const BLOCK_SIZE: u32 = 8;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 10;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("hash cost {0} is out of range")]
    InvalidCost(u8),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Password complexity requirements
#[derive(Debug, Clone)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }
}

/// One-way adaptive hash comparator
#[derive(Debug, Clone, Copy)]
pub struct PasswordEncoder {
    params: Params,
}

impl PasswordEncoder {
    /// Create an encoder with the given scrypt `log_n`
    pub fn new(cost: u8) -> Result<Self, PasswordError> {
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        let params = Params::new(cost, BLOCK_SIZE, PARALLELISM, OUTPUT_LEN)
            .map_err(|_| PasswordError::InvalidCost(cost))?;
        Ok(Self { params })
    }

    /// The `log_n` used for new hashes
    pub fn cost(&self) -> u8 {
        self.params.log_n()
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Hash a password and zeroize the original
    pub fn hash_secure(&self, plain: &mut String) -> Result<String, PasswordError> {
        let hash = self.hash(plain);
        plain.zeroize();
        hash
    }

    /// Verify a password against a stored hash.
    ///
    /// The final digest comparison is constant-time. A hash that does not
    /// parse never verifies.
    pub fn verify(&self, hash: &str, plain: &str) -> bool {
        verify_password(hash, plain)
    }

    /// True when `hash` was not produced with this encoder's parameters.
    /// Such hashes still verify, but at their own cost.
    pub fn needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };
        parsed.algorithm.as_str() != "scrypt"
            || parsed.params.get_decimal("ln") != Some(u32::from(self.params.log_n()))
            || parsed.params.get_decimal("r") != Some(self.params.r())
            || parsed.params.get_decimal("p") != Some(self.params.p())
    }
}

impl Default for PasswordEncoder {
    fn default() -> Self {
        Self {
            params: Params::recommended(),
        }
    }
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Check if a password meets the complexity requirements
pub fn validate_password_strength(password: &str, requirements: &PasswordRequirements) -> bool {
    if password.chars().count() < requirements.min_length {
        return false;
    }

    if requirements.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
        return false;
    }

    if requirements.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
        return false;
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return false;
    }

    true
}

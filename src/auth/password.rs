use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),
    #[error("Password must be no more than {0} characters long")]
    TooLong(usize),
    #[error("Failed to hash password")]
    HashingFailed,
    #[error("Failed to verify password")]
    VerificationFailed,
}

impl PasswordError {
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, PasswordError::TooShort(_) | PasswordError::TooLong(_))
    }
}

/// Password requirements and bcrypt work factor
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub bcrypt_cost: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 128,
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

impl PasswordPolicy {
    pub fn with_cost(bcrypt_cost: u32) -> Self {
        Self { bcrypt_cost, ..Self::default() }
    }
}

pub fn validate_password(password: &str, policy: &PasswordPolicy) -> Result<(), PasswordError> {
    let length = password.chars().count();

    if length < policy.min_length {
        return Err(PasswordError::TooShort(policy.min_length));
    }

    if length > policy.max_length {
        return Err(PasswordError::TooLong(policy.max_length));
    }

    Ok(())
}

/// Hash a password using bcrypt, after checking it against the policy
pub fn hash_password(password: &str, policy: &PasswordPolicy) -> Result<String, PasswordError> {
    validate_password(password, policy)?;

    hash(password, policy.bcrypt_cost).map_err(|_| PasswordError::HashingFailed)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(|_| PasswordError::VerificationFailed)
}

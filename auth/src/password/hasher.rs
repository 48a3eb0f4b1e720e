use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Wraps bcrypt with a caller-supplied cost factor. The cost is validated at
/// construction so a misconfigured deployment fails before any password is
/// hashed with weak parameters.
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Lowest cost factor the hasher accepts.
    pub const MIN_COST: u32 = 8;

    /// Operational default cost factor.
    pub const DEFAULT_COST: u32 = 12;

    /// Create a new password hasher with the given bcrypt cost.
    ///
    /// # Errors
    /// * `CostTooLow` - Cost factor below [`Self::MIN_COST`]
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if cost < Self::MIN_COST {
            return Err(PasswordError::CostTooLow {
                min: Self::MIN_COST,
                actual: cost,
            });
        }
        Ok(Self { cost })
    }

    /// Hash a plaintext password securely.
    ///
    /// bcrypt generates a random salt per call, so hashing the same password
    /// twice yields different strings.
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch returns `Ok(false)`, never an error; errors are reserved
    /// for malformed stored hashes.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid bcrypt string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))
    }
}

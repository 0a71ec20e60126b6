//! bcrypt password hashing on tokio's blocking pool

use crate::errors::Failure;

/// Hashes account passwords
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Salted bcrypt hash of `password`
    pub async fn hash(&self, password: &str) -> Result<String, Failure> {
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_is_salted_and_verifiable() {
        let hasher = PasswordHasher::new(4);

        let first = hasher.hash("s3cret").await.unwrap();
        let second = hasher.hash("s3cret").await.unwrap();

        assert_ne!(first, "s3cret");
        assert_ne!(first, second);
        assert!(bcrypt::verify("s3cret", &first).unwrap());
        assert!(!bcrypt::verify("wrong", &first).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_cost_is_a_hashing_failure() {
        let hasher = PasswordHasher::new(1);
        assert!(matches!(hasher.hash("s3cret").await, Err(Failure::Hashing(_))));
    }
}

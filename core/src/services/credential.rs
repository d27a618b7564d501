//! Password hashing and verification
//!
//! Every hash and verify runs on the blocking pool, bounded by a semaphore
//! (`password_hash_concurrency`) and a timeout that covers queueing.
//! bcrypt reads at most 72 bytes, so longer passwords are refused rather than
//! truncated.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use st_shared::config::PasswordConfig;
use st_shared::validation::{ValidationErrors, PASSWORD_MAX_BYTES};

use crate::errors::{CredentialError, DomainError};
use crate::services::random::RandomSource;

/// Hashes and verifies passwords with bcrypt
pub struct CredentialVerifier {
    cost: u32,
    permits: Arc<Semaphore>,
    timeout: Duration,
    random: Arc<dyn RandomSource>,
    /// Hash checked against when the account does not exist
    dummy_hash: OnceLock<String>,
}

const DUMMY_PASSWORD: &str = "strive-dummy-password";

impl CredentialVerifier {
    pub fn new(config: &PasswordConfig, random: Arc<dyn RandomSource>) -> Self {
        Self {
            cost: config.bcrypt_cost,
            permits: Arc::new(Semaphore::new(config.hash_concurrency.max(1))),
            timeout: config.hash_timeout,
            random,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Hash a password with a fresh random salt
    ///
    /// Never fails on weak input; strength policy is checked before this.
    ///
    /// # Returns
    /// * `Ok(String)` - `$2b$` bcrypt hash
    /// * `Err(DomainError::Validation)` - Longer than bcrypt's 72-byte input
    /// * `Err(DomainError::Internal)` - Hashing failed
    /// * `Err(DomainError::Timeout)` - The pool was saturated past the timeout
    pub async fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(ValidationErrors::single(
                "password",
                "Password must be at most 72 bytes",
                "length",
            )
            .into());
        }
        let mut salt = [0u8; 16];
        self.random.fill_bytes(&mut salt);
        let password = password.to_owned();
        let cost = self.cost;

        self.run_blocking("password_hash", move || {
            bcrypt::hash_with_salt(password, cost, salt)
                .map(|parts| parts.format_for_version(bcrypt::Version::TwoB))
        })
        .await?
        .map_err(|e| DomainError::internal(format!("password hashing failed: {}", e)))
    }

    /// Check a password against a stored hash
    ///
    /// A malformed hash, a wrong password and a password longer than 72 bytes
    /// produce the same error.
    ///
    /// # Returns
    /// * `Ok(())` - Password matches
    /// * `Err(DomainError::Credential)` - Mismatch or unusable hash
    /// * `Err(DomainError::Timeout)` - The pool was saturated past the timeout
    pub async fn verify_password(&self, hash: &str, password: &str) -> Result<(), DomainError> {
        let too_long = password.len() > PASSWORD_MAX_BYTES;
        let hash = hash.to_owned();
        // Over-long input still costs one bcrypt round before it is refused
        let password = password.as_bytes()[..password.len().min(PASSWORD_MAX_BYTES)].to_vec();

        let outcome = self
            .run_blocking("password_verify", move || bcrypt::verify(password, &hash))
            .await?;

        if too_long {
            return Err(CredentialError::InvalidCredentials.into());
        }

        match outcome {
            Ok(true) => Ok(()),
            Ok(false) => Err(CredentialError::InvalidCredentials.into()),
            Err(e) => {
                debug!(error = %e, "Stored password hash could not be checked");
                Err(CredentialError::InvalidCredentials.into())
            }
        }
    }

    /// Spend one bcrypt computation at the configured cost without an account
    ///
    /// Used when the email is unknown so the failure costs the same as a wrong
    /// password. The first call computes the dummy hash, which is itself one
    /// computation at the same cost.
    pub async fn burn_verification(&self, password: &str) -> Result<(), DomainError> {
        let Some(hash) = self.dummy_hash.get() else {
            let hash = self.hash_password(DUMMY_PASSWORD).await?;
            let _ = self.dummy_hash.set(hash);
            return Ok(());
        };

        match self.verify_password(hash, password).await {
            Ok(()) | Err(DomainError::Credential(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn run_blocking<T, F>(&self, operation: &'static str, work: F) -> Result<T, DomainError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permits = self.permits.clone();
        let task = async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|_| DomainError::internal("password hashing pool closed"))?;
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                work()
            })
            .await
            .map_err(|e| DomainError::internal(format!("{} task failed: {}", operation, e)))
        };

        tokio::time::timeout(self.timeout, task)
            .await
            .map_err(|_| DomainError::timeout(operation))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::{OsRandom, SeededRandom};

    fn verifier() -> CredentialVerifier {
        let config = PasswordConfig {
            bcrypt_cost: 4,
            ..PasswordConfig::default()
        };
        CredentialVerifier::new(&config, Arc::new(OsRandom))
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let verifier = verifier();
        let hash = verifier.hash_password("Password123!").await.unwrap();

        assert!(hash.starts_with("$2b$04$"));
        assert_ne!(hash, "Password123!");
        assert!(verifier.verify_password(&hash, "Password123!").await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_is_generic_error() {
        let verifier = verifier();
        let hash = verifier.hash_password("Password123!").await.unwrap();

        let err = verifier.verify_password(&hash, "password123!").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Credential(CredentialError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_malformed_hash_indistinguishable_from_mismatch() {
        let err = verifier()
            .verify_password("not-a-bcrypt-hash", "Password123!")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Credential(CredentialError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_password_beyond_72_bytes_is_not_truncated() {
        let verifier = verifier();
        let prefix = format!("Aa1{}", "x".repeat(69));

        let err = verifier
            .hash_password(&format!("{}REGISTERED-TAIL", prefix))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // A stored hash of the 72-byte prefix does not accept longer input
        let hash = verifier.hash_password(&prefix).await.unwrap();
        assert!(verifier.verify_password(&hash, &prefix).await.is_ok());
        let err = verifier
            .verify_password(&hash, &format!("{}COMPLETELY-DIFFERENT", prefix))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Credential(CredentialError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_burn_verification_never_authenticates() {
        let verifier = verifier();
        // First call builds the dummy hash, later calls verify against it
        for _ in 0..3 {
            verifier.burn_verification("Password123!").await.unwrap();
        }
        assert!(verifier.dummy_hash.get().is_some());
    }

    #[tokio::test]
    async fn test_salt_comes_from_random_source() {
        let config = PasswordConfig {
            bcrypt_cost: 4,
            ..PasswordConfig::default()
        };
        let a = CredentialVerifier::new(&config, Arc::new(SeededRandom::new(1)));
        let b = CredentialVerifier::new(&config, Arc::new(SeededRandom::new(1)));

        assert_eq!(
            a.hash_password("Password123!").await.unwrap(),
            b.hash_password("Password123!").await.unwrap()
        );
        assert_ne!(
            a.hash_password("Password123!").await.unwrap(),
            verifier().hash_password("Password123!").await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_timeout_is_retryable_internal_error() {
        let config = PasswordConfig {
            bcrypt_cost: 14,
            hash_concurrency: 1,
            hash_timeout: Duration::from_millis(1),
        };
        let verifier = CredentialVerifier::new(&config, Arc::new(OsRandom));

        let err = verifier.hash_password("Password123!").await.unwrap_err();
        assert!(matches!(err, DomainError::Timeout { .. }));
        assert!(err.is_retryable());
    }
}

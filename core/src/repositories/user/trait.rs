//! User repository trait defining the interface for user data persistence.
//!
//! The trait is async-first and every operation returns a `DomainResult`, so
//! implementations can surface storage failures as `DomainError::Internal`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Emails handed to and returned from the repository are already normalized
/// (see [`crate::domain::normalize_email`]); implementations compare them
/// byte-for-byte.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use st_core::repositories::UserRepository;
/// use st_core::domain::User;
/// use st_core::errors::DomainError;
///
/// struct NullUserRepository;
///
/// #[async_trait]
/// impl UserRepository for NullUserRepository {
///     async fn create(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
///     async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///     async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///     async fn update(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
///     async fn delete(&self, _id: Uuid) -> Result<bool, DomainError> {
///         Ok(false)
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    ///
    /// # Arguments
    /// * `user` - The user to create; `email` must be normalized
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Auth(AuthError::RegistrationFailed))` - Email already taken
    /// * `Err(DomainError)` - Storage failure
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Find a user by ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by normalized email
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Update an existing user's email, password hash and `updated_at`
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError)` - User missing or storage failure
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user
    ///
    /// # Returns
    /// * `Ok(true)` - User deleted
    /// * `Ok(false)` - No user with that ID
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

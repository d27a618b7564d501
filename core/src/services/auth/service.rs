//! Main authentication service implementation

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use st_shared::validation::validators;

use crate::domain::entities::token::{RefreshToken, TokenPair};
use crate::domain::entities::user::{normalize_email, User};
use crate::errors::{
    AuthError, CredentialError, DomainError, DomainResult, RefreshTokenError, ValidationErrors,
};
use crate::repositories::{RefreshTokenRepository, UserRepository};
use crate::services::clock::Clock;
use crate::services::credential::CredentialVerifier;
use crate::services::token::{hash_refresh_token, TokenIssuer};

use super::config::AuthServiceConfig;
use super::delay_response::DelayResponseService;

/// Authentication service for managing the complete authentication flow
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    /// User repository for account lookups
    user_repository: Arc<U>,
    /// Refresh token store
    token_repository: Arc<T>,
    /// Password hashing
    credentials: Arc<CredentialVerifier>,
    /// Access and refresh token minting
    issuer: Arc<TokenIssuer>,
    /// Time source for expiry checks and timestamps
    clock: Arc<dyn Clock>,
    /// Failed-login delay
    delay: DelayResponseService,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_repository` - Repository for refresh tokens
    /// * `credentials` - Password hasher and verifier
    /// * `issuer` - Token issuer
    /// * `clock` - Time source
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        credentials: Arc<CredentialVerifier>,
        issuer: Arc<TokenIssuer>,
        clock: Arc<dyn Clock>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            credentials,
            issuer,
            clock,
            delay: DelayResponseService::new(config.login_failure_delay),
            config,
        }
    }

    /// Register a new account
    ///
    /// The email is normalized first. Tokens are not issued; the client logs in
    /// afterwards.
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Auth(AuthError::RegistrationFailed))` - Email already registered
    /// * `Err(DomainError)` - Validation, hashing or store failure
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email);
        if !validators::is_valid_email(&email) {
            return Err(ValidationErrors::single("email", "Invalid email format", "email").into());
        }
        if password.is_empty() {
            return Err(ValidationErrors::single("password", "Password is required", "required").into());
        }

        let existing = self
            .timed("user_store.find_by_email", self.user_repository.find_by_email(&email))
            .await?;
        if existing.is_some() {
            warn!(reason = "duplicate_email", "Registration rejected");
            return Err(AuthError::RegistrationFailed.into());
        }

        let password_hash = self.credentials.hash_password(password).await?;
        let user = User::new(&email, password_hash, self.clock.now());
        let user = self
            .timed("user_store.create", self.user_repository.create(user))
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Authenticate with email and password and issue a token pair
    ///
    /// Unknown email and wrong password yield the same error after the same
    /// bcrypt work and the same fixed delay.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Access token and opaque refresh token
    /// * `Err(DomainError::Credential)` - Authentication failed
    /// * `Err(DomainError::Timeout | DomainError::Internal)` - Infrastructure failure
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let email = normalize_email(email);

        let user = self
            .timed("user_store.find_by_email", self.user_repository.find_by_email(&email))
            .await?;
        let Some(user) = user else {
            self.credentials.burn_verification(password).await?;
            return self.reject_login().await;
        };

        match self
            .credentials
            .verify_password(&user.password_hash, password)
            .await
        {
            Ok(()) => {}
            Err(DomainError::Credential(_)) => return self.reject_login().await,
            Err(e) => return Err(e),
        }

        let pair = self.issue_and_store(&user).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(pair)
    }

    /// Exchange a refresh token for a new pair
    ///
    /// The presented row is deleted before anything is issued. Only the caller
    /// whose delete removed the row proceeds, so a token is usable once even
    /// under concurrent presentation. Unknown, expired, already-used and
    /// orphaned tokens all produce the same error.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The replacement pair
    /// * `Err(DomainError::RefreshToken)` - Token not usable
    /// * `Err(DomainError::Timeout | DomainError::Internal)` - Infrastructure failure
    pub async fn refresh_token(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let token = refresh_token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingRefreshToken.into());
        }
        let token_hash = hash_refresh_token(token);

        let row = self
            .timed("refresh_token_store.find_by_token", self.token_repository.find_by_token(&token_hash))
            .await?;
        let Some(row) = row.filter(|r| !r.is_expired_at(self.clock.now())) else {
            return Err(invalid_refresh("not_found"));
        };

        let claimed = self
            .timed("refresh_token_store.delete", self.token_repository.delete(&token_hash))
            .await?;
        if !claimed {
            return Err(invalid_refresh("already_used"));
        }

        let user = self
            .timed("user_store.find_by_id", self.user_repository.find_by_id(row.user_id))
            .await?;
        let Some(user) = user else {
            return Err(invalid_refresh("user_missing"));
        };

        let pair = self.issue_and_store(&user).await?;
        info!(user_id = %user.id, "Refresh token rotated");
        Ok(pair)
    }

    /// Revoke one refresh token
    ///
    /// Unknown and empty tokens are not an error.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let token = refresh_token.trim();
        if token.is_empty() {
            return Ok(());
        }

        let removed = self
            .timed(
                "refresh_token_store.delete",
                self.token_repository.delete(&hash_refresh_token(token)),
            )
            .await?;
        if removed {
            info!("Refresh token revoked");
        }
        Ok(())
    }

    /// Revoke every refresh token of a user
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of sessions revoked
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<usize> {
        let revoked = self
            .timed(
                "refresh_token_store.delete_by_user",
                self.token_repository.delete_by_user(user_id),
            )
            .await?;
        info!(user_id = %user_id, revoked = revoked, "All sessions revoked");
        Ok(revoked)
    }

    /// Active (non-expired) refresh tokens of a user, newest first
    pub async fn sessions(&self, user_id: Uuid) -> DomainResult<Vec<RefreshToken>> {
        self.timed(
            "refresh_token_store.find_by_user",
            self.token_repository.find_by_user(user_id),
        )
        .await
    }

    async fn issue_and_store(&self, user: &User) -> DomainResult<TokenPair> {
        let (pair, row) = self.issuer.issue_pair(user)?;
        self.timed("refresh_token_store.create", self.token_repository.create(row))
            .await?;
        Ok(pair)
    }

    async fn reject_login<R>(&self) -> DomainResult<R> {
        warn!(reason = "invalid_credentials", "Login failed");
        self.delay.apply_delay().await;
        Err(CredentialError::InvalidCredentials.into())
    }

    /// Bound a store call by the configured timeout
    async fn timed<R, F>(&self, operation: &'static str, call: F) -> DomainResult<R>
    where
        F: Future<Output = DomainResult<R>>,
    {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                error!(operation = operation, "Store operation timed out");
                Err(DomainError::timeout(operation))
            }
        }
    }
}

fn invalid_refresh(cause: &'static str) -> DomainError {
    warn!(reason = "invalid_refresh_token", cause = cause, "Refresh rejected");
    RefreshTokenError::InvalidRefreshToken.into()
}

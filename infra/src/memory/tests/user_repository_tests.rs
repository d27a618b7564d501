use chrono::Utc;

use st_core::domain::User;
use st_core::errors::{AuthError, DomainError};
use st_core::repositories::UserRepository;

use crate::memory::InMemoryUserRepository;

fn user(email: &str) -> User {
    User::new(email, "$2b$04$hash".to_string(), Utc::now())
}

#[tokio::test]
async fn test_create_and_find() {
    let repo = InMemoryUserRepository::new();
    let created = repo.create(user("a@x.com")).await.unwrap();

    assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created.clone()));
    assert_eq!(repo.find_by_email("a@x.com").await.unwrap(), Some(created));
    assert_eq!(repo.find_by_email("b@x.com").await.unwrap(), None);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let repo = InMemoryUserRepository::new();
    repo.create(user("a@x.com")).await.unwrap();

    let err = repo.create(user("A@X.com")).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::RegistrationFailed)));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_update_moves_email_index() {
    let repo = InMemoryUserRepository::new();
    let mut stored = repo.create(user("a@x.com")).await.unwrap();

    stored.email = "c@x.com".to_string();
    repo.update(stored.clone()).await.unwrap();

    assert_eq!(repo.find_by_email("a@x.com").await.unwrap(), None);
    assert_eq!(repo.find_by_email("c@x.com").await.unwrap(), Some(stored));
}

#[tokio::test]
async fn test_update_missing_user_fails() {
    let repo = InMemoryUserRepository::new();
    assert!(repo.update(user("a@x.com")).await.is_err());
}

#[tokio::test]
async fn test_delete() {
    let repo = InMemoryUserRepository::new();
    let stored = repo.create(user("a@x.com")).await.unwrap();

    assert!(repo.delete(stored.id).await.unwrap());
    assert!(!repo.delete(stored.id).await.unwrap());
    assert!(repo.is_empty().await);
    // Email is free again
    assert!(repo.create(user("a@x.com")).await.is_ok());
}

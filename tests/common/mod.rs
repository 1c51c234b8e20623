#![allow(dead_code)]

use admin_panel::{
    AppConfig, AppState, InMemoryRepository, MockStorageService,
    auth::issue_access_token,
    models::{CreateUserRequest, User},
    repository::{Repository, RepositoryState},
    services::users,
    storage::StorageState,
};
use axum::{body::Body, response::Response};
use std::sync::Arc;

pub const PASSWORD: &str = "correct-horse-battery";

/// State over a fresh in-memory repository and the given mock storage.
pub fn test_state(repo: Arc<InMemoryRepository>, storage: MockStorageService) -> AppState {
    AppState {
        repo: repo as RepositoryState,
        storage: Arc::new(storage) as StorageState,
        config: AppConfig::default(),
    }
}

/// Registers an account through the user service and returns the stored row.
pub async fn seed_user(repo: &dyn Repository, email: &str, superuser: bool) -> User {
    let created = users::create_user(
        repo,
        CreateUserRequest {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            is_active: Some(true),
            is_superuser: Some(superuser),
        },
        AppConfig::default().bcrypt_cost,
    )
    .await
    .unwrap();

    repo.get_user(created.id).await.unwrap().unwrap()
}

/// `Authorization` header value for `user` signed with the default test secret.
pub fn bearer(user: &User) -> String {
    let config = AppConfig::default();
    let token = issue_access_token(user.id, &config.jwt_secret, config.access_token_ttl).unwrap();
    format!("Bearer {token}")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

use admin_panel::{
    AppConfig, AppError, InMemoryRepository,
    auth::{compare_passwords, hash_password, token::verify_recovery_token},
    models::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest},
    repository::Repository,
    services::users,
};
use std::time::Duration;
use uuid::Uuid;

mod common;
use common::{PASSWORD, seed_user};

const COST: u32 = 4;
const SECRET: &str = "user-service-test-secret";
const HOUR: Duration = Duration::from_secs(3600);

fn signup_request(email: &str, password: &str) -> CreateUserRequest {
    CreateUserRequest {
        full_name: "Ann Example".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        is_active: None,
        is_superuser: None,
    }
}

// --- Credential utilities ---

#[test]
fn test_hash_never_equals_plaintext_and_is_salted() {
    let first = hash_password(PASSWORD, COST).unwrap();
    let second = hash_password(PASSWORD, COST).unwrap();

    assert_ne!(first, PASSWORD);
    assert_ne!(first, second);
    assert!(compare_passwords(PASSWORD, &first));
    assert!(compare_passwords(PASSWORD, &second));
    assert!(!compare_passwords("wrong-password", &first));
}

#[test]
fn test_compare_with_malformed_hash_is_false() {
    assert!(!compare_passwords(PASSWORD, "not-a-bcrypt-hash"));
}

#[test]
fn test_passwords_sharing_72_bytes_do_not_match() {
    let prefix = "a".repeat(72);
    let hash = hash_password(&prefix, COST).unwrap();
    assert!(!compare_passwords(&format!("{prefix}second"), &hash));
    assert!(hash_password(&format!("{prefix}first"), COST).is_err());
}

// --- create_user ---

#[tokio::test]
async fn test_create_user_hashes_and_applies_defaults() {
    let repo = InMemoryRepository::new();
    let created = users::create_user(&repo, signup_request("ann@example.com", PASSWORD), COST)
        .await
        .unwrap();

    assert_eq!(created.email, "ann@example.com");
    assert!(created.is_active);
    assert!(!created.is_superuser);

    let stored = repo.get_user(created.id).await.unwrap().unwrap();
    assert_ne!(stored.password, PASSWORD);
    assert!(compare_passwords(PASSWORD, &stored.password));
}

#[tokio::test]
async fn test_create_user_rejects_duplicate_email() {
    let repo = InMemoryRepository::new();
    users::create_user(&repo, signup_request("ann@example.com", PASSWORD), COST)
        .await
        .unwrap();

    let err = users::create_user(&repo, signup_request("ann@example.com", PASSWORD), COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_user_rejects_bad_input() {
    let repo = InMemoryRepository::new();

    let err = users::create_user(&repo, signup_request("", PASSWORD), COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = users::create_user(&repo, signup_request("not-an-email", PASSWORD), COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = users::create_user(&repo, signup_request("ann@example.com", "short"), COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let long = "x".repeat(73);
    let err = users::create_user(&repo, signup_request("ann@example.com", &long), COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(repo.get_user_by_email("ann@example.com").await.unwrap().is_none());

    assert!(repo.list_users(100, 0).await.unwrap().is_empty());
}

// --- lookups and listing ---

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let repo = InMemoryRepository::new();
    let err = users::get_user_by_id(&repo, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_list_users_paginates() {
    let repo = InMemoryRepository::new();
    for i in 0..3 {
        seed_user(&repo, &format!("user{i}@example.com"), false).await;
    }

    let all = users::list_users(&repo, None, None).await.unwrap();
    assert_eq!(all.count, 3);
    assert_eq!(all.data.len(), 3);

    let page = users::list_users(&repo, Some(2), Some(2)).await.unwrap();
    assert_eq!(page.count, 1);

    let err = users::list_users(&repo, Some(-1), None).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_is_superuser_lookup() {
    let repo = InMemoryRepository::new();
    let admin = seed_user(&repo, "admin@example.com", true).await;
    let plain = seed_user(&repo, "plain@example.com", false).await;

    assert!(users::get_current_user_is_superuser(&repo, admin.id).await.unwrap());
    assert!(!users::get_current_user_is_superuser(&repo, plain.id).await.unwrap());

    let err = users::get_current_user_is_superuser(&repo, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// --- update_user_by_id ---

#[tokio::test]
async fn test_update_user_only_overwrites_non_empty_fields() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    let updated = users::update_user_by_id(
        &repo,
        user.id,
        UpdateUserRequest {
            full_name: Some("  ".to_string()),
            email: Some("ann.new@example.com".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.full_name, "Test User");
    assert_eq!(updated.email, "ann.new@example.com");
}

#[tokio::test]
async fn test_update_user_cannot_take_existing_email() {
    let repo = InMemoryRepository::new();
    seed_user(&repo, "taken@example.com", false).await;
    let user = seed_user(&repo, "ann@example.com", false).await;

    let err = users::update_user_by_id(
        &repo,
        user.id,
        UpdateUserRequest {
            full_name: None,
            email: Some("taken@example.com".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

// --- update_current_user_password ---

#[tokio::test]
async fn test_update_password_success() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    users::update_current_user_password(
        &repo,
        user.id,
        UpdatePasswordRequest {
            current_password: PASSWORD.to_string(),
            new_password: "a-brand-new-password".to_string(),
        },
        COST,
    )
    .await
    .unwrap();

    let stored = repo.get_user(user.id).await.unwrap().unwrap();
    assert!(compare_passwords("a-brand-new-password", &stored.password));
    assert!(!compare_passwords(PASSWORD, &stored.password));
}

#[tokio::test]
async fn test_update_password_with_wrong_current_keeps_hash() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    let err = users::update_current_user_password(
        &repo,
        user.id,
        UpdatePasswordRequest {
            current_password: "not-my-password".to_string(),
            new_password: "a-brand-new-password".to_string(),
        },
        COST,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "incorrect password");
    let stored = repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password, user.password);
}

#[tokio::test]
async fn test_update_password_with_identical_new_keeps_hash() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    let err = users::update_current_user_password(
        &repo,
        user.id,
        UpdatePasswordRequest {
            current_password: PASSWORD.to_string(),
            new_password: PASSWORD.to_string(),
        },
        COST,
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "new password cannot be the same as the current one"
    );
    let stored = repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password, user.password);
}

#[tokio::test]
async fn test_update_password_rejects_over_long_new_password() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    let err = users::update_current_user_password(
        &repo,
        user.id,
        UpdatePasswordRequest {
            current_password: PASSWORD.to_string(),
            new_password: format!("{}two", "b".repeat(72)),
        },
        COST,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    let stored = repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password, user.password);
}

#[tokio::test]
async fn test_update_password_for_unknown_user() {
    let repo = InMemoryRepository::new();
    let err = users::update_current_user_password(
        &repo,
        Uuid::new_v4(),
        UpdatePasswordRequest {
            current_password: PASSWORD.to_string(),
            new_password: "a-brand-new-password".to_string(),
        },
        COST,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// --- recovery and reset ---

#[tokio::test]
async fn test_recovery_token_resets_password() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    let token = users::request_password_recovery(&repo, "ann@example.com", SECRET, HOUR)
        .await
        .unwrap();
    assert_eq!(verify_recovery_token(&token, SECRET).unwrap().sub, "ann@example.com");

    users::reset_password_with_token(&repo, &token, "reset-password-123", SECRET, COST)
        .await
        .unwrap();

    let stored = repo.get_user(user.id).await.unwrap().unwrap();
    assert!(compare_passwords("reset-password-123", &stored.password));
}

#[tokio::test]
async fn test_recovery_token_works_only_once() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    let token = users::request_password_recovery(&repo, "ann@example.com", SECRET, HOUR)
        .await
        .unwrap();
    users::reset_password_with_token(&repo, &token, "reset-password-123", SECRET, COST)
        .await
        .unwrap();

    let err = users::reset_password_with_token(&repo, &token, "attacker-choice-1", SECRET, COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let stored = repo.get_user(user.id).await.unwrap().unwrap();
    assert!(compare_passwords("reset-password-123", &stored.password));
}

#[tokio::test]
async fn test_recovery_token_dies_after_password_change() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    let token = users::request_password_recovery(&repo, "ann@example.com", SECRET, HOUR)
        .await
        .unwrap();
    users::update_current_user_password(
        &repo,
        user.id,
        UpdatePasswordRequest {
            current_password: PASSWORD.to_string(),
            new_password: "changed-by-owner".to_string(),
        },
        COST,
    )
    .await
    .unwrap();

    assert!(
        users::reset_password_with_token(&repo, &token, "reset-password-123", SECRET, COST)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_recovery_for_unknown_email_is_not_found() {
    let repo = InMemoryRepository::new();
    let err = users::request_password_recovery(&repo, "nobody@example.com", SECRET, HOUR)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_reset_with_access_token_is_rejected() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;
    let access = admin_panel::auth::issue_access_token(user.id, SECRET, HOUR).unwrap();

    let err = users::reset_password_with_token(&repo, &access, "reset-password-123", SECRET, COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let stored = repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password, user.password);
}

#[tokio::test]
async fn test_reset_current_user_password_for_unknown_email() {
    let repo = InMemoryRepository::new();
    let err = users::reset_current_user_password(&repo, "nobody@example.com", "long-enough", COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// --- delete_user_by_id ---

#[tokio::test]
async fn test_delete_user() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    users::delete_user_by_id(&repo, user.id).await.unwrap();
    assert!(repo.get_user(user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_unknown_user_is_not_found() {
    let repo = InMemoryRepository::new();
    let err = users::delete_user_by_id(&repo, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// --- login ---

#[tokio::test]
async fn test_login_issues_bearer_token() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "ann@example.com", false).await;

    let token = users::login(&repo, "ann@example.com", PASSWORD, SECRET, HOUR, COST)
        .await
        .unwrap();
    assert_eq!(token.token_type, "bearer");

    let claims = admin_panel::auth::verify_access_token(&token.access_token, SECRET).unwrap();
    assert_eq!(claims.sub, user.id);
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let repo = InMemoryRepository::new();
    seed_user(&repo, "ann@example.com", false).await;

    let wrong_password =
        users::login(&repo, "ann@example.com", "wrong-password", SECRET, HOUR, COST)
            .await
            .unwrap_err();
    let unknown_email = users::login(&repo, "bob@example.com", PASSWORD, SECRET, HOUR, COST)
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), "Incorrect email or password");
    assert_eq!(unknown_email.to_string(), "Incorrect email or password");
    assert!(matches!(wrong_password, AppError::Authentication(_)));
}

#[tokio::test]
async fn test_login_refuses_inactive_user() {
    let repo = InMemoryRepository::new();
    users::create_user(
        &repo,
        CreateUserRequest {
            is_active: Some(false),
            ..signup_request("ann@example.com", PASSWORD)
        },
        AppConfig::default().bcrypt_cost,
    )
    .await
    .unwrap();

    let err = users::login(&repo, "ann@example.com", PASSWORD, SECRET, HOUR, COST)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
}

use chrono::Utc;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    auth::{
        compare_passwords, hash_password, issue_access_token,
        password::{
            MAX_PASSWORD_BYTES, MIN_PASSWORD_LEN, compare_with_dummy, password_fingerprint,
        },
        token::{issue_recovery_token, verify_recovery_token},
    },
    error::{AppError, AppResult},
    models::{
        CreateUserRequest, Token, UpdatePasswordRequest, UpdateUserRequest, User, UserList,
        UserPublic,
    },
    repository::Repository,
};

pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Light structural check: one `@`, non-empty local part, dotted domain, no spaces.
fn validate_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation("a valid email address is required"));
    }
    Ok(email.to_string())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::validation(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// create_user
///
/// Validates the payload, hashes the password and stores the row. `is_active` defaults
/// to true and `is_superuser` to false when the request leaves them out. A duplicate
/// email comes back from the repository as `AppError::Validation`.
pub async fn create_user(
    repo: &dyn Repository,
    req: CreateUserRequest,
    bcrypt_cost: u32,
) -> AppResult<UserPublic> {
    let email = validate_email(&req.email)?;
    validate_password(&req.password)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        full_name: req.full_name.trim().to_string(),
        email,
        password: hash_password(&req.password, bcrypt_cost)?,
        is_active: req.is_active.unwrap_or(true),
        is_superuser: req.is_superuser.unwrap_or(false),
        created_at: now,
        updated_at: now,
    };

    let created = repo.create_user(user).await?;
    tracing::info!(user_id = %created.id, "user created");
    Ok(created.into())
}

pub async fn get_user_by_id_full(repo: &dyn Repository, id: Uuid) -> AppResult<User> {
    repo.get_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))
}

pub async fn get_user_by_id(repo: &dyn Repository, id: Uuid) -> AppResult<UserPublic> {
    get_user_by_id_full(repo, id).await.map(UserPublic::from)
}

/// list_users
///
/// Page of users ordered by creation time. Missing values fall back to limit 100, skip 0.
pub async fn list_users(
    repo: &dyn Repository,
    limit: Option<i64>,
    skip: Option<i64>,
) -> AppResult<UserList> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let skip = skip.unwrap_or(0);
    if limit < 0 || skip < 0 {
        return Err(AppError::validation("limit and skip must not be negative"));
    }

    let users = repo.list_users(limit, skip).await?;
    Ok(users
        .into_iter()
        .map(UserPublic::from)
        .collect::<Vec<_>>()
        .into())
}

/// update_user_by_id
///
/// Only fields that are present and non-empty after trimming overwrite the stored ones.
pub async fn update_user_by_id(
    repo: &dyn Repository,
    id: Uuid,
    req: UpdateUserRequest,
) -> AppResult<UserPublic> {
    let mut user = get_user_by_id_full(repo, id).await?;

    if let Some(full_name) = req.full_name.as_deref().map(str::trim) {
        if !full_name.is_empty() {
            user.full_name = full_name.to_string();
        }
    }
    if let Some(email) = req.email.as_deref().map(str::trim) {
        if !email.is_empty() {
            user.email = validate_email(email)?;
        }
    }

    Ok(repo.save_user(&user).await?.into())
}

/// update_current_user_password
///
/// The stored hash only changes when every check passes.
pub async fn update_current_user_password(
    repo: &dyn Repository,
    id: Uuid,
    req: UpdatePasswordRequest,
    bcrypt_cost: u32,
) -> AppResult<()> {
    let mut user = get_user_by_id_full(repo, id).await?;

    if !compare_passwords(&req.current_password, &user.password) {
        return Err(AppError::validation("incorrect password"));
    }
    if req.new_password == req.current_password {
        return Err(AppError::validation(
            "new password cannot be the same as the current one",
        ));
    }
    validate_password(&req.new_password)?;

    user.password = hash_password(&req.new_password, bcrypt_cost)?;
    repo.save_user(&user).await?;
    tracing::info!(user_id = %id, "password updated");
    Ok(())
}

/// reset_current_user_password
///
/// Overwrites the hash of the account registered under `email`. Callers must have
/// proven control of that address first (see `reset_password_with_token`).
pub async fn reset_current_user_password(
    repo: &dyn Repository,
    email: &str,
    new_password: &str,
    bcrypt_cost: u32,
) -> AppResult<()> {
    validate_password(new_password)?;
    let mut user = repo
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;

    user.password = hash_password(new_password, bcrypt_cost)?;
    repo.save_user(&user).await?;
    tracing::info!(user_id = %user.id, "password reset");
    Ok(())
}

/// request_password_recovery
///
/// Issues a recovery token for a registered email. The token is bound to the current
/// password hash and stops working once the password changes.
pub async fn request_password_recovery(
    repo: &dyn Repository,
    email: &str,
    secret: &str,
    ttl: Duration,
) -> AppResult<String> {
    let user = repo
        .get_user_by_email(email.trim())
        .await?
        .ok_or_else(|| AppError::not_found("the user with this email does not exist"))?;

    let token = issue_recovery_token(
        &user.email,
        &password_fingerprint(&user.password),
        secret,
        ttl,
    )?;
    tracing::debug!(user_id = %user.id, recovery_token = %token, "password recovery requested");
    Ok(token)
}

pub async fn reset_password_with_token(
    repo: &dyn Repository,
    token: &str,
    new_password: &str,
    secret: &str,
    bcrypt_cost: u32,
) -> AppResult<()> {
    let claims = verify_recovery_token(token, secret)?;
    let user = repo
        .get_user_by_email(&claims.sub)
        .await?
        .ok_or_else(|| AppError::validation("invalid or expired recovery token"))?;

    // Already used, or the password changed some other way since it was issued.
    if password_fingerprint(&user.password) != claims.fp {
        return Err(AppError::validation("invalid or expired recovery token"));
    }
    reset_current_user_password(repo, &user.email, new_password, bcrypt_cost).await
}

pub async fn delete_user_by_id(repo: &dyn Repository, id: Uuid) -> AppResult<()> {
    if !repo.delete_user(id).await? {
        return Err(AppError::not_found("user not found"));
    }
    tracing::info!(user_id = %id, "user deleted");
    Ok(())
}

pub async fn get_current_user_is_superuser(repo: &dyn Repository, id: Uuid) -> AppResult<bool> {
    Ok(get_user_by_id_full(repo, id).await?.is_superuser)
}

/// login
///
/// Unknown emails and wrong passwords produce the same error, and an unknown email
/// still pays for one bcrypt verification at `bcrypt_cost`, so neither the body nor the
/// timing tells registered addresses apart.
pub async fn login(
    repo: &dyn Repository,
    email: &str,
    password: &str,
    secret: &str,
    ttl: Duration,
    bcrypt_cost: u32,
) -> AppResult<Token> {
    let user = repo.get_user_by_email(email.trim()).await?;
    let verified = match &user {
        Some(user) => compare_passwords(password, &user.password),
        None => compare_with_dummy(password, bcrypt_cost),
    };
    let user = user
        .filter(|_| verified)
        .ok_or_else(|| AppError::authentication("Incorrect email or password"))?;

    if !user.is_active {
        return Err(AppError::authentication("inactive user"));
    }

    Ok(Token {
        access_token: issue_access_token(user.id, secret, ttl)?,
        token_type: "bearer".to_string(),
    })
}

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Claims
///
/// Payload of an access token. `sub` is the user id used by the `AuthUser` extractor.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// RecoveryClaims
///
/// Payload of a password-reset token. `sub` carries the email; `purpose` keeps the
/// token from being replayed anywhere else. `fp` is the fingerprint of the password
/// hash at issue time, so the token dies with the first reset.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecoveryClaims {
    pub sub: String,
    pub purpose: String,
    pub fp: String,
    pub exp: usize,
    pub iat: usize,
}

pub const RECOVERY_PURPOSE: &str = "password_reset";

fn now_secs() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> AppResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("token signing failed: {e}")))
}

fn verify<T: for<'de> Deserialize<'de>>(token: &str, secret: &str) -> AppResult<T> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<T>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::authentication("token has expired"),
            _ => AppError::authentication("could not validate credentials"),
        })
}

/// issue_access_token
///
/// Signs an HS256 token for `user_id`, valid for `ttl`.
pub fn issue_access_token(user_id: Uuid, secret: &str, ttl: Duration) -> AppResult<String> {
    let iat = now_secs();
    let claims = Claims {
        sub: user_id,
        iat,
        exp: iat + ttl.as_secs() as usize,
    };
    sign(&claims, secret)
}

/// verify_access_token
///
/// Checks signature and expiry and returns the claims. Every failure is an
/// `AppError::Authentication`.
pub fn verify_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    verify::<Claims>(token, secret)
}

pub fn issue_recovery_token(
    email: &str,
    fingerprint: &str,
    secret: &str,
    ttl: Duration,
) -> AppResult<String> {
    let iat = now_secs();
    let claims = RecoveryClaims {
        sub: email.to_string(),
        purpose: RECOVERY_PURPOSE.to_string(),
        fp: fingerprint.to_string(),
        iat,
        exp: iat + ttl.as_secs() as usize,
    };
    sign(&claims, secret)
}

/// verify_recovery_token
///
/// Checks signature, expiry and purpose. Whether `fp` still matches the account is up
/// to the caller.
pub fn verify_recovery_token(token: &str, secret: &str) -> AppResult<RecoveryClaims> {
    let claims = verify::<RecoveryClaims>(token, secret)
        .map_err(|_| AppError::validation("invalid or expired recovery token"))?;

    if claims.purpose != RECOVERY_PURPOSE {
        return Err(AppError::validation("invalid or expired recovery token"));
    }
    Ok(claims)
}

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::auth::dto::{RegisterRequest, TokenRequest};
use crate::auth::repo::AccountRepo;
use crate::auth::repo_types::{Token, User};
use crate::db::RepoError;
use crate::error::{ApiError, ApiResult, FieldErrors};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const TOKEN_LEN: usize = 32;
const TOKEN_ATTEMPTS: usize = 3;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Fresh opaque bearer token.
pub fn generate_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Field-level checks for a registration payload. Returns the trimmed email
/// and the password on success.
pub fn validate_registration(req: &RegisterRequest) -> ApiResult<(String, String)> {
    let mut errors = FieldErrors::new();

    let email = req.email.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() {
        errors.add("email", "can't be blank");
    } else if !is_valid_email(email) {
        errors.add("email", "is invalid");
    }

    let password = req.password.as_deref().unwrap_or_default();
    if password.is_empty() {
        errors.add("password", "can't be blank");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("is too short (minimum is {} characters)", MIN_PASSWORD_LEN),
        );
    }

    if let Some(confirmation) = req.password_confirmation.as_deref() {
        if confirmation != password {
            errors.add("password_confirmation", "doesn't match Password");
        }
    }

    errors.into_result()?;
    Ok((email.to_string(), password.to_string()))
}

pub async fn register_user(repo: &dyn AccountRepo, req: &RegisterRequest) -> ApiResult<User> {
    let (email, password) = validate_registration(req)?;
    let hash = hash_password(&password)?;

    match repo.create_user(&email, &hash).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(user)
        }
        Err(RepoError::Duplicate) => {
            warn!(email = %email, "email already registered");
            Err(ApiError::invalid("email", "has already been taken"))
        }
        Err(RepoError::MissingReference) => Err(anyhow::anyhow!("users has no references").into()),
        Err(RepoError::Other(e)) => Err(e.into()),
    }
}

/// Verify credentials and mint a new token. Existing tokens stay valid.
pub async fn issue_token(repo: &dyn AccountRepo, req: &TokenRequest) -> ApiResult<(Token, User)> {
    let (Some(email), Some(password)) = (req.email.as_deref(), req.password.as_deref()) else {
        warn!("login without email or password");
        return Err(ApiError::unauthorized("account"));
    };

    let Some(user) = repo.find_user_by_email(email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::unauthorized("account"));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthorized("account"));
    }

    for attempt in 1..=TOKEN_ATTEMPTS {
        match repo.create_token(user.id, &generate_token()).await {
            Ok(token) => {
                info!(user_id = %user.id, "token issued");
                return Ok((token, user));
            }
            Err(RepoError::Duplicate) => {
                debug!(user_id = %user.id, attempt, "token collision, retrying");
            }
            Err(RepoError::MissingReference) => {
                warn!(user_id = %user.id, "user vanished during login");
                return Err(ApiError::unauthorized("account"));
            }
            Err(RepoError::Other(e)) => return Err(e.into()),
        }
    }

    Err(anyhow::anyhow!("could not generate a unique token").into())
}

//! User Handlers
//!
//! Registration, login and self-service profile lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{
    self, hash_password, verify_password, JwtKeys, MAX_MOBILE_LEN, MAX_NAME_LEN,
    MIN_PASSWORD_LEN,
};
use crate::domain::{normalize_email, DomainError, Identity, Profile};
use crate::error::AppError;
use crate::store::{BankStore, NewUser};

use super::{LoginCommand, LoginResult, RegisterCommand, RegisterResult};

fn validate_registration(command: &RegisterCommand) -> Result<(), AppError> {
    let name = command.name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Name must be 1 to {} characters",
            MAX_NAME_LEN
        )));
    }
    if !auth::is_valid_email(&normalize_email(&command.email)) {
        return Err(AppError::InvalidRequest("Email address is not valid".to_string()));
    }
    if command.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let mobile = command.mobile.trim();
    if mobile.is_empty() || mobile.chars().count() > MAX_MOBILE_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Mobile must be 1 to {} characters",
            MAX_MOBILE_LEN
        )));
    }
    Ok(())
}

// =========================================================================
// RegisterHandler
// =========================================================================

/// Handler for self-registration
pub struct RegisterHandler {
    store: Arc<dyn BankStore>,
}

impl RegisterHandler {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self { store }
    }

    /// Create a Pending account with zero balance
    pub async fn execute(&self, command: RegisterCommand) -> Result<RegisterResult, AppError> {
        validate_registration(&command)?;
        let email = normalize_email(&command.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "Registration rejected: email already registered");
            return Err(DomainError::DuplicateIdentity.into());
        }

        let password_hash =
            hash_password(&command.password).map_err(|e| AppError::Internal(e.to_string()))?;

        // The unique index still catches a concurrent registration of the same email
        let user = self
            .store
            .insert_user(NewUser::registration(
                command.name.trim().to_string(),
                email,
                password_hash,
                command.mobile.trim().to_string(),
            ))
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::Domain(DomainError::DuplicateIdentity)
                } else {
                    e.into()
                }
            })?;

        tracing::info!(user_id = %user.id, "User registered, pending approval");
        Ok(RegisterResult { user_id: user.id })
    }
}

// =========================================================================
// LoginHandler
// =========================================================================

/// Handler for credential login
pub struct LoginHandler {
    store: Arc<dyn BankStore>,
    keys: JwtKeys,
}

impl LoginHandler {
    pub fn new(store: Arc<dyn BankStore>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub async fn execute(&self, command: LoginCommand) -> Result<LoginResult, AppError> {
        let email = normalize_email(&command.email);

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let matches = verify_password(&command.password, &user.password_hash).unwrap_or_else(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Stored password digest is unreadable");
            false
        });
        if !matches {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(DomainError::InvalidCredentials.into());
        }

        if !user.is_approved() {
            tracing::warn!(user_id = %user.id, "Login rejected: account pending approval");
            return Err(DomainError::NotApproved.into());
        }

        let token = self
            .keys
            .sign(&user)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(LoginResult {
            token,
            profile: Profile::from(&user),
            role: user.role,
        })
    }
}

// =========================================================================
// ProfileHandler
// =========================================================================

/// Handler for reading one's own account
pub struct ProfileHandler {
    store: Arc<dyn BankStore>,
}

impl ProfileHandler {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, identity: &Identity, user_id: Uuid) -> Result<Profile, AppError> {
        identity.require_self(user_id)?;

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        Ok(Profile::from(&user))
    }
}

/// Create an approved administrator unless the email is already taken.
/// Returns whether an account was created.
pub async fn ensure_admin(
    store: &dyn BankStore,
    email: &str,
    password: &str,
) -> Result<bool, AppError> {
    let email = normalize_email(email);
    if !auth::is_valid_email(&email) {
        return Err(AppError::InvalidRequest(
            "Bootstrap admin email is not valid".to_string(),
        ));
    }
    if store.find_user_by_email(&email).await?.is_some() {
        return Ok(false);
    }

    let password_hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;
    let admin = store
        .insert_user(NewUser::admin("Administrator".to_string(), email, password_hash))
        .await?;

    tracing::info!(user_id = %admin.id, "Bootstrap administrator created");
    Ok(true)
}

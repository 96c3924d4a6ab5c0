// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication backends.
//!
//! The account service talks to a backend through [`AuthBackend`]; the local
//! variant keeps Argon2id credential records in the store, the cloud variant
//! (see [`crate::services::identity`]) delegates to the identity provider.

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::Credential;
use crate::store::Store;

/// Account operations an authentication backend provides.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create an account and return its uid.
    ///
    /// Fails with a validation error if the email is already taken.
    async fn create_account(&self, email: &str, password: &str) -> Result<String>;

    /// Verify credentials and return the account's uid.
    ///
    /// Fails with [`AppError::EmailNotFound`] or
    /// [`AppError::IncorrectPassword`] as distinct kinds.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String>;
}

/// Credential records stored beside the profiles (offline variant).
pub struct LocalAuth {
    store: Arc<dyn Store>,
}

impl LocalAuth {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthBackend for LocalAuth {
    async fn create_account(&self, email: &str, password: &str) -> Result<String> {
        if self.store.get_credential(email).await?.is_some() {
            return Err(AppError::Validation("email already registered".to_string()));
        }

        let credential = Credential {
            email: email.to_string(),
            uid: uuid::Uuid::new_v4().to_string(),
            password_hash: hash_password(password)?,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.upsert_credential(&credential).await?;

        tracing::debug!(uid = %credential.uid, "Credential record created");
        Ok(credential.uid)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let credential = self
            .store
            .get_credential(email)
            .await?
            .ok_or(AppError::EmailNotFound)?;

        if !verify_password(password, &credential.password_hash)? {
            return Err(AppError::IncorrectPassword);
        }

        Ok(credential.uid)
    }
}

/// Hash a password with Argon2id, returning a PHC-format string.
pub(crate) fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; errors only if the stored hash is
/// malformed.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid stored hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "Password verification failed: {}",
            e
        ))),
    }
}

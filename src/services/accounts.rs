// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and profile service.
//!
//! Registration and login go through the configured [`AuthBackend`]; profile
//! documents live in the store. The current session is broadcast on a watch
//! channel so UI code can react to login/logout.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use validator::{Validate, ValidationError};

use crate::error::{AppError, Result};
use crate::models::{Session, User};
use crate::services::auth::AuthBackend;
use crate::store::Store;

/// Session token lifetime.
const SESSION_TTL_SECS: usize = 30 * 24 * 60 * 60; // 30 days

/// Registration input, validated before any backend call.
#[derive(Debug, Validate)]
struct RegistrationInput {
    #[validate(
        length(min = 5, message = "email must be at least 5 characters"),
        custom(function = email_contains_at)
    )]
    email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    password: String,
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    username: String,
}

fn email_contains_at(email: &str) -> std::result::Result<(), ValidationError> {
    if email.contains('@') {
        return Ok(());
    }
    let mut err = ValidationError::new("email");
    err.message = Some("email must contain '@'".into());
    Err(err)
}

/// First violated rule, for the error message.
fn first_violation(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .next()
        .map(|err| match &err.message {
            Some(message) => message.to_string(),
            None => err.code.to_string(),
        })
        .unwrap_or_else(|| "invalid input".to_string())
}

/// Profile fields a user may change.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
}

/// Accounts, profiles and sessions.
pub struct AccountService {
    store: Arc<dyn Store>,
    auth: Arc<dyn AuthBackend>,
    signing_key: Vec<u8>,
    session_tx: watch::Sender<Option<Session>>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, auth: Arc<dyn AuthBackend>, signing_key: Vec<u8>) -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            store,
            auth,
            signing_key,
            session_tx,
        }
    }

    /// Register a new user and return the uid.
    ///
    /// Email is normalized to lowercase, username is trimmed. Fails with a
    /// validation error naming the violated rule.
    pub async fn register(&self, email: &str, password: &str, username: &str) -> Result<String> {
        let input = RegistrationInput {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
            username: username.trim().to_string(),
        };
        input
            .validate()
            .map_err(|e| AppError::Validation(first_violation(&e)))?;

        // Case-insensitive uniqueness: everything stored is lowercase.
        if self.store.find_user_by_email(&input.email).await?.is_some() {
            return Err(AppError::Validation("email already registered".to_string()));
        }

        let uid = self
            .auth
            .create_account(&input.email, &input.password)
            .await?;

        let now = chrono::Utc::now().to_rfc3339();
        let user = User::new(uid.clone(), input.email, input.username, &now);
        self.store.upsert_user(&user).await?;

        tracing::info!(uid = %uid, "User registered");
        Ok(uid)
    }

    /// Sign in and establish the current session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        let uid = self.auth.sign_in(&email, password).await?;

        let mut user = self
            .store
            .get_user(&uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", uid)))?;

        let now = chrono::Utc::now().to_rfc3339();
        user.last_active = now.clone();
        self.store.upsert_user(&user).await?;

        let session = Session {
            uid: user.uid,
            email: user.email,
            username: user.username,
            token: create_session_token(&uid, &self.signing_key)?,
            login_time: now,
        };

        self.session_tx.send_replace(Some(session.clone()));
        tracing::info!(uid = %session.uid, "User logged in");

        Ok(session)
    }

    /// Clear the current session.
    pub fn logout(&self) {
        self.session_tx.send_replace(None);
        tracing::info!("User logged out");
    }

    /// Watch the current session; yields on every login/logout.
    pub fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session_tx.borrow().clone()
    }

    pub async fn get_user(&self, uid: &str) -> Result<Option<User>> {
        self.store.get_user(uid).await
    }

    /// Apply a profile update and refresh `last_active`.
    pub async fn update_profile(&self, uid: &str, update: ProfileUpdate) -> Result<User> {
        let mut user = self
            .store
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", uid)))?;

        if let Some(username) = update.username {
            let username = username.trim().to_string();
            if username.len() < 3 {
                return Err(AppError::Validation(
                    "username must be at least 3 characters".to_string(),
                ));
            }
            user.username = username;
        }

        user.last_active = chrono::Utc::now().to_rfc3339();
        self.store.upsert_user(&user).await?;

        Ok(user)
    }

    /// Search profiles by username. Never fails: backend errors are logged
    /// and map to an empty list.
    pub async fn search_by_username(&self, term: &str) -> Vec<User> {
        match self.store.search_users(term.trim()).await {
            Ok(users) => users,
            Err(err) => {
                tracing::warn!(error = %err, "User search failed");
                Vec::new()
            }
        }
    }
}

/// JWT claims for session tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (uid)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Create a signed session token for a user.
fn create_session_token(uid: &str, signing_key: &[u8]) -> Result<String> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?
        .as_secs() as usize;

    let claims = Claims {
        sub: uid.to_string(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))
}

/// Verify a session token and return the uid it was issued for.
pub fn verify_session_token(token: &str, signing_key: &[u8]) -> Result<String> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidSession)?;

    Ok(token_data.claims.sub)
}

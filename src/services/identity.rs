// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider REST client (cloud auth backend).
//!
//! Consumes a Google Identity Toolkit-compatible endpoint; only the
//! email/password flows the account service needs are implemented.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::auth::AuthBackend;

/// Identity provider API client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "returnSecureToken")]
    return_secure_token: bool,
}

#[derive(Deserialize)]
struct IdentityResponse {
    #[serde(rename = "localId")]
    local_id: String,
}

#[derive(Deserialize)]
struct IdentityErrorBody {
    error: IdentityErrorDetail,
}

#[derive(Deserialize)]
struct IdentityErrorDetail {
    message: String,
}

impl IdentityClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// POST an email/password action and return the account's uid.
    async fn password_action(&self, action: &str, email: &str, password: &str) -> Result<String> {
        let url = format!(
            "{}/v1/accounts:{}?key={}",
            self.endpoint, action, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let body: IdentityResponse = response
                .json()
                .await
                .map_err(|e| AppError::Identity(format!("JSON parse error: {}", e)))?;
            return Ok(body.local_id);
        }

        let message = response
            .json::<IdentityErrorBody>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| status.to_string());

        Err(map_identity_error(&message))
    }
}

/// Map provider error codes to the distinct kinds callers match on.
///
/// Codes may carry a suffix ("INVALID_PASSWORD : ..."), so match on the
/// prefix.
fn map_identity_error(message: &str) -> AppError {
    if message.starts_with("EMAIL_NOT_FOUND") {
        AppError::EmailNotFound
    } else if message.starts_with("INVALID_PASSWORD")
        || message.starts_with("INVALID_LOGIN_CREDENTIALS")
    {
        AppError::IncorrectPassword
    } else if message.starts_with("EMAIL_EXISTS") {
        AppError::Validation("email already registered".to_string())
    } else {
        AppError::Identity(message.to_string())
    }
}

#[async_trait]
impl AuthBackend for IdentityClient {
    async fn create_account(&self, email: &str, password: &str) -> Result<String> {
        self.password_action("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        self.password_action("signInWithPassword", email, password)
            .await
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by stores and services.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Email not found")]
    EmailNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, AppError>;

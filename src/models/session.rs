//! Session issued on login.

use serde::{Deserialize, Serialize};

/// An authenticated session for the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub username: String,
    /// Signed session token (HS256 JWT)
    pub token: String,
    /// When the session was established (ISO 8601)
    pub login_time: String,
}

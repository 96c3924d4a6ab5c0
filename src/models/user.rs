//! User profile and credential models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User profile document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable user ID (also used as document ID)
    pub uid: String,
    /// Email address, stored lowercase
    pub email: String,
    /// Display name
    pub username: String,
    /// Reputation score, never below zero
    #[serde(default)]
    pub reputation: u32,
    /// Completed trades this user took part in
    #[serde(default)]
    pub trades_count: u32,
    /// Badge labels; once granted, never removed
    #[serde(default)]
    pub badges: Vec<String>,
    /// Linked third-party identities, one entry per platform
    #[serde(default)]
    pub linked_accounts: BTreeMap<String, String>,
    /// When the account was created (ISO 8601)
    pub created_at: String,
    /// Last profile activity (ISO 8601)
    pub last_active: String,
}

impl User {
    /// Fresh profile with zeroed counters.
    pub fn new(uid: String, email: String, username: String, now: &str) -> Self {
        Self {
            uid,
            email,
            username,
            reputation: 0,
            trades_count: 0,
            badges: Vec::new(),
            linked_accounts: BTreeMap::new(),
            created_at: now.to_string(),
            last_active: now.to_string(),
        }
    }

    pub fn has_badge(&self, label: &str) -> bool {
        self.badges.iter().any(|b| b == label)
    }

    /// Grant-if-absent. Returns `true` if the badge was newly added.
    pub fn grant_badge(&mut self, label: &str) -> bool {
        if self.has_badge(label) {
            return false;
        }
        self.badges.push(label.to_string());
        true
    }
}

/// Credential record for the local auth backend.
///
/// The cloud backend delegates credentials to the identity provider and
/// never stores these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Email address, lowercase (also used as document ID)
    pub email: String,
    /// The uid of the profile this credential unlocks
    pub uid: String,
    /// Argon2id hash in PHC string format
    pub password_hash: String,
    /// When the credential was created (ISO 8601)
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_badge_is_idempotent() {
        let mut user = User::new(
            "u1".into(),
            "a@b.co".into(),
            "alice".into(),
            "2026-01-01T00:00:00Z",
        );

        assert!(user.grant_badge("First Trade"));
        assert!(!user.grant_badge("First Trade"));
        assert_eq!(user.badges, vec!["First Trade".to_string()]);
    }
}

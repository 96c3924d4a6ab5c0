// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Linked third-party accounts.
//!
//! Links live on the user document as a platform -> username map, so one
//! entry per platform holds by construction.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::store::Store;

pub struct LinkService {
    store: Arc<dyn Store>,
}

impl LinkService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Link (or replace) the user's identity on a platform.
    pub async fn link_account(&self, uid: &str, platform: &str, username: &str) -> Result<()> {
        let mut user = self
            .store
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", uid)))?;

        user.linked_accounts
            .insert(platform.to_string(), username.to_string());
        self.store.upsert_user(&user).await?;

        tracing::debug!(uid, platform, "Account linked");
        Ok(())
    }

    /// Remove the user's link for a platform. No-op if absent.
    pub async fn unlink_account(&self, uid: &str, platform: &str) -> Result<()> {
        let mut user = self
            .store
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", uid)))?;

        if user.linked_accounts.remove(platform).is_some() {
            self.store.upsert_user(&user).await?;
            tracing::debug!(uid, platform, "Account unlinked");
        }

        Ok(())
    }

    pub async fn linked_accounts(&self, uid: &str) -> Result<BTreeMap<String, String>> {
        let user = self
            .store
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", uid)))?;

        Ok(user.linked_accounts)
    }
}

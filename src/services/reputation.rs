// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reputation counters and badge evaluation.
//!
//! All mutations are read-modify-write cycles on the user document. A
//! per-uid lock serializes those cycles within this process; the storage
//! backend's single-document atomicity is the only cross-process guarantee.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::events::{DomainEvent, EventHandler};
use crate::models::badge::earned_badges;
use crate::models::{Badge, User};
use crate::store::Store;

/// Reputation awarded to each party on trade completion.
const TRADE_REPUTATION_AWARD: u32 = 10;
/// Reputation deducted from a reported user.
const REPORT_REPUTATION_PENALTY: u32 = 5;

pub struct ReputationEngine {
    store: Arc<dyn Store>,
    /// Per-uid locks serializing read-modify-write cycles
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ReputationEngine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    fn user_lock(&self, uid: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(uid.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Read-modify-write a user under the per-uid lock.
    ///
    /// A missing user is a no-op with a warning: reputation changes are
    /// secondary effects and must not fail the primary operation over a
    /// dangling uid.
    async fn mutate_user<F>(&self, uid: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut User) + Send,
    {
        let lock = self.user_lock(uid);
        let _guard = lock.lock().await;

        let Some(mut user) = self.store.get_user(uid).await? else {
            tracing::warn!(uid, "Reputation change for unknown user ignored");
            return Ok(());
        };

        mutate(&mut user);
        self.store.upsert_user(&user).await
    }

    pub async fn increase_reputation(&self, uid: &str, amount: u32) -> Result<()> {
        self.mutate_user(uid, |user| {
            user.reputation = user.reputation.saturating_add(amount);
        })
        .await
    }

    /// Decrease reputation, clamped at zero.
    pub async fn decrease_reputation(&self, uid: &str, amount: u32) -> Result<()> {
        self.mutate_user(uid, |user| {
            user.reputation = user.reputation.saturating_sub(amount);
        })
        .await
    }

    /// Grant a badge if absent.
    pub async fn award_badge(&self, uid: &str, badge: Badge) -> Result<()> {
        self.mutate_user(uid, |user| {
            if user.grant_badge(badge.label()) {
                tracing::info!(uid = %user.uid, badge = badge.label(), "Badge granted");
            }
        })
        .await
    }

    /// Recompute earned badges from current counters and grant the missing
    /// ones. Badges already present are never removed.
    pub async fn evaluate_badges(&self, uid: &str) -> Result<()> {
        // Read outside the lock: the count only feeds the monotonic
        // Clean Account grant.
        let reports_received = self.store.reports_against(uid).await?.len();

        self.mutate_user(uid, |user| {
            for badge in earned_badges(user.trades_count, user.reputation, reports_received) {
                if user.grant_badge(badge.label()) {
                    tracing::info!(uid = %user.uid, badge = badge.label(), "Badge granted");
                }
            }
        })
        .await
    }

    /// Counter updates for one participant of a completed trade.
    async fn apply_trade_completion(&self, uid: &str) -> Result<()> {
        self.mutate_user(uid, |user| {
            user.trades_count += 1;
            user.reputation = user.reputation.saturating_add(TRADE_REPUTATION_AWARD);
        })
        .await?;

        self.evaluate_badges(uid).await
    }
}

#[async_trait]
impl EventHandler for ReputationEngine {
    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        match event {
            DomainEvent::TradeCompleted { user1, user2, .. } => {
                // Apply to each party independently; one failing must not
                // starve the other.
                for uid in [user1, user2] {
                    if let Err(err) = self.apply_trade_completion(uid).await {
                        tracing::warn!(uid, error = %err, "Trade completion update failed");
                    }
                }
                Ok(())
            }
            DomainEvent::ReportFiled { reported_uid, .. } => {
                self.decrease_reputation(reported_uid, REPORT_REPUTATION_PENALTY)
                    .await
            }
        }
    }
}

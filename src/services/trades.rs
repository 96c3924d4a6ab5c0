// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trade ledger service.
//!
//! Confirmation flow:
//! 1. The store records the confirmation and checks for completion as one
//!    atomic unit.
//! 2. On the pending -> completed transition (and only then), a
//!    `TradeCompleted` event is published; the reputation engine applies
//!    counters and badges downstream.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::events::{DomainEvent, EventBus};
use crate::models::Trade;
use crate::store::{ConfirmOutcome, Store};

pub struct TradeService {
    store: Arc<dyn Store>,
    events: EventBus,
}

impl TradeService {
    pub fn new(store: Arc<dyn Store>, events: EventBus) -> Self {
        Self { store, events }
    }

    /// Propose a trade between two distinct users.
    pub async fn create_trade(
        &self,
        user1: &str,
        user2: &str,
        items: serde_json::Value,
        evidence: &str,
    ) -> Result<String> {
        if user1 == user2 {
            return Err(AppError::Validation(
                "a trade requires two distinct users".to_string(),
            ));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let trade = Trade::new(
            uuid::Uuid::new_v4().to_string(),
            user1.to_string(),
            user2.to_string(),
            items,
            evidence.to_string(),
            &now,
        );
        self.store.insert_trade(&trade).await?;

        tracing::info!(trade_id = %trade.id, user1, user2, "Trade created");
        Ok(trade.id)
    }

    /// Record `uid`'s confirmation.
    ///
    /// A confirmation from a user who is neither party is a no-op. When both
    /// parties have confirmed, the completion side effects run exactly once.
    pub async fn confirm_trade(&self, trade_id: &str, uid: &str) -> Result<ConfirmOutcome> {
        let outcome = self.store.confirm_trade(trade_id, uid).await?;

        match &outcome {
            ConfirmOutcome::Completed(trade) => {
                tracing::info!(trade_id, "Trade completed");
                self.events
                    .publish(DomainEvent::TradeCompleted {
                        trade_id: trade.id.clone(),
                        user1: trade.user1.clone(),
                        user2: trade.user2.clone(),
                    })
                    .await;
            }
            ConfirmOutcome::Confirmed => {
                tracing::debug!(trade_id, uid, "Confirmation recorded");
            }
            ConfirmOutcome::NotParty => {
                tracing::debug!(trade_id, uid, "Confirmation from non-party ignored");
            }
            ConfirmOutcome::AlreadyCompleted => {
                tracing::debug!(trade_id, "Trade already completed");
            }
        }

        Ok(outcome)
    }

    pub async fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>> {
        self.store.get_trade(trade_id).await
    }

    /// All trades the user takes part in, newest first.
    pub async fn trades_for_user(&self, uid: &str) -> Result<Vec<Trade>> {
        self.store.trades_for_user(uid).await
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trade ledger models.

use serde::{Deserialize, Serialize};

/// Trade lifecycle. A completed trade is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Pending,
    Completed,
}

/// A proposed exchange between two users requiring mutual confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade ID (also used as document ID)
    pub id: String,
    /// Proposing party
    pub user1: String,
    /// Counterparty
    pub user2: String,
    /// Opaque items payload supplied by the UI
    pub items: serde_json::Value,
    /// Free-form evidence text
    #[serde(default)]
    pub evidence: String,
    pub status: TradeStatus,
    #[serde(default)]
    pub user1_confirmed: bool,
    #[serde(default)]
    pub user2_confirmed: bool,
    /// When the trade was proposed (ISO 8601)
    pub created_at: String,
}

impl Trade {
    /// New pending trade with both confirmation flags cleared.
    pub fn new(
        id: String,
        user1: String,
        user2: String,
        items: serde_json::Value,
        evidence: String,
        now: &str,
    ) -> Self {
        Self {
            id,
            user1,
            user2,
            items,
            evidence,
            status: TradeStatus::Pending,
            user1_confirmed: false,
            user2_confirmed: false,
            created_at: now.to_string(),
        }
    }

    pub fn is_party(&self, uid: &str) -> bool {
        self.user1 == uid || self.user2 == uid
    }

    pub fn both_confirmed(&self) -> bool {
        self.user1_confirmed && self.user2_confirmed
    }
}

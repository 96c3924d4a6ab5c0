// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Domain events decoupling the ledgers from the reputation engine.
//!
//! Events are dispatched synchronously: the publisher awaits every handler,
//! and handler failures are logged and swallowed. A failed secondary update
//! (reputation, badges) never aborts the primary operation that raised the
//! event.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Something that happened in a primary operation and has downstream effects.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Both parties confirmed; the trade transitioned to completed.
    TradeCompleted {
        trade_id: String,
        user1: String,
        user2: String,
    },
    /// A report was filed against `reported_uid`.
    ReportFiled {
        report_id: String,
        reported_uid: String,
    },
}

/// Downstream consumer of domain events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent) -> Result<()>;
}

/// In-process dispatcher.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Deliver `event` to every handler, logging failures.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in &self.handlers {
            if let Err(err) = handler.handle(&event).await {
                tracing::warn!(error = %err, event = ?event, "Event handler failed");
            }
        }
    }
}

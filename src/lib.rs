// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tradepost: client data layer for a peer-to-peer trading community.
//!
//! This crate provides CRUD-style services for user accounts, trades,
//! reports, linked accounts and a derived reputation/badge system, over two
//! interchangeable backends: a Firestore document database and a local
//! persisted JSON store.

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use config::{Config, StoreBackend};
use error::Result;
use events::EventBus;
use services::{
    AccountService, AuthBackend, IdentityClient, LinkService, LocalAuth, ReportService,
    ReputationEngine, TradeService,
};
use store::{FirestoreStore, LocalStore, Store};

/// The assembled service surface.
pub struct Client {
    pub accounts: AccountService,
    pub trades: TradeService,
    pub reports: ReportService,
    pub links: LinkService,
    pub reputation: Arc<ReputationEngine>,
}

impl Client {
    /// Connect using the backend selected in the configuration.
    pub async fn connect(config: &Config) -> Result<Self> {
        match config.backend {
            StoreBackend::Local => {
                let store: Arc<dyn Store> =
                    Arc::new(LocalStore::open(&config.local_data_path).await?);
                let auth: Arc<dyn AuthBackend> = Arc::new(LocalAuth::new(store.clone()));
                Ok(Self::assemble(store, auth, config))
            }
            StoreBackend::Cloud => {
                let store: Arc<dyn Store> =
                    Arc::new(FirestoreStore::new(&config.gcp_project_id).await?);
                let auth: Arc<dyn AuthBackend> = Arc::new(IdentityClient::new(
                    &config.identity_endpoint,
                    &config.identity_api_key,
                ));
                Ok(Self::assemble(store, auth, config))
            }
        }
    }

    /// Wire the services over explicit store and auth backends.
    ///
    /// Used by [`Client::connect`] and by tests that inject backends
    /// directly.
    pub fn assemble(store: Arc<dyn Store>, auth: Arc<dyn AuthBackend>, config: &Config) -> Self {
        let reputation = Arc::new(ReputationEngine::new(store.clone()));

        let mut events = EventBus::new();
        events.subscribe(reputation.clone());

        Self {
            accounts: AccountService::new(
                store.clone(),
                auth,
                config.session_signing_key.clone(),
            ),
            trades: TradeService::new(store.clone(), events.clone()),
            reports: ReportService::new(store.clone(), events),
            links: LinkService::new(store),
            reputation,
        }
    }
}

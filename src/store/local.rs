// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local persisted key-value backend.
//!
//! The cloud schema expressed as nested objects in a single JSON file: one
//! map per collection, keyed by document id. Every mutation is written
//! through to disk, so a fresh process sees the same state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{Credential, Report, Trade, User};
use crate::store::{apply_confirmation, ConfirmOutcome, Store};

/// On-disk shape. BTreeMaps keep the file diffable.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalData {
    /// uid -> profile
    #[serde(default)]
    users: BTreeMap<String, User>,
    /// lowercase email -> credential
    #[serde(default)]
    accounts: BTreeMap<String, Credential>,
    /// trade id -> trade
    #[serde(default)]
    trades: BTreeMap<String, Trade>,
    /// report id -> report
    #[serde(default)]
    reports: BTreeMap<String, Report>,
}

/// Write-through JSON file store.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    data: RwLock<LocalData>,
}

impl LocalStore {
    /// Open the store file, creating an empty store if it does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Database(format!("Corrupt store file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LocalData::default(),
            Err(e) => {
                return Err(AppError::Database(format!(
                    "Failed to read store file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Database(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        tracing::info!(path = %path.display(), "Local store opened");

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Persist the full store. Called with the write lock held, so writes
    /// cannot interleave.
    async fn flush(&self, data: &LocalData) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| AppError::Database(format!("Failed to serialize store: {}", e)))?;

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            AppError::Database(format!(
                "Failed to write store file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl Store for LocalStore {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        Ok(self.data.read().await.users.get(uid).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let data = self.data.read().await;
        Ok(data.users.values().find(|u| u.email == email).cloned())
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        data.users.insert(user.uid.clone(), user.clone());
        self.flush(&data).await
    }

    /// Case-insensitive substring match over all usernames.
    async fn search_users(&self, term: &str) -> Result<Vec<User>, AppError> {
        let term = term.to_lowercase();
        let data = self.data.read().await;

        Ok(data
            .users
            .values()
            .filter(|u| u.username.to_lowercase().contains(&term))
            .cloned()
            .collect())
    }

    // ─── Credential Operations ───────────────────────────────────

    async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        Ok(self.data.read().await.accounts.get(email).cloned())
    }

    async fn upsert_credential(&self, credential: &Credential) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        data.accounts
            .insert(credential.email.clone(), credential.clone());
        self.flush(&data).await
    }

    // ─── Trade Operations ────────────────────────────────────────

    async fn insert_trade(&self, trade: &Trade) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        data.trades.insert(trade.id.clone(), trade.clone());
        self.flush(&data).await
    }

    async fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>, AppError> {
        Ok(self.data.read().await.trades.get(trade_id).cloned())
    }

    async fn trades_for_user(&self, uid: &str) -> Result<Vec<Trade>, AppError> {
        let data = self.data.read().await;

        let mut trades: Vec<Trade> = data
            .trades
            .values()
            .filter(|t| t.is_party(uid))
            .cloned()
            .collect();
        trades.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(trades)
    }

    /// The write lock makes the flag-set and completion check one atomic
    /// unit; no other task can observe the intermediate state.
    async fn confirm_trade(&self, trade_id: &str, uid: &str) -> Result<ConfirmOutcome, AppError> {
        let mut data = self.data.write().await;

        let trade = data
            .trades
            .get_mut(trade_id)
            .ok_or_else(|| AppError::NotFound(format!("trade {}", trade_id)))?;

        let outcome = apply_confirmation(trade, uid);

        if matches!(
            outcome,
            ConfirmOutcome::Confirmed | ConfirmOutcome::Completed(_)
        ) {
            self.flush(&data).await?;
        }

        Ok(outcome)
    }

    // ─── Report Operations ───────────────────────────────────────

    async fn insert_report(&self, report: &Report) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        data.reports.insert(report.id.clone(), report.clone());
        self.flush(&data).await
    }

    async fn reports_by_reporter(&self, uid: &str) -> Result<Vec<Report>, AppError> {
        let data = self.data.read().await;

        let mut reports: Vec<Report> = data
            .reports
            .values()
            .filter(|r| r.reporter_uid == uid)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(reports)
    }

    async fn reports_against(&self, uid: &str) -> Result<Vec<Report>, AppError> {
        let data = self.data.read().await;

        let mut reports: Vec<Report> = data
            .reports
            .values()
            .filter(|r| r.reported_uid == uid)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(reports)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore backend with typed operations.
//!
//! Collections:
//! - Users (profile documents, keyed by uid)
//! - Accounts (credential records, keyed by lowercase email)
//! - Trades
//! - Reports

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Credential, Report, Trade, User};
use crate::store::{apply_confirmation, collections, ConfirmOutcome, Store};

/// Closes a prefix range over a string field (last code point of the
/// Unicode private-use area).
const PREFIX_RANGE_END: char = '\u{f8ff}';

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // ExternalJwtFunctionSource provides a dummy token without needing a
        // custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl Store for FirestoreStore {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Prefix-range match on `username`, the native way to express "starts
    /// with" against a single indexed field.
    async fn search_users(&self, term: &str) -> Result<Vec<User>, AppError> {
        let start = term.to_string();
        let end = format!("{}{}", term, PREFIX_RANGE_END);

        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| {
                q.for_all([
                    q.field("username").greater_than_or_equal(start.clone()),
                    q.field("username").less_than_or_equal(end.clone()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Credential Operations ───────────────────────────────────

    async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACCOUNTS)
            .obj()
            .one(email)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_credential(&self, credential: &Credential) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACCOUNTS)
            .document_id(&credential.email)
            .object(credential)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Trade Operations ────────────────────────────────────────

    async fn insert_trade(&self, trade: &Trade) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TRADES)
            .document_id(&trade.id)
            .object(trade)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TRADES)
            .obj()
            .one(trade_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn trades_for_user(&self, uid: &str) -> Result<Vec<Trade>, AppError> {
        // The backend has no OR filter; query each side concurrently and merge.
        let as_user1 = uid.to_string();
        let as_user2 = uid.to_string();

        let query_user1 = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::TRADES)
            .filter(move |q| q.for_all([q.field("user1").eq(as_user1.clone())]))
            .obj::<Trade>()
            .query();

        let query_user2 = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::TRADES)
            .filter(move |q| q.for_all([q.field("user2").eq(as_user2.clone())]))
            .obj::<Trade>()
            .query();

        let (mut trades, other_side) = futures_util::try_join!(query_user1, query_user2)
            .map_err(|e| AppError::Database(e.to_string()))?;

        trades.extend(other_side);
        trades.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(trades)
    }

    /// Record a confirmation atomically.
    ///
    /// Uses a Firestore transaction so the flag-set and the completion check
    /// are a single unit: if the other party confirms concurrently, Firestore
    /// retries with fresh data and exactly one caller observes the
    /// pending -> completed transition.
    async fn confirm_trade(&self, trade_id: &str, uid: &str) -> Result<ConfirmOutcome, AppError> {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the trade within the transaction; this registers the document
        // for conflict detection.
        let trade: Option<Trade> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TRADES)
            .obj()
            .one(trade_id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read trade in transaction: {}", e))
            })?;

        let Some(mut trade) = trade else {
            let _ = transaction.rollback().await;
            return Err(AppError::NotFound(format!("trade {}", trade_id)));
        };

        let outcome = apply_confirmation(&mut trade, uid);

        match &outcome {
            ConfirmOutcome::Confirmed | ConfirmOutcome::Completed(_) => {
                self.get_client()?
                    .fluent()
                    .update()
                    .in_col(collections::TRADES)
                    .document_id(&trade.id)
                    .object(&trade)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add trade to transaction: {}", e))
                    })?;

                transaction
                    .commit()
                    .await
                    .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;
            }
            // Nothing to write; release the registered read.
            ConfirmOutcome::NotParty | ConfirmOutcome::AlreadyCompleted => {
                let _ = transaction.rollback().await;
            }
        }

        Ok(outcome)
    }

    // ─── Report Operations ───────────────────────────────────────

    async fn insert_report(&self, report: &Report) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::REPORTS)
            .document_id(&report.id)
            .object(report)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn reports_by_reporter(&self, uid: &str) -> Result<Vec<Report>, AppError> {
        let uid = uid.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::REPORTS)
            .filter(move |q| q.for_all([q.field("reporter_uid").eq(uid.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn reports_against(&self, uid: &str) -> Result<Vec<Report>, AppError> {
        let uid = uid.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::REPORTS)
            .filter(move |q| q.for_all([q.field("reported_uid").eq(uid.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

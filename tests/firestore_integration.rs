// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore backend tests. Most require the emulator:
//!
//! ```sh
//! gcloud emulators firestore start --host-port=localhost:8920
//! FIRESTORE_EMULATOR_HOST=localhost:8920 cargo test
//! ```

mod common;

use tradepost::error::AppError;
use tradepost::models::{Trade, User};
use tradepost::store::{ConfirmOutcome, FirestoreStore, Store};

async fn test_store() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

fn unique_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[tokio::test]
async fn test_offline_mock_reports_database_error() {
    let store = FirestoreStore::new_mock();

    let err = store.get_user("u1").await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn test_user_roundtrip() {
    require_emulator!();
    let store = test_store().await;

    let uid = unique_uid();
    let user = User::new(
        uid.clone(),
        format!("{}@example.com", uid),
        format!("user-{}", uid),
        "2026-01-01T00:00:00Z",
    );

    store.upsert_user(&user).await.unwrap();

    let got = store.get_user(&uid).await.unwrap().unwrap();
    assert_eq!(got.email, user.email);

    let by_email = store.find_user_by_email(&user.email).await.unwrap();
    assert_eq!(by_email.map(|u| u.uid), Some(uid));
}

#[tokio::test]
async fn test_confirm_trade_transaction_outcomes() {
    require_emulator!();
    let store = test_store().await;

    let (alice, bob) = (unique_uid(), unique_uid());
    let trade = Trade::new(
        unique_uid(),
        alice.clone(),
        bob.clone(),
        serde_json::json!(["sword"]),
        String::new(),
        "2026-01-01T00:00:00Z",
    );
    store.insert_trade(&trade).await.unwrap();

    let outcome = store.confirm_trade(&trade.id, "stranger").await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::NotParty);

    let outcome = store.confirm_trade(&trade.id, &alice).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::Confirmed);

    let outcome = store.confirm_trade(&trade.id, &bob).await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Completed(_)));

    let outcome = store.confirm_trade(&trade.id, &alice).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::AlreadyCompleted);

    let err = store.confirm_trade("missing", &alice).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

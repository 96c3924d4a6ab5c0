// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence behavior of the local JSON backend.

mod common;

use common::temp_store_path;
use tradepost::error::AppError;
use tradepost::models::{Trade, User};
use tradepost::store::{LocalStore, Store};

fn sample_user(uid: &str, username: &str) -> User {
    User::new(
        uid.to_string(),
        format!("{}@example.com", username),
        username.to_string(),
        "2026-01-01T00:00:00Z",
    )
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let path = temp_store_path();

    {
        let store = LocalStore::open(&path).await.unwrap();
        store.upsert_user(&sample_user("u1", "alice")).await.unwrap();
        store
            .insert_trade(&Trade::new(
                "t1".into(),
                "u1".into(),
                "u2".into(),
                serde_json::json!(["sword"]),
                String::new(),
                "2026-01-01T00:00:00Z",
            ))
            .await
            .unwrap();
    }

    let reopened = LocalStore::open(&path).await.unwrap();

    let user = reopened.get_user("u1").await.unwrap().unwrap();
    assert_eq!(user.username, "alice");

    let trade = reopened.get_trade("t1").await.unwrap().unwrap();
    assert_eq!(trade.user1, "u1");
}

#[tokio::test]
async fn test_file_holds_one_object_per_collection() {
    let path = temp_store_path();

    let store = LocalStore::open(&path).await.unwrap();
    store.upsert_user(&sample_user("u1", "alice")).await.unwrap();

    let raw = tokio::fs::read(&path).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();

    assert!(value.get("users").and_then(|u| u.get("u1")).is_some());
    assert!(value.get("trades").is_some());
    assert!(value.get("reports").is_some());
    assert!(value.get("accounts").is_some());
}

#[tokio::test]
async fn test_corrupt_file_is_a_database_error() {
    let path = temp_store_path();
    tokio::fs::write(&path, b"not json at all").await.unwrap();

    let err = LocalStore::open(&path).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn test_find_user_by_email_matches_stored_lowercase() {
    let path = temp_store_path();
    let store = LocalStore::open(&path).await.unwrap();

    store.upsert_user(&sample_user("u1", "alice")).await.unwrap();

    assert!(store
        .find_user_by_email("alice@example.com")
        .await
        .unwrap()
        .is_some());
    assert!(store
        .find_user_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_confirm_missing_trade_is_not_found() {
    let path = temp_store_path();
    let store = LocalStore::open(&path).await.unwrap();

    let err = store.confirm_trade("missing", "u1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

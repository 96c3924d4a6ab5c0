// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Two-party trade confirmation and its side effects.

mod common;

use common::{register_user, test_env, TestEnv};
use tradepost::error::AppError;
use tradepost::models::TradeStatus;
use tradepost::store::{ConfirmOutcome, Store};

async fn two_users(env: &TestEnv) -> (String, String) {
    let alice = register_user(&env.client, "alice@example.com", "alice").await;
    let bob = register_user(&env.client, "bob@example.com", "bob").await;
    (alice, bob)
}

#[tokio::test]
async fn test_create_trade_starts_pending() {
    let env = test_env().await;
    let (alice, bob) = two_users(&env).await;

    let trade_id = env
        .client
        .trades
        .create_trade(&alice, &bob, serde_json::json!(["sword", "shield"]), "")
        .await
        .unwrap();

    let trade = env.client.trades.get_trade(&trade_id).await.unwrap().unwrap();
    assert_eq!(trade.status, TradeStatus::Pending);
    assert!(!trade.user1_confirmed);
    assert!(!trade.user2_confirmed);
}

#[tokio::test]
async fn test_create_trade_rejects_self_trade() {
    let env = test_env().await;
    let (alice, _) = two_users(&env).await;

    let err = env
        .client
        .trades
        .create_trade(&alice, &alice, serde_json::json!([]), "")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_confirm_unknown_trade_is_not_found() {
    let env = test_env().await;
    let (alice, _) = two_users(&env).await;

    let err = env
        .client
        .trades
        .confirm_trade("no-such-trade", &alice)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_confirmation_by_stranger_changes_nothing() {
    let env = test_env().await;
    let (alice, bob) = two_users(&env).await;
    let carol = register_user(&env.client, "carol@example.com", "carol").await;

    let trade_id = env
        .client
        .trades
        .create_trade(&alice, &bob, serde_json::json!([]), "")
        .await
        .unwrap();

    let outcome = env.client.trades.confirm_trade(&trade_id, &carol).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::NotParty);

    let trade = env.client.trades.get_trade(&trade_id).await.unwrap().unwrap();
    assert_eq!(trade.status, TradeStatus::Pending);
    assert!(!trade.user1_confirmed);
    assert!(!trade.user2_confirmed);
}

#[tokio::test]
async fn test_single_confirmation_has_no_side_effects() {
    let env = test_env().await;
    let (alice, bob) = two_users(&env).await;

    let trade_id = env
        .client
        .trades
        .create_trade(&alice, &bob, serde_json::json!([]), "")
        .await
        .unwrap();

    let outcome = env.client.trades.confirm_trade(&trade_id, &alice).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::Confirmed);

    let trade = env.client.trades.get_trade(&trade_id).await.unwrap().unwrap();
    assert_eq!(trade.status, TradeStatus::Pending);
    assert!(trade.user1_confirmed);

    let alice_user = env.store.get_user(&alice).await.unwrap().unwrap();
    assert_eq!(alice_user.reputation, 0);
    assert_eq!(alice_user.trades_count, 0);
}

#[tokio::test]
async fn test_both_confirmations_complete_and_reward_exactly_once() {
    let env = test_env().await;
    let (alice, bob) = two_users(&env).await;

    let trade_id = env
        .client
        .trades
        .create_trade(&alice, &bob, serde_json::json!(["sword"]), "screenshot")
        .await
        .unwrap();

    env.client.trades.confirm_trade(&trade_id, &alice).await.unwrap();
    let outcome = env.client.trades.confirm_trade(&trade_id, &bob).await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Completed(_)));

    let trade = env.client.trades.get_trade(&trade_id).await.unwrap().unwrap();
    assert_eq!(trade.status, TradeStatus::Completed);

    for uid in [&alice, &bob] {
        let user = env.store.get_user(uid).await.unwrap().unwrap();
        assert_eq!(user.reputation, 10);
        assert_eq!(user.trades_count, 1);
        assert!(user.has_badge("First Trade"));
    }

    // Re-confirming a completed trade must not re-apply anything.
    let outcome = env.client.trades.confirm_trade(&trade_id, &alice).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::AlreadyCompleted);

    let user = env.store.get_user(&alice).await.unwrap().unwrap();
    assert_eq!(user.reputation, 10);
    assert_eq!(user.trades_count, 1);
}

#[tokio::test]
async fn test_completion_crosses_badge_thresholds() {
    let env = test_env().await;
    let (alice, bob) = two_users(&env).await;

    // Alice is one trade short of "10 Trades" and five reputation short of
    // "Trusted Trader".
    let mut user = env.store.get_user(&alice).await.unwrap().unwrap();
    user.trades_count = 9;
    user.reputation = 95;
    env.store.upsert_user(&user).await.unwrap();

    let trade_id = env
        .client
        .trades
        .create_trade(&alice, &bob, serde_json::json!([]), "")
        .await
        .unwrap();
    env.client.trades.confirm_trade(&trade_id, &alice).await.unwrap();
    env.client.trades.confirm_trade(&trade_id, &bob).await.unwrap();

    let user = env.store.get_user(&alice).await.unwrap().unwrap();
    assert_eq!(user.trades_count, 10);
    assert_eq!(user.reputation, 105);
    assert!(user.has_badge("10 Trades"));
    assert!(user.has_badge("Trusted Trader"));
}

#[tokio::test]
async fn test_trades_for_user_lists_both_sides() {
    let env = test_env().await;
    let (alice, bob) = two_users(&env).await;
    let carol = register_user(&env.client, "carol@example.com", "carol").await;

    let first = env
        .client
        .trades
        .create_trade(&alice, &bob, serde_json::json!([]), "")
        .await
        .unwrap();
    let second = env
        .client
        .trades
        .create_trade(&carol, &alice, serde_json::json!([]), "")
        .await
        .unwrap();

    let trades = env.client.trades.trades_for_user(&alice).await.unwrap();
    let ids: Vec<&str> = trades.iter().map(|t| t.id.as_str()).collect();

    assert_eq!(trades.len(), 2);
    assert!(ids.contains(&first.as_str()));
    assert!(ids.contains(&second.as_str()));

    assert!(env.client.trades.trades_for_user(&bob).await.unwrap().len() == 1);
}

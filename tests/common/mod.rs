// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::path::PathBuf;
use std::sync::Arc;

use tradepost::config::Config;
use tradepost::services::{AuthBackend, LocalAuth};
use tradepost::store::{LocalStore, Store};
use tradepost::Client;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Unique store file under the system temp dir.
#[allow(dead_code)]
pub fn temp_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("tradepost-test-{}.json", uuid::Uuid::new_v4()))
}

/// Assembled client over a fresh local store, plus direct store access for
/// fixtures and assertions.
pub struct TestEnv {
    pub client: Client,
    pub store: Arc<dyn Store>,
    #[allow(dead_code)]
    pub path: PathBuf,
}

#[allow(dead_code)]
pub async fn test_env() -> TestEnv {
    init_tracing();

    let path = temp_store_path();
    let store: Arc<dyn Store> = Arc::new(
        LocalStore::open(&path)
            .await
            .expect("Failed to open local store"),
    );
    let auth: Arc<dyn AuthBackend> = Arc::new(LocalAuth::new(store.clone()));
    let client = Client::assemble(store.clone(), auth, &Config::default());

    TestEnv {
        client,
        store,
        path,
    }
}

/// Register a user with a standard password and return the uid.
#[allow(dead_code)]
pub async fn register_user(client: &Client, email: &str, username: &str) -> String {
    client
        .accounts
        .register(email, "secret123", username)
        .await
        .expect("Registration should succeed")
}

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

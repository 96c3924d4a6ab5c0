//! Storage layer: one trait, two interchangeable backends.

pub mod firestore;
pub mod local;

pub use firestore::FirestoreStore;
pub use local::LocalStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Credential, Report, Trade, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Credential records for the local auth backend
    pub const ACCOUNTS: &str = "accounts";
    pub const TRADES: &str = "trades";
    pub const REPORTS: &str = "reports";
}

/// Outcome of recording a trade confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// Caller is neither party; nothing changed
    NotParty,
    /// Flag recorded, the other party has not confirmed yet
    Confirmed,
    /// Both flags set; this call performed the pending -> completed transition
    Completed(Trade),
    /// Trade was already completed; nothing changed
    AlreadyCompleted,
}

/// Typed document operations shared by the cloud and local backends.
///
/// Single-document updates are the only atomicity either backend guarantees,
/// except for [`Store::confirm_trade`], which performs the flag-set and the
/// completion check as one atomic unit.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<User>>;

    /// Lookup by lowercase email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create or replace a user profile.
    async fn upsert_user(&self, user: &User) -> Result<()>;

    /// Backend-defined username match: prefix range on the cloud backend,
    /// case-insensitive substring on the local one.
    async fn search_users(&self, term: &str) -> Result<Vec<User>>;

    // ─── Credentials (local auth backend) ────────────────────────

    async fn get_credential(&self, email: &str) -> Result<Option<Credential>>;

    async fn upsert_credential(&self, credential: &Credential) -> Result<()>;

    // ─── Trades ──────────────────────────────────────────────────

    async fn insert_trade(&self, trade: &Trade) -> Result<()>;

    async fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>>;

    /// All trades where the user is either party, newest first.
    async fn trades_for_user(&self, uid: &str) -> Result<Vec<Trade>>;

    /// Record `uid`'s confirmation and, when both flags are set, transition
    /// the trade to completed in the same atomic unit.
    ///
    /// Fails with a not-found error when the id does not resolve.
    async fn confirm_trade(&self, trade_id: &str, uid: &str) -> Result<ConfirmOutcome>;

    // ─── Reports ─────────────────────────────────────────────────

    async fn insert_report(&self, report: &Report) -> Result<()>;

    async fn reports_by_reporter(&self, uid: &str) -> Result<Vec<Report>>;

    async fn reports_against(&self, uid: &str) -> Result<Vec<Report>>;
}

/// Shared confirm-trade state machine.
///
/// Both backends run this on the freshly read trade inside their atomic
/// unit, then persist the mutation it makes.
pub(crate) fn apply_confirmation(trade: &mut Trade, uid: &str) -> ConfirmOutcome {
    use crate::models::TradeStatus;

    if trade.status == TradeStatus::Completed {
        return ConfirmOutcome::AlreadyCompleted;
    }

    if trade.user1 == uid {
        trade.user1_confirmed = true;
    } else if trade.user2 == uid {
        trade.user2_confirmed = true;
    } else {
        return ConfirmOutcome::NotParty;
    }

    if trade.both_confirmed() {
        trade.status = TradeStatus::Completed;
        ConfirmOutcome::Completed(trade.clone())
    } else {
        ConfirmOutcome::Confirmed
    }
}

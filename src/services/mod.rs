// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod auth;
pub mod identity;
pub mod links;
pub mod reports;
pub mod reputation;
pub mod trades;

pub use accounts::{AccountService, ProfileUpdate};
pub use auth::{AuthBackend, LocalAuth};
pub use identity::IdentityClient;
pub use links::LinkService;
pub use reports::ReportService;
pub use reputation::ReputationEngine;
pub use trades::TradeService;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Abuse report model.

use serde::{Deserialize, Serialize};

/// Report lifecycle. Reporting is fire-and-forget; no transition out of
/// `Pending` exists in this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
}

/// An abuse report filed by one user against another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report ID (also used as document ID)
    pub id: String,
    pub reporter_uid: String,
    pub reported_uid: String,
    pub reason: String,
    #[serde(default)]
    pub evidence_text: String,
    pub status: ReportStatus,
    /// When the report was filed (ISO 8601)
    pub created_at: String,
}

impl Report {
    pub fn new(
        id: String,
        reporter_uid: String,
        reported_uid: String,
        reason: String,
        evidence_text: String,
        now: &str,
    ) -> Self {
        Self {
            id,
            reporter_uid,
            reported_uid,
            reason,
            evidence_text,
            status: ReportStatus::Pending,
            created_at: now.to_string(),
        }
    }
}

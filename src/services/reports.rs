// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report registry service.
//!
//! Reporting is fire-and-forget: the report is stored, a `ReportFiled` event
//! is published, and the reputation penalty is applied downstream where
//! failures are swallowed.

use std::sync::Arc;

use crate::error::Result;
use crate::events::{DomainEvent, EventBus};
use crate::models::Report;
use crate::store::Store;

pub struct ReportService {
    store: Arc<dyn Store>,
    events: EventBus,
}

impl ReportService {
    pub fn new(store: Arc<dyn Store>, events: EventBus) -> Self {
        Self { store, events }
    }

    /// File a report against a user.
    ///
    /// Nothing prevents self-reports or duplicates; moderation happens
    /// outside this layer.
    pub async fn create_report(
        &self,
        reporter_uid: &str,
        reported_uid: &str,
        reason: &str,
        evidence: &str,
    ) -> Result<String> {
        let now = chrono::Utc::now().to_rfc3339();
        let report = Report::new(
            uuid::Uuid::new_v4().to_string(),
            reporter_uid.to_string(),
            reported_uid.to_string(),
            reason.to_string(),
            evidence.to_string(),
            &now,
        );
        self.store.insert_report(&report).await?;

        tracing::info!(report_id = %report.id, reported_uid, "Report filed");

        self.events
            .publish(DomainEvent::ReportFiled {
                report_id: report.id.clone(),
                reported_uid: reported_uid.to_string(),
            })
            .await;

        Ok(report.id)
    }

    pub async fn reports_by_reporter(&self, uid: &str) -> Result<Vec<Report>> {
        self.store.reports_by_reporter(uid).await
    }

    pub async fn reports_against(&self, uid: &str) -> Result<Vec<Report>> {
        self.store.reports_against(uid).await
    }
}

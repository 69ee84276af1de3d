//! DashboardAggregate: a store's active batches with readiness labels.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::readiness::Readiness;
use crate::api::{Batch, BatchStatus, MarketplaceApi};
use crate::error::{Result, ValidationError};

/// What the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    /// Store of the most recent request.
    pub store_id: Option<String>,
    pub batches: Vec<Batch>,
    /// Inline error from the most recent request, if it failed.
    pub error: Option<String>,
    pub loading: bool,
}

/// Result of a [`DashboardAggregate::load`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Vec<Batch>),
    /// A newer load started before this one finished; its result was dropped.
    Superseded,
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLine {
    pub id: String,
    pub product: String,
    pub quantity: i64,
    pub status: BatchStatus,
    pub readiness: Readiness,
}

impl BatchLine {
    pub fn label(&self) -> String {
        self.readiness.to_string()
    }
}

/// Loads a store's batches, keeping only the most recently requested
/// result.
pub struct DashboardAggregate {
    api: Arc<dyn MarketplaceApi>,
    latest: AtomicU64,
    view: RwLock<DashboardView>,
}

impl DashboardAggregate {
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            api,
            latest: AtomicU64::new(0),
            view: RwLock::new(DashboardView::default()),
        }
    }

    /// Fetch batches for `store_id`.
    ///
    /// Every call supersedes the previous ones: if another load starts
    /// before this one resolves, this result (success or error) is dropped
    /// and [`LoadOutcome::Superseded`] is returned.
    pub async fn load(&self, store_id: &str) -> Result<LoadOutcome> {
        if store_id.trim().is_empty() {
            return Err(ValidationError::MissingStoreId.into());
        }

        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut view = self.view.write().await;
            view.store_id = Some(store_id.to_string());
            view.loading = true;
            view.error = None;
        }

        let result = self.api.list_batches(store_id).await;

        let mut view = self.view.write().await;
        if self.latest.load(Ordering::SeqCst) != ticket {
            warn!(store_id, ticket, "Discarding stale batch listing");
            return Ok(LoadOutcome::Superseded);
        }
        view.loading = false;
        match result {
            Ok(batches) => {
                info!(store_id, count = batches.len(), "Batches loaded");
                view.batches = batches.clone();
                Ok(LoadOutcome::Loaded(batches))
            }
            Err(e) => {
                view.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Snapshot of what is displayed.
    pub async fn view(&self) -> DashboardView {
        self.view.read().await.clone()
    }

    /// Number of active publications.
    pub async fn active_count(&self) -> usize {
        self.view.read().await.batches.len()
    }

    /// Rows with readiness evaluated at `now`.
    pub async fn lines(&self, now: DateTime<Utc>) -> Vec<BatchLine> {
        self.view
            .read()
            .await
            .batches
            .iter()
            .map(|b| BatchLine {
                id: b.id.clone(),
                product: b.product.clone(),
                quantity: b.quantity,
                status: b.status,
                readiness: Readiness::at(&b.ready_at, now),
            })
            .collect()
    }
}

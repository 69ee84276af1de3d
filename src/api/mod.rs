//! HTTP contract with the verification/store service.
//!
//! Components talk to the service through the [`MarketplaceApi`] trait so
//! tests can substitute an in-process stub. [`HttpApi`] is the reqwest-backed
//! implementation used in production.

pub mod client;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use client::HttpApi;
pub use types::{
    Batch, BatchStatus, BatchStore, CreateBatch, CreateStore, DashboardEntry, VerificationIssued,
};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::Result;
use crate::onboarding::Role;

/// Operations the onboarding core needs from the service.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// `POST /api/public/verification/start`
    async fn start_verification(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<VerificationIssued>;

    /// `POST /api/public/verification/confirm`
    async fn confirm_verification(&self, verification_id: &str, code: &str) -> Result<()>;

    /// `POST /api/public/verification/sign-in`
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<DashboardEntry>;

    /// `POST /api/stores`, returning the new store id.
    async fn create_store(&self, request: &CreateStore) -> Result<String>;

    /// `POST /api/stores/{storeId}/batches`
    async fn create_batch(&self, store_id: &str, request: &CreateBatch) -> Result<Option<Batch>>;

    /// `GET /api/stores/{storeId}/batches`
    async fn list_batches(&self, store_id: &str) -> Result<Vec<Batch>>;
}

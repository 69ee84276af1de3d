//! In-process stub of the service for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use super::MarketplaceApi;
use super::types::{Batch, CreateBatch, CreateStore, DashboardEntry, VerificationIssued};
use crate::error::{Error, Result};
use crate::onboarding::Role;

/// A request the stub received.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Start { name: String, email: String },
    Confirm { verification_id: String, code: String },
    SignIn { email: String, role: Role },
    CreateStore(CreateStore),
    CreateBatch { store_id: String, request: CreateBatch },
    ListBatches(String),
}

#[derive(Default)]
pub(crate) struct StubApi {
    issued: Option<VerificationIssued>,
    reject_codes: AtomicBool,
    store_id: Option<String>,
    store_error: Option<String>,
    signed_in: Option<DashboardEntry>,
    batches: HashMap<String, Vec<Batch>>,
    list_delays: HashMap<String, Duration>,
    list_error: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl StubApi {
    pub fn issuing(verification_id: &str, client_id: &str) -> Self {
        Self {
            issued: Some(VerificationIssued {
                verification_id: verification_id.to_string(),
                client_id: client_id.to_string(),
            }),
            store_id: Some("7".to_string()),
            ..Self::default()
        }
    }

    pub fn rejecting_codes(self) -> Self {
        self.reject_codes.store(true, Ordering::SeqCst);
        self
    }

    pub fn accept_codes(&self) {
        self.reject_codes.store(false, Ordering::SeqCst);
    }

    pub fn with_store_id(mut self, store_id: Option<&str>) -> Self {
        self.store_id = store_id.map(str::to_string);
        self
    }

    pub fn failing_store_creation(mut self, message: &str) -> Self {
        self.store_error = Some(message.to_string());
        self
    }

    pub fn signing_in_as(mut self, entry: DashboardEntry) -> Self {
        self.signed_in = Some(entry);
        self
    }

    pub fn with_batches(mut self, store_id: &str, batches: Vec<Batch>) -> Self {
        self.batches.insert(store_id.to_string(), batches);
        self
    }

    pub fn delaying_list(mut self, store_id: &str, delay: Duration) -> Self {
        self.list_delays.insert(store_id.to_string(), delay);
        self
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MarketplaceApi for StubApi {
    async fn start_verification(
        &self,
        name: &str,
        email: &str,
        _password: &SecretString,
    ) -> Result<VerificationIssued> {
        self.record(Call::Start {
            name: name.to_string(),
            email: email.to_string(),
        });
        self.issued
            .clone()
            .ok_or_else(|| Error::contract("missing verificationId"))
    }

    async fn confirm_verification(&self, verification_id: &str, code: &str) -> Result<()> {
        self.record(Call::Confirm {
            verification_id: verification_id.to_string(),
            code: code.to_string(),
        });
        if self.reject_codes.load(Ordering::SeqCst) {
            return Err(Error::service(Some(400), "Could not verify the code."));
        }
        Ok(())
    }

    async fn sign_in(
        &self,
        email: &str,
        _password: &SecretString,
        role: Role,
    ) -> Result<DashboardEntry> {
        self.record(Call::SignIn {
            email: email.to_string(),
            role,
        });
        self.signed_in
            .clone()
            .ok_or_else(|| Error::service(Some(401), "Could not sign in."))
    }

    async fn create_store(&self, request: &CreateStore) -> Result<String> {
        self.record(Call::CreateStore(request.clone()));
        if let Some(message) = &self.store_error {
            return Err(Error::service(Some(500), message.clone()));
        }
        self.store_id
            .clone()
            .ok_or_else(|| Error::contract("no storeId"))
    }

    async fn create_batch(&self, store_id: &str, request: &CreateBatch) -> Result<Option<Batch>> {
        self.record(Call::CreateBatch {
            store_id: store_id.to_string(),
            request: request.clone(),
        });
        Ok(None)
    }

    async fn list_batches(&self, store_id: &str) -> Result<Vec<Batch>> {
        self.record(Call::ListBatches(store_id.to_string()));
        if let Some(delay) = self.list_delays.get(store_id) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(message) = &self.list_error {
            return Err(Error::service(Some(404), message.clone()));
        }
        Ok(self.batches.get(store_id).cloned().unwrap_or_default())
    }
}

//! reqwest-backed implementation of [`MarketplaceApi`].

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::MarketplaceApi;
use super::types::{Batch, CreateBatch, CreateStore, DashboardEntry, VerificationIssued, id_from_value};
use crate::config::ClientConfig;
use crate::error::{ConfigError, Error, Result};
use crate::onboarding::Role;

const START_FAILED: &str = "Could not create the account. Please try again.";
const CONFIRM_FAILED: &str = "Could not verify the code.";
const SIGN_IN_FAILED: &str = "Could not sign in.";
const CREATE_STORE_FAILED: &str = "Could not save the store details.";
const PUBLISH_FAILED: &str = "Could not publish the product.";
const LIST_BATCHES_FAILED: &str = "Could not load batches.";

/// HTTP client for the verification/store service.
#[derive(Debug, Clone)]
pub struct HttpApi {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { config, client })
    }

    async fn post(&self, path: &str, body: &impl serde::Serialize) -> Result<Response> {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::network)
    }

    fn batches_path(store_id: &str) -> String {
        format!("/api/stores/{store_id}/batches")
    }
}

/// Read the body as JSON, treating an empty or malformed body as absent.
async fn read_json(response: Response) -> Option<Value> {
    response.json::<Value>().await.ok()
}

fn service_message(body: Option<&Value>) -> Option<String> {
    body?
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

fn text_field(body: Option<&Value>, key: &str) -> Option<String> {
    id_from_value(body?.get(key))
}

fn status_code(status: StatusCode) -> Option<u16> {
    Some(status.as_u16())
}

#[async_trait]
impl MarketplaceApi for HttpApi {
    #[instrument(skip_all, fields(email = %email))]
    async fn start_verification(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<VerificationIssued> {
        let body = json!({
            "name": name,
            "email": email,
            "password": password.expose_secret(),
        });
        let response = self.post("/api/public/verification/start", &body).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, %detail, "Account creation rejected");
            return Err(Error::service(status_code(status), START_FAILED));
        }

        let data = read_json(response).await;
        let verification_id = text_field(data.as_ref(), "verificationId");
        let client_id = text_field(data.as_ref(), "clientId");
        match (verification_id, client_id) {
            (Some(verification_id), Some(client_id)) => Ok(VerificationIssued {
                verification_id,
                client_id,
            }),
            _ => Err(Error::contract(
                "verification start response is missing verificationId or clientId",
            )),
        }
    }

    #[instrument(skip_all, fields(verification_id = %verification_id))]
    async fn confirm_verification(&self, verification_id: &str, code: &str) -> Result<()> {
        let body = json!({ "verificationId": verification_id, "code": code });
        let response = self.post("/api/public/verification/confirm", &body).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Code confirmation rejected");
            return Err(Error::service(status_code(status), CONFIRM_FAILED));
        }
        Ok(())
    }

    #[instrument(skip_all, fields(email = %email, role = %role))]
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<DashboardEntry> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "role": role.as_wire(),
        });
        let response = self.post("/api/public/verification/sign-in", &body).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Sign-in rejected");
            return Err(Error::service(status_code(status), SIGN_IN_FAILED));
        }

        let data = read_json(response).await;
        let name = text_field(data.as_ref(), "name");
        let address = text_field(data.as_ref(), "address");
        let store_id = text_field(data.as_ref(), "storeId");
        match (name, address, store_id) {
            (Some(name), Some(address), Some(store_id)) => Ok(DashboardEntry {
                store_id,
                name,
                address,
            }),
            _ => Err(Error::contract(
                "sign-in response is missing name, address or storeId",
            )),
        }
    }

    #[instrument(skip_all, fields(name = %request.name))]
    async fn create_store(&self, request: &CreateStore) -> Result<String> {
        let response = self.post("/api/stores", request).await?;

        let status = response.status();
        let data = read_json(response).await;
        if !status.is_success() {
            let message = service_message(data.as_ref());
            warn!(%status, ?message, "Store creation rejected");
            return Err(Error::service(
                status_code(status),
                message.unwrap_or_else(|| CREATE_STORE_FAILED.to_string()),
            ));
        }

        text_field(data.as_ref(), "storeId")
            .or_else(|| text_field(data.as_ref(), "id"))
            .ok_or_else(|| Error::contract("store creation response has neither storeId nor id"))
    }

    #[instrument(skip_all, fields(store_id = %store_id))]
    async fn create_batch(&self, store_id: &str, request: &CreateBatch) -> Result<Option<Batch>> {
        let response = self.post(&Self::batches_path(store_id), request).await?;

        let status = response.status();
        let data = read_json(response).await;
        if !status.is_success() {
            let message = service_message(data.as_ref());
            warn!(%status, ?message, "Batch publication rejected");
            return Err(Error::service(
                status_code(status),
                message.unwrap_or_else(|| PUBLISH_FAILED.to_string()),
            ));
        }

        Ok(data.and_then(|v| serde_json::from_value(v).ok()))
    }

    #[instrument(skip_all, fields(store_id = %store_id))]
    async fn list_batches(&self, store_id: &str) -> Result<Vec<Batch>> {
        let url = self.config.endpoint(&Self::batches_path(store_id));
        debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(Error::network)?;

        let status = response.status();
        let data = read_json(response).await;
        if !status.is_success() {
            let message = service_message(data.as_ref());
            warn!(%status, ?message, "Batch listing rejected");
            return Err(Error::service(
                status_code(status),
                message.unwrap_or_else(|| LIST_BATCHES_FAILED.to_string()),
            ));
        }

        match data {
            Some(list @ Value::Array(_)) => serde_json::from_value(list)
                .map_err(|e| Error::contract(format!("malformed batch in listing: {e}"))),
            other => {
                debug!(body = ?other, "Batch listing body is not an array; treating as empty");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_message_ignores_blank() {
        assert_eq!(
            service_message(Some(&json!({"message": "x"}))),
            Some("x".to_string())
        );
        assert_eq!(service_message(Some(&json!({"message": "  "}))), None);
        assert_eq!(service_message(Some(&json!([1, 2]))), None);
        assert_eq!(service_message(None), None);
    }

    #[test]
    fn batches_path_embeds_store() {
        assert_eq!(HttpApi::batches_path("3"), "/api/stores/3/batches");
    }
}

//! Wire types for the service contract.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifiers issued when a registration starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationIssued {
    pub verification_id: String,
    pub client_id: String,
}

/// What the creator dashboard needs to open: the store and how to title it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntry {
    pub store_id: String,
    pub name: String,
    pub address: String,
}

/// Body of `POST /api/stores`.
///
/// Optional fields are omitted from the JSON when unset rather than sent as
/// empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStore {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Body of `POST /api/stores/{storeId}/batches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatch {
    pub product_desc: String,
    pub ready_in_minutes: u32,
    pub quantity: u32,
}

/// Batch status as reported by the service. The client never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Scheduled,
    Ready,
    #[default]
    #[serde(other)]
    Other,
}

/// Store summary embedded in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStore {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// A time-bounded production run of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub store: Option<BatchStore>,
    #[serde(default, alias = "productDesc", deserialize_with = "null_as_default")]
    pub product: String,
    /// Raw timestamp; parsed when a readiness label is derived.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ready_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BatchStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Read an identifier the service may send as a number or a string.
///
/// Empty strings and anything that isn't a scalar count as absent.
pub fn id_from_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Encode a client id for the store payload: numeric ids go out as numbers.
pub fn client_id_value(client_id: &str) -> Value {
    client_id
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(client_id))
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(Some(&value))
        .ok_or_else(|| serde::de::Error::custom(format!("expected a string or numeric id, got {value}")))
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

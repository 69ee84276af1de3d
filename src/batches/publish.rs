//! Publishing a new batch for a store.

use tracing::info;

use crate::api::{Batch, CreateBatch, MarketplaceApi};
use crate::error::{Result, ValidationError};

/// Preparation times a creator can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyIn {
    Minutes15,
    Minutes30,
    Minutes45,
    Hour,
    HourAndHalf,
    TwoHours,
}

impl ReadyIn {
    pub const ALL: [ReadyIn; 6] = [
        Self::Minutes15,
        Self::Minutes30,
        Self::Minutes45,
        Self::Hour,
        Self::HourAndHalf,
        Self::TwoHours,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            Self::Minutes15 => 15,
            Self::Minutes30 => 30,
            Self::Minutes45 => 45,
            Self::Hour => 60,
            Self::HourAndHalf => 90,
            Self::TwoHours => 120,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.minutes() == minutes)
    }
}

impl std::fmt::Display for ReadyIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Minutes15 => "15 minutes",
            Self::Minutes30 => "30 minutes",
            Self::Minutes45 => "45 minutes",
            Self::Hour => "1 hour",
            Self::HourAndHalf => "1.5 hours",
            Self::TwoHours => "2 hours",
        };
        write!(f, "{s}")
    }
}

/// Fields of the publish form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchForm {
    pub product: String,
    pub ready_in: Option<ReadyIn>,
    /// Stock is not tracked yet; the service receives zero unless set.
    pub quantity: u32,
}

impl BatchForm {
    pub fn new(product: &str, ready_in: ReadyIn) -> Self {
        Self {
            product: product.to_string(),
            ready_in: Some(ready_in),
            quantity: 0,
        }
    }

    pub fn can_publish(&self) -> bool {
        !self.product.trim().is_empty() && self.ready_in.is_some()
    }

    fn to_request(&self) -> std::result::Result<CreateBatch, ValidationError> {
        let product = self.product.trim();
        if product.is_empty() {
            return Err(ValidationError::EmptyField { field: "product" });
        }
        let Some(ready_in) = self.ready_in else {
            return Err(ValidationError::EmptyField {
                field: "ready time",
            });
        };
        Ok(CreateBatch {
            product_desc: product.to_string(),
            ready_in_minutes: ready_in.minutes(),
            quantity: self.quantity,
        })
    }
}

/// Publish `form` for `store_id`.
///
/// Returns the created batch when the service echoes it back.
pub async fn publish(
    api: &dyn MarketplaceApi,
    store_id: Option<&str>,
    form: &BatchForm,
) -> Result<Option<Batch>> {
    let store_id = store_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingStoreId)?;
    let request = form.to_request()?;

    let created = api.create_batch(store_id, &request).await?;
    info!(
        store_id,
        product = %request.product_desc,
        ready_in = request.ready_in_minutes,
        "Batch published"
    );
    Ok(created)
}

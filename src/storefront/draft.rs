//! Store fields collected across the address and identity stages.

use tracing::info;

use super::catalog;
use crate::api::types::client_id_value;
use crate::api::{CreateStore, MarketplaceApi};
use crate::error::{Result, ValidationError};

/// Title shown for a store whose business name is still empty.
pub const PLACEHOLDER_NAME: &str = "My home kitchen";

/// Accumulated storefront fields, submitted once as a single creation request.
///
/// `city` always belongs to `region`: picking a new region clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreDraft {
    region: Option<String>,
    city: Option<String>,
    address: String,
    business_name: String,
    category: Option<String>,
}

impl StoreDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a region from the catalog. Resets the city.
    pub fn select_region(&mut self, region: &str) -> std::result::Result<(), ValidationError> {
        if catalog::cities_of(region).is_none() {
            return Err(ValidationError::UnknownRegion(region.to_string()));
        }
        self.region = Some(region.to_string());
        self.city = None;
        Ok(())
    }

    /// Pick a city belonging to the selected region.
    pub fn select_city(&mut self, city: &str) -> std::result::Result<(), ValidationError> {
        let Some(region) = self.region.as_deref() else {
            return Err(ValidationError::CityWithoutRegion);
        };
        if !self.available_cities().contains(&city) {
            return Err(ValidationError::CityNotInRegion {
                region: region.to_string(),
                city: city.to_string(),
            });
        }
        self.city = Some(city.to_string());
        Ok(())
    }

    pub fn set_address(&mut self, address: &str) {
        self.address = address.to_string();
    }

    pub fn set_business_name(&mut self, name: &str) {
        self.business_name = name.to_string();
    }

    /// Pick a category, or clear it with an empty string.
    pub fn set_category(&mut self, category: &str) -> std::result::Result<(), ValidationError> {
        let category = category.trim();
        if category.is_empty() {
            self.category = None;
            return Ok(());
        }
        if !catalog::is_category(category) {
            return Err(ValidationError::UnknownCategory(category.to_string()));
        }
        self.category = Some(category.to_string());
        Ok(())
    }

    /// Cities for the selected region; empty until a region is picked.
    pub fn available_cities(&self) -> &'static [&'static str] {
        self.region
            .as_deref()
            .and_then(catalog::cities_of)
            .unwrap_or(&[])
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn address(&self) -> &str {
        self.address.trim()
    }

    pub fn business_name(&self) -> &str {
        self.business_name.trim()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Name to show, falling back to [`PLACEHOLDER_NAME`].
    pub fn display_name(&self) -> &str {
        match self.business_name() {
            "" => PLACEHOLDER_NAME,
            name => name,
        }
    }

    /// Region, city and address are all set.
    pub fn validate_location(&self) -> std::result::Result<(), ValidationError> {
        let Some(region) = self.region.as_deref() else {
            return Err(ValidationError::EmptyField { field: "region" });
        };
        if self.city.is_none() {
            return Err(ValidationError::MissingCity {
                region: region.to_string(),
            });
        }
        if self.address().is_empty() {
            return Err(ValidationError::EmptyField { field: "address" });
        }
        Ok(())
    }

    pub fn can_continue(&self) -> bool {
        self.validate_location().is_ok()
    }

    /// Business name and address are both filled in.
    pub fn can_submit(&self) -> bool {
        !self.business_name().is_empty() && !self.address().is_empty()
    }

    /// Build the sparse creation request.
    ///
    /// A region without a city is an incomplete location and is refused.
    pub fn to_request(
        &self,
        client_id: Option<&str>,
    ) -> std::result::Result<CreateStore, ValidationError> {
        if self.business_name().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "business name",
            });
        }
        if self.address().is_empty() {
            return Err(ValidationError::EmptyField { field: "address" });
        }
        if let (Some(region), None) = (self.region.as_deref(), self.city.as_deref()) {
            return Err(ValidationError::MissingCity {
                region: region.to_string(),
            });
        }

        Ok(CreateStore {
            name: self.business_name().to_string(),
            address: self.address().to_string(),
            client_id: client_id
                .filter(|id| !id.trim().is_empty())
                .map(client_id_value),
            region: self.region.clone(),
            city: self.city.clone(),
            category: self.category.clone(),
        })
    }

    /// Create the store and return its id. Validation runs before any request.
    pub async fn submit(&self, api: &dyn MarketplaceApi, client_id: Option<&str>) -> Result<String> {
        let request = self.to_request(client_id)?;
        let store_id = api.create_store(&request).await?;
        info!(store_id = %store_id, name = %request.name, "Store created");
        Ok(store_id)
    }
}

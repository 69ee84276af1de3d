//! Sign-in for returning creators.

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::api::{DashboardEntry, MarketplaceApi};
use crate::error::{Result, ValidationError};
use crate::onboarding::Role;

/// Sign in with email and password, landing on the store dashboard.
///
/// Both fields are trimmed; an empty one is refused before any request.
pub async fn sign_in(
    api: &dyn MarketplaceApi,
    email: &str,
    password: &SecretString,
    role: Role,
) -> Result<DashboardEntry> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmptyField { field: "email" }.into());
    }
    let password = password.expose_secret().trim();
    if password.is_empty() {
        return Err(ValidationError::EmptyField { field: "password" }.into());
    }

    let entry = api
        .sign_in(email, &SecretString::from(password), role)
        .await?;
    info!(store_id = %entry.store_id, %role, "Signed in");
    Ok(entry)
}

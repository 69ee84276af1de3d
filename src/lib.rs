//! RecienHecho: onboarding and storefront core for a fresh-baked goods
//! marketplace.

pub mod api;
pub mod batches;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod sign_in;
pub mod storefront;
pub mod verification;

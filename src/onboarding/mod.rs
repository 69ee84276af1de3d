//! Onboarding pipeline: from account creation to an operating storefront.
//!
//! A new user registers, confirms the emailed code, and is then routed by
//! role: creators set up their store's location and identity and land on
//! the dashboard; consumers go straight to notifications. Each stage holds
//! every identifier it inherited, so stage handlers never re-thread them.

pub mod pipeline;
pub mod role;
pub mod state;

pub use pipeline::{
    AddressStage, IdentityStage, OnboardingPipeline, PipelineState, VerifiedAccount,
};
pub use role::Role;
pub use state::OnboardingStage;

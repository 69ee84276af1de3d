//! OnboardingPipeline: drives a new user from registration to an
//! operating storefront (or to the consumer notifications view).
//!
//! Every stage owns the identifiers it inherited, so nothing has to be
//! re-threaded by hand between stages. A failed operation leaves the current
//! stage, and everything typed into it, untouched.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};

use super::role::Role;
use super::state::OnboardingStage;
use crate::api::{DashboardEntry, MarketplaceApi};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::storefront::StoreDraft;
use crate::verification::VerificationSession;

/// The confirmed account, carried unchanged through every later stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccount {
    name: String,
    email: String,
    client_id: String,
}

impl VerifiedAccount {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Creator picking where the store is.
#[derive(Debug, Clone)]
pub struct AddressStage {
    account: VerifiedAccount,
    role: Role,
    draft: StoreDraft,
}

impl AddressStage {
    pub fn account(&self) -> &VerifiedAccount {
        &self.account
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn draft(&self) -> &StoreDraft {
        &self.draft
    }

    /// Region, city and address are edited here.
    pub fn draft_mut(&mut self) -> &mut StoreDraft {
        &mut self.draft
    }
}

/// Creator naming the business. The location is read-only at this point.
#[derive(Debug, Clone)]
pub struct IdentityStage {
    account: VerifiedAccount,
    role: Role,
    draft: StoreDraft,
}

impl IdentityStage {
    pub fn account(&self) -> &VerifiedAccount {
        &self.account
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn draft(&self) -> &StoreDraft {
        &self.draft
    }

    pub fn set_business_name(&mut self, name: &str) {
        self.draft.set_business_name(name);
    }

    pub fn set_category(&mut self, category: &str) -> Result<()> {
        Ok(self.draft.set_category(category)?)
    }

    pub fn can_submit(&self) -> bool {
        self.draft.can_submit()
    }
}

/// Where the pipeline currently is, with everything that stage needs.
#[derive(Debug)]
pub enum PipelineState {
    Register,
    Verify(VerificationSession),
    AccountVerified(VerifiedAccount),
    Address(AddressStage),
    Identity(IdentityStage),
    Dashboard(DashboardEntry),
    Notifications(VerifiedAccount),
}

impl PipelineState {
    pub fn stage(&self) -> OnboardingStage {
        match self {
            Self::Register => OnboardingStage::Register,
            Self::Verify(_) => OnboardingStage::Verify,
            Self::AccountVerified(_) => OnboardingStage::AccountVerified,
            Self::Address(_) => OnboardingStage::Address,
            Self::Identity(_) => OnboardingStage::Identity,
            Self::Dashboard(_) => OnboardingStage::Dashboard,
            Self::Notifications(_) => OnboardingStage::Notifications,
        }
    }
}

/// Coordinates one onboarding attempt.
pub struct OnboardingPipeline {
    api: Arc<dyn MarketplaceApi>,
    resend_cooldown: u32,
    role: Option<String>,
    state: PipelineState,
}

impl OnboardingPipeline {
    /// `role` is the raw role chosen before registering; it is only
    /// interpreted once the account is verified.
    pub fn new(api: Arc<dyn MarketplaceApi>, config: &ClientConfig, role: Option<&str>) -> Self {
        Self {
            api,
            resend_cooldown: config.resend_cooldown,
            role: role.map(str::to_string),
            state: PipelineState::Register,
        }
    }

    pub fn stage(&self) -> OnboardingStage {
        self.state.stage()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Register stage: create the account and move to code entry.
    pub async fn register(&mut self, name: &str, email: &str, password: &SecretString) -> Result<()> {
        self.advance_from(OnboardingStage::Register, "register")?;
        let mut session = VerificationSession::new(Arc::clone(&self.api), self.resend_cooldown);
        session.start(name, email, password).await?;
        self.transition(OnboardingStage::Register, PipelineState::Verify(session));
        Ok(())
    }

    /// The running verification session, while in the Verify stage.
    pub fn verification(&self) -> Option<&VerificationSession> {
        match &self.state {
            PipelineState::Verify(session) => Some(session),
            _ => None,
        }
    }

    pub fn verification_mut(&mut self) -> Option<&mut VerificationSession> {
        match &mut self.state {
            PipelineState::Verify(session) => Some(session),
            _ => None,
        }
    }

    /// Verify stage: confirm the typed code. Leaving the stage stops the
    /// resend countdown.
    pub async fn confirm(&mut self) -> Result<&VerifiedAccount> {
        self.advance_from(OnboardingStage::Verify, "confirm a code")?;
        let PipelineState::Verify(session) = &mut self.state else {
            return Err(self.out_of_order("confirm a code"));
        };
        session.confirm().await?;

        let client_id = session
            .client_id()
            .ok_or_else(|| Error::contract("confirmed session has no clientId"))?;
        let account = VerifiedAccount {
            name: session.name().to_string(),
            email: session.email().to_string(),
            client_id: client_id.to_string(),
        };
        self.transition(OnboardingStage::Verify, PipelineState::AccountVerified(account));

        match &self.state {
            PipelineState::AccountVerified(account) => Ok(account),
            _ => Err(self.out_of_order("confirm a code")),
        }
    }

    /// AccountVerified stage: route by role.
    ///
    /// Creators continue to store setup; consumers go straight to
    /// notifications.
    pub fn proceed(&mut self) -> Result<OnboardingStage> {
        let to = self.advance_from(OnboardingStage::AccountVerified, "choose a path")?;
        match self.take_state() {
            PipelineState::AccountVerified(account) => {
                let next = match to {
                    OnboardingStage::Notifications => PipelineState::Notifications(account),
                    _ => PipelineState::Address(AddressStage {
                        account,
                        role: self.role(),
                        draft: StoreDraft::new(),
                    }),
                };
                self.transition(OnboardingStage::AccountVerified, next);
                Ok(to)
            }
            other => {
                self.state = other;
                Err(self.out_of_order("choose a path"))
            }
        }
    }

    pub fn address_mut(&mut self) -> Option<&mut AddressStage> {
        match &mut self.state {
            PipelineState::Address(stage) => Some(stage),
            _ => None,
        }
    }

    /// Address stage: continue once region, city and address are set.
    pub fn continue_to_identity(&mut self) -> Result<()> {
        self.advance_from(OnboardingStage::Address, "continue to identity")?;
        if let PipelineState::Address(stage) = &self.state {
            stage.draft.validate_location()?;
        }
        match self.take_state() {
            PipelineState::Address(AddressStage {
                account,
                role,
                draft,
            }) => {
                self.transition(
                    OnboardingStage::Address,
                    PipelineState::Identity(IdentityStage {
                        account,
                        role,
                        draft,
                    }),
                );
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.out_of_order("continue to identity"))
            }
        }
    }

    pub fn identity_mut(&mut self) -> Option<&mut IdentityStage> {
        match &mut self.state {
            PipelineState::Identity(stage) => Some(stage),
            _ => None,
        }
    }

    /// Identity stage: create the store and open the dashboard.
    ///
    /// Blocked locally unless business name and address are filled in.
    pub async fn create_store(&mut self) -> Result<&DashboardEntry> {
        self.advance_from(OnboardingStage::Identity, "create the store")?;
        let PipelineState::Identity(stage) = &self.state else {
            return Err(self.out_of_order("create the store"));
        };
        let store_id = stage
            .draft
            .submit(self.api.as_ref(), Some(stage.account.client_id()))
            .await?;

        let entry = DashboardEntry {
            store_id,
            name: stage.draft.business_name().to_string(),
            address: stage.draft.address().to_string(),
        };
        self.transition(OnboardingStage::Identity, PipelineState::Dashboard(entry));

        match &self.state {
            PipelineState::Dashboard(entry) => Ok(entry),
            _ => Err(self.out_of_order("create the store")),
        }
    }

    /// Step back one stage, keeping what was already collected.
    pub fn back(&mut self) -> Result<OnboardingStage> {
        let from = self.stage();
        let to = from
            .previous()
            .filter(|to| from.can_transition_to(*to))
            .ok_or_else(|| self.out_of_order("go back"))?;
        let previous = match self.take_state() {
            PipelineState::Verify(_session) => PipelineState::Register,
            PipelineState::Address(stage) => PipelineState::AccountVerified(stage.account),
            PipelineState::Identity(IdentityStage {
                account,
                role,
                draft,
            }) => PipelineState::Address(AddressStage {
                account,
                role,
                draft,
            }),
            other => {
                self.state = other;
                return Err(self.out_of_order("go back"));
            }
        };
        self.transition(from, previous);
        Ok(to)
    }

    fn role(&self) -> Role {
        Role::from_param(self.role.as_deref())
    }

    /// The stage `action` leads to from `at`, per the stage graph.
    ///
    /// Fails without touching the state unless the pipeline is at `at` and
    /// the edge exists.
    fn advance_from(&self, at: OnboardingStage, action: &str) -> Result<OnboardingStage> {
        let from = self.stage();
        if from != at {
            return Err(self.out_of_order(action));
        }
        let to = from
            .next(self.role())
            .ok_or_else(|| self.out_of_order(action))?;
        if !from.can_transition_to(to) {
            warn!(%from, %to, action, "Rejected onboarding transition");
            return Err(self.out_of_order(action));
        }
        Ok(to)
    }

    fn take_state(&mut self) -> PipelineState {
        std::mem::replace(&mut self.state, PipelineState::Register)
    }

    /// Install `next`. The edge was already checked against the graph;
    /// `from` is passed in because the state may already have been taken.
    fn transition(&mut self, from: OnboardingStage, next: PipelineState) {
        let to = next.stage();
        info!(%from, %to, "Onboarding stage transition");
        self.state = next;
    }

    fn out_of_order(&self, action: &str) -> Error {
        Error::OutOfOrder {
            stage: self.stage().to_string(),
            action: action.to_string(),
        }
    }
}

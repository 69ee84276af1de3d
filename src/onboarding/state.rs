//! Onboarding stage graph: which stage may follow which.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// The stages of creator/consumer onboarding.
///
/// Progresses linearly: Register → Verify → AccountVerified, then forks on
/// role: creators go Address → Identity → Dashboard, consumers go straight
/// to Notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStage {
    #[default]
    Register,
    Verify,
    AccountVerified,
    Address,
    Identity,
    Dashboard,
    Notifications,
}

impl OnboardingStage {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Includes the three back-navigation edges.
    pub fn can_transition_to(&self, target: OnboardingStage) -> bool {
        use OnboardingStage::*;
        matches!(
            (self, target),
            (Register, Verify)
                | (Verify, AccountVerified)
                | (AccountVerified, Address)
                | (AccountVerified, Notifications)
                | (Address, Identity)
                | (Identity, Dashboard)
                | (Verify, Register)
                | (Address, AccountVerified)
                | (Identity, Address)
        )
    }

    /// Whether this stage ends onboarding.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Notifications)
    }

    /// The next stage for a user with `role`, if any.
    pub fn next(&self, role: Role) -> Option<OnboardingStage> {
        use OnboardingStage::*;
        match (self, role) {
            (Register, _) => Some(Verify),
            (Verify, _) => Some(AccountVerified),
            (AccountVerified, Role::Creator) => Some(Address),
            (AccountVerified, Role::Consumer) => Some(Notifications),
            (Address, _) => Some(Identity),
            (Identity, _) => Some(Dashboard),
            (Dashboard | Notifications, _) => None,
        }
    }

    /// Where back-navigation leads, if it is allowed here.
    pub fn previous(&self) -> Option<OnboardingStage> {
        use OnboardingStage::*;
        match self {
            Verify => Some(Register),
            Address => Some(AccountVerified),
            Identity => Some(Address),
            _ => None,
        }
    }
}

impl std::fmt::Display for OnboardingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Register => "register",
            Self::Verify => "verify",
            Self::AccountVerified => "account_verified",
            Self::Address => "address",
            Self::Identity => "identity",
            Self::Dashboard => "dashboard",
            Self::Notifications => "notifications",
        };
        write!(f, "{s}")
    }
}

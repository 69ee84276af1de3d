//! Creator/consumer role and the fork it drives after verification.

use serde::{Deserialize, Serialize};

/// Which kind of user is onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Creator,
    Consumer,
}

impl Role {
    /// Normalize a loosely-typed role parameter.
    ///
    /// Only `CONSUMER` (any casing, surrounding whitespace ignored) selects the
    /// consumer path. Anything else, including no role at all, is a creator.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(r) if r.trim().to_uppercase() == "CONSUMER" => Self::Consumer,
            _ => Self::Creator,
        }
    }

    /// Value sent to the service.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Creator => "CREATOR",
            Self::Consumer => "CONSUMER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Creator => write!(f, "creator"),
            Self::Consumer => write!(f, "consumer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_in_any_casing() {
        for raw in ["CONSUMER", "consumer", "Consumer", " cOnSuMeR "] {
            assert_eq!(Role::from_param(Some(raw)), Role::Consumer, "{raw:?}");
        }
    }

    #[test]
    fn everything_else_is_a_creator() {
        for raw in [Some(""), Some("creator"), Some("CREATOR"), Some("consumers"), None] {
            assert_eq!(Role::from_param(raw), Role::Creator, "{raw:?}");
        }
    }

    #[test]
    fn wire_and_serde_agree() {
        for role in [Role::Creator, Role::Consumer] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_wire()));
        }
    }
}

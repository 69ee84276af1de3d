//! One in-flight registration awaiting OTP confirmation.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{info, warn};

use super::code::{CodeEntry, validate_code};
use super::countdown::ResendCountdown;
use crate::api::{MarketplaceApi, VerificationIssued};
use crate::error::{Error, Result, ValidationError};

/// Lifecycle of a verification session.
///
/// Idle → Started → Confirming → Confirmed, with Failed looping back to
/// another confirm attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Started,
    Confirming,
    Confirmed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Started => "started",
            Self::Confirming => "confirming",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Check the confirm preconditions without touching the network.
pub fn validate_confirmation(
    verification_id: Option<&str>,
    code: &str,
) -> std::result::Result<(), ValidationError> {
    match verification_id {
        Some(id) if !id.trim().is_empty() => validate_code(code),
        _ => Err(ValidationError::MissingVerificationId),
    }
}

fn required(field: &'static str, value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

/// A registration in progress: the issued identifiers, the code being typed
/// and the resend countdown.
///
/// The countdown starts when registration succeeds and stops when the
/// session is dropped.
pub struct VerificationSession {
    api: Arc<dyn MarketplaceApi>,
    resend_cooldown: u32,
    name: String,
    email: String,
    issued: Option<VerificationIssued>,
    state: SessionState,
    entry: CodeEntry,
    countdown: Option<ResendCountdown>,
}

impl std::fmt::Debug for VerificationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationSession")
            .field("email", &self.email)
            .field("issued", &self.issued)
            .field("state", &self.state)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

impl VerificationSession {
    pub fn new(api: Arc<dyn MarketplaceApi>, resend_cooldown: u32) -> Self {
        Self {
            api,
            resend_cooldown,
            name: String::new(),
            email: String::new(),
            issued: None,
            state: SessionState::Idle,
            entry: CodeEntry::new(),
            countdown: None,
        }
    }

    /// Create the account and obtain its verification identifiers.
    ///
    /// On any failure the session stays idle so the form can be resubmitted.
    pub async fn start(
        &mut self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<&VerificationIssued> {
        if self.state != SessionState::Idle {
            return Err(self.out_of_order("start a registration"));
        }
        required("name", name)?;
        required("email", email)?;
        required("password", password.expose_secret())?;

        let issued = self.api.start_verification(name, email, password).await?;
        info!(
            email = %email,
            client_id = %issued.client_id,
            "Registration started, awaiting code"
        );

        self.name = name.to_string();
        self.email = email.to_string();
        self.state = SessionState::Started;
        self.countdown = Some(ResendCountdown::start(self.resend_cooldown));
        Ok(self.issued.insert(issued))
    }

    /// Confirm the code currently typed into the entry buffer.
    pub async fn confirm(&mut self) -> Result<()> {
        let code = self.entry.joined();
        self.confirm_code(&code).await
    }

    /// Confirm an explicit code.
    ///
    /// Missing identifiers or a code of the wrong length fail locally. The
    /// typed code is left in place on failure so the user can edit it.
    pub async fn confirm_code(&mut self, code: &str) -> Result<()> {
        if self.state.is_terminal() {
            return Ok(());
        }
        validate_confirmation(self.verification_id(), code)?;
        let verification_id = self.verification_id().unwrap_or_default().to_string();

        self.state = SessionState::Confirming;
        match self.api.confirm_verification(&verification_id, code).await {
            Ok(()) => {
                info!(email = %self.email, "Email verified");
                self.state = SessionState::Confirmed;
                if let Some(mut countdown) = self.countdown.take() {
                    countdown.cancel();
                }
                Ok(())
            }
            Err(e) => {
                warn!(email = %self.email, error = %e, "Code confirmation failed");
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// Clear the code and restart the countdown.
    ///
    /// Purely local: no request is sent. Refused while the countdown runs.
    pub fn resend(&mut self) -> Result<()> {
        let Some(countdown) = self.countdown.as_mut() else {
            return Err(self.out_of_order("resend the code"));
        };
        let remaining = countdown.remaining();
        if remaining > 0 {
            return Err(ValidationError::ResendLocked { remaining }.into());
        }
        countdown.restart();
        self.entry.reset();
        info!(email = %self.email, "Code entry reset for resend");
        Ok(())
    }

    /// Seconds left before [`resend`](Self::resend) is allowed.
    pub fn resend_remaining(&self) -> u32 {
        self.countdown.as_ref().map_or(0, ResendCountdown::remaining)
    }

    pub fn subscribe_countdown(&self) -> Option<watch::Receiver<u32>> {
        self.countdown.as_ref().map(ResendCountdown::subscribe)
    }

    pub fn entry(&self) -> &CodeEntry {
        &self.entry
    }

    pub fn entry_mut(&mut self) -> &mut CodeEntry {
        &mut self.entry
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn verification_id(&self) -> Option<&str> {
        self.issued.as_ref().map(|i| i.verification_id.as_str())
    }

    pub fn client_id(&self) -> Option<&str> {
        self.issued.as_ref().map(|i| i.client_id.as_str())
    }

    fn out_of_order(&self, action: &str) -> Error {
        Error::OutOfOrder {
            stage: format!("verification ({})", self.state),
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{Call, StubApi};

    fn password() -> SecretString {
        SecretString::from("hunter22")
    }

    async fn started(api: &Arc<StubApi>) -> VerificationSession {
        let mut session = VerificationSession::new(api.clone(), 24);
        session
            .start("Ana", "ana@example.cl", &password())
            .await
            .unwrap();
        session
    }

    fn type_code(session: &mut VerificationSession, code: &str) {
        for (i, c) in code.chars().enumerate() {
            session.entry_mut().set_digit(i, &c.to_string());
        }
    }

    #[tokio::test]
    async fn start_records_issued_ids() {
        let api = Arc::new(StubApi::issuing("v1", "42"));
        let session = started(&api).await;

        assert_eq!(session.state(), SessionState::Started);
        assert_eq!(session.verification_id(), Some("v1"));
        assert_eq!(session.client_id(), Some("42"));
        assert_eq!(session.email(), "ana@example.cl");
        assert_eq!(session.resend_remaining(), 24);
    }

    #[tokio::test]
    async fn start_rejects_empty_fields_locally() {
        let api = Arc::new(StubApi::issuing("v1", "42"));
        let mut session = VerificationSession::new(api.clone(), 24);

        let err = session
            .start("Ana", "  ", &password())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::EmptyField { field: "email" })
        ));
        assert!(api.calls().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn start_without_ids_is_a_contract_error() {
        let api = Arc::new(StubApi::default());
        let mut session = VerificationSession::new(api.clone(), 24);

        let err = session
            .start("Ana", "ana@example.cl", &password())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Contract { .. }));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.client_id().is_none());
    }

    #[tokio::test]
    async fn confirm_without_ids_never_reaches_network() {
        let api = Arc::new(StubApi::issuing("v1", "42"));
        let mut session = VerificationSession::new(api.clone(), 24);
        type_code(&mut session, "123456");

        let err = session.confirm().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingVerificationId)
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn short_code_never_reaches_network() {
        let api = Arc::new(StubApi::issuing("v1", "42"));
        let mut session = started(&api).await;
        type_code(&mut session, "1234");

        let err = session.confirm().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::CodeLength { actual: 4, .. })
        ));
        assert_eq!(api.calls().len(), 1, "only the start call");
    }

    #[tokio::test]
    async fn confirm_sends_id_and_code() {
        let api = Arc::new(StubApi::issuing("v1", "42"));
        let mut session = started(&api).await;
        type_code(&mut session, "123456");

        session.confirm().await.unwrap();
        assert_eq!(session.state(), SessionState::Confirmed);
        assert!(api.calls().contains(&Call::Confirm {
            verification_id: "v1".into(),
            code: "123456".into(),
        }));
    }

    #[tokio::test]
    async fn failed_confirm_keeps_code_and_allows_retry() {
        let api = Arc::new(StubApi::issuing("v1", "42").rejecting_codes());
        let mut session = started(&api).await;
        type_code(&mut session, "111111");

        let err = session.confirm().await.unwrap_err();
        assert!(matches!(err, Error::Service { .. }));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.entry().joined(), "111111");

        api.accept_codes();
        session.confirm().await.unwrap();
        assert_eq!(session.state(), SessionState::Confirmed);
    }

    #[tokio::test]
    async fn resend_is_locked_while_counting() {
        let api = Arc::new(StubApi::issuing("v1", "42"));
        let mut session = started(&api).await;
        type_code(&mut session, "12");

        let err = session.resend().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ResendLocked { .. })
        ));
        assert_eq!(session.entry().joined(), "12");
    }

    #[tokio::test(start_paused = true)]
    async fn resend_resets_buffer_and_countdown_without_network() {
        let api = Arc::new(StubApi::issuing("v1", "42"));
        let mut session = VerificationSession::new(api.clone(), 3);
        session
            .start("Ana", "ana@example.cl", &password())
            .await
            .unwrap();
        type_code(&mut session, "98");

        tokio::time::sleep(std::time::Duration::from_secs(4)).await;
        assert_eq!(session.resend_remaining(), 0);

        session.resend().unwrap();
        assert_eq!(session.entry().joined(), "");
        assert_eq!(session.entry().focus(), 0);
        assert_eq!(session.resend_remaining(), 3);
        assert_eq!(api.calls().len(), 1, "resend is client-local");
    }

    #[tokio::test]
    async fn resend_before_start_is_out_of_order() {
        let api = Arc::new(StubApi::issuing("v1", "42"));
        let mut session = VerificationSession::new(api, 24);
        assert!(matches!(
            session.resend().unwrap_err(),
            Error::OutOfOrder { .. }
        ));
    }

    #[test]
    fn validate_confirmation_rules() {
        assert_eq!(
            validate_confirmation(None, "123456"),
            Err(ValidationError::MissingVerificationId)
        );
        assert_eq!(
            validate_confirmation(Some(" "), "123456"),
            Err(ValidationError::MissingVerificationId)
        );
        assert!(validate_confirmation(Some("v1"), "12345").is_err());
        assert!(validate_confirmation(Some("v1"), "123456").is_ok());
    }
}

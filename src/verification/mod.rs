//! Email verification: code entry, resend countdown and the registration
//! session that ties them to the service.

pub mod code;
pub mod countdown;
pub mod session;

pub use code::{CODE_LENGTH, CodeEntry};
pub use countdown::ResendCountdown;
pub use session::{SessionState, VerificationSession, validate_confirmation};

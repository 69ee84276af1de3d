//! Resend countdown: a cancellable once-per-second ticker.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

/// Seconds remaining before a new code may be requested.
///
/// The ticking task lives exactly as long as this value: it is aborted on
/// [`restart`](Self::restart), [`cancel`](Self::cancel) and `Drop`. Must be
/// created inside a tokio runtime.
#[derive(Debug)]
pub struct ResendCountdown {
    seconds: u32,
    tx: watch::Sender<u32>,
    ticker: Option<JoinHandle<()>>,
}

impl ResendCountdown {
    /// Start counting down from `seconds`.
    pub fn start(seconds: u32) -> Self {
        let (tx, _rx) = watch::channel(seconds);
        let mut countdown = Self {
            seconds,
            tx,
            ticker: None,
        };
        countdown.spawn_ticker();
        countdown
    }

    pub fn remaining(&self) -> u32 {
        *self.tx.borrow()
    }

    /// Resend is only allowed once the countdown reaches zero.
    pub fn can_resend(&self) -> bool {
        self.remaining() == 0
    }

    /// Observe the remaining seconds as they change.
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.tx.subscribe()
    }

    /// Reset to the full length and tick again.
    pub fn restart(&mut self) {
        self.cancel();
        self.tx.send_replace(self.seconds);
        self.spawn_ticker();
    }

    /// Stop ticking. The remaining value is frozen where it was.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            debug!(remaining = self.remaining(), "Resend countdown cancelled");
        }
    }

    fn spawn_ticker(&mut self) {
        if self.remaining() == 0 {
            return;
        }
        let tx = self.tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(TICK).await;
                let mut left = 0;
                tx.send_modify(|r| {
                    *r = r.saturating_sub(1);
                    left = *r;
                });
                if left == 0 {
                    return;
                }
            }
        }));
    }
}

impl Drop for ResendCountdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

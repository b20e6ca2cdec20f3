//! Per-question countdown timer.
//!
//! Each armed question gets a one-shot countdown task keyed by
//! (session id, cursor). The task ticks once per second, decrementing an
//! observable remaining-seconds counter, and on reaching zero sends exactly
//! one `TimerExpired` event and exits. Cancelling (question answered early,
//! session discarded) trips a `CancellationToken`, so an expiry can never
//! fire for a question that has already been dealt with. Re-arming replaces
//! the previous countdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Identity of one armed countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerKey {
    pub session_id: Uuid,
    pub cursor: usize,
}

/// Sent exactly once when an armed countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerExpired {
    pub session_id: Uuid,
    pub cursor: usize,
}

struct ArmedTimer {
    key: TimerKey,
    token: CancellationToken,
    remaining: Arc<AtomicU64>,
}

/// One-shot per-question countdown.
///
/// Holds at most one armed countdown at a time; expiry events go out over
/// the mpsc sender supplied at construction.
pub struct QuestionTimer {
    tx: mpsc::Sender<TimerExpired>,
    armed: Option<ArmedTimer>,
}

impl QuestionTimer {
    pub fn new(tx: mpsc::Sender<TimerExpired>) -> Self {
        Self { tx, armed: None }
    }

    /// Arm the countdown for a question, replacing (and cancelling) any
    /// previous one.
    pub fn arm(&mut self, session_id: Uuid, cursor: usize, limit_secs: u64) {
        self.cancel();

        let key = TimerKey { session_id, cursor };
        let token = CancellationToken::new();
        let remaining = Arc::new(AtomicU64::new(limit_secs));

        let task_token = token.clone();
        let task_remaining = Arc::clone(&remaining);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick completes immediately; consume it so
            // the countdown starts after a full second.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!(session_id = %key.session_id, cursor = key.cursor, "Countdown cancelled");
                        return;
                    }
                    _ = ticker.tick() => {
                        let left = task_remaining.load(Ordering::Acquire).saturating_sub(1);
                        task_remaining.store(left, Ordering::Release);
                        if left == 0 {
                            debug!(session_id = %key.session_id, cursor = key.cursor, "Countdown expired");
                            let _ = tx
                                .send(TimerExpired {
                                    session_id: key.session_id,
                                    cursor: key.cursor,
                                })
                                .await;
                            return;
                        }
                    }
                }
            }
        });

        self.armed = Some(ArmedTimer {
            key,
            token,
            remaining,
        });
    }

    /// Cancel the pending expiry, if any. Idempotent; safe to call after
    /// the countdown already fired.
    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.token.cancel();
        }
    }

    /// Key of the currently armed countdown.
    pub fn armed_key(&self) -> Option<TimerKey> {
        self.armed.as_ref().map(|a| a.key)
    }

    /// Seconds left on the armed countdown.
    pub fn remaining_secs(&self) -> Option<u64> {
        self.armed
            .as_ref()
            .map(|a| a.remaining.load(Ordering::Acquire))
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

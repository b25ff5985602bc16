//! Auto-dismissal of notifications.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// How long a notification stays up.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Sends the notification's `seq` on the channel once `after` has elapsed.
///
/// The callback lives as long as the timer: dropping it (for example when a
/// newer notification replaces it) aborts the pending send.
#[derive(Debug)]
pub struct DismissTimer {
    seq: u64,
    handle: JoinHandle<()>,
}

impl DismissTimer {
    pub fn schedule(seq: u64, after: Duration, tx: UnboundedSender<u64>) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // The receiver is gone only when the session is.
            let _ = tx.send(seq);
        });
        Self { seq, handle }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

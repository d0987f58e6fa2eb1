/// Best-effort progress signal from the walk to its consumer.
///
/// The channel carries no data. A tick means "something changed, re-read the
/// tree"; many ticks may collapse into one wake-up. Disconnection of the
/// channel is the one authoritative "walk fully settled" signal.
use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use tracing::{error, trace};

/// Capacity of the notification channel. One pending tick is enough to wake
/// the consumer; anything more would only queue stale news.
pub const NOTIFY_CHANNEL_CAPACITY: usize = 1;

/// Producer side shared by every walk unit.
///
/// The notifier holds the only sender of its channel, so closing it is what
/// disconnects the receiver. Units take the read lock to post; only
/// [`Notifier::close`] takes the write lock, and it runs after every unit has
/// finished.
#[derive(Debug)]
pub(crate) struct Notifier {
    tx: RwLock<Option<Sender<()>>>,
}

impl Notifier {
    /// Create a notifier and the receiver its ticks arrive on.
    pub(crate) fn channel() -> (Self, Receiver<()>) {
        let (tx, rx) = crossbeam_channel::bounded(NOTIFY_CHANNEL_CAPACITY);
        let notifier = Self {
            tx: RwLock::new(Some(tx)),
        };
        (notifier, rx)
    }

    /// Post a tick without blocking. Dropped if the consumer is busy.
    pub(crate) fn ping(&self) {
        let guard = self.tx.read();
        let Some(tx) = guard.as_ref() else {
            debug_assert!(false, "progress tick after the notifier was closed");
            error!("progress tick after the notifier was closed");
            return;
        };
        match tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => trace!("consumer busy, tick coalesced"),
            // The consumer stopped listening; the walk carries on regardless.
            Err(TrySendError::Disconnected(())) => trace!("consumer gone, tick dropped"),
        }
    }

    /// Close the channel. Must happen exactly once.
    pub(crate) fn close(&self) {
        if self.tx.write().take().is_none() {
            debug_assert!(false, "notifier closed twice");
            error!("notifier closed twice");
        }
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.tx.read().is_none()
    }
}

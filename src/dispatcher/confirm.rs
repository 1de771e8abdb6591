//! The confirmation round trip.
//!
//! A gated action suspends until the host answers. The host may deliver an
//! explicit [`ConfirmSignal::Confirmed`], or only a generic
//! [`ConfirmSignal::DialogClosed`] when the dialog goes away. Because both
//! can arrive near-simultaneously (clicking "confirm" also closes the
//! dialog), a closed signal arms a short default-deny delay during which a
//! late confirmed signal still wins the race.

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use crate::constants::CONFIRMATION_DENY_DELAY_MS;
use crate::models::ConfirmSignal;

/// Await the host's answer to a confirmation request.
///
/// Resolves `true` only on an explicit confirmed signal. A closed channel
/// denies immediately.
pub async fn await_confirmation(signals: &mut mpsc::Receiver<ConfirmSignal>) -> bool {
    loop {
        match signals.recv().await {
            Some(ConfirmSignal::Confirmed) => return true,
            Some(ConfirmSignal::DialogClosed) => break,
            None => return false,
        }
    }

    // Dialog closed without an explicit answer: deny once the delay
    // elapses, unless a confirmed signal sneaks in first.
    let deny = sleep(Duration::from_millis(CONFIRMATION_DENY_DELAY_MS));
    tokio::pin!(deny);
    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                Some(ConfirmSignal::Confirmed) => return true,
                Some(ConfirmSignal::DialogClosed) => {}
                None => return false,
            },
            () = &mut deny => return false,
        }
    }
}

/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use std::time::Duration;

/***************************************/
/*       Public data structures        */
/***************************************/
/// Result of a cancellable timed wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

impl WaitOutcome {
    pub fn is_cancelled(&self) -> bool {
        *self == WaitOutcome::Cancelled
    }
}

/***************************************/
/*             Public API              */
/***************************************/
/// Sleeps for `duration` unless a cancellation message arrives first.
///
/// A disconnected cancel sender means nobody can cancel anymore; the wait then
/// runs out its remaining time and reports `Elapsed`.
pub fn sleep_unless_cancelled(duration: Duration, cancel_rx: &cbc::Receiver<()>) -> WaitOutcome {
    let deadline = cbc::after(duration);
    cbc::select! {
        recv(cancel_rx) -> msg => {
            if msg.is_ok() {
                return WaitOutcome::Cancelled;
            }
            let _ = deadline.recv();
            WaitOutcome::Elapsed
        }
        recv(deadline) -> _ => WaitOutcome::Elapsed,
    }
}

/// Non-blocking poll of the cancellation signal.
pub fn cancel_requested(cancel_rx: &cbc::Receiver<()>) -> bool {
    matches!(cancel_rx.try_recv(), Ok(()))
}

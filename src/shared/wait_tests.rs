/*
 * Unit tests for the cancellable wait helpers
 *
 * The unit tests follow the Arrange, Act, Assert pattern.
 */

use crate::shared::wait::{cancel_requested, sleep_unless_cancelled, WaitOutcome};
use crossbeam_channel::unbounded;
use std::time::{Duration, Instant};

#[test]
fn test_wait_elapses_without_cancel() {
    // Arrange
    let (_cancel_tx, cancel_rx) = unbounded::<()>();

    // Act
    let outcome = sleep_unless_cancelled(Duration::from_millis(20), &cancel_rx);

    // Assert
    assert_eq!(outcome, WaitOutcome::Elapsed);
}

#[test]
fn test_wait_aborts_on_pending_cancel() {
    // Arrange
    let (cancel_tx, cancel_rx) = unbounded::<()>();
    cancel_tx.send(()).unwrap();

    // Act
    let started = Instant::now();
    let outcome = sleep_unless_cancelled(Duration::from_secs(5), &cancel_rx);

    // Assert: the wait must return well before the full five seconds
    assert_eq!(outcome, WaitOutcome::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_wait_ignores_disconnected_sender() {
    // Arrange
    let (cancel_tx, cancel_rx) = unbounded::<()>();
    drop(cancel_tx);

    // Act
    let started = Instant::now();
    let outcome = sleep_unless_cancelled(Duration::from_millis(50), &cancel_rx);

    // Assert: a dropped sender is not a cancellation
    assert_eq!(outcome, WaitOutcome::Elapsed);
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[test]
fn test_cancel_requested_polls_without_blocking() {
    // Arrange
    let (cancel_tx, cancel_rx) = unbounded::<()>();

    // Act + Assert
    assert!(!cancel_requested(&cancel_rx));
    cancel_tx.send(()).unwrap();
    assert!(cancel_requested(&cancel_rx));
}

/*
 * Unit tests for the car state machine
 *
 * The unit tests follow the Arrange, Act, Assert pattern.
 */

use crate::config::Timing;
use crate::elevator::Car;
use crate::shared::structs::{DoorState, MoveOutcome};
use crossbeam_channel::unbounded;
use std::sync::Arc;
use std::thread::spawn;
use std::time::Duration;

fn instant_timing() -> Timing {
    Timing {
        door: Duration::ZERO,
        per_floor: Duration::ZERO,
        stop_start: Duration::ZERO,
        pickup: Duration::ZERO,
    }
}

fn travel_timing() -> Timing {
    Timing {
        door: Duration::from_millis(5),
        per_floor: Duration::from_millis(150),
        stop_start: Duration::from_millis(10),
        pickup: Duration::ZERO,
    }
}

fn test_car(start_floor: i32) -> Car {
    Car::new(1, "TestCar".to_string(), start_floor, 5, instant_timing())
}

#[test]
fn test_new_car_initial_state() {
    // Arrange + Act
    let car = test_car(2);
    let snapshot = car.snapshot();

    // Assert: stopped and open, nobody aboard, nowhere to go
    assert_eq!(snapshot.floor, 2);
    assert_eq!(snapshot.destination, None);
    assert_eq!(snapshot.door, DoorState::Open);
    assert!(!snapshot.moving);
    assert_eq!(snapshot.occupancy, 0);
    assert_eq!(snapshot.occupancy_limit, 5);
}

#[test]
fn test_open_door_noop_when_already_open() {
    // Arrange
    let car = test_car(0);
    let (_cancel_tx, cancel_rx) = unbounded::<()>();

    // Act
    let result = car.open_door(&cancel_rx);

    // Assert
    assert_eq!(result.outcome, MoveOutcome::Completed);
    assert_eq!(car.snapshot().door, DoorState::Open);
}

#[test]
fn test_door_cycle() {
    // Arrange
    let car = test_car(0);
    let (_cancel_tx, cancel_rx) = unbounded::<()>();

    // Act + Assert
    assert_eq!(car.close_door(&cancel_rx).outcome, MoveOutcome::Completed);
    assert_eq!(car.snapshot().door, DoorState::Closed);

    // Closing twice is a no-op success
    assert_eq!(car.close_door(&cancel_rx).outcome, MoveOutcome::Completed);

    assert_eq!(car.open_door(&cancel_rx).outcome, MoveOutcome::Completed);
    assert_eq!(car.snapshot().door, DoorState::Open);
}

#[test]
fn test_open_door_refused_while_moving() {
    // Arrange
    let car = test_car(0);
    let (_cancel_tx, cancel_rx) = unbounded::<()>();
    car.close_door(&cancel_rx);
    car.begin_move_to(3);
    car.test_set_moving(true);

    // Act
    let result = car.open_door(&cancel_rx);

    // Assert: refused as a result, not a panic, and the door stays closed
    assert_eq!(result.outcome, MoveOutcome::Refused);
    assert_eq!(car.snapshot().door, DoorState::Closed);
}

#[test]
fn test_move_without_destination_refused() {
    // Arrange
    let car = test_car(0);
    let (progress_tx, _progress_rx) = unbounded();
    let (_cancel_tx, cancel_rx) = unbounded::<()>();

    // Act
    let result = car.move_to_destination(&progress_tx, &cancel_rx);

    // Assert
    assert_eq!(result.outcome, MoveOutcome::Refused);
    assert!(result.description.contains("no destination"));
}

#[test]
fn test_move_with_open_door_refused() {
    // Arrange
    let car = test_car(0);
    car.begin_move_to(3);
    let (progress_tx, _progress_rx) = unbounded();
    let (_cancel_tx, cancel_rx) = unbounded::<()>();

    // Act
    let result = car.move_to_destination(&progress_tx, &cancel_rx);

    // Assert: still at the origin with the claim intact
    assert_eq!(result.outcome, MoveOutcome::Refused);
    assert!(result.description.contains("door is open"));
    assert_eq!(car.snapshot().floor, 0);
}

#[test]
fn test_move_while_moving_refused() {
    // Arrange
    let car = test_car(0);
    let (progress_tx, _progress_rx) = unbounded();
    let (_cancel_tx, cancel_rx) = unbounded::<()>();
    car.close_door(&cancel_rx);
    car.begin_move_to(3);
    car.test_set_moving(true);

    // Act
    let result = car.move_to_destination(&progress_tx, &cancel_rx);

    // Assert
    assert_eq!(result.outcome, MoveOutcome::Refused);
    assert!(result.description.contains("Stop it first"));
}

#[test]
fn test_move_to_current_floor_skips_travel() {
    // Arrange: door open is fine when there is nothing to travel
    let car = test_car(2);
    car.begin_move_to(2);
    let (progress_tx, progress_rx) = unbounded();
    let (_cancel_tx, cancel_rx) = unbounded::<()>();

    // Act
    let result = car.move_to_destination(&progress_tx, &cancel_rx);

    // Assert: success, claim released, no movement reported
    assert_eq!(result.outcome, MoveOutcome::Completed);
    let snapshot = car.snapshot();
    assert_eq!(snapshot.floor, 2);
    assert_eq!(snapshot.destination, None);
    assert!(!snapshot.moving);
    assert!(progress_rx.try_recv().is_err());
}

#[test]
fn test_travel_up_emits_ordered_progress() {
    // Arrange
    let car = test_car(1);
    let (progress_tx, progress_rx) = unbounded();
    let (_cancel_tx, cancel_rx) = unbounded::<()>();
    car.close_door(&cancel_rx);
    car.begin_move_to(4);

    // Act
    let result = car.move_to_destination(&progress_tx, &cancel_rx);

    // Assert
    assert_eq!(result.outcome, MoveOutcome::Completed);
    assert!(result.description.contains("stopped at Floor4"));
    let snapshot = car.snapshot();
    assert_eq!(snapshot.floor, 4);
    assert_eq!(snapshot.destination, None);
    assert!(!snapshot.moving);

    let events: Vec<_> = progress_rx.try_iter().collect();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[0].movement,
        "TestCar started moving up towards Floor4 from Floor1"
    );
    assert_eq!(events[0].floor, 1);
    assert_eq!(
        events[1].movement,
        "TestCar moved up past Floor2 towards Floor4"
    );
    assert_eq!(events[1].floor, 2);
    assert_eq!(events[2].movement, "TestCar reached destination Floor4");
    assert_eq!(events[2].floor, 3);
}

#[test]
fn test_travel_down_into_basement() {
    // Arrange
    let car = test_car(1);
    let (progress_tx, progress_rx) = unbounded();
    let (_cancel_tx, cancel_rx) = unbounded::<()>();
    car.close_door(&cancel_rx);
    car.begin_move_to(-1);

    // Act
    let result = car.move_to_destination(&progress_tx, &cancel_rx);

    // Assert
    assert_eq!(result.outcome, MoveOutcome::Completed);
    assert_eq!(car.snapshot().floor, -1);

    let events: Vec<_> = progress_rx.try_iter().collect();
    assert_eq!(
        events[0].movement,
        "TestCar started moving down towards Basement1 from Floor1"
    );
    assert_eq!(
        events.last().unwrap().movement,
        "TestCar reached destination Basement1"
    );
}

#[test]
fn test_cancel_before_departure() {
    // Arrange
    let car = Car::new(1, "TestCar".to_string(), 0, 5, travel_timing());
    let (progress_tx, _progress_rx) = unbounded();
    let (cancel_tx, cancel_rx) = unbounded::<()>();
    car.close_door(&cancel_rx);
    car.begin_move_to(5);
    cancel_tx.send(()).unwrap();

    // Act
    let result = car.move_to_destination(&progress_tx, &cancel_rx);

    // Assert: cancelled during the start delay, still at the origin
    assert_eq!(result.outcome, MoveOutcome::Cancelled);
    let snapshot = car.snapshot();
    assert_eq!(snapshot.floor, 0);
    assert_eq!(snapshot.destination, None);
    assert!(!snapshot.moving);
}

#[test]
fn test_cancel_mid_travel_stops_between_floors() {
    // Arrange
    let car = Arc::new(Car::new(1, "TestCar".to_string(), 0, 5, travel_timing()));
    let (progress_tx, _progress_rx) = unbounded();
    let (cancel_tx, cancel_rx) = unbounded::<()>();
    car.close_door(&cancel_rx);
    car.begin_move_to(5);

    // Act: cancel while the car is somewhere in the middle of its run
    let mover = {
        let car = Arc::clone(&car);
        spawn(move || car.move_to_destination(&progress_tx, &cancel_rx))
    };
    std::thread::sleep(Duration::from_millis(250));
    cancel_tx.send(()).unwrap();
    let result = mover.join().unwrap();

    // Assert: controlled stop at a floor short of the destination
    assert_eq!(result.outcome, MoveOutcome::Cancelled);
    let snapshot = car.snapshot();
    assert!(snapshot.floor >= 0 && snapshot.floor < 5);
    assert_eq!(snapshot.destination, None);
    assert!(!snapshot.moving);
}

/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::debug;
use std::sync::{Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::Timing;
use crate::shared::structs::{floor_name, CarSnapshot, Direction, DoorState, MoveResult, ProgressEvent};
use crate::shared::wait::{cancel_requested, sleep_unless_cancelled};

/**
 * One elevator car and its state machine.
 *
 * A car cycles between three states for the life of the process: idle with the
 * door open, idle with the door closed, and moving (door always closed while
 * moving). Every operation that takes simulated time sleeps through the
 * cancellable wait helpers; the state mutex is only held across brief field
 * reads and writes, never across a delay, so snapshots taken while a car is
 * travelling do not block.
 *
 * A car never drives itself: the dispatcher claims it and then runs exactly
 * one orchestration on it at a time. The claim is a separate flag from the
 * destination because the destination is cleared by the terminal stop while
 * the door-open and boarding steps are still outstanding; the flag stays set
 * until the whole orchestration returns, so the selection heuristic cannot
 * hand the car out mid-pickup. Refused preconditions and cancellations are
 * reported through `MoveResult`, never by panicking.
 */
#[derive(Debug)]
pub struct Car {
    id: u32,
    name: String,
    timing: Timing,
    state: Mutex<CarState>,
}

#[derive(Debug)]
struct CarState {
    current_floor: i32,
    destination_floor: Option<i32>,
    door: DoorState,
    moving: bool,
    claimed: bool,
    occupancy: u32,
    occupancy_limit: u32,
}

/// Idle-car facts the dispatcher's selection heuristic needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Availability {
    pub floor: i32,
    pub spare_capacity: u32,
}

impl Car {
    /// A new car starts stopped at `start_floor` with the door open, no
    /// destination and nobody aboard.
    pub fn new(id: u32, name: String, start_floor: i32, occupancy_limit: u32, timing: Timing) -> Car {
        Car {
            id,
            name,
            timing,
            state: Mutex::new(CarState {
                current_floor: start_floor,
                destination_floor: None,
                door: DoorState::Open,
                moving: false,
                claimed: false,
                occupancy: 0,
                occupancy_limit,
            }),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot(&self) -> CarSnapshot {
        let state = self.lock_state();
        CarSnapshot {
            id: self.id,
            name: self.name.clone(),
            floor: state.current_floor,
            destination: state.destination_floor,
            door: state.door,
            moving: state.moving,
            occupancy: state.occupancy,
            occupancy_limit: state.occupancy_limit,
        }
    }

    /// Opens the door after the door delay. No-op if already open; refused
    /// while the car is in transit.
    pub fn open_door(&self, cancel_rx: &cbc::Receiver<()>) -> MoveResult {
        {
            let state = self.lock_state();
            if state.door == DoorState::Open {
                return MoveResult::completed(format!("{} door is already open.", self.name));
            }
            if state.moving {
                return MoveResult::refused(format!("Cannot open door. {} is moving.", self.name));
            }
        }

        if sleep_unless_cancelled(self.timing.door, cancel_rx).is_cancelled() {
            return MoveResult::cancelled(format!("{} door opening cancelled.", self.name));
        }

        self.lock_state().door = DoorState::Open;
        MoveResult::completed(format!("{} door opened.", self.name))
    }

    /// Closes the door after the door delay. No-op if already closed.
    pub fn close_door(&self, cancel_rx: &cbc::Receiver<()>) -> MoveResult {
        {
            let state = self.lock_state();
            if state.door == DoorState::Closed {
                return MoveResult::completed(format!("{} door is already closed.", self.name));
            }
        }

        if sleep_unless_cancelled(self.timing.door, cancel_rx).is_cancelled() {
            return MoveResult::cancelled(format!("{} door closing cancelled.", self.name));
        }

        self.lock_state().door = DoorState::Closed;
        MoveResult::completed(format!("{} door closed.", self.name))
    }

    /// Brings the car to a stop and clears its destination. Applies the
    /// deceleration delay when the car was moving; a pending cancellation only
    /// shortens that wait, the stop itself always completes. Idempotent.
    pub fn stop(&self, cancel_rx: &cbc::Receiver<()>) {
        let was_moving = self.lock_state().moving;
        if was_moving {
            let _ = sleep_unless_cancelled(self.timing.stop_start, cancel_rx);
        }

        let mut state = self.lock_state();
        state.moving = false;
        state.destination_floor = None;
    }

    /// Travels floor by floor to the assigned destination, then stops.
    ///
    /// Preconditions (each a refusal): the car must not already be moving, a
    /// destination must be set, and the door must be closed unless the car is
    /// already at its destination. The cancellation signal is polled once per
    /// floor-step and also aborts any in-progress wait; on cancellation the
    /// car makes a controlled stop at whatever floor it has reached.
    pub fn move_to_destination(
        &self,
        progress_tx: &cbc::Sender<ProgressEvent>,
        cancel_rx: &cbc::Receiver<()>,
    ) -> MoveResult {
        let (origin, destination) = {
            let state = self.lock_state();
            if state.moving {
                return MoveResult::refused(format!(
                    "{} is moving already. Stop it first.",
                    self.name
                ));
            }
            let destination = match state.destination_floor {
                Some(floor) => floor,
                None => {
                    return MoveResult::refused(format!("{} has no destination set.", self.name))
                }
            };
            if state.current_floor != destination && state.door == DoorState::Open {
                return MoveResult::refused(format!("{} door is open. Close it first.", self.name));
            }
            (state.current_floor, destination)
        };

        if origin != destination {
            let direction = if destination > origin {
                Direction::Up
            } else {
                Direction::Down
            };

            self.lock_state().moving = true;
            debug!("{} departing {} for {}", self.name, floor_name(origin), floor_name(destination));

            // Delayed start
            if sleep_unless_cancelled(self.timing.stop_start, cancel_rx).is_cancelled() {
                self.stop(cancel_rx);
                return MoveResult::cancelled(format!(
                    "{} move towards {} cancelled.",
                    self.name,
                    floor_name(destination)
                ));
            }

            self.report(
                progress_tx,
                origin,
                format!(
                    "{} started moving {} towards {} from {}",
                    self.name,
                    direction,
                    floor_name(destination),
                    floor_name(origin)
                ),
            );

            loop {
                let current = self.lock_state().current_floor;
                if current == destination {
                    break;
                }

                // Something went wrong upstream - stop at the current floor
                // and skip the pickup.
                if cancel_requested(cancel_rx) {
                    self.stop(cancel_rx);
                    return MoveResult::cancelled(format!(
                        "{} move towards {} cancelled.",
                        self.name,
                        floor_name(destination)
                    ));
                }

                if current != origin {
                    if sleep_unless_cancelled(self.timing.per_floor, cancel_rx).is_cancelled() {
                        self.stop(cancel_rx);
                        return MoveResult::cancelled(format!(
                            "{} move towards {} cancelled.",
                            self.name,
                            floor_name(destination)
                        ));
                    }

                    let next = if destination > current { current + 1 } else { current - 1 };
                    let movement = if next == destination {
                        format!("{} reached destination {}", self.name, floor_name(destination))
                    } else {
                        format!(
                            "{} moved {} past {} towards {}",
                            self.name,
                            direction,
                            floor_name(current),
                            floor_name(destination)
                        )
                    };
                    self.report(progress_tx, current, movement);
                }

                let mut state = self.lock_state();
                if destination > state.current_floor {
                    state.current_floor += 1;
                } else {
                    state.current_floor -= 1;
                }
            }
        }

        // Destination reached
        self.stop(cancel_rx);
        let floor = self.lock_state().current_floor;
        MoveResult::completed(format!(
            "{} moved and stopped at {}.",
            self.name,
            floor_name(floor)
        ))
    }

    /// Repositions an idle car, for scenario setup.
    pub fn set_current_floor(&self, floor: i32) {
        self.lock_state().current_floor = floor;
    }

    /// Selection facts, or `None` when the car is claimed, moving or full.
    pub(crate) fn availability(&self) -> Option<Availability> {
        let state = self.lock_state();
        if state.claimed
            || state.destination_floor.is_some()
            || state.moving
            || state.occupancy >= state.occupancy_limit
        {
            return None;
        }
        Some(Availability {
            floor: state.current_floor,
            spare_capacity: state.occupancy_limit - state.occupancy,
        })
    }

    /// Compare-and-set claim: takes the car and assigns `floor` as its
    /// destination only if the car is still idle, unclaimed and not full.
    pub(crate) fn try_claim(&self, floor: i32) -> bool {
        let mut state = self.lock_state();
        if state.claimed
            || state.destination_floor.is_some()
            || state.moving
            || state.occupancy >= state.occupancy_limit
        {
            return false;
        }
        state.claimed = true;
        state.destination_floor = Some(floor);
        true
    }

    /// Takes the car for a direct orchestration, bypassing the idle check.
    pub(crate) fn mark_claimed(&self) {
        self.lock_state().claimed = true;
    }

    /// Hands the car back to the selection pool once its orchestration has
    /// returned. Also drops any destination a refused or cancelled step left
    /// behind; the car is stopped by then, so there is nothing to interrupt.
    pub(crate) fn release(&self) {
        let mut state = self.lock_state();
        state.claimed = false;
        state.destination_floor = None;
    }

    /// Assigns the destination for an orchestrated move.
    pub(crate) fn begin_move_to(&self, floor: i32) {
        self.lock_state().destination_floor = Some(floor);
    }

    /// Takes as many of `waiting` passengers as fit and returns how many
    /// boarded.
    pub(crate) fn admit(&self, waiting: u32) -> u32 {
        let mut state = self.lock_state();
        let boarded = waiting.min(state.occupancy_limit - state.occupancy);
        state.occupancy += boarded;
        debug_assert!(state.occupancy <= state.occupancy_limit);
        boarded
    }

    /// Seeds the occupancy, for scenario setup. Caller must keep it within
    /// the limit; the dispatcher validates before calling.
    pub(crate) fn set_occupancy(&self, occupancy: u32) {
        let mut state = self.lock_state();
        debug_assert!(occupancy <= state.occupancy_limit);
        state.occupancy = occupancy;
    }

    fn lock_state(&self) -> MutexGuard<'_, CarState> {
        self.state.lock().expect("car state mutex poisoned")
    }

    fn report(&self, progress_tx: &cbc::Sender<ProgressEvent>, floor: i32, movement: String) {
        let _ = progress_tx.send(ProgressEvent {
            car_id: self.id,
            car_name: self.name.clone(),
            floor,
            movement,
        });
    }

    #[cfg(test)]
    pub(crate) fn test_set_moving(&self, moving: bool) {
        self.lock_state().moving = moving;
    }
}

pub mod macros;
pub mod structs;
pub mod wait;

#[cfg(test)]
mod wait_tests;

pub use structs::{
    floor_name, CarSnapshot, Direction, DispatchError, DoorState, MoveOutcome, MoveResult,
    ProgressEvent,
};
pub use wait::{cancel_requested, sleep_unless_cancelled, WaitOutcome};

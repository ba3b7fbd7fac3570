//! Multi-car elevator dispatch simulation.
//!
//! A fleet of [`Car`]s with capacity limits serves floor requests: the
//! [`Dispatcher`] picks the nearest available car with enough spare capacity,
//! then drives it through a timed stop, close-door, floor-by-floor travel,
//! open-door and boarding sequence. Progress is reported through a crossbeam
//! channel and every simulated delay honours a cooperative cancellation
//! signal.
//!
//! The library exposes the dispatcher operations plus car/floor snapshots;
//! presentation (the console table, input handling) lives in the demo binary.

/* Modules */
pub mod config;
pub mod dispatcher;
pub mod elevator;
pub mod shared;

pub use config::{BuildingConfig, Config, FleetConfig, Timing, TimingConfig};
pub use dispatcher::{Dispatcher, FloorRegistry};
pub use elevator::Car;
pub use shared::{
    floor_name, CarSnapshot, Direction, DispatchError, DoorState, MoveOutcome, MoveResult,
    ProgressEvent,
};

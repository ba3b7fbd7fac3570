/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::error::Error;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
}

/// Travel direction, always derived from current vs destination floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// How a state-machine operation ended. Every door/move operation reports its
/// outcome through this tag; refusals and cancellations are normal return
/// values, never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Completed,
    Refused,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub outcome: MoveOutcome,
    pub description: String,
}

impl MoveResult {
    pub fn completed(description: impl Into<String>) -> MoveResult {
        MoveResult {
            outcome: MoveOutcome::Completed,
            description: description.into(),
        }
    }

    pub fn refused(description: impl Into<String>) -> MoveResult {
        MoveResult {
            outcome: MoveOutcome::Refused,
            description: description.into(),
        }
    }

    pub fn cancelled(description: impl Into<String>) -> MoveResult {
        MoveResult {
            outcome: MoveOutcome::Cancelled,
            description: description.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == MoveOutcome::Completed
    }
}

/// One human-readable movement notification. Events for a single car arrive in
/// chronological order; no ordering holds across cars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub car_id: u32,
    pub car_name: String,
    pub floor: i32,
    pub movement: String,
}

/// Read-only view of one car, for rendering and assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarSnapshot {
    pub id: u32,
    pub name: String,
    pub floor: i32,
    pub destination: Option<i32>,
    pub door: DoorState,
    pub moving: bool,
    pub occupancy: u32,
    pub occupancy_limit: u32,
}

/// Validation failures. These abort the offending call synchronously and
/// mutate no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    EmptyFleet,
    NoCapacity,
    InvalidFloorRange { min: i32, max: i32 },
    StartFloorOutOfRange { floor: i32, min: i32, max: i32 },
    UnknownFloor { floor: i32, min: i32, max: i32 },
    UnknownCar(u32),
    OccupancyAboveLimit { occupancy: u32, limit: u32 },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DispatchError::EmptyFleet => write!(f, "You need elevators. n_cars must be at least 1"),
            DispatchError::NoCapacity => {
                write!(f, "You need bigger elevators. occupancy_limit must be at least 1")
            }
            DispatchError::InvalidFloorRange { min, max } => {
                write!(f, "min_floor ({}) must be lower than max_floor ({})", min, max)
            }
            DispatchError::StartFloorOutOfRange { floor, min, max } => write!(
                f,
                "start floor {} is outside the building ({} to {})",
                floor, min, max
            ),
            DispatchError::UnknownFloor { floor, min, max } => {
                write!(f, "no such floor: {} (should be between {} and {})", floor, min, max)
            }
            DispatchError::UnknownCar(id) => write!(f, "no such car: {}", id),
            DispatchError::OccupancyAboveLimit { occupancy, limit } => {
                write!(f, "occupancy {} exceeds the limit of {}", occupancy, limit)
            }
        }
    }
}

impl Error for DispatchError {}

/***************************************/
/*             Public API              */
/***************************************/
/// Display name for a floor: "Ground Floor", "Basement1", "Floor4".
pub fn floor_name(floor: i32) -> String {
    if floor == 0 {
        return "Ground Floor".to_string();
    }
    if floor < 0 {
        format!("Basement{}", -floor)
    } else {
        format!("Floor{}", floor)
    }
}

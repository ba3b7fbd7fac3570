/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::HashMap;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::structs::DispatchError;

/// Per-floor count of people waiting to board.
///
/// The domain is exactly the contiguous range `[min_floor, max_floor]`; every
/// floor starts at zero. `set_waiting` overwrites the stored count rather than
/// accumulating it. The registry itself is not synchronized - the dispatcher
/// keeps it behind a mutex and does every read-modify-write under that lock.
#[derive(Debug)]
pub struct FloorRegistry {
    min_floor: i32,
    max_floor: i32,
    waiting: HashMap<i32, u32>,
}

impl FloorRegistry {
    pub fn new(min_floor: i32, max_floor: i32) -> Result<FloorRegistry, DispatchError> {
        if min_floor >= max_floor {
            return Err(DispatchError::InvalidFloorRange {
                min: min_floor,
                max: max_floor,
            });
        }

        // Assume all floors are elevator stops
        let waiting = (min_floor..=max_floor).map(|floor| (floor, 0)).collect();
        Ok(FloorRegistry {
            min_floor,
            max_floor,
            waiting,
        })
    }

    pub fn min_floor(&self) -> i32 {
        self.min_floor
    }

    pub fn max_floor(&self) -> i32 {
        self.max_floor
    }

    pub fn contains(&self, floor: i32) -> bool {
        self.waiting.contains_key(&floor)
    }

    /// Overwrites the waiting count for `floor`.
    pub fn set_waiting(&mut self, floor: i32, count: u32) -> Result<(), DispatchError> {
        match self.waiting.get_mut(&floor) {
            Some(entry) => {
                *entry = count;
                Ok(())
            }
            None => Err(self.unknown_floor(floor)),
        }
    }

    pub fn waiting_at(&self, floor: i32) -> Result<u32, DispatchError> {
        self.waiting
            .get(&floor)
            .copied()
            .ok_or_else(|| self.unknown_floor(floor))
    }

    /// Sorted (floor, waiting) pairs, lowest floor first.
    pub fn snapshot(&self) -> Vec<(i32, u32)> {
        let mut floors: Vec<(i32, u32)> = self.waiting.iter().map(|(f, w)| (*f, *w)).collect();
        floors.sort_unstable_by_key(|(floor, _)| *floor);
        floors
    }

    /// Infallible read for floors the dispatcher has already validated.
    pub(crate) fn count(&self, floor: i32) -> u32 {
        debug_assert!(self.contains(floor));
        self.waiting.get(&floor).copied().unwrap_or(0)
    }

    /// Removes `boarded` people from `floor` after a pickup.
    pub(crate) fn remove_waiting(&mut self, floor: i32, boarded: u32) {
        if let Some(entry) = self.waiting.get_mut(&floor) {
            *entry = entry.saturating_sub(boarded);
        }
    }

    fn unknown_floor(&self, floor: i32) -> DispatchError {
        DispatchError::UnknownFloor {
            floor,
            min: self.min_floor,
            max: self.max_floor,
        }
    }
}

/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, warn};
use std::sync::{Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{BuildingConfig, Config, FleetConfig, Timing};
use crate::dispatcher::floors::FloorRegistry;
use crate::elevator::Car;
use crate::shared::structs::{
    floor_name, CarSnapshot, DispatchError, MoveResult, ProgressEvent,
};
use crate::shared::wait::sleep_unless_cancelled;

/**
 * Owns the fleet and the floor registry, picks a car for each floor request
 * and runs the full move-and-board cycle on it.
 *
 * All methods take `&self`; callers that want several cars moving at once
 * share the dispatcher behind an `Arc` and run each `move_and_board` on its
 * own thread. `select_lock` serializes the scan-and-claim inside
 * `select_car`; the claim itself is a flag on the car that stays set from
 * selection until `move_and_board` returns, so a car is never handed out
 * twice - not even while it is dwelling at the pickup floor with its
 * destination already cleared. The floor registry has its own mutex; the
 * boarding step's read-modify-write of the waiting count runs entirely
 * under it.
 */
#[derive(Debug)]
pub struct Dispatcher {
    cars: Vec<Car>,
    floors: Mutex<FloorRegistry>,
    select_lock: Mutex<()>,
    timing: Timing,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Result<Dispatcher, DispatchError> {
        Dispatcher::with_timing(&config.building, &config.fleet, config.timing.to_timing())
    }

    /// Builds the fleet with explicit runtime delays, bypassing the
    /// seconds-based file configuration. Cars get ids 1..=n, all starting
    /// idle at the configured start floor with the door open.
    pub fn with_timing(
        building: &BuildingConfig,
        fleet: &FleetConfig,
        timing: Timing,
    ) -> Result<Dispatcher, DispatchError> {
        if fleet.n_cars == 0 {
            return Err(DispatchError::EmptyFleet);
        }
        if fleet.occupancy_limit == 0 {
            return Err(DispatchError::NoCapacity);
        }
        let floors = FloorRegistry::new(building.min_floor, building.max_floor)?;
        if !floors.contains(fleet.start_floor) {
            return Err(DispatchError::StartFloorOutOfRange {
                floor: fleet.start_floor,
                min: building.min_floor,
                max: building.max_floor,
            });
        }

        let cars = (1..=fleet.n_cars)
            .map(|id| {
                Car::new(
                    id,
                    format!("Elevator{}", id),
                    fleet.start_floor,
                    fleet.occupancy_limit,
                    timing,
                )
            })
            .collect();

        Ok(Dispatcher {
            cars,
            floors: Mutex::new(floors),
            select_lock: Mutex::new(()),
            timing,
        })
    }

    /// Overwrites the number of people waiting on `floor`.
    pub fn set_waiting(&self, floor: i32, count: u32) -> Result<(), DispatchError> {
        self.lock_floors().set_waiting(floor, count)
    }

    pub fn get_waiting(&self, floor: i32) -> Result<u32, DispatchError> {
        self.lock_floors().waiting_at(floor)
    }

    /// Picks the nearest available car for a request on `floor` and claims it.
    ///
    /// When `people_waiting` is given it first overwrites the registry's count
    /// for that floor. Cars that already have a destination, are moving or are
    /// full are never candidates. Among candidates, ones with enough spare
    /// capacity for everyone waiting are preferred; distance decides within
    /// each group and registration order breaks ties. Falls back to a partial
    /// load when no car can take the whole group. `Ok(None)` means the fleet
    /// is saturated - retry later.
    ///
    /// The returned car is claimed, with the request floor assigned as its
    /// destination; a concurrent `select_car` cannot hand it out again until
    /// a [`Dispatcher::move_and_board`] on it returns.
    pub fn select_car(
        &self,
        floor: i32,
        people_waiting: Option<u32>,
    ) -> Result<Option<u32>, DispatchError> {
        let _guard = self.lock_selection();

        let waiting = {
            let mut floors = self.lock_floors();
            if let Some(count) = people_waiting {
                floors.set_waiting(floor, count)?;
            }
            floors.waiting_at(floor)?
        };

        let candidates: Vec<(usize, i32, u32)> = self
            .cars
            .iter()
            .enumerate()
            .filter_map(|(index, car)| {
                car.availability()
                    .map(|a| (index, (a.floor - floor).abs(), a.spare_capacity))
            })
            .collect();

        // min_by_key keeps the first of equal elements, which is exactly the
        // fleet registration order tie-break.
        let nearest = candidates
            .iter()
            .filter(|(_, _, spare)| *spare >= waiting)
            .min_by_key(|(_, distance, _)| *distance)
            .or_else(|| candidates.iter().min_by_key(|(_, distance, _)| *distance));

        match nearest {
            Some(&(index, _, _)) => {
                let car = &self.cars[index];
                if car.try_claim(floor) {
                    debug!("{} claimed for {}", car.name(), floor_name(floor));
                    Ok(Some(car.id()))
                } else {
                    // A direct move_and_board can take the car between the
                    // scan and the claim; treat it as a saturated fleet.
                    warn!("{} changed state during selection", car.name());
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Stop, close door, travel to `destination_floor`, stop, open door and
    /// load whoever is waiting there.
    ///
    /// Unknown cars and out-of-range floors are errors; everything else -
    /// refusals from the car and cancellations - comes back as the
    /// `MoveResult`. A non-completed travel returns immediately and skips the
    /// pickup. Whatever the outcome, the car's claim is released on return,
    /// so a refused or cancelled car goes straight back into the selection
    /// pool.
    pub fn move_and_board(
        &self,
        car_id: u32,
        destination_floor: i32,
        progress_tx: &cbc::Sender<ProgressEvent>,
        cancel_rx: &cbc::Receiver<()>,
    ) -> Result<MoveResult, DispatchError> {
        let car = self.car(car_id)?;
        {
            let floors = self.lock_floors();
            if !floors.contains(destination_floor) {
                return Err(DispatchError::UnknownFloor {
                    floor: destination_floor,
                    min: floors.min_floor(),
                    max: floors.max_floor(),
                });
            }
        }

        // The claim flag keeps select_car away from this car for the whole
        // cycle, so none of the waits below run under select_lock.
        car.mark_claimed();
        let result = self.run_move_cycle(car, destination_floor, progress_tx, cancel_rx);
        car.release();
        Ok(result)
    }

    fn run_move_cycle(
        &self,
        car: &Car,
        destination_floor: i32,
        progress_tx: &cbc::Sender<ProgressEvent>,
        cancel_rx: &cbc::Receiver<()>,
    ) -> MoveResult {
        car.stop(cancel_rx);
        car.begin_move_to(destination_floor);

        if car.snapshot().floor != destination_floor {
            let closed = car.close_door(cancel_rx);
            if !closed.is_completed() {
                return closed;
            }
        }
        // A car already at its destination skips straight to the terminal
        // stop inside move_to_destination.
        let travelled = car.move_to_destination(progress_tx, cancel_rx);
        if !travelled.is_completed() {
            return travelled;
        }

        let opened = car.open_door(cancel_rx);
        if !opened.is_completed() {
            return opened;
        }

        if !self.board(car, cancel_rx) {
            return MoveResult::cancelled(format!(
                "{} pickup at {} cancelled.",
                car.name(),
                floor_name(destination_floor)
            ));
        }

        let snapshot = car.snapshot();
        MoveResult::completed(format!(
            "{} at {}. Stopped and door opened. Loaded to {} of {} person capacity.",
            car.name(),
            floor_name(destination_floor),
            snapshot.occupancy,
            snapshot.occupancy_limit
        ))
    }

    /// Repositions a car and seeds its occupancy, for test/scenario setup.
    pub fn place_car(&self, car_id: u32, floor: i32, occupancy: u32) -> Result<(), DispatchError> {
        let car = self.car(car_id)?;
        {
            let floors = self.lock_floors();
            if !floors.contains(floor) {
                return Err(DispatchError::UnknownFloor {
                    floor,
                    min: floors.min_floor(),
                    max: floors.max_floor(),
                });
            }
        }
        let limit = car.snapshot().occupancy_limit;
        if occupancy > limit {
            return Err(DispatchError::OccupancyAboveLimit { occupancy, limit });
        }
        car.set_current_floor(floor);
        car.set_occupancy(occupancy);
        Ok(())
    }

    pub fn car_snapshots(&self) -> Vec<CarSnapshot> {
        self.cars.iter().map(|car| car.snapshot()).collect()
    }

    /// Sorted (floor, waiting) pairs, lowest floor first.
    pub fn waiting_snapshot(&self) -> Vec<(i32, u32)> {
        self.lock_floors().snapshot()
    }

    pub fn min_floor(&self) -> i32 {
        self.lock_floors().min_floor()
    }

    pub fn max_floor(&self) -> i32 {
        self.lock_floors().max_floor()
    }

    /// Boarding step: pickup dwell, then move as many waiting people as fit
    /// into the car. Returns false when the dwell was cancelled; nobody
    /// boards in that case.
    fn board(&self, car: &Car, cancel_rx: &cbc::Receiver<()>) -> bool {
        if sleep_unless_cancelled(self.timing.pickup, cancel_rx).is_cancelled() {
            return false;
        }

        // One critical section for the whole read-modify-write, so concurrent
        // pickups on other cars cannot interleave with this floor's count.
        let mut floors = self.lock_floors();
        let floor = car.snapshot().floor;
        let waiting = floors.count(floor);
        let boarded = car.admit(waiting);
        floors.remove_waiting(floor, boarded);
        debug!("{} boarded {} at {}", car.name(), boarded, floor_name(floor));
        true
    }

    fn car(&self, car_id: u32) -> Result<&Car, DispatchError> {
        self.cars
            .iter()
            .find(|car| car.id() == car_id)
            .ok_or(DispatchError::UnknownCar(car_id))
    }

    fn lock_floors(&self) -> MutexGuard<'_, FloorRegistry> {
        self.floors.lock().expect("floor registry mutex poisoned")
    }

    fn lock_selection(&self) -> MutexGuard<'_, ()> {
        self.select_lock.lock().expect("selection mutex poisoned")
    }
}

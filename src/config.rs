/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::time::Duration;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub building: BuildingConfig,
    #[serde(default)]
    pub fleet: FleetConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct BuildingConfig {
    pub min_floor: i32,
    pub max_floor: i32,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct FleetConfig {
    pub n_cars: u32,
    pub occupancy_limit: u32,
    pub start_floor: i32,
}

/// Simulated delays, in whole seconds as they appear in the configuration
/// file. Convert with [`TimingConfig::to_timing`] before handing them to the
/// dispatcher.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub door_seconds: u64,
    pub floor_seconds: u64,
    pub stop_start_seconds: u64,
    pub pickup_seconds: u64,
}

/// Runtime delays injected into the dispatcher and its cars at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Time to open or close a door.
    pub door: Duration,
    /// Travel time between two adjacent floors.
    pub per_floor: Duration,
    /// Acceleration/deceleration time when starting or stopping.
    pub stop_start: Duration,
    /// Dwell time while passengers board.
    pub pickup: Duration,
}

impl Default for BuildingConfig {
    fn default() -> BuildingConfig {
        BuildingConfig {
            min_floor: -1,
            max_floor: 5,
        }
    }
}

impl Default for FleetConfig {
    fn default() -> FleetConfig {
        FleetConfig {
            n_cars: 3,
            occupancy_limit: 5,
            start_floor: 0,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> TimingConfig {
        TimingConfig {
            door_seconds: 3,
            floor_seconds: 5,
            stop_start_seconds: 1,
            pickup_seconds: 10,
        }
    }
}

impl TimingConfig {
    pub fn to_timing(&self) -> Timing {
        Timing {
            door: Duration::from_secs(self.door_seconds),
            per_floor: Duration::from_secs(self.floor_seconds),
            stop_start: Duration::from_secs(self.stop_start_seconds),
            pickup: Duration::from_secs(self.pickup_seconds),
        }
    }
}

impl Default for Timing {
    fn default() -> Timing {
        TimingConfig::default().to_timing()
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> Result<Config, Box<dyn Error>> {
    let config_str = fs::read_to_string(path)?;
    let config = toml::from_str(&config_str)?;
    Ok(config)
}

/* 3rd party libraries */
use clap::Parser;
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::sync::Arc;
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use elevator_dispatch::config::{self, Config, Timing};
use elevator_dispatch::shared::{floor_name, CarSnapshot, DoorState, ProgressEvent};
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::Dispatcher;

/// Multi-car elevator dispatch simulation.
#[derive(Parser, Debug)]
#[clap(name = "elevator-dispatch", version)]
struct Args {
    /// Path to the TOML configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,
    /// Run the simulated delays at millisecond scale instead of seconds
    #[clap(long)]
    fast: bool,
}

/* Main */
fn main() {
    env_logger::init();
    let args = Args::parse();

    // Load the configuration
    let config = match config::load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not load {} ({}); using built-in defaults", args.config, e);
            Config::default()
        }
    };
    let timing = if args.fast {
        fast_timing()
    } else {
        config.timing.to_timing()
    };

    let dispatcher = Arc::new(unwrap_or_exit!(Dispatcher::with_timing(
        &config.building,
        &config.fleet,
        timing,
    )));

    // Scenario: people waiting above and below, one full car in between
    for (floor, count) in [(4, 5), (-1, 2)] {
        if let Err(e) = dispatcher.set_waiting(floor, count) {
            warn!("Skipping waiting count for floor {}: {}", floor, e);
        }
    }
    let limit = config.fleet.occupancy_limit;
    for (car_id, floor, occupancy) in [(1, 2, limit), (2, 1, 1), (3, 0, 2)] {
        if let Err(e) = dispatcher.place_car(car_id, floor, occupancy) {
            warn!("Skipping scenario placement for car {}: {}", car_id, e);
        }
    }

    // Progress printer thread
    let (progress_tx, progress_rx) = cbc::unbounded::<ProgressEvent>();
    let printer = Builder::new()
        .name("progress_printer".into())
        .spawn(move || {
            for event in progress_rx.iter() {
                info!("{}", event.movement);
            }
        })
        .unwrap();

    // Send a car to every floor with people waiting, each move on its own
    // thread
    let mut movers = Vec::new();
    for (floor, waiting) in dispatcher.waiting_snapshot() {
        if waiting == 0 {
            continue;
        }
        match unwrap_or_exit!(dispatcher.select_car(floor, None)) {
            Some(car_id) => {
                info!("Sending car {} to {}", car_id, floor_name(floor));
                let dispatcher = Arc::clone(&dispatcher);
                let progress_tx = progress_tx.clone();
                let mover = Builder::new()
                    .name(format!("car_{}_move", car_id))
                    .spawn(move || {
                        let (_cancel_tx, cancel_rx) = cbc::unbounded::<()>();
                        dispatcher.move_and_board(car_id, floor, &progress_tx, &cancel_rx)
                    })
                    .unwrap();
                movers.push(mover);
            }
            None => warn!("No car available for {}", floor_name(floor)),
        }
    }

    for mover in movers {
        match mover.join() {
            Ok(Ok(result)) => info!("{}", result.description),
            Ok(Err(e)) => error!("ERROR: {}", e),
            Err(_) => error!("ERROR: mover thread panicked"),
        }
    }

    // Some new people arrived at the ground floor
    if let Ok(Some(car_id)) = dispatcher.select_car(0, Some(1)) {
        info!("Sending car {} to {}", car_id, floor_name(0));
        let (_cancel_tx, cancel_rx) = cbc::unbounded::<()>();
        let result =
            unwrap_or_exit!(dispatcher.move_and_board(car_id, 0, &progress_tx, &cancel_rx));
        info!("{}", result.description);
    }

    drop(progress_tx);
    let _ = printer.join();

    render_table(&dispatcher.car_snapshots(), &dispatcher.waiting_snapshot());
    println!("Simulation completed!");
}

/// Millisecond-scale delays so the demo finishes in a blink.
fn fast_timing() -> Timing {
    Timing {
        door: Duration::from_millis(30),
        per_floor: Duration::from_millis(50),
        stop_start: Duration::from_millis(10),
        pickup: Duration::from_millis(100),
    }
}

/// Text table of car positions and waiting counts, top floor first.
fn render_table(cars: &[CarSnapshot], waiting: &[(i32, u32)]) {
    let mut header = format!("{:<14}", "");
    for car in cars {
        header.push_str(&format!("{:^12}", car.name));
    }
    header.push_str(&format!("{:>16}", "People waiting"));
    println!("{}", header);

    for (floor, count) in waiting.iter().rev() {
        let mut row = format!("{:<14}", floor_name(*floor));
        for car in cars {
            let cell = if car.floor == *floor {
                let door = if car.door == DoorState::Open { "|" } else { "X" };
                format!("{} {} {}", door, car.occupancy, door)
            } else {
                String::new()
            };
            row.push_str(&format!("{:^12}", cell));
        }
        row.push_str(&format!("{:>16}", count));
        println!("{}", row);
    }

    println!();
    println!("Legend: \"| 3 |\" open car with 3 occupants, \"X 1 X\" closed car with 1 occupant");
}

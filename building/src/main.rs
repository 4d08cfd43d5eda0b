use std::process;
use std::time::Duration;

use crossbeam_channel::{select, tick};
use tracing_subscriber::EnvFilter;

use building::debug::Debug;
use building::dispatcher::Building;
use building::utilities::building_report::SystemStatus;
use shared_resources::{Error, Result, SimulatorConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        tracing::error!(%err, "simulation failed");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    // READ CONFIGURATION
    let config = SimulatorConfig::get()?;
    let settings = config.settings.clone();

    // INITIALIZE BUILDING
    let mut building = Building::from_config(config.building);
    building.start()?;
    for request in &config.requests {
        if let Err(err) = building.add_request(*request) {
            tracing::warn!(%err, "skipping request");
        }
    }

    let mut debug = Debug::new();
    let timer = tick(Duration::from_millis(settings.tick_ms));
    let mut ticks = 0;
    let mut out_of_service = false;

    // RUN, THEN SHUT DOWN
    while !out_of_service {
        select! {
            recv(timer) -> _ => {
                building.step()?;
                ticks += 1;
                let report = building.report();
                if !config.json {
                    debug.printstatus(&report)?;
                }

                if report.status == SystemStatus::Running && ticks >= settings.run_ticks {
                    tracing::info!(ticks, "stopping elevator system");
                    building.stop()?;
                } else if report.status == SystemStatus::OutOfService {
                    out_of_service = true;
                } else if ticks >= settings.run_ticks + settings.shutdown_tick_limit {
                    tracing::warn!(
                        limit = settings.shutdown_tick_limit,
                        "elevators did not return to the ground floor in time"
                    );
                    return Err(Error::invalid_state("shutdown did not converge"));
                }
            }
        }
    }

    if config.json {
        println!("{}", serde_json::to_string_pretty(&building.report())?);
    }
    tracing::info!(ticks, "elevator system out of service");
    Ok(())
}

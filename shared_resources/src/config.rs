use std::env;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::request::Request;

pub const MAX_ELEVATORS: usize = 10;

const CONFIG_FILE_PATH: &str = "config.json";
const FALLBACK_CONFIG_FILE_PATH: &str = "_config.json";

/// Validated construction parameters of a building.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawBuildingConfig")]
pub struct BuildingConfig {
    num_floors: usize,
    num_elevators: usize,
    capacity: usize,
}

#[derive(serde::Deserialize)]
struct RawBuildingConfig {
    num_floors: usize,
    num_elevators: usize,
    capacity: usize,
}

impl TryFrom<RawBuildingConfig> for BuildingConfig {
    type Error = Error;

    fn try_from(raw: RawBuildingConfig) -> Result<Self> {
        BuildingConfig::new(raw.num_floors, raw.num_elevators, raw.capacity)
    }
}

impl BuildingConfig {
    pub fn new(num_floors: usize, num_elevators: usize, capacity: usize) -> Result<Self> {
        if num_floors < 2 {
            return Err(Error::invalid_argument(format!(
                "number of floors must be at least 2, got {num_floors}"
            )));
        }
        if num_elevators < 1 || num_elevators > MAX_ELEVATORS {
            return Err(Error::invalid_argument(format!(
                "number of elevators must be between 1 and {MAX_ELEVATORS}, got {num_elevators}"
            )));
        }
        if capacity < 1 {
            return Err(Error::invalid_argument(format!(
                "elevator capacity must be at least 1, got {capacity}"
            )));
        }
        Ok(BuildingConfig {
            num_floors,
            num_elevators,
            capacity,
        })
    }

    pub fn num_floors(&self) -> usize {
        self.num_floors
    }

    pub fn num_elevators(&self) -> usize {
        self.num_elevators
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn top_floor(&self) -> usize {
        self.num_floors - 1
    }
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            num_floors: 10,
            num_elevators: 2,
            capacity: 5,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_ms: u64,
    pub run_ticks: usize,
    pub shutdown_tick_limit: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            tick_ms: 250,
            run_ticks: 20,
            shutdown_tick_limit: 100,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub building: BuildingConfig,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default = "default_requests")]
    pub requests: Vec<(usize, usize)>,
}

fn default_requests() -> Vec<(usize, usize)> {
    vec![(1, 4), (6, 2)]
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            building: BuildingConfig::default(),
            simulation: SimulationSettings::default(),
            requests: default_requests(),
        }
    }
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("cannot read {}: {err}", path.display())))?;
        Self::parse(&contents)
    }
}

fn read_config_file() -> Result<ConfigFile> {
    for file_path in [CONFIG_FILE_PATH, FALLBACK_CONFIG_FILE_PATH] {
        if Path::new(file_path).exists() {
            tracing::info!(path = file_path, "reading configuration");
            return ConfigFile::read(file_path);
        }
    }
    tracing::info!("no configuration file provided, using default settings");
    Ok(ConfigFile::default())
}

/// Everything the driver binary needs to run a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    pub building: BuildingConfig,
    pub settings: SimulationSettings,
    pub requests: Vec<Request>,
    pub json: bool,
}

impl SimulatorConfig {
    /// Reads the configuration file and applies command line overrides.
    pub fn get() -> Result<Self> {
        let config_file = read_config_file()?;
        let args: Vec<String> = env::args().skip(1).collect();
        Self::from_parts(config_file, &args)
    }

    pub fn from_parts(config_file: ConfigFile, args: &[String]) -> Result<Self> {
        let overrides = parse_env_args(args);
        let building = BuildingConfig::new(
            overrides.floors.unwrap_or(config_file.building.num_floors()),
            overrides.elevators.unwrap_or(config_file.building.num_elevators()),
            overrides.capacity.unwrap_or(config_file.building.capacity()),
        )?;

        let mut settings = config_file.simulation;
        if let Some(ticks) = overrides.ticks {
            settings.run_ticks = ticks;
        }
        if let Some(tick_ms) = overrides.tick_ms {
            settings.tick_ms = tick_ms;
        }

        Ok(SimulatorConfig {
            building,
            settings,
            requests: config_file.requests.into_iter().map(Request::from).collect(),
            json: overrides.json,
        })
    }
}

#[derive(Debug, Default)]
struct ArgOverrides {
    floors: Option<usize>,
    elevators: Option<usize>,
    capacity: Option<usize>,
    ticks: Option<usize>,
    tick_ms: Option<u64>,
    json: bool,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Option<T> {
    let Some(value) = value else {
        tracing::warn!(flag, "missing value, skipping...");
        return None;
    };
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(flag, value = value.as_str(), "not a number, skipping...");
            None
        }
    }
}

fn parse_env_args(args: &[String]) -> ArgOverrides {
    let mut overrides = ArgOverrides::default();
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => overrides.json = true,
            "--floors" => overrides.floors = parse_value(arg, args.next()).or(overrides.floors),
            "--elevators" => {
                overrides.elevators = parse_value(arg, args.next()).or(overrides.elevators)
            }
            "--capacity" => {
                overrides.capacity = parse_value(arg, args.next()).or(overrides.capacity)
            }
            "--ticks" => overrides.ticks = parse_value(arg, args.next()).or(overrides.ticks),
            "--tick-ms" => overrides.tick_ms = parse_value(arg, args.next()).or(overrides.tick_ms),
            _ => tracing::warn!(argument = arg.as_str(), "illegal argument, skipping..."),
        }
    }
    overrides
}

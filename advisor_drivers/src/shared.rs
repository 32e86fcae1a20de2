use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use blackjack_advisor::simulation::{DEFAULT_SIMULATIONS, DEFAULT_SIMULATIONS_WITH_SEEN};
use blackjack_advisor::SimulationOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE_NAME: &str = ".blackjack_advisor.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: ConfigSimulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSimulation {
    pub default_simulations: u32,
    pub default_simulations_with_seen: u32,
    pub number_of_threads: usize,
    pub seed: Option<u64>,
}

impl Default for ConfigSimulation {
    fn default() -> Self {
        ConfigSimulation {
            default_simulations: DEFAULT_SIMULATIONS,
            default_simulations_with_seen: DEFAULT_SIMULATIONS_WITH_SEEN,
            number_of_threads: 1,
            seed: None,
        }
    }
}

impl ConfigSimulation {
    /// Options for a run of `trials` simulations per move.
    pub fn options(&self, trials: u32) -> SimulationOptions {
        SimulationOptions {
            trials,
            seed: self.seed,
            number_of_threads: self.number_of_threads,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("{0} is a directory rather than a config file")]
    IsDirectory(PathBuf),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid seen card {0:?}. Expected RANK=COUNT, e.g. A=2")]
pub struct SeenCardError(pub String);

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &Path) -> Result<Config, ConfigError> {
    if filename.is_dir() {
        return Err(ConfigError::IsDirectory(filename.to_path_buf()));
    }
    let file_content = fs::read_to_string(filename).map_err(|source| ConfigError::Io {
        path: filename.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&file_content).map_err(|source| ConfigError::Yaml {
        path: filename.to_path_buf(),
        source,
    })
}

/// The config file in the home directory, if there is one.
pub fn default_config_path() -> Option<PathBuf> {
    let path = home::home_dir()?.join(DEFAULT_CONFIG_FILE_NAME);
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Parses `RANK=COUNT` pairs. Repeated ranks add up.
pub fn parse_seen_cards<S: AsRef<str>>(pairs: &[S]) -> Result<HashMap<String, i32>, SeenCardError> {
    let mut seen: HashMap<String, i32> = HashMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (rank, count) = pair
            .split_once('=')
            .ok_or_else(|| SeenCardError(pair.to_string()))?;
        let count: i32 = count
            .trim()
            .parse()
            .map_err(|_| SeenCardError(pair.to_string()))?;
        let total = seen.entry(rank.trim().to_uppercase()).or_insert(0);
        *total = total
            .checked_add(count)
            .ok_or_else(|| SeenCardError(pair.to_string()))?;
    }
    Ok(seen)
}

use std::path::Path;

use cachain_core::Validator;
use cachain_crypto::HashMethod;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "cachain";

pub const ENV_PREFIX: &str = "CACHAIN";

/// Experiment parameters shared by every subcommand.
///
/// Precedence, lowest first: built-in defaults, config file, `CACHAIN_*`
/// environment, command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Digest used by chain-building subcommands.
    pub hash: HashMethod,

    /// Leading zero hex characters required of mined blocks.
    pub difficulty: usize,

    /// Blocks mined by `mine` and `chain`.
    pub blocks: usize,

    pub validators: Vec<Validator>,
}

impl Default for Settings {
    fn default() -> Self {
        let validators = [("Alice", 100.0), ("Bob", 50.0), ("Charlie", 250.0), ("David", 20.0)]
            .into_iter()
            .map(|(address, stake)| Validator {
                address: address.to_string(),
                stake,
            })
            .collect();

        Settings {
            hash: HashMethod::default(),
            difficulty: 4,
            blocks: 10,
            validators,
        }
    }
}

impl Settings {
    /// Loads `path` if given (it must exist), otherwise an optional
    /// `cachain.toml` from the working directory, then applies the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::layered(Self::with_defaults()?.add_source(file), environment())
    }

    /// Builder seeded with every default, so later sources may override a
    /// single nested key such as `hash.rule`.
    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder().add_source(Config::try_from(&Settings::default())?))
    }

    fn layered(builder: ConfigBuilder<DefaultState>, env: Environment) -> Result<Self, ConfigError> {
        builder.add_source(env).build()?.try_deserialize()
    }
}

/// `CACHAIN_*` variables, `__` separating nested keys.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

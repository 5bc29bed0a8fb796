use core::fmt;
use std::num::NonZeroUsize;

use clap::ArgAction;
use clap::Parser;
use tracing::Level;

use crate::container::REGISTRY;
use crate::container::Registration;
use crate::container::registration;

/// Entries inserted when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 50_000;
/// Lookups timed when no loop count is given.
pub const DEFAULT_LOOP: usize = 1_000_000;

/// Command line of the `hash-perf` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hash-perf",
    version,
    about = "Compare insert and lookup cost of associative containers under sequential and random keys"
)]
pub struct Cli {
    /// Number of entries inserted into each container.
    #[arg(value_name = "CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Number of timed lookups per lookup benchmark.
    #[arg(value_name = "LOOP", default_value_t = DEFAULT_LOOP)]
    pub loop_count: usize,

    /// Start value of sequential keys, mixed into the clock for random keys.
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Only benchmark the named container. May be repeated.
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Print the registered container names and exit.
    #[arg(long)]
    pub list: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Maximum level logged for the `-v` count.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Validates the parsed arguments into a [`RunConfig`].
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let capacity = NonZeroUsize::new(self.capacity).ok_or(ConfigError::ZeroCapacity)?;
        let loop_count = NonZeroUsize::new(self.loop_count).ok_or(ConfigError::ZeroLoop)?;

        let containers = if self.only.is_empty() {
            REGISTRY.iter().collect()
        } else {
            self.only
                .into_iter()
                .map(|name| registration(&name).ok_or(ConfigError::UnknownContainer(name)))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(RunConfig {
            capacity,
            loop_count,
            seed: self.seed,
            containers,
        })
    }
}

/// Validated, read-only settings for one run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Entries inserted per insert benchmark.
    pub capacity: NonZeroUsize,
    /// Lookups timed per lookup benchmark.
    pub loop_count: NonZeroUsize,
    /// Sequential start value and random seed.
    pub seed: u64,
    /// Containers to run, in report order.
    pub containers: Vec<&'static Registration>,
}

impl RunConfig {
    /// Runs every registered container with the given sizes and seed 0.
    pub fn new(capacity: usize, loop_count: usize) -> Result<Self, ConfigError> {
        Cli {
            capacity,
            loop_count,
            seed: 0,
            only: Vec::new(),
            list: false,
            verbose: 0,
        }
        .into_config()
    }
}

/// Why command line arguments were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity of zero; per-insert cost would divide by zero.
    ZeroCapacity,
    /// Loop count of zero; per-lookup cost would divide by zero.
    ZeroLoop,
    /// `--only` named a container that is not registered.
    UnknownContainer(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "capacity must be at least 1"),
            ConfigError::ZeroLoop => write!(f, "loop count must be at least 1"),
            ConfigError::UnknownContainer(name) => {
                write!(f, "unknown container `{name}` (known: ")?;
                for (i, r) in REGISTRY.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(r.name)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Insert and lookup benchmarks over a single container type.
pub mod bench;

/// Command line surface and validated run configuration.
pub mod config;

/// The containers under test and the registry the driver iterates.
pub mod container;

/// Runs the full benchmark matrix and renders the report.
pub mod driver;

/// Sequential and pseudo-random key generators.
pub mod keys;

/// Allocator introspection behind the [`memory::MemoryProbe`] trait.
pub mod memory;

/// Monotonic stopwatch and per-operation normalization.
pub mod timer;

pub use bench::BenchmarkResult;
pub use bench::Measurement;
pub use bench::Operation;
pub use config::ConfigError;
pub use config::RunConfig;
pub use container::Container;
pub use driver::Report;
pub use keys::KeyGenerator;
pub use keys::KeyPattern;
pub use memory::MemoryProbe;

use core::fmt;
use std::num::NonZeroUsize;

use tracing::info;

use crate::bench::BenchmarkResult;
use crate::bench::Operation;
use crate::config::RunConfig;
use crate::container::Registration;
use crate::keys::KeyPattern;
use crate::memory::MemoryProbe;

/// Width of the bracketed container name column.
const NAME_COLUMN: usize = 24;

/// All results for one container and operation, one per key pattern.
#[derive(Clone, Debug)]
pub struct ReportRow {
    /// The container's registered name.
    pub container: &'static str,
    /// Which benchmark produced the row.
    pub operation: Operation,
    /// Result for [`KeyPattern::Sequential`].
    pub sequential: BenchmarkResult,
    /// Result for [`KeyPattern::Random`].
    pub random: BenchmarkResult,
}

impl ReportRow {
    /// The memory figure shown for the row: the reading of the random-key
    /// run, which is measured last.
    pub fn memory_bytes(&self) -> usize {
        self.random.memory_bytes
    }

    /// Both results in column order.
    pub fn results(&self) -> [&BenchmarkResult; 2] {
        [&self.sequential, &self.random]
    }
}

/// The outcome of a full run. Renders as the text report via [`Display`].
///
/// [`Display`]: fmt::Display
#[derive(Clone, Debug)]
pub struct Report {
    /// Capacity the run used.
    pub capacity: NonZeroUsize,
    /// Loop count the run used.
    pub loop_count: NonZeroUsize,
    /// Insert rows first, then lookup rows, each in registry order.
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Rows of one operation, in report order.
    pub fn rows_for(&self, operation: Operation) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |r| r.operation == operation)
    }

    /// Every result in the report.
    pub fn results(&self) -> impl Iterator<Item = &BenchmarkResult> {
        self.rows.iter().flat_map(|r| r.results())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Running with CAPACITY={}, LOOP={}",
            self.capacity, self.loop_count
        )?;
        for operation in [Operation::Insert, Operation::Lookup] {
            writeln!(f, "\n>>>>>>>>>> {}:\n", operation.heading())?;
            for row in self.rows_for(operation) {
                writeln!(
                    f,
                    "{:<width$}Sequential:{:.2} ns\tRandom:{:.2} ns\tMemory:{}",
                    format!("[{}]", row.container),
                    row.sequential.ns_per_op,
                    row.random.ns_per_op,
                    row.memory_bytes(),
                    width = NAME_COLUMN,
                )?;
            }
        }
        Ok(())
    }
}

fn run_row(
    registration: &Registration,
    operation: Operation,
    config: &RunConfig,
    probe: &dyn MemoryProbe,
) -> ReportRow {
    let [sequential, random] = KeyPattern::ALL.map(|pattern| {
        let measurement = match operation {
            Operation::Insert => {
                let mut keys = pattern.generator(config.seed);
                (registration.insert)(config.capacity, &mut keys, probe)
            }
            Operation::Lookup => {
                let mut fill_keys = pattern.generator(config.seed);
                // A fresh generator, not a continuation of the fill keys.
                let mut probe_keys = pattern.generator(config.seed);
                (registration.lookup)(
                    config.capacity,
                    config.loop_count,
                    &mut fill_keys,
                    &mut probe_keys,
                    probe,
                )
            }
        };
        info!(
            container = registration.name,
            %operation,
            %pattern,
            ns_per_op = measurement.ns_per_op,
            memory_bytes = measurement.memory_bytes,
            hits = measurement.hits,
            "benchmark finished"
        );
        BenchmarkResult::new(registration.name, operation, pattern, measurement)
    });

    ReportRow {
        container: registration.name,
        operation,
        sequential,
        random,
    }
}

/// Runs the whole matrix: every configured container, insert then lookup,
/// each under sequential and random keys.
///
/// Each benchmark owns its own container and generators; nothing carries
/// over between them.
pub fn run(config: &RunConfig, probe: &dyn MemoryProbe) -> Report {
    info!(
        capacity = config.capacity.get(),
        loop_count = config.loop_count.get(),
        seed = config.seed,
        containers = config.containers.len(),
        "starting run"
    );

    let mut insert_rows = Vec::with_capacity(config.containers.len());
    let mut lookup_rows = Vec::with_capacity(config.containers.len());
    for registration in &config.containers {
        info!(container = registration.name, "benchmarking");
        insert_rows.push(run_row(registration, Operation::Insert, config, probe));
        lookup_rows.push(run_row(registration, Operation::Lookup, config, probe));
    }

    insert_rows.append(&mut lookup_rows);
    Report {
        capacity: config.capacity,
        loop_count: config.loop_count,
        rows: insert_rows,
    }
}

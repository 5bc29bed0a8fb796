use core::fmt;
use core::hint::black_box;
use std::num::NonZeroUsize;

use tracing::debug;

use crate::container::Container;
use crate::keys::KeyGenerator;
use crate::keys::KeyPattern;
use crate::memory::MemoryProbe;
use crate::timer::Stopwatch;
use crate::timer::nanos_per_op;

/// Value stored at every key. Only the keys matter to the benchmark.
const PLACEHOLDER: u64 = 0;

/// The operation a benchmark times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Filling an empty container.
    Insert,
    /// Querying a populated container.
    Lookup,
}

impl Operation {
    /// Section heading used in the report.
    pub fn heading(self) -> &'static str {
        match self {
            Operation::Insert => "Insertion",
            Operation::Lookup => "Search",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert => f.write_str("insert"),
            Operation::Lookup => f.write_str("lookup"),
        }
    }
}

/// Raw output of a single benchmark call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Mean wall time per timed operation.
    pub ns_per_op: f64,
    /// Memory probe reading taken right after the timed loop.
    pub memory_bytes: usize,
    /// Lookups that found their key. Always 0 for inserts.
    pub hits: u64,
}

/// One measured (container, operation, key pattern) combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchmarkResult {
    /// Registered container name.
    pub container: &'static str,
    /// Operation timed.
    pub operation: Operation,
    /// Key pattern used.
    pub pattern: KeyPattern,
    /// See [`Measurement::ns_per_op`].
    pub ns_per_op: f64,
    /// See [`Measurement::memory_bytes`].
    pub memory_bytes: usize,
}

impl BenchmarkResult {
    /// Labels a raw measurement.
    pub fn new(
        container: &'static str,
        operation: Operation,
        pattern: KeyPattern,
        measurement: Measurement,
    ) -> Self {
        Self {
            container,
            operation,
            pattern,
            ns_per_op: measurement.ns_per_op,
            memory_bytes: measurement.memory_bytes,
        }
    }
}

#[inline(always)]
fn fill<C: Container>(map: &mut C, count: NonZeroUsize, keys: &mut KeyGenerator) {
    for _ in 0..count.get() {
        map.insert(keys.next_key(), PLACEHOLDER);
    }
}

/// Replays the timed lookups outside the stopwatch and counts the hits.
fn count_hits<C: Container>(map: &C, loop_count: NonZeroUsize, mut keys: KeyGenerator) -> u64 {
    (0..loop_count.get())
        .filter(|_| map.find(keys.next_key()))
        .count() as u64
}

/// Times `capacity` insert-or-overwrite operations into an empty `C`.
///
/// The memory probe is read after the loop, while the container is still
/// fully populated.
pub fn measure_insert<C: Container>(
    capacity: NonZeroUsize,
    keys: &mut KeyGenerator,
    probe: &dyn MemoryProbe,
) -> Measurement {
    let mut map = C::default();
    debug!(
        container = C::NAME,
        pattern = %keys.pattern(),
        capacity = capacity.get(),
        "timing inserts"
    );

    let watch = Stopwatch::start();
    fill(&mut map, capacity, keys);
    let elapsed = watch.stop();

    let memory_bytes = probe.allocated_bytes();
    black_box(&map);
    debug!(container = C::NAME, len = map.len(), ?elapsed, memory_bytes, "inserts done");

    Measurement {
        ns_per_op: nanos_per_op(elapsed, capacity),
        memory_bytes,
        hits: 0,
    }
}

/// Pre-fills a `C` with `capacity` keys from `fill_keys` (untimed), then
/// times `loop_count` lookups of keys drawn from `probe_keys`.
///
/// `probe_keys` is independent of `fill_keys`. When both are fresh sequential
/// generators with the same start, the first `min(capacity, loop_count)`
/// lookups hit and the rest miss. Lookup results are discarded inside the
/// timed loop; [`Measurement::hits`] comes from an untimed replay of the same
/// keys.
pub fn measure_lookup<C: Container>(
    capacity: NonZeroUsize,
    loop_count: NonZeroUsize,
    fill_keys: &mut KeyGenerator,
    probe_keys: &mut KeyGenerator,
    probe: &dyn MemoryProbe,
) -> Measurement {
    let mut map = C::default();
    fill(&mut map, capacity, fill_keys);
    debug!(
        container = C::NAME,
        pattern = %probe_keys.pattern(),
        len = map.len(),
        loop_count = loop_count.get(),
        "pre-fill done, timing lookups"
    );

    let replay_keys = probe_keys.clone();
    let watch = Stopwatch::start();
    for _ in 0..loop_count.get() {
        black_box(map.find(probe_keys.next_key()));
    }
    let elapsed = watch.stop();

    let memory_bytes = probe.allocated_bytes();
    let hits = count_hits(&map, loop_count, replay_keys);
    debug!(container = C::NAME, hits, ?elapsed, memory_bytes, "lookups done");

    Measurement {
        ns_per_op: nanos_per_op(elapsed, loop_count),
        memory_bytes,
        hits,
    }
}

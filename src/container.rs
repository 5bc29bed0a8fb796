use core::hash::BuildHasher;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use siphasher::sip::SipHasher;

use crate::bench::Measurement;
use crate::bench::measure_insert;
use crate::bench::measure_lookup;
use crate::keys::KeyGenerator;
use crate::memory::MemoryProbe;

/// An associative container benchmarked by the harness.
///
/// Keys are `u64` and values are a fixed-width placeholder. Implementations
/// are constructed empty through [`Default`] and release their memory on
/// drop.
pub trait Container: Default {
    /// Name shown in the report.
    const NAME: &'static str;

    /// Inserts `value` at `key`, overwriting any previous value.
    fn insert(&mut self, key: u64, value: u64);

    /// Returns `true` if `key` is present.
    fn find(&self, key: u64) -> bool;

    /// Number of distinct keys stored.
    fn len(&self) -> usize;

    /// Returns `true` if no key is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `std::collections::HashMap` with its default SipHash-1-3 hasher.
#[derive(Default)]
pub struct StdHashMap(std::collections::HashMap<u64, u64>);

impl Container for StdHashMap {
    const NAME: &'static str = "std::HashMap";

    #[inline(always)]
    fn insert(&mut self, key: u64, value: u64) {
        self.0.insert(key, value);
    }

    #[inline(always)]
    fn find(&self, key: u64) -> bool {
        self.0.get(&key).is_some()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// `std::collections::BTreeMap`, the ordered baseline.
#[derive(Default)]
pub struct StdBTreeMap(BTreeMap<u64, u64>);

impl Container for StdBTreeMap {
    const NAME: &'static str = "std::BTreeMap";

    #[inline(always)]
    fn insert(&mut self, key: u64, value: u64) {
        self.0.insert(key, value);
    }

    #[inline(always)]
    fn find(&self, key: u64) -> bool {
        self.0.get(&key).is_some()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// `hashbrown::HashMap` with its default foldhash hasher.
#[derive(Default)]
pub struct Hashbrown(hashbrown::HashMap<u64, u64>);

impl Container for Hashbrown {
    const NAME: &'static str = "hashbrown";

    #[inline(always)]
    fn insert(&mut self, key: u64, value: u64) {
        self.0.insert(key, value);
    }

    #[inline(always)]
    fn find(&self, key: u64) -> bool {
        self.0.get(&key).is_some()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Unkeyed SipHash-2-4, so that hashbrown's probing can be compared against
/// std under a comparable hash cost.
#[derive(Clone, Copy, Default)]
pub struct SipHashBuilder;

impl BuildHasher for SipHashBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new()
    }
}

/// `hashbrown::HashMap` hashed with [`SipHashBuilder`].
#[derive(Default)]
pub struct HashbrownSip(hashbrown::HashMap<u64, u64, SipHashBuilder>);

impl Container for HashbrownSip {
    const NAME: &'static str = "hashbrown+sip";

    #[inline(always)]
    fn insert(&mut self, key: u64, value: u64) {
        self.0.insert(key, value);
    }

    #[inline(always)]
    fn find(&self, key: u64) -> bool {
        self.0.get(&key).is_some()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// `hop_hash::HashMap`, the 16-way hopscotch table, with the same foldhash
/// hasher hashbrown uses by default.
#[derive(Default)]
pub struct HopHash(hop_hash::hash_map::HashMap<u64, u64, hashbrown::DefaultHashBuilder>);

impl Container for HopHash {
    const NAME: &'static str = "hop-hash";

    #[inline(always)]
    fn insert(&mut self, key: u64, value: u64) {
        self.0.insert(key, value);
    }

    #[inline(always)]
    fn find(&self, key: u64) -> bool {
        self.0.get(&key).is_some()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// `std::collections::HashMap` with foldhash's fast hasher.
#[cfg(feature = "foldhash")]
#[derive(Default)]
pub struct StdFoldHashMap(std::collections::HashMap<u64, u64, foldhash::fast::RandomState>);

#[cfg(feature = "foldhash")]
impl Container for StdFoldHashMap {
    const NAME: &'static str = "std::HashMap+foldhash";

    #[inline(always)]
    fn insert(&mut self, key: u64, value: u64) {
        self.0.insert(key, value);
    }

    #[inline(always)]
    fn find(&self, key: u64) -> bool {
        self.0.get(&key).is_some()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Signature of a monomorphized [`measure_insert`].
pub type InsertFn = fn(NonZeroUsize, &mut KeyGenerator, &dyn MemoryProbe) -> Measurement;

/// Signature of a monomorphized [`measure_lookup`].
pub type LookupFn = fn(
    NonZeroUsize,
    NonZeroUsize,
    &mut KeyGenerator,
    &mut KeyGenerator,
    &dyn MemoryProbe,
) -> Measurement;

/// A registry entry: a container name and its benchmarks, monomorphized for
/// that container.
#[derive(Clone, Copy)]
pub struct Registration {
    /// The container's [`Container::NAME`].
    pub name: &'static str,
    /// [`measure_insert`] for this container.
    pub insert: InsertFn,
    /// [`measure_lookup`] for this container.
    pub lookup: LookupFn,
}

impl Registration {
    /// Registers `C`.
    pub const fn of<C: Container>() -> Self {
        Self {
            name: C::NAME,
            insert: measure_insert::<C>,
            lookup: measure_lookup::<C>,
        }
    }
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Every container the driver knows how to benchmark, in report order.
        pub static REGISTRY: &[Registration] = &[
            Registration::of::<StdHashMap>(),
            Registration::of::<StdFoldHashMap>(),
            Registration::of::<StdBTreeMap>(),
            Registration::of::<Hashbrown>(),
            Registration::of::<HashbrownSip>(),
            Registration::of::<HopHash>(),
        ];
    } else {
        /// Every container the driver knows how to benchmark, in report order.
        pub static REGISTRY: &[Registration] = &[
            Registration::of::<StdHashMap>(),
            Registration::of::<StdBTreeMap>(),
            Registration::of::<Hashbrown>(),
            Registration::of::<HashbrownSip>(),
            Registration::of::<HopHash>(),
        ];
    }
}

/// Looks up a registered container by its report name.
pub fn registration(name: &str) -> Option<&'static Registration> {
    REGISTRY.iter().find(|r| r.name == name)
}

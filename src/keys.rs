use core::fmt;
use std::time::SystemTime;

use rand::RngCore;
use rand::rand_core::impls;

/// Initial value of the xorshift word of the Numerical Recipes `Ran`
/// generator.
const NR_V_INIT: u64 = 4101842887655102017;
const NR_U_MUL: u64 = 2862933555777941757;
const NR_U_ADD: u64 = 7046029254386353087;
const NR_W_MUL: u64 = 4294957665;

/// The key distribution a [`KeyGenerator`] produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPattern {
    /// Strictly increasing keys starting at the seed.
    Sequential,
    /// Pseudo-random keys seeded from the wall clock and the seed.
    Random,
}

impl KeyPattern {
    /// Both patterns, in report column order.
    pub const ALL: [KeyPattern; 2] = [KeyPattern::Sequential, KeyPattern::Random];

    /// Builds a fresh generator of this pattern.
    ///
    /// Sequential generators start counting at `seed`. Random generators mix
    /// `seed` into the current wall-clock time, so two random generators built
    /// within the same second with the same seed produce the same keys.
    pub fn generator(self, seed: u64) -> KeyGenerator {
        match self {
            KeyPattern::Sequential => KeyGenerator::Sequential(SequentialKeys::new(seed)),
            KeyPattern::Random => KeyGenerator::Random(RandomKeys::new(seed)),
        }
    }

    /// Column label used in the report.
    pub fn label(self) -> &'static str {
        match self {
            KeyPattern::Sequential => "Sequential",
            KeyPattern::Random => "Random",
        }
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A monotonically incrementing key counter.
#[derive(Clone, Debug)]
pub struct SequentialKeys {
    counter: u64,
}

impl SequentialKeys {
    /// Starts counting at `start`.
    pub fn new(start: u64) -> Self {
        Self { counter: start }
    }

    /// Returns the current counter and advances it by one.
    #[inline(always)]
    pub fn next_key(&mut self) -> u64 {
        let key = self.counter;
        self.counter = self.counter.wrapping_add(1);
        key
    }
}

impl Default for SequentialKeys {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Pseudo-random keys from the Numerical Recipes (3rd ed.) `Ran` generator.
///
/// The state combines a 64-bit LCG, a 64-bit xorshift and a
/// multiply-with-carry word. The combined output has a period of roughly
/// 3.138e57 and no low-order bit correlation, which matters here since the
/// keys are fed straight into the hashers under test.
#[derive(Clone, Debug)]
pub struct RandomKeys {
    u: u64,
    v: u64,
    w: u64,
}

impl RandomKeys {
    /// Seeds from the current wall-clock time (whole seconds since the Unix
    /// epoch) combined with `seed`.
    pub fn new(seed: u64) -> Self {
        let clock = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self::with_clock(clock, seed)
    }

    /// Seeds from an explicit clock reading, making the sequence reproducible.
    pub fn with_clock(clock: u64, seed: u64) -> Self {
        let mut keys = Self {
            u: (clock ^ seed) ^ NR_V_INIT,
            v: NR_V_INIT,
            w: 1,
        };
        keys.next_key();
        keys.v = keys.u;
        keys.next_key();
        keys.w = keys.v;
        keys.next_key();
        keys
    }

    /// Advances the state and returns the next key.
    #[inline(always)]
    pub fn next_key(&mut self) -> u64 {
        self.u = self.u.wrapping_mul(NR_U_MUL).wrapping_add(NR_U_ADD);

        self.v ^= self.v >> 17;
        self.v ^= self.v << 31;
        self.v ^= self.v >> 8;

        self.w = NR_W_MUL
            .wrapping_mul(self.w & 0xffff_ffff)
            .wrapping_add(self.w >> 32);

        let mut x = self.u ^ (self.u << 21);
        x ^= x >> 35;
        x ^= x << 4;

        x.wrapping_add(self.v) ^ self.w
    }
}

/// Lets the generator drive `rand`'s distributions and slice helpers.
impl RngCore for RandomKeys {
    fn next_u32(&mut self) -> u32 {
        self.next_key() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_key()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

/// A source of benchmark keys.
///
/// A generator is owned by exactly one benchmark phase and is only advanced
/// through [`KeyGenerator::next_key`].
#[derive(Clone, Debug)]
pub enum KeyGenerator {
    /// See [`SequentialKeys`].
    Sequential(SequentialKeys),
    /// See [`RandomKeys`].
    Random(RandomKeys),
}

impl KeyGenerator {
    /// Draws the next key.
    #[inline(always)]
    pub fn next_key(&mut self) -> u64 {
        match self {
            KeyGenerator::Sequential(keys) => keys.next_key(),
            KeyGenerator::Random(keys) => keys.next_key(),
        }
    }

    /// The pattern this generator was built for.
    pub fn pattern(&self) -> KeyPattern {
        match self {
            KeyGenerator::Sequential(_) => KeyPattern::Sequential,
            KeyGenerator::Random(_) => KeyPattern::Random,
        }
    }
}

impl From<SequentialKeys> for KeyGenerator {
    fn from(keys: SequentialKeys) -> Self {
        KeyGenerator::Sequential(keys)
    }
}

impl From<RandomKeys> for KeyGenerator {
    fn from(keys: RandomKeys) -> Self {
        KeyGenerator::Random(keys)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_sequential_nth_key() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..64 {
            let seed = rng.random_range(0..u64::MAX / 2);
            let mut keys = SequentialKeys::new(seed);
            for n in 1..=1000u64 {
                assert_eq!(keys.next_key(), seed + n - 1);
            }
        }
    }

    #[test]
    fn test_sequential_strictly_increasing() {
        let mut keys = KeyGenerator::from(SequentialKeys::default());
        let mut prev = keys.next_key();
        assert_eq!(prev, 0);
        for _ in 0..10_000 {
            let next = keys.next_key();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_sequential_wraps_at_max() {
        let mut keys = SequentialKeys::new(u64::MAX);
        assert_eq!(keys.next_key(), u64::MAX);
        assert_eq!(keys.next_key(), 0);
    }

    #[test]
    fn test_random_known_answers() {
        let mut keys = RandomKeys::with_clock(0, 0);
        assert_eq!(keys.next_key(), 1454121425012434822);
        assert_eq!(keys.next_key(), 1060667887419232322);
        assert_eq!(keys.next_key(), 9308986122101090684);

        // clock ^ seed == 42
        let mut keys = RandomKeys::with_clock(40, 2);
        assert_eq!(keys.next_key(), 2235175048639730301);
        assert_eq!(keys.next_key(), 6425562075534813739);
        assert_eq!(keys.next_key(), 3657314841840734556);
    }

    #[test]
    fn test_random_reproducible_with_fixed_clock() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..32 {
            let clock: u64 = rng.random();
            let seed: u64 = rng.random();
            let mut a = RandomKeys::with_clock(clock, seed);
            let mut b = RandomKeys::with_clock(clock, seed);
            for _ in 0..1000 {
                assert_eq!(a.next_key(), b.next_key());
            }
        }
    }

    #[test]
    fn test_random_diverges_across_clocks() {
        let mut a = RandomKeys::with_clock(1_700_000_000, 0);
        let mut b = RandomKeys::with_clock(1_700_000_001, 0);
        let a_keys: Vec<u64> = (0..100).map(|_| a.next_key()).collect();
        let b_keys: Vec<u64> = (0..100).map(|_| b.next_key()).collect();
        assert_ne!(a_keys, b_keys);
    }

    #[test]
    fn test_random_no_short_cycle() {
        let mut keys = RandomKeys::with_clock(1_700_000_000, 0);
        let seen: HashSet<u64> = (0..100_000).map(|_| keys.next_key()).collect();
        assert_eq!(seen.len(), 100_000);
    }

    #[test]
    fn test_random_low_bits_balanced() {
        let mut keys = RandomKeys::with_clock(1_700_000_000, 0);
        let samples = 100_000;
        let ones = (0..samples).filter(|_| keys.next_key() & 1 == 1).count();
        // 0.5 +/- 1% is far outside 3 sigma for a fair bit at this sample size.
        assert!((49_000..=51_000).contains(&ones), "ones = {ones}");
    }

    #[test]
    fn test_rng_core_matches_next_key() {
        let mut a = RandomKeys::with_clock(123, 456);
        let mut b = a.clone();
        assert_eq!(a.next_u64(), b.next_key());

        let mut bytes = [0u8; 8];
        a.fill_bytes(&mut bytes);
        assert_eq!(u64::from_le_bytes(bytes), b.next_key());

        let bounded = a.random_range(0..10u64);
        assert!(bounded < 10);
    }

    #[test]
    fn test_rng_core_shuffle_reproducible() {
        use rand::seq::SliceRandom;

        let sorted: Vec<u64> = (0..1000).collect();
        let mut a = sorted.clone();
        let mut b = sorted.clone();
        a.shuffle(&mut RandomKeys::with_clock(1_700_000_000, 1));
        b.shuffle(&mut RandomKeys::with_clock(1_700_000_000, 1));
        assert_eq!(a, b);
        assert_ne!(a, sorted);

        a.sort_unstable();
        assert_eq!(a, sorted);
    }

    #[test]
    fn test_pattern_generator() {
        let mut sequential = KeyPattern::Sequential.generator(5);
        assert_eq!(sequential.pattern(), KeyPattern::Sequential);
        assert_eq!(sequential.next_key(), 5);
        assert_eq!(sequential.next_key(), 6);

        let random = KeyPattern::Random.generator(5);
        assert_eq!(random.pattern(), KeyPattern::Random);
        assert_eq!(KeyPattern::Random.to_string(), "Random");
    }
}

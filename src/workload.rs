//! Key workload generation for the measurement driver.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Seed shared by every scenario so runs are reproducible.
const WORKLOAD_SEED: u64 = 42;

/// Named key-distribution scenario used to populate a table under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Keys `0..n` in uniformly random order.
    Random,
    /// Keys `0..n` in ascending order.
    Ascending,
    /// Keys drawn from one hundred buckets spaced ten apart.
    Clustered,
    /// Keys drawn from only ten distinct values.
    HighCollision,
}

impl Scenario {
    /// All scenarios, in the order drivers report them.
    pub const ALL: [Self; 4] =
        [Self::Random, Self::Ascending, Self::Clustered, Self::HighCollision];

    /// Name used in latency logs and chart labels.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Ascending => "ascending",
            Self::Clustered => "clustered",
            Self::HighCollision => "high_collision",
        }
    }

    /// Generates `n` keys for the scenario.
    ///
    /// Every call reseeds the generator, so two calls with the same scenario
    /// and `n` produce identical keys.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub fn keys(self, n: usize) -> Vec<u64> {
        let mut rng = StdRng::seed_from_u64(WORKLOAD_SEED);
        match self {
            Self::Random => {
                let mut keys: Vec<u64> = (0..n as u64).collect();
                keys.shuffle(&mut rng);
                keys
            }
            Self::Ascending => (0..n as u64).collect(),
            Self::Clustered => (0..n).map(|_| rng.random_range(0..100_u64) * 10).collect(),
            Self::HighCollision => (0..n).map(|_| rng.random_range(0..10_u64)).collect(),
        }
    }
}

use std::fmt;

/// Probe sequence strategy used to resolve a key to a slot index.
///
/// All three strategies reduce to the primary hash `h1(key) = key mod capacity`
/// for the first attempt and differ only in how subsequent candidate indices
/// are derived. Changing the strategy on a populated table does not rehash
/// existing entries, so lookups are only guaranteed to agree with placements
/// if the strategy is set before the first insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStrategy {
    /// Step one slot per attempt: `(h1 + attempt) mod capacity`.
    Linear,
    /// Step by the square of the attempt: `(h1 + attempt²) mod capacity`.
    Quadratic,
    /// Step by a key-derived stride `h2(key) = 1 + (key mod (capacity − 1))`:
    /// `(h1 + attempt · h2) mod capacity`.
    #[default]
    DoubleHashing,
}

impl ProbeStrategy {
    /// All strategies, in the order drivers report them.
    pub const ALL: [Self; 3] = [Self::Linear, Self::Quadratic, Self::DoubleHashing];

    /// Candidate slot index for `key` at the given probe attempt.
    ///
    /// Deterministic and in `[0, capacity)` for any `capacity >= 2`.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub fn slot_index(self, key: u64, attempt: u64, capacity: usize) -> usize {
        let capacity = capacity as u64;
        let primary = key % capacity;

        let index = match self {
            Self::Linear => primary.wrapping_add(attempt) % capacity,
            Self::Quadratic => primary.wrapping_add(attempt.wrapping_mul(attempt)) % capacity,
            Self::DoubleHashing => {
                let stride = 1 + (key % (capacity - 1));
                primary.wrapping_add(attempt.wrapping_mul(stride)) % capacity
            }
        };

        index as usize
    }

    /// Short name used in latency logs and chart legends.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::DoubleHashing => "double_hashing",
        }
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

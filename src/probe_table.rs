use std::fmt;
use std::mem;

use crate::probe::ProbeStrategy;

/// Number of slots a table starts with.
const INITIAL_CAPACITY: usize = 16;

/// Load factor above which insert/upsert double the capacity before placing
/// the pending entry.
const LOAD_FACTOR_THRESHOLD: f64 = 0.5;

/// A slot holding a live or tombstoned entry.
///
/// A slot position in the backing array is in one of three states: empty
/// (`None` in the array), live (`deleted == false`) or tombstoned
/// (`deleted == true`). Tombstones keep probe sequences intact for keys
/// placed past them and are purged on growth.
#[derive(Debug, Clone)]
struct Slot {
    /// The key stored in the slot.
    key: u64,
    /// The value associated with the key.
    value: String,
    /// Tombstone flag set by `erase`.
    deleted: bool,
}

/// Outcome of one probe walk over the slot array.
#[derive(Debug)]
struct Walk {
    /// First empty slot or the key's own live slot, if one was reached
    /// within `capacity` attempts.
    slot: Option<usize>,
    /// Whether the walk visited at least one live slot holding a different
    /// key.
    collided: bool,
}

/// A fixed-key-type hash table using open addressing.
///
/// Keys are `u64`, values are `String`. All entries live in a single
/// contiguous slot array; collisions are resolved by walking a probe
/// sequence chosen by the active [`ProbeStrategy`]. Deletion tombstones the
/// slot, and growth doubles the capacity whenever an insert or upsert would
/// push the load factor past 0.5.
///
/// The table counts collisions: each mutating operation whose probe walk
/// passes a live slot owned by a different key bumps `collision_count` by
/// one. Read-only lookups never touch the counter.
///
/// Note: This implementation is not thread-safe. Callers that share a table
/// across threads must serialize every operation behind one exclusive lock.
#[derive(Debug, Clone)]
pub struct ProbeTable {
    /// The slot array; `None` marks a never-occupied position.
    slots: Vec<Option<Slot>>,
    /// Current number of live entries.
    size: usize,
    /// Monotonic collision counter, resettable by the caller.
    collision_count: usize,
    /// Active probe sequence strategy.
    strategy: ProbeStrategy,
}

impl Default for ProbeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeTable {
    /// Creates an empty table with the default initial capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty table with the given initial capacity.
    ///
    /// The capacity is clamped to at least 2 so the double-hashing stride
    /// `1 + (key mod (capacity - 1))` is defined.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(2)],
            size: 0,
            collision_count: 0,
            strategy: ProbeStrategy::default(),
        }
    }

    /// Inserts a new key, failing if the key is already present.
    ///
    /// Returns `true` if the entry was placed. Returns `false` without
    /// modifying the table when the key already has a live entry, or when
    /// the probe sequence exhausts every slot without finding a free one.
    pub fn insert(&mut self, key: u64, value: String) -> bool {
        self.grow_if_needed();

        let Some(index) = self.locate_counting(key) else {
            return false;
        };

        match self.slots.get_mut(index) {
            Some(Some(slot)) if !slot.deleted => false,
            Some(entry) => {
                *entry = Some(Slot { key, value, deleted: false });
                self.size = self.size.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Inserts the key or overwrites the value of an existing live entry.
    ///
    /// Silently does nothing in the defensive case where the probe sequence
    /// exhausts every slot.
    pub fn upsert(&mut self, key: u64, value: String) {
        self.grow_if_needed();

        let Some(index) = self.locate_counting(key) else {
            return;
        };

        match self.slots.get_mut(index) {
            Some(Some(slot)) if !slot.deleted => slot.value = value,
            Some(entry) => {
                *entry = Some(Slot { key, value, deleted: false });
                self.size = self.size.saturating_add(1);
            }
            None => {}
        }
    }

    /// Removes the key, tombstoning its slot.
    ///
    /// Returns `false` if the key had no live entry. The erase walk counts
    /// collisions like the other mutating operations.
    pub fn erase(&mut self, key: u64) -> bool {
        let Some(index) = self.locate_counting(key) else {
            return false;
        };

        match self.slots.get_mut(index) {
            Some(Some(slot)) if !slot.deleted => {
                slot.deleted = true;
                self.size = self.size.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Returns the value stored for the key, if it has a live entry.
    ///
    /// Never mutates the table or the collision counter.
    #[must_use]
    pub fn find(&self, key: u64) -> Option<&str> {
        let index = self.locate(key)?;
        match self.slots.get(index) {
            Some(Some(slot)) if !slot.deleted => Some(slot.value.as_str()),
            _ => None,
        }
    }

    /// Returns true if the key has a live entry.
    #[must_use]
    pub fn contains(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots in the backing array.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current ratio of live entries to slots.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Returns the number of collisions recorded since creation or the last
    /// reset.
    #[must_use]
    pub fn collision_count(&self) -> usize {
        self.collision_count
    }

    /// Resets the collision counter to zero.
    pub fn reset_collision_count(&mut self) {
        self.collision_count = 0;
    }

    /// Returns the active probe strategy.
    #[must_use]
    pub fn probe_strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    /// Sets the probe strategy for subsequent operations.
    ///
    /// Existing entries are not rehashed; a strategy change on a populated
    /// table makes earlier placements unreachable to the new probe
    /// sequences. Set the strategy before the first insert.
    pub fn set_probe_strategy(&mut self, strategy: ProbeStrategy) {
        self.strategy = strategy;
    }

    /// Walks the probe sequence for the key, visiting at most `capacity`
    /// candidate slots.
    ///
    /// The walk stops at the first empty slot or at the key's own live
    /// slot; tombstones are passed over. `collided` reports whether any
    /// visited slot was live under a different key, at most once per walk.
    fn walk(&self, key: u64) -> Walk {
        let capacity = self.slots.len();
        let mut collided = false;

        for attempt in 0..capacity {
            let index = self.strategy.slot_index(key, attempt as u64, capacity);
            match self.slots.get(index) {
                Some(None) => return Walk { slot: Some(index), collided },
                Some(Some(slot)) if !slot.deleted && slot.key == key => {
                    return Walk { slot: Some(index), collided };
                }
                Some(Some(slot)) => {
                    if !slot.deleted {
                        collided = true;
                    }
                }
                None => return Walk { slot: None, collided },
            }
        }

        Walk { slot: None, collided }
    }

    /// Locates the slot for a mutating operation, recording the walk's
    /// collision in the counter.
    fn locate_counting(&mut self, key: u64) -> Option<usize> {
        let walk = self.walk(key);
        if walk.collided {
            self.collision_count = self.collision_count.saturating_add(1);
        }
        walk.slot
    }

    /// Locates the slot for a read-only operation without touching the
    /// collision counter.
    fn locate(&self, key: u64) -> Option<usize> {
        self.walk(key).slot
    }

    /// Doubles the capacity if placing one more entry would push the load
    /// factor past the threshold.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn grow_if_needed(&mut self) {
        let pending = self.size.saturating_add(1);
        if pending as f64 / self.slots.len() as f64 > LOAD_FACTOR_THRESHOLD {
            self.grow();
        }
    }

    /// Rebuilds the table into a slot array of twice the capacity.
    ///
    /// Live entries are relocated in their original slot order; tombstones
    /// are dropped. The collision counter and strategy carry over unchanged,
    /// and `size` is recomputed from the entries actually relocated.
    fn grow(&mut self) {
        let new_capacity = self.slots.len().saturating_mul(2);
        let old_slots = mem::take(&mut self.slots);

        let mut grown = Self {
            slots: vec![None; new_capacity],
            size: 0,
            collision_count: self.collision_count,
            strategy: self.strategy,
        };

        for slot in old_slots.into_iter().flatten() {
            if !slot.deleted {
                grown.place_relocated(slot.key, slot.value);
            }
        }

        *self = grown;
    }

    /// Places one surviving entry during growth.
    ///
    /// Uses the shared walk but never touches the collision counter, so a
    /// growth event is invisible in the instrumentation. An entry whose walk
    /// exhausts is dropped; `size` then reflects what was relocated.
    fn place_relocated(&mut self, key: u64, value: String) {
        let Walk { slot, .. } = self.walk(key);
        if let Some(index) = slot {
            if let Some(entry) = self.slots.get_mut(index) {
                *entry = Some(Slot { key, value, deleted: false });
                self.size = self.size.saturating_add(1);
            }
        }
    }
}

impl fmt::Display for ProbeTable {
    /// Renders every live and tombstoned slot with its index.
    ///
    /// Intended for manual inspection; the format is not stable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Probe Table (Size: {}, Capacity: {}, Collisions: {})",
            self.size,
            self.slots.len(),
            self.collision_count
        )?;

        for (index, entry) in self.slots.iter().enumerate() {
            match entry {
                Some(slot) if !slot.deleted => {
                    writeln!(f, "[{index}] ({} : {})", slot.key, slot.value)?;
                }
                Some(_) => writeln!(f, "[{index}] <deleted>")?,
                None => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Keys 0, 16, 32, ... all share primary hash 0 in a capacity-16 table.
    fn same_bucket_keys(count: u64) -> Vec<u64> {
        (0..count).map(|i| i * 16).collect()
    }

    #[test]
    fn test_insert_and_find() {
        let mut table = ProbeTable::new();
        assert!(table.insert(1, "one".to_string()));
        assert!(table.insert(2, "two".to_string()));
        assert!(table.insert(3, "three".to_string()));

        assert_eq!(table.find(1), Some("one"));
        assert_eq!(table.find(2), Some("two"));
        assert_eq!(table.find(3), Some("three"));
        assert_eq!(table.find(4), None);
        assert!(table.contains(2));
        assert!(!table.contains(4));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut table = ProbeTable::new();
        assert!(table.insert(7, "first".to_string()));
        assert!(!table.insert(7, "second".to_string()));

        assert_eq!(table.find(7), Some("first"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_upsert_inserts_and_overwrites() {
        let mut table = ProbeTable::new();
        table.upsert(7, "first".to_string());
        assert_eq!(table.find(7), Some("first"));
        assert_eq!(table.len(), 1);

        table.upsert(7, "second".to_string());
        assert_eq!(table.find(7), Some("second"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_erase_is_idempotent() {
        let mut table = ProbeTable::new();
        assert!(!table.erase(1));
        assert_eq!(table.len(), 0);

        assert!(table.insert(1, "one".to_string()));
        assert!(table.insert(2, "two".to_string()));

        assert!(table.erase(1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(1), None);
        assert_eq!(table.find(2), Some("two"));

        assert!(!table.erase(1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_factor_never_exceeds_threshold() {
        let mut table = ProbeTable::new();
        for key in 0..100 {
            assert!(table.insert(key, format!("value_{key}")));
            assert!(table.load_factor() <= 0.5, "load factor breached at key {key}");
        }
        assert_eq!(table.len(), 100);
    }

    #[test]
    fn test_upsert_triggers_growth() {
        let mut table = ProbeTable::new();
        for key in 0..9 {
            table.upsert(key, format!("value_{key}"));
        }
        assert_eq!(table.capacity(), 32);
        assert!(table.load_factor() <= 0.5);
    }

    #[test]
    fn test_linear_collision_accounting() {
        let mut table = ProbeTable::new();
        table.set_probe_strategy(ProbeStrategy::Linear);

        for key in same_bucket_keys(8) {
            assert!(table.insert(key, "test".to_string()));
        }

        assert_eq!(table.collision_count(), 7);
        assert_eq!(table.len(), 8);
        assert_eq!(table.capacity(), 16);
    }

    #[test]
    fn test_find_does_not_count_collisions() {
        let mut table = ProbeTable::new();
        table.set_probe_strategy(ProbeStrategy::Linear);
        for key in same_bucket_keys(4) {
            table.insert(key, "test".to_string());
        }

        let before = table.collision_count();
        assert_eq!(table.find(48), Some("test"));
        assert!(!table.contains(64));
        assert_eq!(table.collision_count(), before);
    }

    #[test]
    fn test_reset_collision_count() {
        let mut table = ProbeTable::new();
        table.set_probe_strategy(ProbeStrategy::Linear);
        for key in same_bucket_keys(4) {
            table.insert(key, "test".to_string());
        }
        assert!(table.collision_count() > 0);

        table.reset_collision_count();
        assert_eq!(table.collision_count(), 0);
    }

    #[test]
    fn test_growth_preserves_entries_and_collisions() {
        let mut table = ProbeTable::new();
        table.set_probe_strategy(ProbeStrategy::Linear);

        let keys = same_bucket_keys(8);
        for &key in &keys {
            assert!(table.insert(key, format!("value_{key}")));
        }
        assert_eq!(table.collision_count(), 7);
        assert_eq!(table.capacity(), 16);

        // Key 5 lands in an empty primary slot after the doubling, so the
        // counter can only change if growth itself perturbed it.
        assert!(table.insert(5, "value_5".to_string()));
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.collision_count(), 7);

        for &key in &keys {
            assert_eq!(table.find(key), Some(format!("value_{key}").as_str()));
        }
        assert_eq!(table.find(5), Some("value_5"));
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn test_growth_purges_tombstones() {
        let mut table = ProbeTable::new();
        table.set_probe_strategy(ProbeStrategy::Linear);

        for key in same_bucket_keys(8) {
            table.insert(key, "test".to_string());
        }
        assert!(table.erase(16));
        assert!(table.to_string().contains("<deleted>"));

        // Ninth live entry forces the doubling that drops the tombstone.
        assert!(table.insert(5, "test".to_string()));
        assert!(table.insert(6, "test".to_string()));
        assert_eq!(table.capacity(), 32);
        assert!(!table.to_string().contains("<deleted>"));
        assert!(!table.contains(16));
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn test_strategy_changes_layout_not_contents() {
        // The physical layout and collision counts depend on the strategy,
        // but every strategy must report the same keys and values.
        let keys = [0_u64, 16, 32, 48, 5, 21, 7];

        for strategy in ProbeStrategy::ALL {
            let mut table = ProbeTable::new();
            table.set_probe_strategy(strategy);
            for &key in &keys {
                assert!(table.insert(key, format!("value_{key}")));
            }

            for &key in &keys {
                assert_eq!(table.find(key), Some(format!("value_{key}").as_str()));
            }
            assert!(!table.contains(64));
            assert_eq!(table.len(), keys.len());
        }
    }

    #[test]
    fn test_probing_continues_past_tombstones() {
        let mut table = ProbeTable::new();
        table.set_probe_strategy(ProbeStrategy::Linear);

        assert!(table.insert(0, "zero".to_string()));
        assert!(table.insert(16, "sixteen".to_string()));
        assert!(table.erase(0));

        // 16 sits past 0's tombstoned slot and must stay reachable.
        assert_eq!(table.find(16), Some("sixteen"));

        // A new key probing through the tombstone lands beyond it.
        assert!(table.insert(32, "thirty-two".to_string()));
        assert_eq!(table.find(32), Some("thirty-two"));
        assert!(!table.contains(0));
    }

    #[test]
    fn test_quadratic_probe_exhaustion_is_reported() {
        // Quadratic probing in a capacity-16 table only ever visits offsets
        // {0, 1, 4, 9} from the primary slot. Occupying all four leaves key
        // 16 (primary slot 0) with no reachable free slot even though the
        // table is half empty.
        let mut table = ProbeTable::new();
        table.set_probe_strategy(ProbeStrategy::Quadratic);
        for key in [0, 1, 4, 9] {
            assert!(table.insert(key, "block".to_string()));
        }

        assert!(!table.insert(16, "stuck".to_string()));
        assert_eq!(table.len(), 4);
        assert_eq!(table.find(16), None);

        table.upsert(16, "stuck".to_string());
        assert!(!table.contains(16));
        assert!(!table.erase(16));

        // The table stays usable afterwards.
        assert!(table.insert(2, "two".to_string()));
        assert_eq!(table.find(2), Some("two"));
    }

    #[test]
    fn test_double_hashing_stride_placement() {
        let mut table = ProbeTable::new();
        // DoubleHashing is the default strategy.
        assert_eq!(table.probe_strategy(), ProbeStrategy::DoubleHashing);

        // h1(1) = h1(17) = 1; h2(17) = 3, so 17 lands at slot 1 + 3 = 4.
        assert!(table.insert(1, "one".to_string()));
        assert!(table.insert(17, "seventeen".to_string()));

        assert_eq!(table.collision_count(), 1);
        assert_eq!(table.find(1), Some("one"));
        assert_eq!(table.find(17), Some("seventeen"));
    }

    #[test]
    fn test_display_dump() {
        let mut table = ProbeTable::new();
        table.set_probe_strategy(ProbeStrategy::Linear);
        table.insert(0, "zero".to_string());
        table.insert(16, "sixteen".to_string());
        table.erase(0);

        let dump = table.to_string();
        assert!(dump.contains("Size: 1"));
        assert!(dump.contains("Capacity: 16"));
        assert!(dump.contains("Collisions: 1"));
        assert!(dump.contains("[0] <deleted>"));
        assert!(dump.contains("[1] (16 : sixteen)"));
    }

    #[test]
    fn test_with_capacity_clamps_to_two() {
        let table = ProbeTable::with_capacity(0);
        assert_eq!(table.capacity(), 2);
        assert!(table.is_empty());
    }

    proptest! {
        #[test]
        fn behaves_like_reference_map(
            ops in proptest::collection::vec((0_u64..48, 0_u8..3), 1..256),
            strategy in prop_oneof![
                Just(ProbeStrategy::Linear),
                Just(ProbeStrategy::Quadratic),
                Just(ProbeStrategy::DoubleHashing),
            ],
        ) {
            let mut table = ProbeTable::new();
            table.set_probe_strategy(strategy);
            let mut reference: HashMap<u64, String> = HashMap::new();

            for (step, &(key, action)) in ops.iter().enumerate() {
                let value = format!("value_{step}");
                match action {
                    0 => {
                        let present = reference.contains_key(&key);
                        let inserted = table.insert(key, value.clone());
                        if present {
                            prop_assert!(!inserted);
                        } else if inserted {
                            reference.insert(key, value);
                        } else {
                            // Probe exhaustion: the key must stay absent.
                            prop_assert_eq!(table.find(key), None);
                        }
                    }
                    1 => {
                        table.upsert(key, value.clone());
                        if table.contains(key) {
                            prop_assert_eq!(table.find(key), Some(value.as_str()));
                            reference.insert(key, value);
                        } else {
                            // Probe exhaustion: only possible for absent keys.
                            prop_assert!(!reference.contains_key(&key));
                        }
                    }
                    _ => {
                        let removed = table.erase(key);
                        prop_assert_eq!(removed, reference.remove(&key).is_some());
                    }
                }

                prop_assert!(table.load_factor() <= 0.5);
            }

            prop_assert_eq!(table.len(), reference.len());
            for key in 0..48_u64 {
                prop_assert_eq!(table.find(key), reference.get(&key).map(String::as_str));
            }
        }
    }
}

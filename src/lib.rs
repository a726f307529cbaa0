//! # Probe Table
//!
//! A Rust implementation of a hash table using open addressing with
//! pluggable probe strategies.
//!
//! The table keeps every entry in one contiguous slot array and resolves
//! collisions by walking a probe sequence: linear, quadratic, or double
//! hashing, selectable per table. Deletions leave tombstones so later keys
//! stay reachable, growth doubles the capacity whenever the load factor
//! would pass 0.5, and a collision counter records how often mutating
//! operations probe past slots owned by other keys.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probetable::ProbeTable;
//!
//! // Create a new table
//! let mut table = ProbeTable::new();
//!
//! // Insert values; a duplicate key is rejected
//! assert!(table.insert(1, "one".to_string()));
//! assert!(!table.insert(1, "uno".to_string()));
//!
//! // Upsert overwrites in place
//! table.upsert(1, "uno".to_string());
//! assert_eq!(table.find(1), Some("uno"));
//!
//! // Erase tombstones the slot
//! assert!(table.erase(1));
//! assert!(!table.contains(1));
//! ```
//!
//! ## Choosing a Probe Strategy
//!
//! ```rust
//! use probetable::{ProbeStrategy, ProbeTable};
//!
//! // Pick the strategy before the first insert
//! let mut table = ProbeTable::new();
//! table.set_probe_strategy(ProbeStrategy::Linear);
//!
//! // Keys 0 and 16 share primary slot 0 in a capacity-16 table, so the
//! // second insert registers one collision
//! assert!(table.insert(0, "zero".to_string()));
//! assert!(table.insert(16, "sixteen".to_string()));
//! assert_eq!(table.collision_count(), 1);
//!
//! // Lookups never disturb the counter
//! assert_eq!(table.find(16), Some("sixteen"));
//! assert_eq!(table.collision_count(), 1);
//! ```
//!
//! ## Measuring Workloads
//!
//! ```rust
//! use probetable::{ProbeStrategy, ProbeTable, Scenario};
//!
//! let mut table = ProbeTable::new();
//! table.set_probe_strategy(ProbeStrategy::DoubleHashing);
//!
//! for key in Scenario::Clustered.keys(500) {
//!     table.upsert(key, format!("value_{key}"));
//! }
//!
//! assert!(table.load_factor() <= 0.5);
//! assert!(table.collision_count() > 0);
//! ```

/// Module implementing probe sequence strategies
mod probe;
/// Module implementing the open addressing table
mod probe_table;
/// Module persisting latency samples for the measurement driver
mod report;
/// Module generating key workloads for the measurement driver
mod workload;

pub use probe::ProbeStrategy;
pub use probe_table::ProbeTable;
pub use report::LatencyLog;
pub use workload::Scenario;

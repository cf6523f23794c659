//! Low-level utilities shared by every CITAM crate: hash maps, the seeded
//! RNG, generic graph search and sampling distributions.

mod distribution;
pub use distribution::{PlottedDistribution, RangeDistribution};

mod path;
pub use path::{PathNode, bfs, dijkstra_search};

mod rng;
pub use rng::{RngExt, srng};

/// Map with an efficient hash function.
pub use rustc_hash::FxHashMap as HashMap;

/// Set with an efficient hash function.
pub use rustc_hash::FxHashSet as HashSet;

type DefaultHashBuilder = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// Insertion order preserving map with an efficient hash function.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, DefaultHashBuilder>;

/// Insertion order preserving set with an efficient hash function.
pub type IndexSet<V> = indexmap::IndexSet<V, DefaultHashBuilder>;

/// The simulation's single logical source of randomness. Seeding it the same
/// way with worker count 1 reproduces a run bit-for-bit (see the
/// determinism property in the top-level design notes).
pub type SimRng = rand_xorshift::XorShiftRng;

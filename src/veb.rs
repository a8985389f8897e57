//! van Emde Boas tree, the ordered map built on it, and its heaps
//!
//! A [`VebTree`] stores a set of integers from a universe `[0, 2^k)`. A tree
//! over `k` bits splits every key into a high half (which cluster) and a low
//! half (position within the cluster):
//!
//! - `2^⌈k/2⌉` clusters, each a tree over `⌊k/2⌋` bits
//! - a summary tree over `⌈k/2⌉` bits recording which clusters are non-empty
//! - the minimum and maximum cached at the top; the minimum is never stored
//!   inside a cluster
//!
//! Membership, insertion, removal, successor and predecessor recurse into a
//! single cluster or into the summary per level, so they take
//! O(log log U) steps. Clusters and summaries are created on first use and
//! dropped when they become empty, so memory follows the stored keys rather
//! than the universe.
//!
//! [`VebMap`] pairs the tree with a hash map from key to entry, and
//! [`VebTreeHeap`] / [`IndexedVebTreeHeap`] plug that map into
//! [`crate::map_heap`].
//!
//! # Universe
//!
//! The universe is fixed at construction, must be at least 2, and is rounded
//! up to the next power of two. Keys at or above the universe are a contract
//! violation and panic on insertion.

use crate::chain::ChainEnds;
use crate::error::ConfigError;
use crate::map_heap::{IndexedMapHeap, MapHeap, PriorityMap};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;
use std::mem;

/// Smallest accepted universe size
pub const MIN_UNIVERSE: u64 = 2;

/// Unsigned integer types usable as van Emde Boas keys
pub trait VebKey: Copy + Ord {
    fn to_u64(self) -> u64;
}

macro_rules! impl_veb_key {
    ($($t:ty),*) => {
        $(
            impl VebKey for $t {
                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_veb_key!(u8, u16, u32, u64, usize);

/// Validates a universe size and returns the number of key bits it needs
fn universe_bits(universe: u64) -> Result<u32, ConfigError> {
    if universe < MIN_UNIVERSE {
        return Err(ConfigError::UniverseTooSmall {
            universe,
            minimum: MIN_UNIVERSE,
        });
    }
    let rounded = universe
        .checked_next_power_of_two()
        .ok_or(ConfigError::UniverseTooLarge(universe))?;
    if rounded != universe {
        tracing::debug!("rounded van Emde Boas universe {} up to {}", universe, rounded);
    }
    Ok(rounded.trailing_zeros())
}

/// Integer set over a power-of-two universe
pub struct VebTree {
    bits: u32,
    min: Option<u64>,
    max: Option<u64>,
    summary: Option<Box<VebTree>>,
    clusters: FxHashMap<u64, VebTree>,
}

impl VebTree {
    /// Creates an empty set over `[0, universe)`, rounding `universe` up to a
    /// power of two
    ///
    /// # Errors
    /// [`ConfigError::UniverseTooSmall`] below [`MIN_UNIVERSE`];
    /// [`ConfigError::UniverseTooLarge`] above `2^63`.
    pub fn new(universe: u64) -> Result<Self, ConfigError> {
        universe_bits(universe).map(Self::with_bits)
    }

    fn with_bits(bits: u32) -> Self {
        Self {
            bits,
            min: None,
            max: None,
            summary: None,
            clusters: FxHashMap::default(),
        }
    }

    /// Size of the universe after rounding
    pub fn universe(&self) -> u64 {
        1u64 << self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    pub fn min(&self) -> Option<u64> {
        self.min
    }

    pub fn max(&self) -> Option<u64> {
        self.max
    }

    pub fn clear(&mut self) {
        self.min = None;
        self.max = None;
        self.summary = None;
        self.clusters.clear();
    }

    #[inline]
    fn low_bits(&self) -> u32 {
        self.bits / 2
    }

    #[inline]
    fn high(&self, x: u64) -> u64 {
        x >> self.low_bits()
    }

    #[inline]
    fn low(&self, x: u64) -> u64 {
        x & ((1u64 << self.low_bits()) - 1)
    }

    #[inline]
    fn index(&self, high: u64, low: u64) -> u64 {
        (high << self.low_bits()) | low
    }

    fn cluster_min(&self, high: u64) -> Option<u64> {
        self.clusters.get(&high).and_then(|c| c.min)
    }

    fn cluster_max(&self, high: u64) -> Option<u64> {
        self.clusters.get(&high).and_then(|c| c.max)
    }

    pub fn contains(&self, x: u64) -> bool {
        if self.min == Some(x) || self.max == Some(x) {
            return true;
        }
        if self.bits == 1 || x >= self.universe() {
            return false;
        }
        self.clusters
            .get(&self.high(x))
            .map_or(false, |c| c.contains(self.low(x)))
    }

    /// Adds `x`, returning `false` if it was already present
    ///
    /// # Panics
    /// Panics if `x` is outside the universe.
    pub fn insert(&mut self, x: u64) -> bool {
        assert!(
            x < self.universe(),
            "key {} outside van Emde Boas universe [0, {})",
            x,
            self.universe()
        );
        if self.contains(x) {
            return false;
        }
        self.insert_absent(x);
        true
    }

    fn insert_absent(&mut self, mut x: u64) {
        let Some(min) = self.min else {
            self.min = Some(x);
            self.max = Some(x);
            return;
        };
        if x < min {
            self.min = Some(x);
            x = min;
        }
        if self.bits > 1 {
            let (high, low) = (self.high(x), self.low(x));
            let low_bits = self.low_bits();
            let high_bits = self.bits - low_bits;
            let cluster = self
                .clusters
                .entry(high)
                .or_insert_with(|| VebTree::with_bits(low_bits));
            if cluster.min.is_none() {
                self.summary
                    .get_or_insert_with(|| Box::new(VebTree::with_bits(high_bits)))
                    .insert_absent(high);
            }
            cluster.insert_absent(low);
        }
        if self.max.map_or(true, |max| x > max) {
            self.max = Some(x);
        }
    }

    /// Removes `x`, returning `false` if it was not present
    pub fn remove(&mut self, x: u64) -> bool {
        if !self.contains(x) {
            return false;
        }
        self.remove_present(x);
        true
    }

    fn remove_present(&mut self, mut x: u64) {
        if self.min == self.max {
            self.min = None;
            self.max = None;
            return;
        }
        if self.bits == 1 {
            let other = 1 - x;
            self.min = Some(other);
            self.max = Some(other);
            return;
        }
        if self.min == Some(x) {
            // Promote the smallest clustered key to be the new minimum
            let Some(first) = self.summary.as_ref().and_then(|s| s.min) else {
                return;
            };
            let Some(low) = self.cluster_min(first) else {
                return;
            };
            x = self.index(first, low);
            self.min = Some(x);
        }

        let (high, low) = (self.high(x), self.low(x));
        let emptied = match self.clusters.get_mut(&high) {
            Some(cluster) => {
                cluster.remove_present(low);
                cluster.is_empty()
            }
            None => false,
        };

        if emptied {
            self.clusters.remove(&high);
            if let Some(summary) = self.summary.as_mut() {
                summary.remove_present(high);
                if summary.is_empty() {
                    self.summary = None;
                }
            }
            if self.max == Some(x) {
                let last = self.summary.as_ref().and_then(|s| s.max);
                self.max = match last {
                    Some(last) => self.cluster_max(last).map(|low| self.index(last, low)),
                    None => self.min,
                };
            }
        } else if self.max == Some(x) {
            self.max = self.cluster_max(high).map(|low| self.index(high, low));
        }
    }

    /// Smallest stored key strictly greater than `x`
    pub fn successor(&self, x: u64) -> Option<u64> {
        if let Some(min) = self.min {
            if x < min {
                return Some(min);
            }
        }
        if self.bits == 1 {
            return (x == 0 && self.max == Some(1)).then_some(1);
        }
        if x >= self.universe() {
            return None;
        }
        let (high, low) = (self.high(x), self.low(x));
        if self.cluster_max(high).map_or(false, |max_low| low < max_low) {
            let offset = self.clusters.get(&high)?.successor(low)?;
            return Some(self.index(high, offset));
        }
        let next = self.summary.as_ref()?.successor(high)?;
        let offset = self.cluster_min(next)?;
        Some(self.index(next, offset))
    }

    /// Largest stored key strictly smaller than `x`
    pub fn predecessor(&self, x: u64) -> Option<u64> {
        if let Some(max) = self.max {
            if x > max {
                return Some(max);
            }
        }
        if self.bits == 1 {
            return (x == 1 && self.min == Some(0)).then_some(0);
        }
        let (high, low) = (self.high(x), self.low(x));
        if self.cluster_min(high).map_or(false, |min_low| low > min_low) {
            let offset = self.clusters.get(&high)?.predecessor(low)?;
            return Some(self.index(high, offset));
        }
        match self.summary.as_ref().and_then(|s| s.predecessor(high)) {
            Some(prev) => {
                let offset = self.cluster_max(prev)?;
                Some(self.index(prev, offset))
            }
            None => self.min.filter(|&min| x > min),
        }
    }

    /// Stored keys in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        std::iter::successors(self.min, move |&x| self.successor(x))
    }
}

impl fmt::Debug for VebTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VebTree")
            .field("universe", &self.universe())
            .field("keys", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Ordered map over integer keys backed by a [`VebTree`]
pub struct VebMap<K, V> {
    tree: VebTree,
    entries: FxHashMap<u64, (K, V)>,
}

impl<K: VebKey, V> VebMap<K, V> {
    /// Creates an empty map over keys `[0, universe)`, rounding `universe`
    /// up to a power of two
    ///
    /// # Errors
    /// See [`VebTree::new`].
    pub fn with_universe(universe: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            tree: VebTree::new(universe)?,
            entries: FxHashMap::default(),
        })
    }

    pub fn universe(&self) -> u64 {
        self.tree.universe()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(&key.to_u64()).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(&key.to_u64()).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(&key.to_u64())
    }

    /// Inserts `value` under `key`, returning the value it replaced
    ///
    /// # Panics
    /// Panics if `key` is outside the universe.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let raw = key.to_u64();
        if let Some((_, slot)) = self.entries.get_mut(&raw) {
            return Some(mem::replace(slot, value));
        }
        self.tree.insert(raw);
        self.entries.insert(raw, (key, value));
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let raw = key.to_u64();
        let (_, value) = self.entries.remove(&raw)?;
        self.tree.remove(raw);
        Some(value)
    }

    fn entry(&self, raw: Option<u64>) -> Option<(&K, &V)> {
        raw.and_then(|raw| self.entries.get(&raw)).map(|(k, v)| (k, v))
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.entry(self.tree.min())
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.entry(self.tree.max())
    }

    /// Entry with the smallest key strictly greater than `key`
    pub fn successor(&self, key: &K) -> Option<(&K, &V)> {
        self.entry(self.tree.successor(key.to_u64()))
    }

    /// Entry with the largest key strictly smaller than `key`
    pub fn predecessor(&self, key: &K) -> Option<(&K, &V)> {
        self.entry(self.tree.predecessor(key.to_u64()))
    }

    pub fn clear(&mut self) {
        self.tree.clear();
        self.entries.clear();
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for VebMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.tree
                    .iter()
                    .filter_map(|raw| self.entries.get(&raw))
                    .map(|(k, v)| (k, v)),
            )
            .finish()
    }
}

impl<K: VebKey, V> PriorityMap<K, V> for VebMap<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        VebMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        VebMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        VebMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        VebMap::remove(self, key)
    }

    fn first_key_value(&self) -> Option<(&K, &V)> {
        VebMap::first_key_value(self)
    }

    fn clear(&mut self) {
        VebMap::clear(self)
    }
}

/// Unindexed heap over integer priorities in a bounded universe
pub type VebTreeHeap<E, P> = MapHeap<E, P, VebMap<P, Vec<E>>>;

/// Indexed heap over integer priorities in a bounded universe
pub type IndexedVebTreeHeap<E, P> = IndexedMapHeap<E, P, VebMap<P, ChainEnds>>;

impl<E, P: VebKey> MapHeap<E, P, VebMap<P, Vec<E>>> {
    /// Creates an empty heap accepting priorities in `[0, universe)`
    ///
    /// # Errors
    /// See [`VebTree::new`].
    pub fn with_universe(universe: u64) -> Result<Self, ConfigError> {
        VebMap::with_universe(universe).map(Self::from_map)
    }
}

impl<E: Clone + Eq + Hash, P: VebKey> IndexedMapHeap<E, P, VebMap<P, ChainEnds>> {
    /// Creates an empty heap accepting priorities in `[0, universe)`
    ///
    /// # Errors
    /// See [`VebTree::new`].
    pub fn with_universe(universe: u64) -> Result<Self, ConfigError> {
        VebMap::with_universe(universe).map(Self::from_map)
    }
}

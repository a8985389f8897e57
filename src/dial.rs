//! Dial's bucket heap
//!
//! Priorities are sorted into fixed-width buckets: priority `p` lands in
//! bucket `⌊p / width⌋`. The heap remembers the lowest non-empty bucket and
//! only ever scans that one bucket to find a minimum, walking forward to the
//! next non-empty bucket when it runs dry.
//!
//! Within a bucket the first record with the smallest priority wins, so
//! records of equal priority come out in the order they were filed.
//!
//! The bucket array widens on demand to `max(bucket + 1, 2 * len)` slots.
//! Memory is therefore proportional to the largest priority divided by the
//! width; the structure is meant for small non-negative priority ranges.
//! Bucket indices are capped at [`LAST_BUCKET`]: every larger priority,
//! including `f64::INFINITY` and NaN, shares that final bucket and is still
//! ordered correctly by the in-bucket scan.
//!
//! # Example
//!
//! ```rust
//! use comparative_heaps::PriorityQueue;
//! use comparative_heaps::dial::DoubleDialHeap;
//! use ordered_float::OrderedFloat;
//!
//! let mut heap = DoubleDialHeap::with_width(0.5).unwrap();
//! heap.add('b', OrderedFloat(1.75));
//! heap.add('a', OrderedFloat(1.5));
//! assert_eq!(heap.extract_min(), Ok(('a', OrderedFloat(1.5))));
//! ```

use crate::chain::{ChainEnds, Chains};
use crate::error::{ConfigError, HeapError};
use crate::storage::{ElementIndex, NodeKey};
use crate::traits::{IndexedPriorityQueue, PriorityQueue};
use ordered_float::OrderedFloat;
use std::fmt;
use std::hash::Hash;

/// A priority that can be mapped to a bucket index
///
/// `bucket` must be monotone: `a <= b` implies
/// `a.bucket(w) <= b.bucket(w)` for every accepted width `w`.
pub trait BucketPriority: Ord + Copy {
    /// Bucket width type
    type Width: Copy + fmt::Debug;

    /// Width used by the `new` constructors
    const UNIT_WIDTH: Self::Width;

    /// Accepts or rejects a bucket width
    fn check_width(width: Self::Width) -> Result<Self::Width, ConfigError>;

    /// Index of the bucket holding `self`
    fn bucket(self, width: Self::Width) -> usize;
}

impl BucketPriority for OrderedFloat<f64> {
    type Width = f64;

    const UNIT_WIDTH: f64 = 1.0;

    fn check_width(width: f64) -> Result<f64, ConfigError> {
        if width.is_finite() && width > 0.0 {
            Ok(width)
        } else {
            Err(ConfigError::InvalidBucketWidth(width.to_string()))
        }
    }

    /// Negative priorities share bucket 0; NaN sorts last, as `OrderedFloat` does
    #[inline]
    fn bucket(self, width: f64) -> usize {
        if self.0.is_nan() {
            return usize::MAX;
        }
        let slot = (self.0 / width).floor();
        if slot > 0.0 {
            slot as usize
        } else {
            0
        }
    }
}

macro_rules! impl_unsigned_bucket {
    ($($t:ty),*) => {
        $(
            impl BucketPriority for $t {
                type Width = $t;

                const UNIT_WIDTH: $t = 1;

                fn check_width(width: $t) -> Result<$t, ConfigError> {
                    if width > 0 {
                        Ok(width)
                    } else {
                        Err(ConfigError::InvalidBucketWidth(width.to_string()))
                    }
                }

                #[inline]
                fn bucket(self, width: $t) -> usize {
                    (self / width) as usize
                }
            }
        )*
    };
}

macro_rules! impl_signed_bucket {
    ($($t:ty),*) => {
        $(
            impl BucketPriority for $t {
                type Width = $t;

                const UNIT_WIDTH: $t = 1;

                fn check_width(width: $t) -> Result<$t, ConfigError> {
                    if width > 0 {
                        Ok(width)
                    } else {
                        Err(ConfigError::InvalidBucketWidth(width.to_string()))
                    }
                }

                /// Negative priorities share bucket 0
                #[inline]
                fn bucket(self, width: $t) -> usize {
                    (self.max(0) / width) as usize
                }
            }
        )*
    };
}

impl_unsigned_bucket!(u8, u16, u32, u64, usize);
impl_signed_bucket!(i32, i64);

/// Highest bucket index; priorities mapping past it share this bucket
pub const LAST_BUCKET: usize = 1 << 20;

#[inline]
fn bucket_of<P: BucketPriority>(priority: P, width: P::Width) -> usize {
    priority.bucket(width).min(LAST_BUCKET)
}

/// New bucket array length able to hold `bucket`
fn grown_len(bucket: usize, current: usize, records: usize) -> usize {
    (bucket + 1).max(2 * records).min(LAST_BUCKET + 1).max(current)
}

/// Widens `buckets` so that `bucket` is a valid index
fn ensure_bucket(buckets: &mut Vec<Option<ChainEnds>>, bucket: usize, records: usize) {
    if bucket >= buckets.len() {
        let new_len = grown_len(bucket, buckets.len(), records);
        tracing::trace!("widening Dial bucket array from {} to {}", buckets.len(), new_len);
        buckets.resize(new_len, None);
    }
}

/// First link holding the smallest priority of the chain at `ends`
fn first_minimum<E, P: Ord>(chains: &Chains<E, P>, ends: Option<ChainEnds>) -> Option<NodeKey> {
    let mut best: Option<NodeKey> = None;
    for key in chains.iter(ends?) {
        if best.map_or(true, |b| chains.get(key).priority < chains.get(b).priority) {
            best = Some(key);
        }
    }
    best
}

/// Unindexed Dial heap
///
/// Buckets are linked chains, so taking the minimum out of the middle of a
/// bucket does not shift its other records.
pub struct DialHeap<E, P: BucketPriority> {
    buckets: Vec<Option<ChainEnds>>,
    chains: Chains<E, P>,
    width: P::Width,
    min_bucket: usize,
}

/// Dial heap over `f64` priorities
pub type DoubleDialHeap<E> = DialHeap<E, OrderedFloat<f64>>;

/// Dial heap over `u64` priorities
pub type IntegerDialHeap<E> = DialHeap<E, u64>;

impl<E, P: BucketPriority> DialHeap<E, P> {
    /// Creates a heap with unit-width buckets
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            chains: Chains::new(),
            width: P::UNIT_WIDTH,
            min_bucket: 0,
        }
    }

    /// Creates a heap whose buckets each cover `width` priority units
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBucketWidth`] if `width` is not
    /// strictly positive (or, for floats, not finite).
    pub fn with_width(width: P::Width) -> Result<Self, ConfigError> {
        Ok(Self {
            buckets: Vec::new(),
            chains: Chains::new(),
            width: P::check_width(width)?,
            min_bucket: 0,
        })
    }

    pub fn width(&self) -> P::Width {
        self.width
    }

    /// Current length of the bucket array
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn min_link(&self) -> Option<NodeKey> {
        first_minimum(&self.chains, *self.buckets.get(self.min_bucket)?)
    }
}

impl<E, P: BucketPriority> PriorityQueue<E, P> for DialHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        let bucket = bucket_of(priority, self.width);
        ensure_bucket(&mut self.buckets, bucket, self.chains.len());
        if self.chains.len() == 0 || bucket < self.min_bucket {
            self.min_bucket = bucket;
        }
        let (_, ends) = self.chains.push_back(self.buckets[bucket], element, priority);
        self.buckets[bucket] = Some(ends);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        let key = self.min_link().ok_or(HeapError::EmptyStructure)?;
        let ends = self.buckets[self.min_bucket].ok_or(HeapError::EmptyStructure)?;
        let (rest, link) = self.chains.remove(ends, key);
        self.buckets[self.min_bucket] = rest;
        let link = link.ok_or(HeapError::EmptyStructure)?;
        if self.chains.len() > 0 {
            while self.buckets[self.min_bucket].is_none() {
                self.min_bucket += 1;
            }
        }
        Ok((link.element, link.priority))
    }

    fn peek(&self) -> Option<(&E, &P)> {
        let link = self.chains.get(self.min_link()?);
        Some((&link.element, &link.priority))
    }

    fn len(&self) -> usize {
        self.chains.len()
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.chains.clear();
        self.min_bucket = 0;
    }
}

impl<E, P: BucketPriority> Default for DialHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Dial heap with an element → link index
///
/// Each bucket is a doubly linked chain, so `decrease_priority` can unlink
/// an element from its old bucket and append it to the new one in O(1).
pub struct IndexedDialHeap<E, P: BucketPriority> {
    buckets: Vec<Option<ChainEnds>>,
    chains: Chains<E, P>,
    index: ElementIndex<E, NodeKey>,
    width: P::Width,
    min_bucket: usize,
}

/// Indexed Dial heap over `f64` priorities
pub type IndexedDoubleDialHeap<E> = IndexedDialHeap<E, OrderedFloat<f64>>;

/// Indexed Dial heap over `u64` priorities
pub type IndexedIntegerDialHeap<E> = IndexedDialHeap<E, u64>;

impl<E: Clone + Eq + Hash, P: BucketPriority> IndexedDialHeap<E, P> {
    /// Creates a heap with unit-width buckets
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            chains: Chains::new(),
            index: ElementIndex::new(),
            width: P::UNIT_WIDTH,
            min_bucket: 0,
        }
    }

    /// Creates a heap whose buckets each cover `width` priority units
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBucketWidth`] if `width` is not
    /// strictly positive (or, for floats, not finite).
    pub fn with_width(width: P::Width) -> Result<Self, ConfigError> {
        Ok(Self {
            buckets: Vec::new(),
            chains: Chains::new(),
            index: ElementIndex::new(),
            width: P::check_width(width)?,
            min_bucket: 0,
        })
    }

    pub fn width(&self) -> P::Width {
        self.width
    }

    /// Current length of the bucket array
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Link holding the first minimum record of the lowest bucket
    fn min_link(&self) -> Option<NodeKey> {
        first_minimum(&self.chains, *self.buckets.get(self.min_bucket)?)
    }

    fn advance_min_bucket(&mut self) {
        if self.chains.len() == 0 {
            return;
        }
        while self.buckets[self.min_bucket].is_none() {
            self.min_bucket += 1;
        }
    }
}

impl<E: Clone + Eq + Hash, P: BucketPriority> PriorityQueue<E, P> for IndexedDialHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        if self.index.contains(&element) {
            return false;
        }
        let bucket = bucket_of(priority, self.width);
        ensure_bucket(&mut self.buckets, bucket, self.chains.len());
        if self.chains.len() == 0 || bucket < self.min_bucket {
            self.min_bucket = bucket;
        }
        let (key, ends) = self.chains.push_back(self.buckets[bucket], element.clone(), priority);
        self.buckets[bucket] = Some(ends);
        self.index.insert(element, key);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        let key = self.min_link().ok_or(HeapError::EmptyStructure)?;
        let ends = self.buckets[self.min_bucket].ok_or(HeapError::EmptyStructure)?;
        let (rest, link) = self.chains.remove(ends, key);
        self.buckets[self.min_bucket] = rest;
        let link = link.ok_or(HeapError::EmptyStructure)?;
        self.index.remove(&link.element);
        self.advance_min_bucket();
        Ok((link.element, link.priority))
    }

    fn peek(&self) -> Option<(&E, &P)> {
        let link = self.chains.get(self.min_link()?);
        Some((&link.element, &link.priority))
    }

    fn len(&self) -> usize {
        self.chains.len()
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.chains.clear();
        self.index.clear();
        self.min_bucket = 0;
    }

    fn decrease_priority(&mut self, element: &E, priority: P) -> Result<bool, HeapError> {
        let Some(key) = self.index.get(element) else {
            return Ok(false);
        };
        let old = self.chains.get(key).priority;
        if priority >= old {
            return Ok(false);
        }
        let from = bucket_of(old, self.width);
        let to = bucket_of(priority, self.width);
        if from != to {
            let Some(ends) = self.buckets[from] else {
                return Ok(false);
            };
            self.buckets[from] = self.chains.detach(ends, key);
            self.buckets[to] = Some(self.chains.attach_back(self.buckets[to], key));
            if to < self.min_bucket {
                self.min_bucket = to;
            }
        }
        self.chains.get_mut(key).priority = priority;
        Ok(true)
    }
}

impl<E: Clone + Eq + Hash, P: BucketPriority> IndexedPriorityQueue<E, P> for IndexedDialHeap<E, P> {
    fn contains(&self, element: &E) -> bool {
        self.index.contains(element)
    }

    fn priority_of(&self, element: &E) -> Option<&P> {
        self.index
            .get(element)
            .map(|key| &self.chains.get(key).priority)
    }
}

impl<E: Clone + Eq + Hash, P: BucketPriority> Default for IndexedDialHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

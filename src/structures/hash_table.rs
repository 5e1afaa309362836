//! Fixed-capacity hash table with three collision strategies.
//!
//! Open addressing (linear or quadratic probing) stores one entry per
//! slot and leaves a tombstone behind on removal, so probe chains that
//! ran through a removed slot keep working. Chaining stores a real
//! `Vec` of entries per slot; joining them with `" → "` is only done when
//! rendering.
//!
//! Probing stops after `size` probes. With quadratic probing that bound
//! can be hit while empty slots remain, which reports the table as full.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Change;
use crate::engine::{Highlight, StepLog, StepLogBuilder};
use crate::error::{VizError, VizResult};

/// Slot count on first load.
pub const DEFAULT_SIZE: usize = 10;

/// Sizes offered in the size selector.
pub const SIZE_CHOICES: [usize; 4] = [5, 10, 15, 20];

/// Separator used when a chain is drawn on one line.
pub const CHAIN_SEPARATOR: &str = " → ";

/// String hash functions, computed over UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    /// Sum of code units.
    #[default]
    Simple,
    /// `h * 33 + c` from 5381, wrapping at 32 bits signed.
    Djb2,
    /// 32-bit FNV-1a.
    Fnv,
}

impl HashFunction {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Djb2 => "djb2",
            Self::Fnv => "fnv",
        }
    }

    /// Next function, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Simple => Self::Djb2,
            Self::Djb2 => Self::Fnv,
            Self::Fnv => Self::Simple,
        }
    }

    /// Parse `simple` / `djb2` / `fnv`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "djb2" => Some(Self::Djb2),
            "fnv" => Some(Self::Fnv),
            _ => None,
        }
    }

    /// Home slot of `key` in a table of `size` slots (`size > 0`).
    ///
    /// DJB2 and FNV run on an `f64` accumulator where only the shift and
    /// xor truncate to 32 bits, then take `|hash| % size`.
    #[must_use]
    pub fn slot(self, key: &str, size: usize) -> usize {
        let units = key.encode_utf16();
        match self {
            Self::Simple => {
                let sum: u64 = units.map(u64::from).sum();
                (sum % size as u64) as usize
            }
            Self::Djb2 => {
                let hash = units.fold(5381.0_f64, |h, c| {
                    f64::from(to_int32(h).wrapping_shl(5)) + h + f64::from(c)
                });
                number_mod(hash, size)
            }
            Self::Fnv => {
                let hash = units.fold(2_166_136_261.0_f64, |h, c| {
                    f64::from(to_int32(h) ^ i32::from(c)) * 16_777_619.0
                });
                number_mod(hash, size)
            }
        }
    }
}

/// Truncate toward zero, wrap modulo 2^32 and reinterpret as signed.
fn to_int32(value: f64) -> i32 {
    const TWO_32: f64 = 4_294_967_296.0;
    if !value.is_finite() {
        return 0;
    }
    let wrapped = value.trunc().rem_euclid(TWO_32);
    let signed = if wrapped >= TWO_32 / 2.0 {
        wrapped - TWO_32
    } else {
        wrapped
    };
    signed as i32
}

fn number_mod(hash: f64, size: usize) -> usize {
    (hash.abs() % size as f64) as usize
}

/// Collision resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionStrategy {
    /// `(h + i) % size`.
    #[default]
    Linear,
    /// `(h + i²) % size`.
    Quadratic,
    /// Per-slot list of entries.
    Chaining,
}

impl CollisionStrategy {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Chaining => "chaining",
        }
    }

    /// Next strategy, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Linear => Self::Quadratic,
            Self::Quadratic => Self::Chaining,
            Self::Chaining => Self::Linear,
        }
    }

    /// Parse `linear` / `quadratic` / `chaining`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "quadratic" => Some(Self::Quadratic),
            "chaining" => Some(Self::Chaining),
            _ => None,
        }
    }

    /// Slot visited on probe `i` from home slot `home`.
    #[must_use]
    pub const fn probe(self, home: usize, i: usize, size: usize) -> usize {
        match self {
            Self::Linear | Self::Chaining => (home + i) % size,
            Self::Quadratic => (home + i * i) % size,
        }
    }
}

/// Key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Key.
    pub key: String,
    /// Value.
    pub value: String,
}

/// One open-addressing slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
enum OpenSlot {
    #[default]
    Empty,
    Tombstone,
    Occupied(Entry),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum Buckets {
    Open(Vec<OpenSlot>),
    Chained(Vec<Vec<Entry>>),
}

impl Buckets {
    fn empty(strategy: CollisionStrategy, size: usize) -> Self {
        match strategy {
            CollisionStrategy::Chaining => Self::Chained(vec![Vec::new(); size]),
            CollisionStrategy::Linear | CollisionStrategy::Quadratic => {
                Self::Open(vec![OpenSlot::Empty; size])
            }
        }
    }
}

/// One slot as drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    /// Entries stored in the slot (at most one unless chaining).
    pub entries: Vec<Entry>,
    /// True if the slot held an entry that was removed.
    pub tombstone: bool,
    /// Highlight tag, if any.
    pub highlight: Option<Highlight>,
}

impl SlotView {
    /// Keys joined for display.
    #[must_use]
    pub fn key_label(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.key.as_str())
            .collect::<Vec<_>>()
            .join(CHAIN_SEPARATOR)
    }

    /// Values joined for display.
    #[must_use]
    pub fn value_label(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.value.as_str())
            .collect::<Vec<_>>()
            .join(CHAIN_SEPARATOR)
    }
}

/// Table contents at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashSnapshot {
    /// Strategy in force.
    pub strategy: CollisionStrategy,
    /// Hash function in force.
    pub function: HashFunction,
    /// Slots in index order.
    pub slots: Vec<SlotView>,
}

impl HashSnapshot {
    /// Indices carrying `highlight`.
    #[must_use]
    pub fn indices_with(&self, highlight: Highlight) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.highlight == Some(highlight))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Outcome of a lookup.
#[derive(Debug, Clone)]
pub struct HashSearch {
    /// Probe animation.
    pub log: StepLog<HashSnapshot>,
    /// Slot index and value on a hit.
    pub found: Option<(usize, String)>,
    /// User-facing result.
    pub message: String,
}

/// Hash table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashTable {
    size: usize,
    strategy: CollisionStrategy,
    function: HashFunction,
    buckets: Buckets,
}

impl Default for HashTable {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            strategy: CollisionStrategy::default(),
            function: HashFunction::default(),
            buckets: Buckets::empty(CollisionStrategy::default(), DEFAULT_SIZE),
        }
    }
}

impl HashTable {
    /// Empty table.
    ///
    /// # Errors
    ///
    /// `InvalidNumber` if `size` is zero.
    pub fn new(size: usize, strategy: CollisionStrategy, function: HashFunction) -> VizResult<Self> {
        if size == 0 {
            return Err(VizError::InvalidNumber);
        }
        Ok(Self {
            size,
            strategy,
            function,
            buckets: Buckets::empty(strategy, size),
        })
    }

    /// Slot count.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Strategy in force.
    #[must_use]
    pub const fn strategy(&self) -> CollisionStrategy {
        self.strategy
    }

    /// Hash function in force.
    #[must_use]
    pub const fn function(&self) -> HashFunction {
        self.function
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.buckets {
            Buckets::Open(slots) => slots
                .iter()
                .filter(|s| matches!(s, OpenSlot::Occupied(_)))
                .count(),
            Buckets::Chained(chains) => chains.iter().map(Vec::len).sum(),
        }
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Home slot of `key`.
    #[must_use]
    pub fn home_slot(&self, key: &str) -> usize {
        self.function.slot(key, self.size)
    }

    /// Value stored under `key`, without animation.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match &self.buckets {
            Buckets::Open(slots) => {
                let home = self.home_slot(key);
                for i in 0..self.size {
                    match &slots[self.strategy.probe(home, i, self.size)] {
                        OpenSlot::Empty => return None,
                        OpenSlot::Occupied(e) if e.key == key => return Some(&e.value),
                        _ => {}
                    }
                }
                None
            }
            Buckets::Chained(chains) => chains[self.home_slot(key)]
                .iter()
                .find(|e| e.key == key)
                .map(|e| e.value.as_str()),
        }
    }

    /// Resize, clearing every entry.
    ///
    /// # Errors
    ///
    /// `InvalidNumber` if `size` is zero.
    pub fn set_size(&mut self, size: usize) -> VizResult<String> {
        if size == 0 {
            return Err(VizError::InvalidNumber);
        }
        self.size = size;
        self.buckets = Buckets::empty(self.strategy, size);
        Ok(format!("Hash table size changed to {size}"))
    }

    /// Switch strategy, clearing every entry.
    pub fn set_strategy(&mut self, strategy: CollisionStrategy) {
        self.strategy = strategy;
        self.buckets = Buckets::empty(strategy, self.size);
    }

    /// Switch hash function, clearing every entry.
    pub fn set_hash_function(&mut self, function: HashFunction) {
        self.function = function;
        self.buckets = Buckets::empty(self.strategy, self.size);
    }

    /// Drop every entry, keeping size, strategy and function.
    pub fn clear(&mut self) {
        self.buckets = Buckets::empty(self.strategy, self.size);
    }

    /// Draw the table and tag slots.
    #[must_use]
    pub fn snapshot(&self, highlight: impl Fn(usize) -> Option<Highlight>) -> HashSnapshot {
        let slots = match &self.buckets {
            Buckets::Open(slots) => slots
                .iter()
                .enumerate()
                .map(|(i, slot)| SlotView {
                    entries: match slot {
                        OpenSlot::Occupied(e) => vec![e.clone()],
                        OpenSlot::Empty | OpenSlot::Tombstone => Vec::new(),
                    },
                    tombstone: matches!(slot, OpenSlot::Tombstone),
                    highlight: highlight(i),
                })
                .collect(),
            Buckets::Chained(chains) => chains
                .iter()
                .enumerate()
                .map(|(i, chain)| SlotView {
                    entries: chain.clone(),
                    tombstone: false,
                    highlight: highlight(i),
                })
                .collect(),
        };
        HashSnapshot {
            strategy: self.strategy,
            function: self.function,
            slots,
        }
    }

    /// Snapshot with no highlights.
    #[must_use]
    pub fn plain_snapshot(&self) -> HashSnapshot {
        self.snapshot(|_| None)
    }

    fn mark(&self, steps: &mut StepLogBuilder<HashSnapshot>, index: usize, highlight: Highlight) {
        steps.push(self.snapshot(|i| (i == index).then_some(highlight)));
    }

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// `MissingInput` if either field is empty, `TableFull` if the probe
    /// sequence finds no free slot.
    pub fn insert(&self, key: &str, value: &str) -> VizResult<Change<Self, HashSnapshot>> {
        if key.is_empty() || value.is_empty() {
            return Err(VizError::MissingInput("both key and value"));
        }
        let home = self.home_slot(key);
        let mut steps = StepLog::builder(self.plain_snapshot());
        self.mark(&mut steps, home, Highlight::Collision);

        let mut next = self.clone();
        let entry = Entry {
            key: key.to_string(),
            value: value.to_string(),
        };
        let index = match &mut next.buckets {
            Buckets::Open(slots) => {
                let mut reuse = None;
                let mut target = None;
                for i in 0..self.size {
                    let index = self.strategy.probe(home, i, self.size);
                    match &slots[index] {
                        OpenSlot::Empty => {
                            target = Some(reuse.unwrap_or(index));
                            break;
                        }
                        OpenSlot::Occupied(e) if e.key == key => {
                            target = Some(index);
                            break;
                        }
                        OpenSlot::Tombstone => {
                            reuse.get_or_insert(index);
                        }
                        OpenSlot::Occupied(_) => {
                            if i > 0 {
                                self.mark(&mut steps, index, Highlight::Collision);
                            }
                        }
                    }
                }
                let index = target.or(reuse).ok_or(VizError::TableFull)?;
                slots[index] = OpenSlot::Occupied(entry);
                index
            }
            Buckets::Chained(chains) => {
                let chain = &mut chains[home];
                match chain.iter_mut().find(|e| e.key == key) {
                    Some(existing) => existing.value = entry.value,
                    None => chain.push(entry),
                }
                home
            }
        };
        next.mark(&mut steps, index, Highlight::New);

        debug!(key, index, strategy = self.strategy.name(), "hash insert");
        Ok(Change {
            next,
            log: steps.finish(),
            message: format!("Inserted {key}:{value} at index {index}"),
        })
    }

    /// Probe for `key`. A miss is reported through the message.
    ///
    /// # Errors
    ///
    /// `MissingInput` if `key` is empty.
    pub fn search(&self, key: &str) -> VizResult<HashSearch> {
        if key.is_empty() {
            return Err(VizError::MissingInput("a key to search"));
        }
        let home = self.home_slot(key);
        let mut steps = StepLog::builder(self.plain_snapshot());
        let found = match &self.buckets {
            Buckets::Open(slots) => {
                let mut found = None;
                for i in 0..self.size {
                    let index = self.strategy.probe(home, i, self.size);
                    match &slots[index] {
                        OpenSlot::Empty => break,
                        OpenSlot::Tombstone => self.mark(&mut steps, index, Highlight::Search),
                        OpenSlot::Occupied(e) => {
                            self.mark(&mut steps, index, Highlight::Search);
                            if e.key == key {
                                found = Some((index, e.value.clone()));
                                break;
                            }
                        }
                    }
                }
                found
            }
            Buckets::Chained(chains) => {
                let chain = &chains[home];
                if chain.is_empty() {
                    None
                } else {
                    self.mark(&mut steps, home, Highlight::Search);
                    chain
                        .iter()
                        .find(|e| e.key == key)
                        .map(|e| (home, e.value.clone()))
                }
            }
        };

        let message = match &found {
            Some((index, value)) => {
                self.mark(&mut steps, *index, Highlight::Active);
                format!("Found key {key} with value {value} at index {index}")
            }
            None => VizError::KeyNotFound(key.to_string()).to_string(),
        };
        Ok(HashSearch {
            log: steps.finish(),
            found,
            message,
        })
    }

    /// Remove `key`.
    ///
    /// # Errors
    ///
    /// `MissingInput` if `key` is empty, `KeyNotFound` on a miss.
    pub fn remove(&self, key: &str) -> VizResult<Change<Self, HashSnapshot>> {
        if key.is_empty() {
            return Err(VizError::MissingInput("a key to remove"));
        }
        let home = self.home_slot(key);
        let mut steps = StepLog::builder(self.plain_snapshot());
        let mut next = self.clone();

        let removed_at = match &mut next.buckets {
            Buckets::Open(slots) => {
                let mut hit = None;
                for i in 0..self.size {
                    let index = self.strategy.probe(home, i, self.size);
                    match &slots[index] {
                        OpenSlot::Empty => break,
                        OpenSlot::Occupied(e) if e.key == key => {
                            hit = Some(index);
                            break;
                        }
                        OpenSlot::Occupied(_) | OpenSlot::Tombstone => {
                            self.mark(&mut steps, index, Highlight::Search);
                        }
                    }
                }
                let index = hit.ok_or_else(|| VizError::KeyNotFound(key.to_string()))?;
                slots[index] = OpenSlot::Tombstone;
                index
            }
            Buckets::Chained(chains) => {
                let chain = &mut chains[home];
                let position = chain
                    .iter()
                    .position(|e| e.key == key)
                    .ok_or_else(|| VizError::KeyNotFound(key.to_string()))?;
                chain.remove(position);
                home
            }
        };
        self.mark(&mut steps, removed_at, Highlight::Removed);
        steps.push(next.plain_snapshot());

        debug!(key, index = removed_at, "hash remove");
        Ok(Change {
            next,
            log: steps.finish(),
            message: format!("Removed key {key}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(strategy: CollisionStrategy) -> HashTable {
        HashTable::new(10, strategy, HashFunction::Simple).unwrap()
    }

    #[test]
    fn test_simple_hash() {
        // 'a' = 97, 'b' = 98
        assert_eq!(HashFunction::Simple.slot("a", 10), 7);
        assert_eq!(HashFunction::Simple.slot("ab", 10), 5);
        assert_eq!(HashFunction::Simple.slot("ba", 10), 5);
    }

    #[test]
    fn test_djb2_and_fnv() {
        // 5381 * 33 + 97
        assert_eq!(HashFunction::Djb2.slot("a", 1000), 670);
        assert_eq!(HashFunction::Fnv.slot("a", 1_000_000), 267_092);
        for f in [HashFunction::Simple, HashFunction::Djb2, HashFunction::Fnv] {
            assert!(f.slot("some much longer key to force wrapping", 7) < 7);
        }
    }

    #[test]
    fn test_hash_slots_follow_number_arithmetic() {
        let fnv = [("a", 2), ("ab", 8), ("hello", 5), ("apple", 2), ("banana", 8), ("key1", 8)];
        for (key, slot) in fnv {
            assert_eq!(HashFunction::Fnv.slot(key, 10), slot, "fnv {key}");
        }
        let djb2 = [
            ("some much longer key to force wrapping", 0),
            ("abcdefghij", 6),
            ("user_identifier", 4),
            ("apple", 3),
        ];
        for (key, slot) in djb2 {
            assert_eq!(HashFunction::Djb2.slot(key, 10), slot, "djb2 {key}");
        }
    }

    #[test]
    fn test_to_int32_wraps() {
        assert_eq!(to_int32(2_166_136_261.0), -2_128_831_035);
        assert_eq!(to_int32(-1.5), -1);
        assert_eq!(to_int32(4_294_967_296.0 * 3.0 + 7.0), 7);
        assert_eq!(to_int32(f64::NAN), 0);
    }

    #[test]
    fn test_linear_collision_goes_to_next_slot() {
        let first = table(CollisionStrategy::Linear).insert("ab", "1").unwrap();
        let second = first.next.insert("ba", "2").unwrap();
        assert_eq!(first.message, "Inserted ab:1 at index 5");
        assert_eq!(second.message, "Inserted ba:2 at index 6");
        assert_eq!(second.log.get(1).unwrap().indices_with(Highlight::Collision), vec![5]);
        assert_eq!(second.log.last().indices_with(Highlight::New), vec![6]);
    }

    #[test]
    fn test_quadratic_probe_sequence() {
        let mut t = table(CollisionStrategy::Quadratic);
        for (k, expected) in [("ab", 5), ("ba", 6), ("a\u{0}b", 9)] {
            let change = t.insert(k, "x").unwrap();
            assert!(change.message.ends_with(&format!("index {expected}")));
            t = change.next;
        }
    }

    #[test]
    fn test_same_key_updates() {
        let t = table(CollisionStrategy::Linear).insert("k", "1").unwrap().next;
        let t = t.insert("k", "2").unwrap().next;
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("k"), Some("2"));
    }

    #[test]
    fn test_remove_then_search_reports_missing() {
        let t = table(CollisionStrategy::Linear).insert("ab", "1").unwrap().next;
        let t = t.insert("ba", "2").unwrap().next;
        let removed = t.remove("ab").unwrap();
        assert_eq!(removed.message, "Removed key ab");

        let miss = removed.next.search("ab").unwrap();
        assert!(miss.found.is_none());
        assert_eq!(miss.message, "Key ab not found");

        // the tombstone keeps the chain to "ba" intact
        let hit = removed.next.search("ba").unwrap();
        assert_eq!(hit.found, Some((6, "2".to_string())));
        assert_eq!(hit.message, "Found key ba with value 2 at index 6");
    }

    #[test]
    fn test_tombstone_reused() {
        let t = table(CollisionStrategy::Linear).insert("ab", "1").unwrap().next;
        let t = t.insert("ba", "2").unwrap().next;
        let t = t.remove("ab").unwrap().next;
        let change = t.insert("ab", "3").unwrap();
        assert!(change.message.ends_with("index 5"));
        assert_eq!(change.next.len(), 2);
    }

    #[test]
    fn test_remove_missing() {
        let err = table(CollisionStrategy::Linear).remove("zz").unwrap_err();
        assert_eq!(err.to_string(), "Key zz not found");
    }

    #[test]
    fn test_table_full() {
        let mut t = HashTable::new(2, CollisionStrategy::Linear, HashFunction::Simple).unwrap();
        t = t.insert("a", "1").unwrap().next;
        t = t.insert("b", "2").unwrap().next;
        assert!(matches!(t.insert("c", "3"), Err(VizError::TableFull)));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_chaining_keeps_real_buckets() {
        let t = table(CollisionStrategy::Chaining).insert("ab", "1").unwrap().next;
        let change = t.insert("ba", "2").unwrap();
        assert_eq!(change.message, "Inserted ba:2 at index 5");
        let slot = &change.log.last().slots[5];
        assert_eq!(slot.entries.len(), 2);
        assert_eq!(slot.key_label(), "ab → ba");
        assert_eq!(slot.value_label(), "1 → 2");

        let t = change.next.remove("ab").unwrap().next;
        assert_eq!(t.get("ba"), Some("2"));
        assert_eq!(t.get("ab"), None);
    }

    #[test]
    fn test_missing_input() {
        let t = table(CollisionStrategy::Linear);
        assert_eq!(t.insert("", "1").unwrap_err().to_string(), "Please enter both key and value");
        assert_eq!(t.remove("").unwrap_err().to_string(), "Please enter a key to remove");
        assert_eq!(t.search("").unwrap_err().to_string(), "Please enter a key to search");
    }

    #[test]
    fn test_reconfigure_clears() {
        let mut t = table(CollisionStrategy::Linear).insert("k", "v").unwrap().next;
        assert_eq!(t.set_size(15).unwrap(), "Hash table size changed to 15");
        assert!(t.is_empty());
        assert_eq!(t.plain_snapshot().slots.len(), 15);
        assert!(t.set_size(0).is_err());

        t = t.insert("k", "v").unwrap().next;
        t.set_strategy(CollisionStrategy::Chaining);
        assert!(t.is_empty());
        t = t.insert("k", "v").unwrap().next;
        t.set_hash_function(HashFunction::Fnv);
        assert!(t.is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn strategy() -> impl Strategy<Value = CollisionStrategy> {
        prop_oneof![
            Just(CollisionStrategy::Linear),
            Just(CollisionStrategy::Quadratic),
            Just(CollisionStrategy::Chaining),
        ]
    }

    proptest! {
        /// Every inserted key can be found until it is removed.
        #[test]
        fn prop_insert_search_remove(keys in proptest::collection::hash_set("[a-z]{1,6}", 1..8), strategy in strategy()) {
            let mut t = HashTable::new(20, strategy, HashFunction::Djb2).unwrap();
            let keys: Vec<String> = keys.into_iter().collect();
            for key in &keys {
                match t.insert(key, "v") {
                    Ok(change) => t = change.next,
                    Err(VizError::TableFull) => {}
                    Err(other) => prop_assert!(false, "unexpected {other}"),
                }
            }
            let stored: Vec<&String> = keys.iter().filter(|k| t.get(k).is_some()).collect();
            for key in &stored {
                prop_assert!(t.search(key).unwrap().found.is_some());
            }
            for key in stored {
                t = t.remove(key).unwrap().next;
                prop_assert!(t.search(key).unwrap().found.is_none());
            }
            prop_assert!(t.is_empty());
        }
    }
}

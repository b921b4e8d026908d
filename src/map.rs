//! This module provides an open-addressing hash map with linear probing.
//!
//! Every entry lives in one contiguous array of slots. A key's natural slot is
//! its hash modulo the number of slots, and a key that collides is stored in
//! the first free slot found by scanning forward from there, wrapping around
//! at the end of the array.
//!
//! The map maintains the probe-chain invariant: for every entry, each slot
//! from its natural slot up to and including the slot that holds it is
//! non-empty. Removal therefore writes a tombstone rather than emptying the
//! slot, unless no probe chain can pass through it.

use core::fmt;
use core::hash::Hash;
use core::iter::ExactSizeIterator;
use core::mem;
use core::ops::Index;
use core::ops::IndexMut;
use core::slice;
use rand_core::RngCore;

use crate::error::Error;
use crate::hash::DefaultHash;
use crate::hash::HashFn;

/// An open-addressing hash map with linear probing.
///
/// The hash function is fixed at construction. By default it is a randomly
/// seeded structural hash of `K`, see [`DefaultHash`].

#[derive(Clone)]
pub struct HashMap<K, V, H = DefaultHash> {
  slots: Vec<Slot<K, V>>,
  count: usize,
  tombs: usize,
  hash: H,
}

#[derive(Clone)]
enum Slot<K, V> {
  Empty,
  Occupied(K, V),
  Tombstone,
}

#[derive(Clone, Copy)]
enum Probe {
  Found(usize),
  Vacant(usize),
  Full,
}

const GROWTH_FACTOR: usize = 2;

// Grow before placing a new key once `count / capacity >= 7 / 10`.

const MAX_LOAD: (u128, u128) = (7, 10);

// Purge tombstones once live entries and tombstones together reach 9 / 10 of
// capacity.

const MAX_OCCUPANCY: (u128, u128) = (9, 10);

#[inline(always)]
fn over_load(n: usize, w: usize) -> bool {
  let (p, q) = MAX_LOAD;
  return n as u128 * q >= w as u128 * p;
}

#[inline(always)]
fn over_occupancy(n: usize, w: usize) -> bool {
  let (p, q) = MAX_OCCUPANCY;
  return n as u128 * q >= w as u128 * p;
}

#[inline(always)]
fn next(a: usize, w: usize) -> usize {
  let b = a + 1;
  return if b == w { 0 } else { b };
}

#[inline(always)]
fn prev(a: usize, w: usize) -> usize {
  return if a == 0 { w - 1 } else { a - 1 };
}

// Returns the first empty slot at or after `i`, wrapping around.

fn first_empty<K, V>(t: &[Slot<K, V>], i: usize) -> Option<usize> {
  let w = t.len();
  let mut a = i;

  loop {
    if let Slot::Empty = t[a] { return Some(a); }

    a = next(a, w);

    if a == i { return None; }
  }
}

fn alloc_slots<K, V>(w: usize) -> Result<Vec<Slot<K, V>>, Error> {
  let mut t = Vec::new();
  t.try_reserve_exact(w)?;
  t.resize_with(w, || Slot::Empty);
  return Ok(t);
}

impl<K, V, H> HashMap<K, V, H> {
  const MAX_NUM_SLOTS: usize = isize::MAX as usize / size_of::<Slot<K, V>>();

  fn internal_new(capacity: usize, hash: H) -> Result<Self, Error> {
    if capacity == 0 { return Err(Error::ZeroCapacity); }

    if capacity > Self::MAX_NUM_SLOTS { return Err(Error::CapacityOverflow); }

    let slots = alloc_slots(capacity)?;

    return Ok(Self { slots, count: 0, tombs: 0, hash });
  }

  /// Returns the number of items.

  #[inline(always)]
  #[must_use]
  pub fn len(&self) -> usize {
    return self.count;
  }

  /// Returns whether the map contains zero items.

  #[inline(always)]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    return self.count == 0;
  }

  /// Returns the number of slots. This only changes when the map is rehashed
  /// into a larger slot array.

  #[inline(always)]
  #[must_use]
  pub fn capacity(&self) -> usize {
    return self.slots.len();
  }

  /// Removes every item from the map. Retains the slot array, so the capacity
  /// is unchanged.
  ///
  /// # Panics
  ///
  /// Panics if [`drop`]ping a key or value panics. If that happens, the map
  /// will be in a valid but otherwise unspecified state.

  pub fn clear(&mut self) {
    for x in self.slots.iter_mut() {
      match mem::replace(x, Slot::Empty) {
        Slot::Empty => {}
        Slot::Tombstone => {
          self.tombs = self.tombs - 1;
        }
        Slot::Occupied(k, v) => {
          self.count = self.count - 1;
          drop(k);
          drop(v);
        }
      }
    }
  }

  /// Returns an iterator yielding a reference to each key and its associated
  /// value, in slot order. The iterator item type is `(&'_ K, &'_ V)`.

  #[inline(always)]
  #[must_use]
  pub fn iter(&self) -> Iter<'_, K, V> {
    return Iter { size: self.count, slots: self.slots.iter() };
  }

  /// Returns an iterator yielding a reference to each key and a mutable
  /// reference to its associated value, in slot order. The iterator item type
  /// is `(&'_ K, &'_ mut V)`.

  #[inline(always)]
  #[must_use]
  pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
    return IterMut { size: self.count, slots: self.slots.iter_mut() };
  }

  /// Returns an iterator yielding a reference to each key. The iterator item
  /// type is `&'_ K`.

  #[inline(always)]
  #[must_use]
  pub fn keys(&self) -> Keys<'_, K, V> {
    return Keys { inner: self.iter() };
  }

  /// Returns an iterator yielding a reference to each value. The iterator item
  /// type is `&'_ V`.

  #[inline(always)]
  #[must_use]
  pub fn values(&self) -> Values<'_, K, V> {
    return Values { inner: self.iter() };
  }

  /// Returns an iterator yielding a mutable reference to each value. The
  /// iterator item type is `&'_ mut V`.

  #[inline(always)]
  #[must_use]
  pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
    return ValuesMut { inner: self.iter_mut() };
  }

  fn internal_load_factor(&self) -> f64 {
    return self.count as f64 / self.slots.len() as f64;
  }
}

impl<K: Hash + Eq, V> HashMap<K, V, DefaultHash> {
  /// Creates an empty map with `capacity` slots, seeding the hash function
  /// from a thread-local random number generator.
  ///
  /// Returns [`Error::ZeroCapacity`] if `capacity` is zero.

  pub fn new(capacity: usize) -> Result<Self, Error> {
    return Self::internal_new(capacity, DefaultHash::new());
  }

  /// Creates an empty map with `capacity` slots, seeding the hash function
  /// from the given random number generator.
  ///
  /// Returns [`Error::ZeroCapacity`] if `capacity` is zero.

  pub fn new_seeded(capacity: usize, rng: &mut impl RngCore) -> Result<Self, Error> {
    return Self::internal_new(capacity, DefaultHash::new_seeded(rng));
  }
}

impl<K: Eq, V, H: HashFn<K>> HashMap<K, V, H> {
  /// Creates an empty map with `capacity` slots that places keys using the
  /// given hash function.
  ///
  /// Returns [`Error::ZeroCapacity`] if `capacity` is zero.

  pub fn with_hasher(capacity: usize, hash: H) -> Result<Self, Error> {
    return Self::internal_new(capacity, hash);
  }

  #[inline(always)]
  fn slot_of(&self, key: &K) -> usize {
    let w = self.slots.len();
    let h = self.hash.hash(key);

    return (h % w as u64) as usize;
  }

  // Scans the probe chain of `key`. Tombstones never end the scan, but the
  // first one seen is remembered as the slot a new entry should reuse.

  #[inline(always)]
  fn probe(&self, key: &K) -> Probe {
    let t = &self.slots;
    let w = t.len();
    let i = self.slot_of(key);

    let mut a = i;
    let mut free = None;

    loop {
      match &t[a] {
        Slot::Empty => {
          return Probe::Vacant(free.unwrap_or(a));
        }
        Slot::Tombstone => {
          if free.is_none() { free = Some(a); }
        }
        Slot::Occupied(k, _) => {
          if k == key { return Probe::Found(a); }
        }
      }

      a = next(a, w);

      if a == i { break; }
    }

    return match free {
      None => Probe::Full,
      Some(a) => Probe::Vacant(a),
    };
  }

  /// Returns whether the map contains the given key.

  #[inline(always)]
  #[must_use]
  pub fn contains_key(&self, key: &K) -> bool {
    return matches!(self.probe(key), Probe::Found(_));
  }

  /// Returns a reference to the value associated with the given key, if
  /// present.

  #[inline(always)]
  #[must_use]
  pub fn get(&self, key: &K) -> Option<&V> {
    let Probe::Found(a) = self.probe(key) else { return None; };

    return match &self.slots[a] {
      Slot::Occupied(_, v) => Some(v),
      _ => None,
    };
  }

  /// Returns a mutable reference to the value associated with the given key,
  /// if present.

  #[inline(always)]
  #[must_use]
  pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
    let Probe::Found(a) = self.probe(key) else { return None; };

    return match &mut self.slots[a] {
      Slot::Occupied(_, v) => Some(v),
      _ => None,
    };
  }

  #[inline(never)]
  #[cold]
  fn rehash(&mut self, new_w: usize) -> Result<(), Error> {
    if new_w > Self::MAX_NUM_SLOTS { return Err(Error::CapacityOverflow); }

    // If allocation fails, nothing has been touched yet.

    let new_t = alloc_slots(new_w)?;
    let old_t = mem::replace(&mut self.slots, new_t);
    let old_w = old_t.len();
    let old_d = self.tombs;

    self.tombs = 0;

    for x in old_t {
      if let Slot::Occupied(k, v) = x {
        let i = self.slot_of(&k);

        let Some(a) = first_empty(&self.slots, i) else {
          panic!("hash map has no empty slot while rehashing");
        };

        self.slots[a] = Slot::Occupied(k, v);
      }
    }

    log::debug!(
      "rehashed {} entries from {} to {} slots, dropping {} tombstones",
      self.count,
      old_w,
      new_w,
      old_d,
    );

    return Ok(());
  }

  #[inline(never)]
  #[cold]
  fn grow(&mut self) -> Result<(), Error> {
    let w = self.slots.len();
    let Some(new_w) = w.checked_mul(GROWTH_FACTOR) else {
      return Err(Error::CapacityOverflow);
    };

    return self.rehash(new_w);
  }

  /// Inserts the given key and value into the map. Returns the previous value
  /// associated with given key, if one was present.
  ///
  /// Returns an error if the map had to grow and the larger slot array could
  /// not be allocated. In that case the map is unchanged.

  pub fn try_get_insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
    let p = self.probe(&key);

    if let Probe::Found(a) = p {
      if let Slot::Occupied(_, v) = &mut self.slots[a] {
        return Ok(Some(mem::replace(v, value)));
      }
    }

    let n = self.count;
    let d = self.tombs;
    let w = self.slots.len();

    let a =
      if over_load(n, w) {
        self.grow()?;
        first_empty(&self.slots, self.slot_of(&key))
      } else if d != 0 && over_occupancy(n + d, w) {
        self.rehash(w)?;
        first_empty(&self.slots, self.slot_of(&key))
      } else {
        match p {
          Probe::Vacant(a) => Some(a),
          _ => None,
        }
      };

    let Some(a) = a else {
      panic!("hash map is full without having grown");
    };

    if let Slot::Tombstone = self.slots[a] {
      self.tombs = self.tombs - 1;
    }

    self.slots[a] = Slot::Occupied(key, value);
    self.count = self.count + 1;

    return Ok(None);
  }

  /// Inserts the given key and value into the map.
  ///
  /// Returns an error if the map had to grow and the larger slot array could
  /// not be allocated. In that case the map is unchanged.

  pub fn try_insert(&mut self, key: K, value: V) -> Result<(), Error> {
    let _: Option<V> = self.try_get_insert(key, value)?;
    return Ok(());
  }

  /// Inserts the given key and value into the map. Returns the previous value
  /// associated with given key, if one was present.
  ///
  /// # Panics
  ///
  /// Panics if the map has to grow and allocation fails. The map is left
  /// unchanged.

  #[must_use]
  pub fn get_insert(&mut self, key: K, value: V) -> Option<V> {
    return match self.try_get_insert(key, value) {
      Ok(x) => x,
      Err(e) => panic!("{}", e),
    };
  }

  /// Inserts the given key and value into the map.
  ///
  /// # Panics
  ///
  /// Panics if the map has to grow and allocation fails. The map is left
  /// unchanged.

  pub fn insert(&mut self, key: K, value: V) {
    let _: Option<V> = self.get_insert(key, value);
  }

  /// Removes the given key from the map. Returns the previous value associated
  /// with the given key, if one was present.

  #[must_use]
  pub fn get_remove(&mut self, key: &K) -> Option<V> {
    let Probe::Found(a) = self.probe(key) else { return None; };

    let w = self.slots.len();
    let x = mem::replace(&mut self.slots[a], Slot::Tombstone);

    self.count = self.count - 1;
    self.tombs = self.tombs + 1;

    // A tombstone followed by an empty slot is not inside any probe chain, so
    // it and the tombstones directly before it can become empty.

    let b = next(a, w);

    if b == a || matches!(self.slots[b], Slot::Empty) {
      let mut c = a;

      while let Slot::Tombstone = self.slots[c] {
        self.slots[c] = Slot::Empty;
        self.tombs = self.tombs - 1;
        c = prev(c, w);
      }
    }

    return match x {
      Slot::Occupied(_, v) => Some(v),
      _ => None,
    };
  }

  /// Removes the given key from the map. Removing an absent key does nothing.

  pub fn remove(&mut self, key: &K) {
    let _: Option<V> = self.get_remove(key);
  }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for HashMap<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    return f.debug_map().entries(self.iter()).finish();
  }
}

impl<K: Eq, V, H: HashFn<K>> Index<&K> for HashMap<K, V, H> {
  type Output = V;

  #[inline(always)]
  fn index(&self, key: &K) -> &Self::Output {
    return self.get(key).expect("no entry found for key");
  }
}

// NB: The standard library hash map does *NOT* implement `IndexMut`, because
// `map[k] = ...` looks like it should insert `k`. Here it panics if `k` is
// absent, the same as `Index`.

impl<K: Eq, V, H: HashFn<K>> IndexMut<&K> for HashMap<K, V, H> {
  #[inline(always)]
  fn index_mut(&mut self, key: &K) -> &mut Self::Output {
    return self.get_mut(key).expect("no entry found for key");
  }
}

/// Iterator returned by [`HashMap::iter`].

pub struct Iter<'a, K, V> {
  size: usize,
  slots: slice::Iter<'a, Slot<K, V>>,
}

/// Iterator returned by [`HashMap::iter_mut`].

pub struct IterMut<'a, K, V> {
  size: usize,
  slots: slice::IterMut<'a, Slot<K, V>>,
}

/// Iterator returned by [`HashMap::keys`].

pub struct Keys<'a, K, V> {
  inner: Iter<'a, K, V>,
}

/// Iterator returned by [`HashMap::values`].

pub struct Values<'a, K, V> {
  inner: Iter<'a, K, V>,
}

/// Iterator returned by [`HashMap::values_mut`].

pub struct ValuesMut<'a, K, V> {
  inner: IterMut<'a, K, V>,
}

// NB: Written by hand because `derive(Clone)` would require `K: Clone` and
// `V: Clone`.

impl<'a, K, V> Clone for Iter<'a, K, V> {
  fn clone(&self) -> Self {
    return Iter { size: self.size, slots: self.slots.clone() };
  }
}

impl<'a, K, V> Clone for Keys<'a, K, V> {
  fn clone(&self) -> Self {
    return Keys { inner: self.inner.clone() };
  }
}

impl<'a, K, V> Clone for Values<'a, K, V> {
  fn clone(&self) -> Self {
    return Values { inner: self.inner.clone() };
  }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
  type Item = (&'a K, &'a V);

  #[inline(always)]
  fn next(&mut self) -> Option<Self::Item> {
    if self.size == 0 { return None; }

    for x in self.slots.by_ref() {
      if let Slot::Occupied(k, v) = x {
        self.size = self.size - 1;
        return Some((k, v));
      }
    }

    return None;
  }

  #[inline(always)]
  fn size_hint(&self) -> (usize, Option<usize>) {
    return (self.size, Some(self.size));
  }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
  type Item = (&'a K, &'a mut V);

  #[inline(always)]
  fn next(&mut self) -> Option<Self::Item> {
    if self.size == 0 { return None; }

    for x in self.slots.by_ref() {
      if let Slot::Occupied(k, v) = x {
        self.size = self.size - 1;
        return Some((&*k, v));
      }
    }

    return None;
  }

  #[inline(always)]
  fn size_hint(&self) -> (usize, Option<usize>) {
    return (self.size, Some(self.size));
  }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
  type Item = &'a K;

  #[inline(always)]
  fn next(&mut self) -> Option<Self::Item> {
    return self.inner.next().map(|(k, _)| k);
  }

  #[inline(always)]
  fn size_hint(&self) -> (usize, Option<usize>) {
    return self.inner.size_hint();
  }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
  type Item = &'a V;

  #[inline(always)]
  fn next(&mut self) -> Option<Self::Item> {
    return self.inner.next().map(|(_, v)| v);
  }

  #[inline(always)]
  fn size_hint(&self) -> (usize, Option<usize>) {
    return self.inner.size_hint();
  }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
  type Item = &'a mut V;

  #[inline(always)]
  fn next(&mut self) -> Option<Self::Item> {
    return self.inner.next().map(|(_, v)| v);
  }

  #[inline(always)]
  fn size_hint(&self) -> (usize, Option<usize>) {
    return self.inner.size_hint();
  }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
  #[inline(always)]
  fn len(&self) -> usize {
    return self.size;
  }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {
  #[inline(always)]
  fn len(&self) -> usize {
    return self.size;
  }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {
  #[inline(always)]
  fn len(&self) -> usize {
    return self.inner.len();
  }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {
  #[inline(always)]
  fn len(&self) -> usize {
    return self.inner.len();
  }
}

impl<'a, K, V> ExactSizeIterator for ValuesMut<'a, K, V> {
  #[inline(always)]
  fn len(&self) -> usize {
    return self.inner.len();
  }
}

impl<'a, K, V, H> IntoIterator for &'a HashMap<K, V, H> {
  type Item = (&'a K, &'a V);
  type IntoIter = Iter<'a, K, V>;

  fn into_iter(self) -> Self::IntoIter {
    return self.iter();
  }
}

pub mod internal {
  //! Unstable API exposing implementation details for benchmarks and tests.

  #![allow(missing_docs)]

  use super::HashMap;

  #[must_use]
  pub fn num_slots<K, V, H>(t: &HashMap<K, V, H>) -> usize {
    return t.capacity();
  }

  #[must_use]
  pub fn num_tombstones<K, V, H>(t: &HashMap<K, V, H>) -> usize {
    return t.tombs;
  }

  #[must_use]
  pub fn load_factor<K, V, H>(t: &HashMap<K, V, H>) -> f64 {
    return t.internal_load_factor();
  }
}

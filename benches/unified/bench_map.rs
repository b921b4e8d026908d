use std::hint::black_box;

use crate::util::INITIAL_CAPACITY;
use crate::util::Map;

// Each round fills a fresh map with `SIZE` keys. At a maximum load of 7 / 10
// that takes a 16-slot map through six doublings, to 1024 slots.

const SIZE: usize = 500;
const ROUNDS: usize = 1_000;

const _: () = assert!(SIZE * 10 > INITIAL_CAPACITY * 32 * 7);
const _: () = assert!(SIZE * 10 < INITIAL_CAPACITY * 64 * 7);

fn make_key(x: usize) -> u64 {
  return (x as u64).rotate_left(16) | 1;
}

#[inline(never)]
fn fill<T: Map>() {
  for _ in 0 .. ROUNDS {
    let mut t = T::new();
    for x in 0 .. SIZE { t.insert(make_key(x), x as u64); }
    black_box(&t);
  }
}

// The map grows during the first round only. Later rounds reuse slots left
// behind as tombstones or empties by the removals.

#[inline(never)]
fn churn<T: Map>() {
  let mut t = T::new();
  for _ in 0 .. ROUNDS {
    for x in 0 .. SIZE { t.insert(make_key(x), x as u64); }
    for x in 0 .. SIZE { t.remove(make_key(x)); }
  }
  black_box(&t);
}

// Half of the lookups miss, and the misses run past tombstones left by the
// removals.

#[inline(never)]
fn lookup_after_remove<T: Map>() {
  let mut t = T::new();
  for x in 0 .. 10 * SIZE { t.insert(make_key(x), x as u64); }
  for x in (0 .. 10 * SIZE).step_by(2) { t.remove(make_key(x)); }
  for _ in 0 .. ROUNDS / 5 {
    for x in 0 .. 10 * SIZE { black_box(t.contains(make_key(x))); }
  }
}

#[divan::bench]
fn fill_clementine() {
  fill::<clementine::map::HashMap<u64, u64>>();
}

#[divan::bench]
fn fill_foldhash() {
  fill::<foldhash::HashMap<u64, u64>>();
}

#[divan::bench]
fn churn_clementine() {
  churn::<clementine::map::HashMap<u64, u64>>();
}

#[divan::bench]
fn churn_foldhash() {
  churn::<foldhash::HashMap<u64, u64>>();
}

#[divan::bench]
fn lookup_after_remove_clementine() {
  lookup_after_remove::<clementine::map::HashMap<u64, u64>>();
}

#[divan::bench]
fn lookup_after_remove_foldhash() {
  lookup_after_remove::<foldhash::HashMap<u64, u64>>();
}

// Both maps start this small, so filling them measures rehashing as well.

pub(crate) const INITIAL_CAPACITY: usize = 16;

pub(crate) trait Map {
  fn new() -> Self;

  fn insert(&mut self, _: u64, _: u64);

  fn remove(&mut self, _: u64);

  fn contains(&self, _: u64) -> bool;
}

impl Map for clementine::map::HashMap<u64, u64> {
  #[inline(always)]
  fn new() -> Self { clementine::map::HashMap::new(INITIAL_CAPACITY).unwrap() }

  #[inline(always)]
  fn insert(&mut self, k: u64, v: u64) { self.insert(k, v); }

  #[inline(always)]
  fn remove(&mut self, k: u64) { self.remove(&k); }

  #[inline(always)]
  fn contains(&self, k: u64) -> bool { self.contains_key(&k) }
}

impl Map for foldhash::HashMap<u64, u64> {
  #[inline(always)]
  fn new() -> Self { <foldhash::HashMap<_, _> as foldhash::HashMapExt>::with_capacity(INITIAL_CAPACITY) }

  #[inline(always)]
  fn insert(&mut self, k: u64, v: u64) { let _: Option<_> = self.insert(k, v); }

  #[inline(always)]
  fn remove(&mut self, k: u64) { let _: Option<_> = self.remove(&k); }

  #[inline(always)]
  fn contains(&self, k: u64) -> bool { self.contains_key(&k) }
}

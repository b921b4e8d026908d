//! Hash functions used to pick a key's natural slot.

use core::hash::BuildHasher;
use core::hash::Hash;
use foldhash::fast::FixedState;
use rand_core::RngCore;

/// A hash function from keys to 64-bit integers.
///
/// Equal keys must hash to equal integers. The map reduces the result modulo
/// its capacity, so the output need not be in any particular range, but a
/// poorly distributed function will produce long probe chains.
///
/// Every closure `Fn(&K) -> u64` is a `HashFn<K>`.

pub trait HashFn<K: ?Sized> {
  fn hash(&self, key: &K) -> u64;
}

impl<K: ?Sized, F: Fn(&K) -> u64> HashFn<K> for F {
  #[inline(always)]
  fn hash(&self, key: &K) -> u64 {
    return self(key);
  }
}

/// The hash function used when none is supplied. It hashes the structure of
/// any `K: Hash` with a seeded `foldhash`.

#[derive(Clone)]
pub struct DefaultHash {
  state: FixedState,
}

impl DefaultHash {
  /// Creates a hash function seeded from a thread-local random number
  /// generator.

  #[must_use]
  pub fn new() -> Self {
    return Self::with_seed(dandelion::thread_local::u64());
  }

  /// Creates a hash function seeded from the given random number generator.

  #[must_use]
  pub fn new_seeded(rng: &mut impl RngCore) -> Self {
    return Self::with_seed(rng.next_u64());
  }

  /// Creates a hash function with a fixed seed. Two instances with the same
  /// seed always agree.

  #[must_use]
  pub fn with_seed(seed: u64) -> Self {
    return Self { state: FixedState::with_seed(seed) };
  }
}

impl Default for DefaultHash {
  fn default() -> Self {
    return Self::new();
  }
}

impl<K: Hash + ?Sized> HashFn<K> for DefaultHash {
  #[inline(always)]
  fn hash(&self, key: &K) -> u64 {
    return self.state.hash_one(key);
  }
}

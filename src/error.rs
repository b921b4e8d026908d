//! Errors reported by map construction and fallible insertion.

use std::collections::TryReserveError;

/// The error type for [`HashMap`](crate::map::HashMap) operations that can
/// fail.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// The map was constructed with zero slots.
  #[error("capacity must be positive")]
  ZeroCapacity,

  /// Growing the map would overflow the maximum slot count.
  #[error("capacity overflow")]
  CapacityOverflow,

  /// The allocator could not provide a new slot array.
  #[error("memory allocation failed: {0}")]
  AllocFailed(#[from] TryReserveError),
}

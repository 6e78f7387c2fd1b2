// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Hash types and functions for message storage.
//!
//! Value hashes are xxHash3 digests; field hashes are folded together with an
//! order-sensitive combiner so that field order is part of the result.

use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash64(pub u64);

impl From<u64> for Hash64 {
	fn from(value: u64) -> Self {
		Hash64(value)
	}
}

impl From<Hash64> for u64 {
	fn from(hash: Hash64) -> Self {
		hash.0
	}
}

impl Hash for Hash64 {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_u64(self.0)
	}
}

/// Compute xxHash3 64-bit hash of data.
#[inline]
pub fn xxh3_64(data: &[u8]) -> Hash64 {
	Hash64(xxh3::xxh3_64(data))
}

/// Fold `value` into the running hash `seed`.
#[inline]
pub fn combine(seed: Hash64, value: Hash64) -> Hash64 {
	Hash64(xxh3::xxh3_64_with_seed(&value.0.to_le_bytes(), seed.0))
}

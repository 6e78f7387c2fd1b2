// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

/// A reference-counted handle that can live in a reference-sized slot.
///
/// `Clone` is the shallow operation: it aliases the referent and bumps the
/// strong count. `deep_clone` builds an independent copy of the referent, so
/// later mutation through either handle is not observed by the other.
pub trait Shared: Clone {
	/// Gives up this handle's strong count as a raw pointer.
	fn into_raw(self) -> *const ();

	/// Reclaims a strong count previously released with [`Shared::into_raw`].
	///
	/// # Safety
	/// `ptr` must come from `into_raw` on the same handle type and its strong
	/// count must not have been reclaimed already.
	unsafe fn from_raw(ptr: *const ()) -> Self;

	/// Address of the referent, stable for as long as any handle is alive.
	fn as_ptr(&self) -> *const ();

	fn deep_clone(&self) -> Self;

	fn ptr_eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.as_ptr(), other.as_ptr())
	}
}

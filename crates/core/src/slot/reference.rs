// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Reference cells. A cell holds either null or one strong count of a
//! [`Shared`] handle, released with [`Shared::into_raw`].

use std::{mem::ManuallyDrop, ptr};

use protoslot_type::Shared;

#[inline]
pub(crate) unsafe fn read_ptr(cell: *const u8) -> *const () {
	unsafe { ptr::read_unaligned(cell as *const *const ()) }
}

#[inline]
unsafe fn write_ptr(cell: *mut u8, raw: *const ()) {
	unsafe { ptr::write_unaligned(cell as *mut *const (), raw) }
}

/// Runs `f` on the handle stored in `cell` without touching its count.
///
/// # Safety
/// `cell` must be a reference cell holding null or a `T`.
pub(crate) unsafe fn with<T: Shared, R>(cell: *const u8, f: impl FnOnce(Option<&T>) -> R) -> R {
	let raw = unsafe { read_ptr(cell) };
	if raw.is_null() {
		return f(None);
	}
	let handle = ManuallyDrop::new(unsafe { T::from_raw(raw) });
	f(Some(&*handle))
}

/// A new strong handle to the referent of `cell`.
///
/// # Safety
/// Same as [`with`].
pub(crate) unsafe fn load<T: Shared>(cell: *const u8) -> Option<T> {
	unsafe { with::<T, _>(cell, |handle| handle.cloned()) }
}

/// Moves the handle out of `cell`, leaving null behind.
///
/// # Safety
/// Same as [`with`].
pub(crate) unsafe fn take<T: Shared>(cell: *mut u8) -> Option<T> {
	let raw = unsafe { read_ptr(cell) };
	if raw.is_null() {
		return None;
	}
	unsafe {
		write_ptr(cell, ptr::null());
		Some(T::from_raw(raw))
	}
}

/// Stores `handle` in an empty cell.
///
/// # Safety
/// `cell` must be a zeroed or taken reference cell; anything it held leaks.
pub(crate) unsafe fn store<T: Shared>(cell: *mut u8, handle: Option<T>) {
	let raw = handle.map_or(ptr::null(), Shared::into_raw);
	unsafe { write_ptr(cell, raw) }
}

/// Stores `handle`, dropping whatever `cell` held before.
///
/// # Safety
/// Same as [`with`].
pub(crate) unsafe fn replace<T: Shared>(cell: *mut u8, handle: Option<T>) {
	unsafe {
		let old = take::<T>(cell);
		store(cell, handle);
		drop(old);
	}
}

#[cfg(test)]
pub mod tests {
	use protoslot_type::{REFERENCE_SIZE, Shared, Text};

	use super::*;

	#[test]
	fn test_store_load_take() {
		let mut cell = [0u8; REFERENCE_SIZE];
		let text = Text::new("a");

		unsafe {
			assert!(load::<Text>(cell.as_ptr()).is_none());

			store(cell.as_mut_ptr(), Some(text.clone()));
			let loaded = load::<Text>(cell.as_ptr()).unwrap();
			assert!(loaded.ptr_eq(&text));

			let taken = take::<Text>(cell.as_mut_ptr()).unwrap();
			assert!(taken.ptr_eq(&text));
			assert!(read_ptr(cell.as_ptr()).is_null());
		}
	}

	#[test]
	fn test_replace_releases_old() {
		let mut cell = [0u8; REFERENCE_SIZE];
		let old = Text::new("old");
		let alias = old.clone();

		unsafe {
			store(cell.as_mut_ptr(), Some(old));
			replace(cell.as_mut_ptr(), Some(Text::new("new")));
			assert_eq!(load::<Text>(cell.as_ptr()).unwrap(), "new");
			assert_eq!(alias, "old");
			replace::<Text>(cell.as_mut_ptr(), None);
		}
	}

	#[test]
	fn test_with_does_not_change_count() {
		let mut cell = [0u8; REFERENCE_SIZE];
		let text = Text::new("a");
		unsafe {
			store(cell.as_mut_ptr(), Some(text.clone()));
			for _ in 0..3 {
				with::<Text, _>(cell.as_ptr(), |handle| assert_eq!(handle.unwrap(), &text));
			}
			drop(take::<Text>(cell.as_mut_ptr()));
		}
		text.push_str("b");
		assert_eq!(text, "ab");
	}
}

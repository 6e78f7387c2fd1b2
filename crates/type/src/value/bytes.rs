// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	cell::RefCell,
	fmt::{Debug, Display, Formatter},
	hash::{Hash, Hasher},
	rc::Rc,
};

use crate::Shared;

/// A shared, mutable byte sequence.
#[derive(Clone, Default)]
pub struct Bytes(Rc<RefCell<Vec<u8>>>);

impl Bytes {
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(Rc::new(RefCell::new(bytes.into())))
	}

	pub fn empty() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.0.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.borrow().is_empty()
	}

	pub fn with<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
		f(self.0.borrow().as_slice())
	}

	pub fn extend_from_slice(&self, bytes: &[u8]) {
		self.0.borrow_mut().extend_from_slice(bytes);
	}

	pub fn set(&self, bytes: impl Into<Vec<u8>>) {
		*self.0.borrow_mut() = bytes.into();
	}

	pub fn to_vec(&self) -> Vec<u8> {
		self.0.borrow().clone()
	}
}

impl Shared for Bytes {
	fn into_raw(self) -> *const () {
		Rc::into_raw(self.0) as *const ()
	}

	unsafe fn from_raw(ptr: *const ()) -> Self {
		Self(unsafe { Rc::from_raw(ptr as *const RefCell<Vec<u8>>) })
	}

	fn as_ptr(&self) -> *const () {
		Rc::as_ptr(&self.0) as *const ()
	}

	fn deep_clone(&self) -> Self {
		Self::new(self.to_vec())
	}
}

impl PartialEq for Bytes {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
	}
}

impl Eq for Bytes {}

impl PartialEq<[u8]> for Bytes {
	fn eq(&self, other: &[u8]) -> bool {
		self.0.borrow().as_slice() == other
	}
}

impl Hash for Bytes {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.borrow().hash(state)
	}
}

impl From<Vec<u8>> for Bytes {
	fn from(value: Vec<u8>) -> Self {
		Self::new(value)
	}
}

impl From<&[u8]> for Bytes {
	fn from(value: &[u8]) -> Self {
		Self::new(value)
	}
}

impl Display for Bytes {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "b\"{}\"", self.0.borrow().escape_ascii())
	}
}

impl Debug for Bytes {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(self, f)
	}
}

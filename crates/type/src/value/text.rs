// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	cell::RefCell,
	fmt::{Debug, Display, Formatter},
	hash::{Hash, Hasher},
	rc::Rc,
};

use crate::Shared;

/// A shared, mutable UTF-8 string.
///
/// Cloning a `Text` aliases the same string; use [`Shared::deep_clone`] for an
/// independent copy.
#[derive(Clone, Default)]
pub struct Text(Rc<RefCell<String>>);

impl Text {
	pub fn new(value: impl Into<String>) -> Self {
		Self(Rc::new(RefCell::new(value.into())))
	}

	pub fn len(&self) -> usize {
		self.0.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.borrow().is_empty()
	}

	pub fn with<R>(&self, f: impl FnOnce(&str) -> R) -> R {
		f(self.0.borrow().as_str())
	}

	pub fn push_str(&self, value: &str) {
		self.0.borrow_mut().push_str(value);
	}

	pub fn set(&self, value: impl Into<String>) {
		*self.0.borrow_mut() = value.into();
	}

	pub fn to_owned_string(&self) -> String {
		self.0.borrow().clone()
	}
}

impl Shared for Text {
	fn into_raw(self) -> *const () {
		Rc::into_raw(self.0) as *const ()
	}

	unsafe fn from_raw(ptr: *const ()) -> Self {
		Self(unsafe { Rc::from_raw(ptr as *const RefCell<String>) })
	}

	fn as_ptr(&self) -> *const () {
		Rc::as_ptr(&self.0) as *const ()
	}

	fn deep_clone(&self) -> Self {
		Self::new(self.to_owned_string())
	}
}

impl PartialEq for Text {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
	}
}

impl Eq for Text {}

impl PartialEq<str> for Text {
	fn eq(&self, other: &str) -> bool {
		self.0.borrow().as_str() == other
	}
}

impl PartialEq<&str> for Text {
	fn eq(&self, other: &&str) -> bool {
		self.0.borrow().as_str() == *other
	}
}

impl Hash for Text {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.borrow().hash(state)
	}
}

impl From<&str> for Text {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for Text {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl Display for Text {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.0.borrow().as_str())
	}
}

impl Debug for Text {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Debug::fmt(self.0.borrow().as_str(), f)
	}
}

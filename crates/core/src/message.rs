// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cell::RefCell,
	fmt::{Debug, Display, Formatter},
	rc::Rc,
};

use protoslot_type::{Error, Hash64, Result, Shared};

use crate::{
	MessageStorage, Value,
	descriptor::{FieldDescriptor, MessageType},
	trace::Tracer,
};

struct MessageCell {
	schema: MessageType,
	storage: RefCell<MessageStorage>,
}

/// A message instance. Cloning the handle aliases the message; [`Message::dup`]
/// makes a shallow copy and [`Shared::deep_clone`] a deep one.
///
/// Messages may reference each other in cycles, which keep every message on
/// the cycle alive. Equality, hashing and formatting do not terminate on
/// cyclic graphs; [`is_cyclic`](crate::is_cyclic) detects them.
#[derive(Clone)]
pub struct Message(Rc<MessageCell>);

impl Message {
	pub fn new(schema: MessageType) -> Self {
		let storage = MessageStorage::new(schema.clone());
		Self::from_storage(schema, storage)
	}

	fn from_storage(schema: MessageType, storage: MessageStorage) -> Self {
		Self(Rc::new(MessageCell {
			schema,
			storage: RefCell::new(storage),
		}))
	}

	pub fn message_type(&self) -> &MessageType {
		&self.0.schema
	}

	fn field(&self, name: &str) -> Result<&FieldDescriptor> {
		self.0.schema.find_field(name).ok_or_else(|| Error::UnknownField {
			message: self.0.schema.name().to_string(),
			field: name.to_string(),
		})
	}

	pub fn get(&self, name: &str) -> Result<Value> {
		self.get_field(self.field(name)?)
	}

	pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
		self.set_field(self.field(name)?, value)
	}

	/// Resets the field to its zero value; the only way to unset a message field.
	pub fn clear(&self, name: &str) -> Result<()> {
		self.clear_field(self.field(name)?)
	}

	pub fn get_field(&self, field: &FieldDescriptor) -> Result<Value> {
		self.0.storage.borrow().get_field(field)
	}

	pub fn set_field(&self, field: &FieldDescriptor, value: impl Into<Value>) -> Result<()> {
		let value = value.into();
		self.0.storage.borrow_mut().set_field(field, &value)
	}

	pub fn clear_field(&self, field: &FieldDescriptor) -> Result<()> {
		self.0.storage.borrow_mut().clear_field(field)
	}

	/// A new message whose reference fields alias this one's.
	pub fn dup(&self) -> Self {
		let storage = self.0.storage.borrow().duplicate();
		Self::from_storage(self.0.schema.clone(), storage)
	}

	pub fn hash64(&self) -> Hash64 {
		self.0.storage.borrow().hash64()
	}

	/// Reports every reference this message holds directly.
	pub fn trace(&self, tracer: &mut dyn Tracer) {
		self.0.storage.borrow().mark(tracer)
	}

	pub fn debug_string(&self) -> String {
		self.0.storage.borrow().debug_string()
	}
}

impl Shared for Message {
	fn into_raw(self) -> *const () {
		Rc::into_raw(self.0) as *const ()
	}

	unsafe fn from_raw(ptr: *const ()) -> Self {
		Self(unsafe { Rc::from_raw(ptr as *const MessageCell) })
	}

	fn as_ptr(&self) -> *const () {
		Rc::as_ptr(&self.0) as *const ()
	}

	fn deep_clone(&self) -> Self {
		let storage = self.0.storage.borrow().deep_clone();
		Self::from_storage(self.0.schema.clone(), storage)
	}
}

impl PartialEq for Message {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other) || self.0.storage.borrow().equal(&other.0.storage.borrow())
	}
}

impl Display for Message {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "<{}: {}>", self.0.schema.name(), self.debug_string())
	}
}

impl Debug for Message {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(self, f)
	}
}

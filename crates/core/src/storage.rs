// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error},
	fmt::Write,
	ptr::NonNull,
};

use protoslot_type::{Error, Hash64, Result, Shared, Type, combine};
use tracing::{instrument, trace};

use crate::{
	RepeatedField, Value,
	descriptor::{FieldDescriptor, MessageType},
	layout::slot_size,
	slot::{self, reference},
	trace::{Reference, Tracer},
};

/// Zeroed, aligned bytes sized by a message layout.
struct Buffer {
	ptr: NonNull<u8>,
	layout: Layout,
}

impl Buffer {
	fn zeroed(size: usize, alignment: usize) -> Self {
		let layout = Layout::from_size_align(size, alignment).expect("message layout alignment is a power of two");
		if size == 0 {
			return Self {
				ptr: NonNull::dangling(),
				layout,
			};
		}
		// Safe because the layout has a non-zero size
		let ptr = unsafe { alloc_zeroed(layout) };
		match NonNull::new(ptr) {
			Some(ptr) => Self {
				ptr,
				layout,
			},
			None => handle_alloc_error(layout),
		}
	}

	fn cell(&self, offset: usize, size: usize) -> *const u8 {
		debug_assert!(offset + size <= self.layout.size());
		unsafe { self.ptr.as_ptr().add(offset) }
	}

	fn cell_mut(&mut self, offset: usize, size: usize) -> *mut u8 {
		debug_assert!(offset + size <= self.layout.size());
		unsafe { self.ptr.as_ptr().add(offset) }
	}
}

impl Drop for Buffer {
	fn drop(&mut self) {
		if self.layout.size() != 0 {
			unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
		}
	}
}

/// The field storage of one message instance: a buffer laid out by the
/// message type's [`MessageLayout`](crate::MessageLayout).
///
/// Every access goes through a [`FieldDescriptor`] of the same message type,
/// which supplies the cell's offset and declared type.
pub struct MessageStorage {
	schema: MessageType,
	buffer: Buffer,
}

impl MessageStorage {
	/// Allocates and initializes storage with every field at its zero value.
	pub fn new(schema: MessageType) -> Self {
		let mut storage = Self::allocate(schema);
		storage.init();
		storage
	}

	fn allocate(schema: MessageType) -> Self {
		let layout = schema.layout();
		let buffer = Buffer::zeroed(layout.size(), layout.alignment());
		trace!(message = schema.name(), size = layout.size(), "allocated message storage");
		Self {
			schema,
			buffer,
		}
	}

	fn init(&mut self) {
		let schema = self.schema.clone();
		for field in schema.fields() {
			let cell = self.cell_mut(field);
			if field.is_repeated() {
				let repeated = RepeatedField::for_field(&schema, field);
				unsafe { reference::store(cell, Some(repeated)) };
			} else {
				unsafe { slot::init(field.r#type(), cell) };
			}
		}
	}

	pub fn schema(&self) -> &MessageType {
		&self.schema
	}

	fn cell(&self, field: &FieldDescriptor) -> *const u8 {
		self.buffer.cell(self.schema.layout().offset(field.index()), slot_size(field))
	}

	fn cell_mut(&mut self, field: &FieldDescriptor) -> *mut u8 {
		let offset = self.schema.layout().offset(field.index());
		self.buffer.cell_mut(offset, slot_size(field))
	}

	fn check_field(&self, field: &FieldDescriptor) -> Result<()> {
		if self.schema.owns(field) {
			Ok(())
		} else {
			Err(Error::UnknownField {
				message: self.schema.name().to_string(),
				field: field.name().to_string(),
			})
		}
	}

	/// Repeated fields return their container, singular fields their value.
	pub fn get_field(&self, field: &FieldDescriptor) -> Result<Value> {
		self.check_field(field)?;
		Ok(self.read(field))
	}

	fn read(&self, field: &FieldDescriptor) -> Value {
		let cell = self.cell(field);
		if field.is_repeated() {
			match unsafe { reference::load::<RepeatedField>(cell) } {
				Some(repeated) => Value::Repeated(repeated),
				None => unreachable!("repeated field {} without container", field.name()),
			}
		} else {
			let handle = self.schema.type_handle(field);
			unsafe { slot::get(field.r#type(), handle.as_ref(), cell) }
		}
	}

	/// Assigning a repeated field replaces its container; the new container
	/// must have the field's element type and nested type.
	pub fn set_field(&mut self, field: &FieldDescriptor, value: &Value) -> Result<()> {
		self.check_field(field)?;
		let handle = self.schema.type_handle(field);
		let cell = self.cell_mut(field);

		if !field.is_repeated() {
			return unsafe { slot::set(field.r#type(), handle.as_ref(), cell, value) };
		}

		match value {
			Value::Repeated(repeated)
				if repeated.element_type() == field.r#type() && repeated.type_handle() == handle =>
			{
				unsafe { reference::replace(cell, Some(repeated.clone())) };
				Ok(())
			}
			Value::Repeated(repeated) => Err(Error::type_mismatch(
				repeated_name(field.r#type(), handle.as_ref().map(|h| h.name())),
				repeated_name(repeated.element_type(), repeated.type_handle().as_ref().map(|h| h.name())),
			)),
			_ => Err(Error::type_mismatch(
				repeated_name(field.r#type(), handle.as_ref().map(|h| h.name())),
				value.kind(),
			)),
		}
	}

	/// Resets a field to its zero value. Message fields become unset and
	/// repeated fields get a new empty container.
	pub fn clear_field(&mut self, field: &FieldDescriptor) -> Result<()> {
		self.check_field(field)?;
		let cell = self.cell_mut(field);
		if field.is_repeated() {
			let repeated = RepeatedField::for_field(&self.schema, field);
			unsafe { reference::replace(cell, Some(repeated)) };
		} else {
			unsafe {
				slot::release(field.r#type(), cell);
				slot::init(field.r#type(), cell);
			}
		}
		Ok(())
	}

	/// Reports every reference held directly by this storage: strings, bytes,
	/// set messages and repeated containers.
	pub fn mark(&self, tracer: &mut dyn Tracer) {
		for field in self.schema.fields() {
			let cell = self.cell(field);
			if field.is_repeated() {
				unsafe {
					reference::with::<RepeatedField, _>(cell, |repeated| {
						if let Some(repeated) = repeated {
							tracer.visit(Reference::Repeated(repeated));
						}
					})
				};
			} else {
				unsafe { slot::mark(field.r#type(), cell, tracer) };
			}
		}
	}

	/// Shallow copy. Reference fields alias the source's referents; repeated
	/// fields get a new container holding the same elements.
	#[instrument(name = "storage::duplicate", level = "trace", skip(self), fields(message = self.schema.name()))]
	pub fn duplicate(&self) -> Self {
		let mut to = Self::allocate(self.schema.clone());
		for field in self.schema.fields() {
			let from = self.cell(field);
			let cell = to.cell_mut(field);
			if field.is_repeated() {
				let repeated = unsafe { reference::with::<RepeatedField, _>(from, |r| r.map(RepeatedField::dup)) };
				unsafe { reference::store(cell, repeated) };
			} else {
				unsafe { slot::duplicate(field.r#type(), cell, from) };
			}
		}
		to
	}

	/// Deep copy. Nothing reachable from the result is shared with the source.
	#[instrument(name = "storage::deep_clone", level = "trace", skip(self), fields(message = self.schema.name()))]
	pub fn deep_clone(&self) -> Self {
		let mut to = Self::allocate(self.schema.clone());
		for field in self.schema.fields() {
			let from = self.cell(field);
			let cell = to.cell_mut(field);
			if field.is_repeated() {
				let repeated =
					unsafe { reference::with::<RepeatedField, _>(from, |r| r.map(RepeatedField::deep_clone)) };
				unsafe { reference::store(cell, repeated) };
			} else {
				unsafe { slot::clone(field.r#type(), cell, from) };
			}
		}
		to
	}

	/// Field-by-field equality, stopping at the first difference.
	pub fn equal(&self, other: &Self) -> bool {
		if self.schema != other.schema {
			return false;
		}
		self.schema.fields().iter().all(|field| {
			let (left, right) = (self.cell(field), other.cell(field));
			if field.is_repeated() {
				unsafe {
					reference::with(left, |l: Option<&RepeatedField>| {
						reference::with(right, |r: Option<&RepeatedField>| l == r)
					})
				}
			} else {
				unsafe { slot::equal(field.r#type(), left, right) }
			}
		})
	}

	/// Folds the hash of every field value in declaration order.
	pub fn hash64(&self) -> Hash64 {
		self.schema.fields().iter().fold(Hash64::default(), |hash, field| combine(hash, self.read(field).hash64()))
	}

	/// `name: value, name: value` in declaration order.
	pub fn debug_string(&self) -> String {
		let mut result = String::new();
		for (index, field) in self.schema.fields().iter().enumerate() {
			if index > 0 {
				result.push_str(", ");
			}
			let _ = write!(result, "{}: {}", field.name(), self.read(field));
		}
		result
	}
}

fn repeated_name(ty: Type, type_name: Option<&str>) -> String {
	match type_name {
		Some(name) => format!("repeated {name}"),
		None => format!("repeated {ty}"),
	}
}

impl PartialEq for MessageStorage {
	fn eq(&self, other: &Self) -> bool {
		self.equal(other)
	}
}

impl Drop for MessageStorage {
	fn drop(&mut self) {
		let schema = self.schema.clone();
		for field in schema.fields() {
			let cell = self.cell_mut(field);
			if field.is_repeated() {
				drop(unsafe { reference::take::<RepeatedField>(cell) });
			} else {
				unsafe { slot::release(field.r#type(), cell) };
			}
		}
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cell::RefCell,
	fmt::{Debug, Display, Formatter},
	mem,
	rc::Rc,
};

use protoslot_type::{Error, GetType, Hash64, RangeViolation, Result, Shared, Type, combine, xxh3_64};

use crate::{
	Value,
	descriptor::{EnumType, FieldDescriptor, MessageType, TypeHandle},
	slot,
	trace::Tracer,
};

struct Elements {
	r#type: Type,
	handle: Option<TypeHandle>,
	/// `len` cells of `r#type.size()` bytes each
	cells: Vec<u8>,
	len: usize,
}

impl Elements {
	fn new(r#type: Type, handle: Option<TypeHandle>) -> Self {
		Self {
			r#type,
			handle,
			cells: Vec::new(),
			len: 0,
		}
	}

	fn stride(&self) -> usize {
		self.r#type.size()
	}

	fn cell(&self, index: usize) -> *const u8 {
		debug_assert!(index < self.len);
		unsafe { self.cells.as_ptr().add(index * self.stride()) }
	}

	fn cell_mut(&mut self, index: usize) -> *mut u8 {
		debug_assert!(index < self.len);
		let stride = self.stride();
		unsafe { self.cells.as_mut_ptr().add(index * stride) }
	}

	fn check_index(&self, index: usize) -> Result<()> {
		if index < self.len {
			Ok(())
		} else {
			Err(RangeViolation::IndexOutOfBounds {
				index,
				len: self.len,
			}
			.into())
		}
	}

	fn get(&self, index: usize) -> Value {
		unsafe { slot::get(self.r#type, self.handle.as_ref(), self.cell(index)) }
	}

	/// A container of the same element type, each cell filled by `copy`.
	fn copy_with(&self, copy: unsafe fn(Type, *mut u8, *const u8)) -> Self {
		let mut to = Self::new(self.r#type, self.handle.clone());
		to.cells = vec![0; self.cells.len()];
		for index in 0..self.len {
			// `to.len` grows with each copied cell so a panic drops only those
			to.len = index + 1;
			unsafe { copy(self.r#type, to.cell_mut(index), self.cell(index)) };
		}
		to
	}
}

impl Drop for Elements {
	fn drop(&mut self) {
		for index in 0..self.len {
			unsafe { slot::release(self.r#type, self.cell_mut(index)) };
		}
	}
}

/// The container behind a repeated field. Elements are stored in cells
/// exactly like singular fields of the element type.
///
/// Cloning the handle aliases the container; see [`RepeatedField::dup`] and
/// [`Shared::deep_clone`] for copies.
#[derive(Clone)]
pub struct RepeatedField(Rc<RefCell<Elements>>);

impl RepeatedField {
	/// Message and enum elements need their nested type, other elements none.
	pub fn new(element_type: Type, handle: Option<TypeHandle>) -> Result<Self> {
		match (element_type, &handle) {
			(Type::Message, Some(TypeHandle::Message(_))) | (Type::Enum, Some(TypeHandle::Enum(_))) => {}
			(ty, None) if !ty.needs_type_handle() => {}
			(ty, None) => return Err(Error::type_mismatch(format!("type for {ty} elements"), "nil")),
			(ty, Some(handle)) => {
				return Err(Error::type_mismatch(format!("type for {ty} elements"), handle.name()));
			}
		}
		Ok(Self::from_parts(element_type, handle))
	}

	pub fn of<T: GetType>() -> Self {
		Self::from_parts(T::get_type(), None)
	}

	pub fn of_message(message: &MessageType) -> Self {
		Self::from_parts(Type::Message, Some(TypeHandle::Message(message.clone())))
	}

	pub fn of_enum(enumeration: &EnumType) -> Self {
		Self::from_parts(Type::Enum, Some(TypeHandle::Enum(enumeration.clone())))
	}

	/// An empty container matching a repeated field of `schema`.
	pub(crate) fn for_field(schema: &MessageType, field: &FieldDescriptor) -> Self {
		Self::from_parts(field.r#type(), schema.type_handle(field))
	}

	fn from_parts(element_type: Type, handle: Option<TypeHandle>) -> Self {
		Self(Rc::new(RefCell::new(Elements::new(element_type, handle))))
	}

	pub fn element_type(&self) -> Type {
		self.0.borrow().r#type
	}

	pub fn type_handle(&self) -> Option<TypeHandle> {
		self.0.borrow().handle.clone()
	}

	pub fn len(&self) -> usize {
		self.0.borrow().len
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Appends `value`, checked like an assignment to a singular field.
	pub fn push(&self, value: impl Into<Value>) -> Result<()> {
		let value = value.into();
		let mut elements = self.0.borrow_mut();
		let (ty, stride, len) = (elements.r#type, elements.stride(), elements.len);

		elements.cells.resize((len + 1) * stride, 0);
		let handle = elements.handle.clone();
		let cell = unsafe { elements.cells.as_mut_ptr().add(len * stride) };
		match unsafe { slot::set(ty, handle.as_ref(), cell, &value) } {
			Ok(()) => {
				elements.len = len + 1;
				Ok(())
			}
			Err(err) => {
				elements.cells.truncate(len * stride);
				Err(err)
			}
		}
	}

	pub fn get(&self, index: usize) -> Result<Value> {
		let elements = self.0.borrow();
		elements.check_index(index)?;
		Ok(elements.get(index))
	}

	pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<()> {
		let value = value.into();
		let mut elements = self.0.borrow_mut();
		elements.check_index(index)?;
		let (ty, handle) = (elements.r#type, elements.handle.clone());
		unsafe { slot::set(ty, handle.as_ref(), elements.cell_mut(index), &value) }
	}

	pub fn pop(&self) -> Option<Value> {
		let mut elements = self.0.borrow_mut();
		let index = elements.len.checked_sub(1)?;
		let value = elements.get(index);
		let ty = elements.r#type;
		unsafe { slot::release(ty, elements.cell_mut(index)) };
		elements.len = index;
		let stride = elements.stride();
		elements.cells.truncate(index * stride);
		Some(value)
	}

	pub fn clear(&self) {
		let released = {
			let mut elements = self.0.borrow_mut();
			let emptied = Elements::new(elements.r#type, elements.handle.clone());
			mem::replace(&mut *elements, emptied)
		};
		// elements drop outside the borrow
		drop(released);
	}

	pub fn to_vec(&self) -> Vec<Value> {
		let elements = self.0.borrow();
		(0..elements.len).map(|index| elements.get(index)).collect()
	}

	/// New container whose elements alias this one's.
	pub fn dup(&self) -> Self {
		Self(Rc::new(RefCell::new(self.0.borrow().copy_with(slot::duplicate))))
	}

	pub fn hash64(&self) -> Hash64 {
		let elements = self.0.borrow();
		let seed = xxh3_64(&[elements.r#type.to_u8()]);
		(0..elements.len).fold(seed, |hash, index| combine(hash, elements.get(index).hash64()))
	}

	/// Reports every element reference.
	pub fn trace(&self, tracer: &mut dyn Tracer) {
		let elements = self.0.borrow();
		for index in 0..elements.len {
			unsafe { slot::mark(elements.r#type, elements.cell(index), tracer) };
		}
	}
}

impl Shared for RepeatedField {
	fn into_raw(self) -> *const () {
		Rc::into_raw(self.0) as *const ()
	}

	unsafe fn from_raw(ptr: *const ()) -> Self {
		Self(unsafe { Rc::from_raw(ptr as *const RefCell<Elements>) })
	}

	fn as_ptr(&self) -> *const () {
		Rc::as_ptr(&self.0) as *const ()
	}

	fn deep_clone(&self) -> Self {
		Self(Rc::new(RefCell::new(self.0.borrow().copy_with(slot::clone))))
	}
}

impl PartialEq for RepeatedField {
	fn eq(&self, other: &Self) -> bool {
		if self.ptr_eq(other) {
			return true;
		}
		let (left, right) = (self.0.borrow(), other.0.borrow());
		left.r#type == right.r#type
			&& left.handle == right.handle
			&& left.len == right.len
			&& (0..left.len).all(|index| unsafe { slot::equal(left.r#type, left.cell(index), right.cell(index)) })
	}
}

impl Display for RepeatedField {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("[")?;
		for (index, value) in self.to_vec().iter().enumerate() {
			if index > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{value}")?;
		}
		f.write_str("]")
	}
}

impl Debug for RepeatedField {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(self, f)
	}
}

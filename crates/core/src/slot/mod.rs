// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Type-dispatched operations on a single field cell.
//!
//! A cell carries no tag of its own. Every function here takes the declared
//! [`Type`] of the field, plus the nested message or enum type where one is
//! needed, and interprets the bytes accordingly. Callers must pass the same
//! type for every operation on a given cell.

mod number;
pub(crate) mod reference;

use std::ptr;

use protoslot_type::{Bytes, Error, Result, Shared, Text, Type};

use crate::{
	Message, Value,
	descriptor::{EnumType, MessageType, TypeHandle},
	trace::{Reference, Tracer},
};

/// Bytes a singular cell of `ty` occupies.
pub const fn size(ty: Type) -> usize {
	ty.size()
}

#[inline]
unsafe fn read<T: Copy>(cell: *const u8) -> T {
	unsafe { ptr::read_unaligned(cell as *const T) }
}

#[inline]
unsafe fn write<T>(cell: *mut u8, value: T) {
	unsafe { ptr::write_unaligned(cell as *mut T, value) }
}

/// Writes the zero value of `ty`. Strings and bytes get a fresh empty
/// referent; message cells stay null.
///
/// # Safety
/// `cell` must point to `size(ty)` writable bytes that hold no reference.
pub unsafe fn init(ty: Type, cell: *mut u8) {
	unsafe {
		match ty {
			Type::Float32 => write(cell, 0f32),
			Type::Float64 => write(cell, 0f64),
			Type::Bool => write(cell, 0u8),
			Type::Int32 | Type::Enum => write(cell, 0i32),
			Type::Uint32 => write(cell, 0u32),
			Type::Int64 => write(cell, 0i64),
			Type::Uint64 => write(cell, 0u64),
			Type::String => reference::store(cell, Some(Text::default())),
			Type::Bytes => reference::store(cell, Some(Bytes::default())),
			Type::Message => reference::store::<Message>(cell, None),
		}
	}
}

/// Reads the cell as a host value. Enum numbers come back as their symbol
/// when the enum declares one, otherwise as the plain number.
///
/// # Safety
/// `cell` must have been initialized for `ty`.
pub unsafe fn get(ty: Type, handle: Option<&TypeHandle>, cell: *const u8) -> Value {
	unsafe {
		match ty {
			Type::Float32 => Value::Float(read::<f32>(cell).into()),
			Type::Float64 => Value::Float(read::<f64>(cell)),
			Type::Bool => Value::Bool(read::<u8>(cell) != 0),
			Type::Int32 => Value::Int(read::<i32>(cell).into()),
			Type::Int64 => Value::Int(read::<i64>(cell)),
			Type::Uint32 => Value::Uint(read::<u32>(cell).into()),
			Type::Uint64 => Value::Uint(read::<u64>(cell)),
			Type::Enum => {
				let number = read::<i32>(cell);
				match enum_handle(handle).lookup_number(number) {
					Some(name) => Value::symbol(name),
					None => Value::Int(number.into()),
				}
			}
			Type::String => match reference::load::<Text>(cell) {
				Some(text) => Value::String(text),
				None => unreachable!("string cell read before init"),
			},
			Type::Bytes => match reference::load::<Bytes>(cell) {
				Some(bytes) => Value::Bytes(bytes),
				None => unreachable!("bytes cell read before init"),
			},
			Type::Message => reference::load::<Message>(cell).into(),
		}
	}
}

/// Validates `value` against `ty` and writes it. On error the cell is left
/// untouched.
///
/// # Safety
/// `cell` must have been initialized for `ty`, or be zeroed.
pub unsafe fn set(ty: Type, handle: Option<&TypeHandle>, cell: *mut u8, value: &Value) -> Result<()> {
	unsafe {
		match ty {
			Type::Float32 => write(cell, number::float(value, ty)? as f32),
			Type::Float64 => write(cell, number::float(value, ty)?),
			Type::Int32 => write(cell, number::integer::<i32>(value, ty)?),
			Type::Int64 => write(cell, number::integer::<i64>(value, ty)?),
			Type::Uint32 => write(cell, number::integer::<u32>(value, ty)?),
			Type::Uint64 => write(cell, number::integer::<u64>(value, ty)?),
			Type::Bool => match value {
				Value::Bool(v) => write(cell, *v as u8),
				_ => return Err(Error::type_mismatch("bool", value.kind())),
			},
			Type::Enum => {
				let enumeration = enum_handle(handle);
				let number = match value {
					Value::Symbol(name) => {
						enumeration.lookup_name(name).ok_or_else(|| Error::Lookup {
							enum_name: enumeration.name().to_string(),
							symbol: name.clone(),
						})?
					}
					_ => number::integer::<i32>(value, ty).map_err(|err| match err {
						Error::TypeMismatch {
							actual,
							..
						} => Error::type_mismatch(format!("number or symbol of {}", enumeration.name()), actual),
						err => err,
					})?,
				};
				write(cell, number);
			}
			Type::String => match value {
				Value::String(text) => reference::replace(cell, Some(text.clone())),
				_ => return Err(Error::type_mismatch("string", value.kind())),
			},
			Type::Bytes => match value {
				Value::Bytes(bytes) => reference::replace(cell, Some(bytes.clone())),
				_ => return Err(Error::type_mismatch("bytes", value.kind())),
			},
			Type::Message => {
				let expected = message_handle(handle);
				match value {
					Value::Message(message) if message.message_type() == expected => {
						reference::replace(cell, Some(message.clone()))
					}
					Value::Message(message) => {
						return Err(Error::type_mismatch(expected.name(), message.message_type().name()));
					}
					_ => return Err(Error::type_mismatch(expected.name(), value.kind())),
				}
			}
		}
	}
	Ok(())
}

/// Drops any reference held by the cell; value cells are left as they are.
///
/// # Safety
/// `cell` must have been initialized for `ty`, or be zeroed.
pub unsafe fn release(ty: Type, cell: *mut u8) {
	unsafe {
		match ty {
			Type::String => drop(reference::take::<Text>(cell)),
			Type::Bytes => drop(reference::take::<Bytes>(cell)),
			Type::Message => drop(reference::take::<Message>(cell)),
			_ => {}
		}
	}
}

/// Reports the referent of a reference cell to `tracer`. Value cells and
/// unset messages report nothing.
///
/// # Safety
/// `cell` must have been initialized for `ty`.
pub unsafe fn mark(ty: Type, cell: *const u8, tracer: &mut dyn Tracer) {
	unsafe {
		match ty {
			Type::String => reference::with::<Text, _>(cell, |text| {
				if let Some(text) = text {
					tracer.visit(Reference::Text(text));
				}
			}),
			Type::Bytes => reference::with::<Bytes, _>(cell, |bytes| {
				if let Some(bytes) = bytes {
					tracer.visit(Reference::Bytes(bytes));
				}
			}),
			Type::Message => reference::with::<Message, _>(cell, |message| {
				if let Some(message) = message {
					tracer.visit(Reference::Message(message));
				}
			}),
			_ => {}
		}
	}
}

/// Shallow copy: reference cells end up aliasing the source's referent.
///
/// # Safety
/// `from` must have been initialized for `ty`; `to` must hold no reference.
pub unsafe fn duplicate(ty: Type, to: *mut u8, from: *const u8) {
	unsafe {
		match ty {
			Type::String => reference::store(to, reference::load::<Text>(from)),
			Type::Bytes => reference::store(to, reference::load::<Bytes>(from)),
			Type::Message => reference::store(to, reference::load::<Message>(from)),
			_ => ptr::copy_nonoverlapping(from, to, size(ty)),
		}
	}
}

/// Deep copy: strings and bytes are copied, messages cloned recursively.
///
/// # Safety
/// Same as [`duplicate`].
pub unsafe fn clone(ty: Type, to: *mut u8, from: *const u8) {
	unsafe {
		match ty {
			Type::String => reference::store(to, reference::with(from, |text: Option<&Text>| text.map(Text::deep_clone))),
			Type::Bytes => {
				reference::store(to, reference::with(from, |bytes: Option<&Bytes>| bytes.map(Bytes::deep_clone)))
			}
			Type::Message => reference::store(
				to,
				reference::with(from, |message: Option<&Message>| message.map(Message::deep_clone)),
			),
			_ => ptr::copy_nonoverlapping(from, to, size(ty)),
		}
	}
}

/// Value cells compare bytewise, reference cells by their referents.
///
/// # Safety
/// Both cells must have been initialized for `ty`.
pub unsafe fn equal(ty: Type, left: *const u8, right: *const u8) -> bool {
	unsafe {
		match ty {
			Type::String => reference::with(left, |l: Option<&Text>| reference::with(right, |r: Option<&Text>| l == r)),
			Type::Bytes => {
				reference::with(left, |l: Option<&Bytes>| reference::with(right, |r: Option<&Bytes>| l == r))
			}
			Type::Message => {
				reference::with(left, |l: Option<&Message>| reference::with(right, |r: Option<&Message>| l == r))
			}
			_ => {
				let size = size(ty);
				std::slice::from_raw_parts(left, size) == std::slice::from_raw_parts(right, size)
			}
		}
	}
}

fn enum_handle(handle: Option<&TypeHandle>) -> &EnumType {
	match handle {
		Some(TypeHandle::Enum(enumeration)) => enumeration,
		_ => unreachable!("enum cell without enum type"),
	}
}

fn message_handle(handle: Option<&TypeHandle>) -> &MessageType {
	match handle {
		Some(TypeHandle::Message(message)) => message,
		_ => unreachable!("message cell without message type"),
	}
}

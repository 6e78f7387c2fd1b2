// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	mem::size_of,
};

use serde::{Deserialize, Serialize};

mod get;

pub use get::GetType;

/// Size of a reference cell (string, bytes, message and repeated slots).
pub const REFERENCE_SIZE: usize = size_of::<*const ()>();

const _: () = assert!(REFERENCE_SIZE.is_power_of_two());

/// Declared element type of a message field
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
	/// A 4-byte floating point
	Float32,
	/// An 8-byte floating point
	Float64,
	/// A boolean: true or false.
	Bool,
	/// A UTF-8 encoded text, stored by reference.
	String,
	/// An arbitrary byte sequence, stored by reference.
	Bytes,
	/// A nested message, stored by reference. Unset is a null reference.
	Message,
	/// An open enum, stored as its 4-byte number.
	Enum,
	/// A 4-byte signed integer
	Int32,
	/// An 8-byte signed integer
	Int64,
	/// A 4-byte unsigned integer
	Uint32,
	/// An 8-byte unsigned integer
	Uint64,
}

impl Type {
	pub fn is_number(&self) -> bool {
		self.is_integer() || self.is_floating_point()
	}

	pub fn is_signed_integer(&self) -> bool {
		matches!(self, Type::Int32 | Type::Int64)
	}

	pub fn is_unsigned_integer(&self) -> bool {
		matches!(self, Type::Uint32 | Type::Uint64)
	}

	pub fn is_integer(&self) -> bool {
		self.is_signed_integer() || self.is_unsigned_integer()
	}

	pub fn is_floating_point(&self) -> bool {
		matches!(self, Type::Float32 | Type::Float64)
	}

	/// Slots of these types hold a reference rather than an inline value.
	pub fn is_reference(&self) -> bool {
		matches!(self, Type::String | Type::Bytes | Type::Message)
	}

	/// Message and enum fields need a nested type to be interpreted.
	pub fn needs_type_handle(&self) -> bool {
		matches!(self, Type::Message | Type::Enum)
	}
}

impl Type {
	/// Descriptor type code, as used by protobuf field descriptors.
	pub fn to_u8(&self) -> u8 {
		match self {
			Type::Float32 => 1,
			Type::Float64 => 2,
			Type::Bool => 3,
			Type::String => 4,
			Type::Bytes => 5,
			Type::Message => 6,
			Type::Enum => 7,
			Type::Int32 => 8,
			Type::Uint32 => 9,
			Type::Int64 => 10,
			Type::Uint64 => 11,
		}
	}

	pub fn from_u8(value: u8) -> Option<Self> {
		match value {
			1 => Some(Type::Float32),
			2 => Some(Type::Float64),
			3 => Some(Type::Bool),
			4 => Some(Type::String),
			5 => Some(Type::Bytes),
			6 => Some(Type::Message),
			7 => Some(Type::Enum),
			8 => Some(Type::Int32),
			9 => Some(Type::Uint32),
			10 => Some(Type::Int64),
			11 => Some(Type::Uint64),
			_ => None,
		}
	}
}

impl Type {
	pub const fn size(&self) -> usize {
		match self {
			Type::Float32 => 4,
			Type::Float64 => 8,
			Type::Bool => 1,
			Type::String => REFERENCE_SIZE,
			Type::Bytes => REFERENCE_SIZE,
			Type::Message => REFERENCE_SIZE,
			Type::Enum => 4,
			Type::Int32 => 4,
			Type::Int64 => 8,
			Type::Uint32 => 4,
			Type::Uint64 => 8,
		}
	}

	/// Slots are aligned to their own size.
	pub const fn alignment(&self) -> usize {
		self.size()
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Float32 => f.write_str("float32"),
			Type::Float64 => f.write_str("float64"),
			Type::Bool => f.write_str("bool"),
			Type::String => f.write_str("string"),
			Type::Bytes => f.write_str("bytes"),
			Type::Message => f.write_str("message"),
			Type::Enum => f.write_str("enum"),
			Type::Int32 => f.write_str("int32"),
			Type::Int64 => f.write_str("int64"),
			Type::Uint32 => f.write_str("uint32"),
			Type::Uint64 => f.write_str("uint64"),
		}
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use protoslot_type::{Bytes, Hash64, Text, combine, xxh3_64};

use crate::{Message, RepeatedField};

/// A value as seen from outside a message: what field reads produce and
/// field writes accept.
#[derive(Clone, Debug, Default)]
pub enum Value {
	/// An unset message field
	#[default]
	Nil,
	Bool(bool),
	/// Signed integers of any width
	Int(i64),
	/// Unsigned integers of any width
	Uint(u64),
	Float(f64),
	/// A symbolic enum value
	Symbol(String),
	String(Text),
	Bytes(Bytes),
	Message(Message),
	Repeated(RepeatedField),
}

impl Value {
	pub fn symbol(name: impl Into<String>) -> Self {
		Value::Symbol(name.into())
	}

	/// Short name of the value's kind, used in type mismatch errors.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Nil => "nil",
			Value::Bool(_) => "bool",
			Value::Int(_) | Value::Uint(_) => "integer",
			Value::Float(_) => "float",
			Value::Symbol(_) => "symbol",
			Value::String(_) => "string",
			Value::Bytes(_) => "bytes",
			Value::Message(_) => "message",
			Value::Repeated(_) => "repeated field",
		}
	}

	pub fn is_nil(&self) -> bool {
		matches!(self, Value::Nil)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			Value::Uint(v) => i64::try_from(*v).ok(),
			_ => None,
		}
	}

	pub fn as_u64(&self) -> Option<u64> {
		match self {
			Value::Uint(v) => Some(*v),
			Value::Int(v) => u64::try_from(*v).ok(),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_symbol(&self) -> Option<&str> {
		match self {
			Value::Symbol(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&Text> {
		match self {
			Value::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&Bytes> {
		match self {
			Value::Bytes(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_message(&self) -> Option<&Message> {
		match self {
			Value::Message(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_repeated(&self) -> Option<&RepeatedField> {
		match self {
			Value::Repeated(v) => Some(v),
			_ => None,
		}
	}

	/// Equal values hash equal, including integers of either signedness.
	pub fn hash64(&self) -> Hash64 {
		match self {
			Value::Nil => tagged(0, &[]),
			Value::Bool(v) => tagged(1, &[*v as u8]),
			Value::Int(v) => tagged(2, &i128::from(*v).to_le_bytes()),
			Value::Uint(v) => tagged(2, &i128::from(*v).to_le_bytes()),
			// 0.0 and -0.0 compare equal
			Value::Float(v) => tagged(3, &(if *v == 0.0 { 0.0f64 } else { *v }).to_bits().to_le_bytes()),
			Value::Symbol(v) => tagged(4, v.as_bytes()),
			Value::String(v) => v.with(|s| tagged(5, s.as_bytes())),
			Value::Bytes(v) => v.with(|b| tagged(6, b)),
			Value::Message(v) => v.hash64(),
			Value::Repeated(v) => v.hash64(),
		}
	}
}

fn tagged(tag: u64, data: &[u8]) -> Hash64 {
	combine(Hash64(tag), xxh3_64(data))
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Nil, Value::Nil) => true,
			(Value::Bool(l), Value::Bool(r)) => l == r,
			(Value::Int(l), Value::Int(r)) => l == r,
			(Value::Uint(l), Value::Uint(r)) => l == r,
			(Value::Int(l), Value::Uint(r)) | (Value::Uint(r), Value::Int(l)) => i128::from(*l) == i128::from(*r),
			(Value::Float(l), Value::Float(r)) => l == r,
			(Value::Symbol(l), Value::Symbol(r)) => l == r,
			(Value::String(l), Value::String(r)) => l == r,
			(Value::Bytes(l), Value::Bytes(r)) => l == r,
			(Value::Message(l), Value::Message(r)) => l == r,
			(Value::Repeated(l), Value::Repeated(r)) => l == r,
			_ => false,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Nil => f.write_str("nil"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			Value::Uint(v) => write!(f, "{v}"),
			Value::Float(v) => write!(f, "{v:?}"),
			Value::Symbol(v) => write!(f, ":{v}"),
			Value::String(v) => write!(f, "{v:?}"),
			Value::Bytes(v) => write!(f, "{v}"),
			Value::Message(v) => write!(f, "{v}"),
			Value::Repeated(v) => write!(f, "{v}"),
		}
	}
}

macro_rules! impl_from_int {
	($variant:ident: $($t:ty),*) => {
		$(
			impl From<$t> for Value {
				fn from(value: $t) -> Self {
					Value::$variant(value.into())
				}
			}
		)*
	};
}

impl_from_int!(Int: i8, i16, i32, i64);
impl_from_int!(Uint: u8, u16, u32, u64);

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::Float(value.into())
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(Text::new(value))
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(Text::new(value))
	}
}

impl From<Text> for Value {
	fn from(value: Text) -> Self {
		Value::String(value)
	}
}

impl From<&[u8]> for Value {
	fn from(value: &[u8]) -> Self {
		Value::Bytes(Bytes::new(value))
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Value::Bytes(Bytes::new(value))
	}
}

impl From<Bytes> for Value {
	fn from(value: Bytes) -> Self {
		Value::Bytes(value)
	}
}

impl From<Message> for Value {
	fn from(value: Message) -> Self {
		Value::Message(value)
	}
}

impl From<Option<Message>> for Value {
	fn from(value: Option<Message>) -> Self {
		value.map_or(Value::Nil, Value::Message)
	}
}

impl From<RepeatedField> for Value {
	fn from(value: RepeatedField) -> Self {
		Value::Repeated(value)
	}
}

#[cfg(test)]
pub mod tests {
	use protoslot_type::{Bytes, Text};

	use super::Value;

	mod eq {
		use super::*;

		#[test]
		fn test_integers_compare_across_signedness() {
			assert_eq!(Value::Int(5), Value::Uint(5));
			assert_eq!(Value::Uint(5), Value::Int(5));
			assert_ne!(Value::Int(-1), Value::Uint(u64::MAX));
		}

		#[test]
		fn test_float_is_not_integer() {
			assert_ne!(Value::Float(5.0), Value::Int(5));
		}

		#[test]
		fn test_text_is_structural() {
			assert_eq!(Value::from("a"), Value::from(Text::new("a")));
			assert_ne!(Value::from("a"), Value::from("b"));
		}

		#[test]
		fn test_kinds_differ() {
			assert_ne!(Value::Nil, Value::Bool(false));
			assert_ne!(Value::from("a"), Value::symbol("a"));
			assert_ne!(Value::from("a"), Value::from(b"a".as_slice()));
		}
	}

	mod hash {
		use super::*;

		#[test]
		fn test_equal_values_hash_equal() {
			assert_eq!(Value::Int(7).hash64(), Value::Uint(7).hash64());
			assert_eq!(Value::Float(0.0).hash64(), Value::Float(-0.0).hash64());
			assert_eq!(Value::from("abc").hash64(), Value::from("abc").hash64());
		}

		#[test]
		fn test_different_kinds_hash_differently() {
			assert_ne!(Value::from("abc").hash64(), Value::symbol("abc").hash64());
			assert_ne!(Value::from("abc").hash64(), Value::from(b"abc".to_vec()).hash64());
			assert_ne!(Value::Bool(false).hash64(), Value::Int(0).hash64());
		}
	}

	mod display {
		use super::*;

		#[test]
		fn test_inspect_forms() {
			assert_eq!(Value::Nil.to_string(), "nil");
			assert_eq!(Value::Bool(true).to_string(), "true");
			assert_eq!(Value::Int(-5).to_string(), "-5");
			assert_eq!(Value::Float(1.5).to_string(), "1.5");
			assert_eq!(Value::Float(2.0).to_string(), "2.0");
			assert_eq!(Value::symbol("RED").to_string(), ":RED");
			assert_eq!(Value::from("hi").to_string(), "\"hi\"");
			assert_eq!(Value::from(Bytes::new(vec![0u8])).to_string(), "b\"\\x00\"");
		}
	}

	mod accessors {
		use super::*;

		#[test]
		fn test_integer_accessors() {
			assert_eq!(Value::Uint(3).as_i64(), Some(3));
			assert_eq!(Value::Int(-3).as_u64(), None);
			assert_eq!(Value::Uint(u64::MAX).as_i64(), None);
			assert_eq!(Value::Float(1.0).as_i64(), None);
		}

		#[test]
		fn test_from_option_message() {
			assert!(Value::from(None).is_nil());
		}
	}
}

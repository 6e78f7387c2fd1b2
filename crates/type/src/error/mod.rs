// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Errors raised when a value is assigned to a field or container slot.
//!
//! Every error is raised before the target slot is written, so a failed
//! assignment leaves the previous value in place.

use crate::Type;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("type mismatch: expected {expected}, got {actual}")]
	TypeMismatch {
		expected: String,
		actual: String,
	},

	#[error("range error: {0}")]
	Range(#[from] RangeViolation),

	#[error("unknown symbol :{symbol} for enum {enum_name}")]
	Lookup {
		enum_name: String,
		symbol: String,
	},

	#[error("message {message} has no field named `{field}`")]
	UnknownField {
		message: String,
		field: String,
	},
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeViolation {
	#[error("non-integral floating point value assigned to integer field")]
	NonIntegral,

	#[error("negative value assigned to unsigned integer field")]
	NegativeUnsigned,

	#[error("value {value} out of range for {target}")]
	OutOfRange {
		value: String,
		target: Type,
	},

	#[error("index {index} out of bounds for length {len}")]
	IndexOutOfBounds {
		index: usize,
		len: usize,
	},
}

impl Error {
	pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
		Error::TypeMismatch {
			expected: expected.into(),
			actual: actual.into(),
		}
	}

	pub fn is_type_mismatch(&self) -> bool {
		matches!(self, Error::TypeMismatch { .. })
	}

	pub fn is_range(&self) -> bool {
		matches!(self, Error::Range(_))
	}

	pub fn is_lookup(&self) -> bool {
		matches!(self, Error::Lookup { .. })
	}
}

#[cfg(test)]
pub mod tests {
	use super::{Error, RangeViolation};
	use crate::Type;

	#[test]
	fn test_display() {
		let err = Error::type_mismatch("bool", "integer");
		assert_eq!(err.to_string(), "type mismatch: expected bool, got integer");

		let err = Error::from(RangeViolation::OutOfRange {
			value: "4294967296".to_string(),
			target: Type::Uint32,
		});
		assert_eq!(err.to_string(), "range error: value 4294967296 out of range for uint32");

		let err = Error::Lookup {
			enum_name: "Color".to_string(),
			symbol: "BLUE".to_string(),
		};
		assert_eq!(err.to_string(), "unknown symbol :BLUE for enum Color");
	}

	#[test]
	fn test_predicates() {
		assert!(Error::from(RangeViolation::NonIntegral).is_range());
		assert!(Error::type_mismatch("a", "b").is_type_mismatch());
		assert!(!Error::type_mismatch("a", "b").is_lookup());
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Conversion of host numbers into numeric slot values.

use protoslot_type::{Error, RangeViolation, Result, Type};

use crate::Value;

/// Converts `value` into the integer representation of `target`.
///
/// Floats are accepted only when integral, negatives never for unsigned
/// targets.
pub(crate) fn integer<T: TryFrom<i128>>(value: &Value, target: Type) -> Result<T> {
	let wide = match *value {
		Value::Int(v) => i128::from(v),
		Value::Uint(v) => i128::from(v),
		Value::Float(v) => {
			// NaN fails here as well
			if v.floor() != v {
				return Err(RangeViolation::NonIntegral.into());
			}
			v as i128
		}
		_ => return Err(Error::type_mismatch(target.to_string(), value.kind())),
	};

	if wide < 0 && target.is_unsigned_integer() {
		return Err(RangeViolation::NegativeUnsigned.into());
	}

	T::try_from(wide).map_err(|_| {
		RangeViolation::OutOfRange {
			value: value.to_string(),
			target,
		}
		.into()
	})
}

pub(crate) fn float(value: &Value, target: Type) -> Result<f64> {
	match *value {
		Value::Int(v) => Ok(v as f64),
		Value::Uint(v) => Ok(v as f64),
		Value::Float(v) => Ok(v),
		_ => Err(Error::type_mismatch(target.to_string(), value.kind())),
	}
}

#[cfg(test)]
pub mod tests {
	use protoslot_type::{Error, RangeViolation, Type};

	use super::{float, integer};
	use crate::Value;

	mod integer {
		use super::*;

		#[test]
		fn test_accepts_in_range() {
			assert_eq!(integer::<i32>(&Value::Int(-7), Type::Int32).unwrap(), -7);
			assert_eq!(integer::<u32>(&Value::Uint(7), Type::Uint32).unwrap(), 7);
			assert_eq!(integer::<i64>(&Value::Uint(i64::MAX as u64), Type::Int64).unwrap(), i64::MAX);
			assert_eq!(integer::<u64>(&Value::Uint(u64::MAX), Type::Uint64).unwrap(), u64::MAX);
		}

		#[test]
		fn test_integral_float() {
			assert_eq!(integer::<i32>(&Value::Float(3.0), Type::Int32).unwrap(), 3);
			assert_eq!(integer::<u64>(&Value::Float(-0.0), Type::Uint64).unwrap(), 0);
		}

		#[test]
		fn test_fractional_float() {
			let err = integer::<i32>(&Value::Float(5.5), Type::Int32).unwrap_err();
			assert_eq!(err, Error::Range(RangeViolation::NonIntegral));
			let err = integer::<i64>(&Value::Float(f64::NAN), Type::Int64).unwrap_err();
			assert_eq!(err, Error::Range(RangeViolation::NonIntegral));
		}

		#[test]
		fn test_negative_unsigned() {
			let err = integer::<u32>(&Value::Int(-1), Type::Uint32).unwrap_err();
			assert_eq!(err, Error::Range(RangeViolation::NegativeUnsigned));
			let err = integer::<u64>(&Value::Float(-2.0), Type::Uint64).unwrap_err();
			assert_eq!(err, Error::Range(RangeViolation::NegativeUnsigned));
		}

		#[test]
		fn test_out_of_range() {
			let err = integer::<i32>(&Value::Int(i64::from(i32::MAX) + 1), Type::Int32).unwrap_err();
			assert_eq!(
				err,
				Error::Range(RangeViolation::OutOfRange {
					value: "2147483648".to_string(),
					target: Type::Int32,
				})
			);
			assert!(integer::<u32>(&Value::Uint(1 << 32), Type::Uint32).unwrap_err().is_range());
			assert!(integer::<i64>(&Value::Uint(u64::MAX), Type::Int64).unwrap_err().is_range());
			assert!(integer::<i64>(&Value::Float(f64::INFINITY), Type::Int64).unwrap_err().is_range());
		}

		#[test]
		fn test_non_numbers() {
			let err = integer::<i32>(&Value::from("1"), Type::Int32).unwrap_err();
			assert_eq!(err, Error::type_mismatch("int32", "string"));
			assert!(integer::<i32>(&Value::Bool(true), Type::Int32).unwrap_err().is_type_mismatch());
		}
	}

	mod float {
		use super::*;

		#[test]
		fn test_accepts_any_number() {
			assert_eq!(float(&Value::Int(-2), Type::Float64).unwrap(), -2.0);
			assert_eq!(float(&Value::Uint(2), Type::Float32).unwrap(), 2.0);
			assert_eq!(float(&Value::Float(0.25), Type::Float64).unwrap(), 0.25);
		}

		#[test]
		fn test_rejects_non_numbers() {
			assert!(float(&Value::Nil, Type::Float64).unwrap_err().is_type_mismatch());
		}
	}
}

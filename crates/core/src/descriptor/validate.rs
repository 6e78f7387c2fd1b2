// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{DescriptorError, MAX_FIELD_NUMBER};

/// `[_A-Za-z][_A-Za-z0-9]*`
pub(crate) fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
		_ => return false,
	}
	chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Dot-separated identifiers, e.g. `pkg.Outer.Inner`.
pub(crate) fn is_type_name(name: &str) -> bool {
	name.split('.').all(is_identifier)
}

pub(crate) fn check_identifier(name: &str) -> Result<(), DescriptorError> {
	if is_identifier(name) {
		Ok(())
	} else {
		Err(DescriptorError::InvalidName {
			name: name.to_string(),
		})
	}
}

pub(crate) fn check_type_name(name: &str) -> Result<(), DescriptorError> {
	if is_type_name(name) {
		Ok(())
	} else {
		Err(DescriptorError::InvalidName {
			name: name.to_string(),
		})
	}
}

pub(crate) fn check_field_number(message: &str, field: &str, number: u32) -> Result<(), DescriptorError> {
	if (1..=MAX_FIELD_NUMBER).contains(&number) {
		Ok(())
	} else {
		Err(DescriptorError::InvalidFieldNumber {
			message: message.to_string(),
			field: field.to_string(),
			number,
		})
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_identifiers() {
		assert!(is_identifier("name"));
		assert!(is_identifier("_private"));
		assert!(is_identifier("field_2"));
		assert!(!is_identifier(""));
		assert!(!is_identifier("2field"));
		assert!(!is_identifier("has-dash"));
		assert!(!is_identifier("a.b"));
	}

	#[test]
	fn test_type_names() {
		assert!(is_type_name("Person"));
		assert!(is_type_name("pkg.Outer.Inner"));
		assert!(!is_type_name(""));
		assert!(!is_type_name("pkg..Inner"));
		assert!(!is_type_name(".Person"));
	}

	#[test]
	fn test_field_number_bounds() {
		assert!(check_field_number("M", "f", 1).is_ok());
		assert!(check_field_number("M", "f", MAX_FIELD_NUMBER).is_ok());
		assert!(check_field_number("M", "f", 0).is_err());
		assert!(check_field_number("M", "f", MAX_FIELD_NUMBER + 1).is_err());
	}
}

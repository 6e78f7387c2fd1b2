// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use protoslot_type::Type;

use super::MAX_FIELD_NUMBER;

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
	#[error("invalid name `{name}`")]
	InvalidName {
		name: String,
	},

	#[error("duplicate type name `{name}`")]
	DuplicateTypeName {
		name: String,
	},

	#[error("field {message}.{field}: number {number} outside 1..={max}", max = MAX_FIELD_NUMBER)]
	InvalidFieldNumber {
		message: String,
		field: String,
		number: u32,
	},

	#[error("duplicate field name `{field}` in {message}")]
	DuplicateFieldName {
		message: String,
		field: String,
	},

	#[error("duplicate field number {number} in {message}")]
	DuplicateFieldNumber {
		message: String,
		number: u32,
	},

	#[error("field {message}.{field} of type {field_type} requires a type name")]
	MissingTypeName {
		message: String,
		field: String,
		field_type: Type,
	},

	#[error("field {message}.{field} of type {field_type} does not take a type name")]
	UnexpectedTypeName {
		message: String,
		field: String,
		field_type: Type,
	},

	#[error("could not resolve type reference `{type_name}` for field {message}.{field}")]
	UnresolvedTypeName {
		message: String,
		field: String,
		type_name: String,
	},

	#[error("field {message}.{field} expects a {expected} type, `{type_name}` is not one")]
	TypeKindMismatch {
		message: String,
		field: String,
		type_name: String,
		expected: Type,
	},

	#[error("duplicate enum value name `{name}` in {enum_name}")]
	DuplicateEnumName {
		enum_name: String,
		name: String,
	},

	#[error("duplicate enum value number {number} in {enum_name}")]
	DuplicateEnumValue {
		enum_name: String,
		number: i32,
	},

	#[error("invalid schema definition: {0}")]
	Json(#[from] serde_json::Error),
}

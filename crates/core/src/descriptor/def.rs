// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Plain schema definitions, the input to [`DescriptorPool::new`].
//!
//! [`DescriptorPool::new`]: super::DescriptorPool::new

use protoslot_type::{Label, Type};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolDef {
	#[serde(default)]
	pub messages: Vec<MessageDef>,
	#[serde(default)]
	pub enums: Vec<EnumDef>,
}

impl PoolDef {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn message(mut self, message: MessageDef) -> Self {
		self.messages.push(message);
		self
	}

	pub fn enumeration(mut self, enumeration: EnumDef) -> Self {
		self.enums.push(enumeration);
		self
	}
}

/// A message type; fields are laid out in the order given here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDef {
	pub name: String,
	#[serde(default)]
	pub fields: Vec<FieldDef>,
}

impl MessageDef {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: Vec::new(),
		}
	}

	pub fn field(mut self, field: FieldDef) -> Self {
		self.fields.push(field);
		self
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
	pub name: String,
	pub number: u32,
	#[serde(rename = "type")]
	pub field_type: Type,
	#[serde(default)]
	pub label: Label,
	/// Name of the nested message or enum type, required for message and enum fields
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub type_name: Option<String>,
}

impl FieldDef {
	pub fn new(name: impl Into<String>, number: u32, field_type: Type) -> Self {
		Self {
			name: name.into(),
			number,
			field_type,
			label: Label::Optional,
			type_name: None,
		}
	}

	pub fn message(name: impl Into<String>, number: u32, type_name: impl Into<String>) -> Self {
		Self::new(name, number, Type::Message).with_type_name(type_name)
	}

	pub fn enumeration(name: impl Into<String>, number: u32, type_name: impl Into<String>) -> Self {
		Self::new(name, number, Type::Enum).with_type_name(type_name)
	}

	pub fn repeated(mut self) -> Self {
		self.label = Label::Repeated;
		self
	}

	pub fn required(mut self) -> Self {
		self.label = Label::Required;
		self
	}

	pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
		self.type_name = Some(type_name.into());
		self
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
	pub name: String,
	#[serde(default)]
	pub values: Vec<EnumValueDef>,
}

impl EnumDef {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			values: Vec::new(),
		}
	}

	pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
		self.values.push(EnumValueDef {
			name: name.into(),
			number,
		});
		self
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueDef {
	pub name: String,
	pub number: i32,
}

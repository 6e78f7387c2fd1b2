// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Message and enum descriptors.
//!
//! A [`DescriptorPool`] is built once from a [`PoolDef`], validated and then
//! frozen. Every message descriptor carries the [`MessageLayout`] computed for
//! it at that point. [`MessageType`] and [`EnumType`] are cheap handles into
//! the pool; two handles are equal only when they name the same type of the
//! same pool.

pub mod def;
mod error;
mod validate;

use std::{
	collections::{HashMap, hash_map::Entry},
	fmt::{Debug, Formatter},
	ops::Deref,
	ptr,
	sync::Arc,
};

pub use def::{EnumDef, EnumValueDef, FieldDef, MessageDef, PoolDef};
pub use error::DescriptorError;
use protoslot_type::{Label, Type};
use tracing::{debug, instrument};

use crate::layout::{MessageLayout, build_layout};

/// Largest field number a message may declare.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

#[derive(Debug)]
pub struct FieldDescriptor {
	name: String,
	number: u32,
	index: usize,
	r#type: Type,
	label: Label,
	type_name: Option<String>,
	/// Index of the nested message or enum within the pool
	sub_type: Option<usize>,
}

impl FieldDescriptor {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn number(&self) -> u32 {
		self.number
	}

	/// Position of the field in declaration order
	pub fn index(&self) -> usize {
		self.index
	}

	/// Declared element type; for repeated fields, the type of each element.
	pub fn r#type(&self) -> Type {
		self.r#type
	}

	pub fn label(&self) -> Label {
		self.label
	}

	pub fn is_repeated(&self) -> bool {
		self.label.is_repeated()
	}

	pub fn type_name(&self) -> Option<&str> {
		self.type_name.as_deref()
	}
}

#[derive(Debug)]
pub struct MessageDescriptor {
	name: String,
	fields: Vec<FieldDescriptor>,
	by_name: HashMap<String, usize>,
	by_number: HashMap<u32, usize>,
	layout: MessageLayout,
}

impl MessageDescriptor {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Fields in declaration order
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	pub fn field_count(&self) -> usize {
		self.fields.len()
	}

	pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
		self.fields.get(index)
	}

	pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.by_name.get(name).map(|&index| &self.fields[index])
	}

	pub fn find_field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
		self.by_number.get(&number).map(|&index| &self.fields[index])
	}

	pub fn layout(&self) -> &MessageLayout {
		&self.layout
	}

	/// Whether `field` is one of this message's own descriptors.
	pub fn owns(&self, field: &FieldDescriptor) -> bool {
		self.fields.get(field.index).is_some_and(|own| ptr::eq(own, field))
	}
}

/// Symbol table of an enum. Lookups may miss: enums are open, so numbers
/// without a symbol are legitimate field values.
#[derive(Debug)]
pub struct EnumDescriptor {
	name: String,
	values: Vec<(String, i32)>,
	by_name: HashMap<String, i32>,
	by_number: HashMap<i32, usize>,
}

impl EnumDescriptor {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn values(&self) -> impl Iterator<Item = (&str, i32)> {
		self.values.iter().map(|(name, number)| (name.as_str(), *number))
	}

	pub fn lookup_name(&self, name: &str) -> Option<i32> {
		self.by_name.get(name).copied()
	}

	pub fn lookup_number(&self, number: i32) -> Option<&str> {
		self.by_number.get(&number).map(|&index| self.values[index].0.as_str())
	}
}

#[derive(Debug, Clone, Copy)]
enum Symbol {
	Message(usize),
	Enum(usize),
}

#[derive(Debug)]
struct PoolInner {
	messages: Vec<MessageDescriptor>,
	enums: Vec<EnumDescriptor>,
	symbols: HashMap<String, Symbol>,
}

/// A frozen set of message and enum types that may reference each other.
#[derive(Clone)]
pub struct DescriptorPool(Arc<PoolInner>);

impl DescriptorPool {
	#[instrument(
		name = "descriptor::pool::new",
		level = "debug",
		skip(def),
		fields(messages = def.messages.len(), enums = def.enums.len())
	)]
	pub fn new(def: PoolDef) -> Result<Self, DescriptorError> {
		let symbols = collect_symbols(&def)?;
		let enums = def.enums.into_iter().map(build_enum).collect::<Result<Vec<_>, _>>()?;
		let messages = def
			.messages
			.into_iter()
			.map(|message| build_message(message, &symbols))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self(Arc::new(PoolInner {
			messages,
			enums,
			symbols,
		})))
	}

	pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
		let def: PoolDef = serde_json::from_str(json)?;
		Self::new(def)
	}

	pub fn message(&self, name: &str) -> Option<MessageType> {
		match self.0.symbols.get(name) {
			Some(Symbol::Message(index)) => Some(MessageType {
				pool: self.0.clone(),
				index: *index,
			}),
			_ => None,
		}
	}

	pub fn enumeration(&self, name: &str) -> Option<EnumType> {
		match self.0.symbols.get(name) {
			Some(Symbol::Enum(index)) => Some(EnumType {
				pool: self.0.clone(),
				index: *index,
			}),
			_ => None,
		}
	}

	pub fn messages(&self) -> impl Iterator<Item = MessageType> + '_ {
		(0..self.0.messages.len()).map(|index| MessageType {
			pool: self.0.clone(),
			index,
		})
	}

	pub fn enums(&self) -> impl Iterator<Item = EnumType> + '_ {
		(0..self.0.enums.len()).map(|index| EnumType {
			pool: self.0.clone(),
			index,
		})
	}
}

impl Debug for DescriptorPool {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DescriptorPool")
			.field("messages", &self.0.messages.iter().map(|m| m.name()).collect::<Vec<_>>())
			.field("enums", &self.0.enums.iter().map(|e| e.name()).collect::<Vec<_>>())
			.finish()
	}
}

fn collect_symbols(def: &PoolDef) -> Result<HashMap<String, Symbol>, DescriptorError> {
	let mut symbols = HashMap::with_capacity(def.messages.len() + def.enums.len());
	let names = def
		.messages
		.iter()
		.enumerate()
		.map(|(index, message)| (message.name.as_str(), Symbol::Message(index)))
		.chain(def.enums.iter().enumerate().map(|(index, e)| (e.name.as_str(), Symbol::Enum(index))));

	for (name, symbol) in names {
		validate::check_type_name(name)?;
		match symbols.entry(name.to_string()) {
			Entry::Occupied(_) => {
				return Err(DescriptorError::DuplicateTypeName {
					name: name.to_string(),
				});
			}
			Entry::Vacant(entry) => {
				entry.insert(symbol);
			}
		}
	}

	Ok(symbols)
}

fn build_enum(def: EnumDef) -> Result<EnumDescriptor, DescriptorError> {
	let mut values = Vec::with_capacity(def.values.len());
	let mut by_name = HashMap::with_capacity(def.values.len());
	let mut by_number = HashMap::with_capacity(def.values.len());

	for (index, value) in def.values.into_iter().enumerate() {
		validate::check_identifier(&value.name)?;
		if by_name.insert(value.name.clone(), value.number).is_some() {
			return Err(DescriptorError::DuplicateEnumName {
				enum_name: def.name,
				name: value.name,
			});
		}
		if by_number.insert(value.number, index).is_some() {
			return Err(DescriptorError::DuplicateEnumValue {
				enum_name: def.name,
				number: value.number,
			});
		}
		values.push((value.name, value.number));
	}

	Ok(EnumDescriptor {
		name: def.name,
		values,
		by_name,
		by_number,
	})
}

fn build_message(def: MessageDef, symbols: &HashMap<String, Symbol>) -> Result<MessageDescriptor, DescriptorError> {
	let mut fields = Vec::with_capacity(def.fields.len());
	let mut by_name = HashMap::with_capacity(def.fields.len());
	let mut by_number = HashMap::with_capacity(def.fields.len());

	for (index, field) in def.fields.into_iter().enumerate() {
		validate::check_identifier(&field.name)?;
		validate::check_field_number(&def.name, &field.name, field.number)?;
		if by_name.insert(field.name.clone(), index).is_some() {
			return Err(DescriptorError::DuplicateFieldName {
				message: def.name,
				field: field.name,
			});
		}
		if by_number.insert(field.number, index).is_some() {
			return Err(DescriptorError::DuplicateFieldNumber {
				message: def.name,
				number: field.number,
			});
		}

		let sub_type = resolve_sub_type(&def.name, &field, symbols)?;
		fields.push(FieldDescriptor {
			name: field.name,
			number: field.number,
			index,
			r#type: field.field_type,
			label: field.label,
			type_name: field.type_name,
			sub_type,
		});
	}

	let layout = build_layout(&fields);
	debug!(message = %def.name, size = layout.size(), alignment = layout.alignment(), "computed message layout");

	Ok(MessageDescriptor {
		name: def.name,
		fields,
		by_name,
		by_number,
		layout,
	})
}

fn resolve_sub_type(
	message: &str,
	field: &FieldDef,
	symbols: &HashMap<String, Symbol>,
) -> Result<Option<usize>, DescriptorError> {
	let type_name = match (&field.type_name, field.field_type.needs_type_handle()) {
		(None, false) => return Ok(None),
		(Some(_), false) => {
			return Err(DescriptorError::UnexpectedTypeName {
				message: message.to_string(),
				field: field.name.clone(),
				field_type: field.field_type,
			});
		}
		(None, true) => {
			return Err(DescriptorError::MissingTypeName {
				message: message.to_string(),
				field: field.name.clone(),
				field_type: field.field_type,
			});
		}
		(Some(type_name), true) => type_name,
	};

	match (symbols.get(type_name), field.field_type) {
		(Some(Symbol::Message(index)), Type::Message) | (Some(Symbol::Enum(index)), Type::Enum) => {
			Ok(Some(*index))
		}
		(Some(_), expected) => Err(DescriptorError::TypeKindMismatch {
			message: message.to_string(),
			field: field.name.clone(),
			type_name: type_name.clone(),
			expected,
		}),
		(None, _) => Err(DescriptorError::UnresolvedTypeName {
			message: message.to_string(),
			field: field.name.clone(),
			type_name: type_name.clone(),
		}),
	}
}

/// Handle to a message type of a pool. Keeps the pool alive.
#[derive(Clone)]
pub struct MessageType {
	pool: Arc<PoolInner>,
	index: usize,
}

impl Deref for MessageType {
	type Target = MessageDescriptor;

	fn deref(&self) -> &Self::Target {
		&self.pool.messages[self.index]
	}
}

impl MessageType {
	/// A single-message pool with scalar fields `f0`, `f1`, ... of the given types.
	pub fn testing(types: &[Type]) -> Self {
		let message = types.iter().enumerate().fold(MessageDef::new("Testing"), |message, (index, ty)| {
			message.field(FieldDef::new(format!("f{index}"), index as u32 + 1, *ty))
		});
		let pool = DescriptorPool::new(PoolDef::new().message(message)).expect("testing schema must be valid");
		pool.message("Testing").expect("testing message must exist")
	}

	pub fn pool(&self) -> DescriptorPool {
		DescriptorPool(self.pool.clone())
	}

	/// The nested message or enum type a field refers to.
	pub fn type_handle(&self, field: &FieldDescriptor) -> Option<TypeHandle> {
		let index = field.sub_type?;
		match field.r#type {
			Type::Message => Some(TypeHandle::Message(MessageType {
				pool: self.pool.clone(),
				index,
			})),
			Type::Enum => Some(TypeHandle::Enum(EnumType {
				pool: self.pool.clone(),
				index,
			})),
			_ => None,
		}
	}
}

impl PartialEq for MessageType {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.pool, &other.pool) && self.index == other.index
	}
}

impl Eq for MessageType {}

impl Debug for MessageType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "MessageType({})", self.name())
	}
}

/// Handle to an enum type of a pool.
#[derive(Clone)]
pub struct EnumType {
	pool: Arc<PoolInner>,
	index: usize,
}

impl Deref for EnumType {
	type Target = EnumDescriptor;

	fn deref(&self) -> &Self::Target {
		&self.pool.enums[self.index]
	}
}

impl PartialEq for EnumType {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.pool, &other.pool) && self.index == other.index
	}
}

impl Eq for EnumType {}

impl Debug for EnumType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "EnumType({})", self.name())
	}
}

/// The auxiliary type a message or enum slot needs to be read and written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeHandle {
	Message(MessageType),
	Enum(EnumType),
}

impl TypeHandle {
	pub fn name(&self) -> &str {
		match self {
			TypeHandle::Message(message) => message.name(),
			TypeHandle::Enum(enumeration) => enumeration.name(),
		}
	}

	pub fn as_message(&self) -> Option<&MessageType> {
		match self {
			TypeHandle::Message(message) => Some(message),
			TypeHandle::Enum(_) => None,
		}
	}

	pub fn as_enum(&self) -> Option<&EnumType> {
		match self {
			TypeHandle::Enum(enumeration) => Some(enumeration),
			TypeHandle::Message(_) => None,
		}
	}
}

#[cfg(test)]
pub mod tests {
	use protoslot_type::{Label, Type};

	use super::{DescriptorError, DescriptorPool, EnumDef, FieldDef, MessageDef, PoolDef, TypeHandle};

	fn pool() -> DescriptorPool {
		DescriptorPool::new(
			PoolDef::new()
				.enumeration(EnumDef::new("Color").value("RED", 0).value("GREEN", 1))
				.message(
					MessageDef::new("Person")
						.field(FieldDef::new("name", 1, Type::String))
						.field(FieldDef::enumeration("color", 2, "Color"))
						.field(FieldDef::message("friends", 3, "Person").repeated()),
				),
		)
		.unwrap()
	}

	mod lookup {
		use super::*;

		#[test]
		fn test_message_fields() {
			let person = pool().message("Person").unwrap();
			assert_eq!(person.name(), "Person");
			assert_eq!(person.field_count(), 3);
			assert_eq!(person.find_field("color").unwrap().index(), 1);
			assert_eq!(person.find_field_by_number(3).unwrap().name(), "friends");
			assert_eq!(person.find_field("friends").unwrap().label(), Label::Repeated);
			assert!(person.find_field("missing").is_none());
			assert!(person.find_field_by_number(4).is_none());
		}

		#[test]
		fn test_kind_specific_lookup() {
			let pool = pool();
			assert!(pool.message("Color").is_none());
			assert!(pool.enumeration("Person").is_none());
			assert!(pool.enumeration("Color").is_some());
		}

		#[test]
		fn test_enum_symbols() {
			let color = pool().enumeration("Color").unwrap();
			assert_eq!(color.lookup_name("GREEN"), Some(1));
			assert_eq!(color.lookup_name("BLUE"), None);
			assert_eq!(color.lookup_number(0), Some("RED"));
			assert_eq!(color.lookup_number(7), None);
			assert_eq!(color.values().collect::<Vec<_>>(), vec![("RED", 0), ("GREEN", 1)]);
		}

		#[test]
		fn test_type_handles() {
			let person = pool().message("Person").unwrap();
			let name = person.find_field("name").unwrap();
			let color = person.find_field("color").unwrap();
			let friends = person.find_field("friends").unwrap();

			assert_eq!(person.type_handle(name), None);
			assert_eq!(person.type_handle(color).unwrap().name(), "Color");
			assert_eq!(person.type_handle(friends), Some(TypeHandle::Message(person.clone())));
		}

		#[test]
		fn test_identity_is_per_pool() {
			let a = pool().message("Person").unwrap();
			let b = pool().message("Person").unwrap();
			assert_eq!(a, a.pool().message("Person").unwrap());
			assert_ne!(a, b);
		}

		#[test]
		fn test_owns_only_own_fields() {
			let a = pool().message("Person").unwrap();
			let b = pool().message("Person").unwrap();
			assert!(a.owns(a.find_field("name").unwrap()));
			assert!(!a.owns(b.find_field("name").unwrap()));
		}
	}

	mod validation {
		use super::*;

		fn build(message: MessageDef) -> Result<DescriptorPool, DescriptorError> {
			DescriptorPool::new(PoolDef::new().enumeration(EnumDef::new("Color").value("RED", 0)).message(message))
		}

		#[test]
		fn test_invalid_field_name() {
			let err = build(MessageDef::new("M").field(FieldDef::new("1st", 1, Type::Bool))).unwrap_err();
			assert!(matches!(err, DescriptorError::InvalidName { .. }));
		}

		#[test]
		fn test_invalid_type_name() {
			let err = build(MessageDef::new("pkg..M")).unwrap_err();
			assert!(matches!(err, DescriptorError::InvalidName { .. }));
		}

		#[test]
		fn test_field_number_zero() {
			let err = build(MessageDef::new("M").field(FieldDef::new("a", 0, Type::Bool))).unwrap_err();
			assert!(matches!(err, DescriptorError::InvalidFieldNumber { number: 0, .. }));
		}

		#[test]
		fn test_duplicate_field_name() {
			let err = build(
				MessageDef::new("M")
					.field(FieldDef::new("a", 1, Type::Bool))
					.field(FieldDef::new("a", 2, Type::Bool)),
			)
			.unwrap_err();
			assert!(matches!(err, DescriptorError::DuplicateFieldName { .. }));
		}

		#[test]
		fn test_duplicate_field_number() {
			let err = build(
				MessageDef::new("M")
					.field(FieldDef::new("a", 1, Type::Bool))
					.field(FieldDef::new("b", 1, Type::Bool)),
			)
			.unwrap_err();
			assert!(matches!(err, DescriptorError::DuplicateFieldNumber { number: 1, .. }));
		}

		#[test]
		fn test_duplicate_type_name() {
			let err = build(MessageDef::new("Color")).unwrap_err();
			assert!(matches!(err, DescriptorError::DuplicateTypeName { .. }));
		}

		#[test]
		fn test_missing_type_name() {
			let err = build(MessageDef::new("M").field(FieldDef::new("c", 1, Type::Enum))).unwrap_err();
			assert!(matches!(err, DescriptorError::MissingTypeName { .. }));
		}

		#[test]
		fn test_unexpected_type_name() {
			let err = build(MessageDef::new("M").field(FieldDef::new("c", 1, Type::Int32).with_type_name("Color")))
				.unwrap_err();
			assert!(matches!(err, DescriptorError::UnexpectedTypeName { .. }));
		}

		#[test]
		fn test_unresolved_type_name() {
			let err = build(MessageDef::new("M").field(FieldDef::message("c", 1, "Nope"))).unwrap_err();
			assert!(matches!(err, DescriptorError::UnresolvedTypeName { .. }));
		}

		#[test]
		fn test_type_kind_mismatch() {
			let err = build(MessageDef::new("M").field(FieldDef::message("c", 1, "Color"))).unwrap_err();
			assert!(matches!(
				err,
				DescriptorError::TypeKindMismatch {
					expected: Type::Message,
					..
				}
			));
		}

		#[test]
		fn test_duplicate_enum_entries() {
			let err = DescriptorPool::new(PoolDef::new().enumeration(EnumDef::new("E").value("A", 0).value("A", 1)))
				.unwrap_err();
			assert!(matches!(err, DescriptorError::DuplicateEnumName { .. }));

			let err = DescriptorPool::new(PoolDef::new().enumeration(EnumDef::new("E").value("A", 0).value("B", 0)))
				.unwrap_err();
			assert!(matches!(err, DescriptorError::DuplicateEnumValue { number: 0, .. }));
		}

		#[test]
		fn test_forward_references_resolve() {
			let pool = DescriptorPool::new(
				PoolDef::new()
					.message(MessageDef::new("A").field(FieldDef::message("b", 1, "B")))
					.message(MessageDef::new("B").field(FieldDef::message("a", 1, "A"))),
			)
			.unwrap();
			let a = pool.message("A").unwrap();
			let handle = a.type_handle(a.find_field("b").unwrap()).unwrap();
			assert_eq!(handle.as_message(), pool.message("B").as_ref());
		}

		#[test]
		fn test_from_json_reports_syntax_errors() {
			let err = DescriptorPool::from_json("{ not json").unwrap_err();
			assert!(matches!(err, DescriptorError::Json(_)));
		}
	}
}

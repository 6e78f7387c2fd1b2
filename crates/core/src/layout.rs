// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use protoslot_type::REFERENCE_SIZE;
use tracing::instrument;

use crate::descriptor::FieldDescriptor;

/// Byte offsets of every field of one message type and the size of the
/// storage buffer an instance needs. Built once per message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLayout {
	offsets: Vec<usize>,
	/// size of one storage buffer in bytes
	size: usize,
	alignment: usize,
}

impl MessageLayout {
	pub fn offset(&self, index: usize) -> usize {
		self.offsets[index]
	}

	pub fn offsets(&self) -> &[usize] {
		&self.offsets
	}

	pub const fn size(&self) -> usize {
		self.size
	}

	pub const fn alignment(&self) -> usize {
		self.alignment
	}

	pub fn len(&self) -> usize {
		self.offsets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.offsets.is_empty()
	}
}

/// Bytes a field occupies in the storage buffer. Repeated fields hold a
/// handle to their container whatever the element type.
pub fn slot_size(field: &FieldDescriptor) -> usize {
	if field.is_repeated() {
		REFERENCE_SIZE
	} else {
		field.r#type().size()
	}
}

/// Assigns offsets in declaration order, each aligned to the slot's own size.
#[instrument(name = "layout::build", level = "trace", skip(fields), fields(count = fields.len()))]
pub fn build_layout(fields: &[FieldDescriptor]) -> MessageLayout {
	let mut offset = 0;
	let mut offsets = Vec::with_capacity(fields.len());
	let mut max_align = 1;

	for (index, field) in fields.iter().enumerate() {
		debug_assert_eq!(field.index(), index);
		let size = slot_size(field);
		let align = size;

		offset = align_up(offset, align);
		offsets.push(offset);

		offset += size;
		max_align = max_align.max(align);
	}

	MessageLayout {
		offsets,
		size: align_up(offset, max_align),
		alignment: max_align,
	}
}

fn align_up(offset: usize, align: usize) -> usize {
	debug_assert!(align.is_power_of_two());
	(offset + align - 1) & !(align - 1)
}

#[cfg(test)]
pub mod tests {
	use protoslot_type::{REFERENCE_SIZE, Type};

	use crate::descriptor::{DescriptorPool, EnumDef, FieldDef, MessageDef, MessageType, PoolDef};

	mod align_up {
		use crate::layout::align_up;

		#[test]
		fn test_already_aligned() {
			assert_eq!(align_up(0, 8), 0);
			assert_eq!(align_up(8, 8), 8);
			assert_eq!(align_up(5, 1), 5);
		}

		#[test]
		fn test_rounds_up() {
			assert_eq!(align_up(1, 4), 4);
			assert_eq!(align_up(5, 8), 8);
			assert_eq!(align_up(9, 2), 10);
		}
	}

	mod build {
		use super::*;

		#[test]
		fn test_empty() {
			let layout = MessageType::testing(&[]).layout().clone();
			assert!(layout.is_empty());
			assert_eq!(layout.size(), 0);
			assert_eq!(layout.alignment(), 1);
		}

		#[test]
		fn test_single_bool() {
			let message = MessageType::testing(&[Type::Bool]);
			let layout = message.layout();
			assert_eq!(layout.offsets(), &[0]);
			assert_eq!(layout.size(), 1);
			assert_eq!(layout.alignment(), 1);
		}

		#[test]
		fn test_padding_between_fields() {
			let message = MessageType::testing(&[Type::Bool, Type::Int32, Type::Bool, Type::Float64]);
			let layout = message.layout();
			assert_eq!(layout.offsets(), &[0, 4, 8, 16]);
			assert_eq!(layout.size(), 24);
			assert_eq!(layout.alignment(), 8);
		}

		#[test]
		fn test_trailing_padding() {
			let message = MessageType::testing(&[Type::Int64, Type::Bool]);
			let layout = message.layout();
			assert_eq!(layout.offsets(), &[0, 8]);
			assert_eq!(layout.size(), 16);
		}

		#[test]
		fn test_reference_fields() {
			let message = MessageType::testing(&[Type::Bool, Type::String, Type::Bytes]);
			let layout = message.layout();
			assert_eq!(layout.offsets(), &[0, REFERENCE_SIZE, 2 * REFERENCE_SIZE]);
			assert_eq!(layout.size(), 3 * REFERENCE_SIZE);
			assert_eq!(layout.alignment(), REFERENCE_SIZE);
		}

		#[test]
		fn test_repeated_fields_hold_a_reference() {
			let pool = DescriptorPool::new(
				PoolDef::new().enumeration(EnumDef::new("E").value("A", 0)).message(
					MessageDef::new("M")
						.field(FieldDef::new("flag", 1, Type::Bool))
						.field(FieldDef::new("flags", 2, Type::Bool).repeated())
						.field(FieldDef::enumeration("e", 3, "E"))
						.field(FieldDef::enumeration("es", 4, "E").repeated()),
				),
			)
			.unwrap();
			let message = pool.message("M").unwrap();
			let layout = message.layout();
			assert_eq!(layout.offsets(), &[0, REFERENCE_SIZE, 2 * REFERENCE_SIZE, 3 * REFERENCE_SIZE]);
			assert_eq!(layout.size(), 4 * REFERENCE_SIZE);
		}

		#[test]
		fn test_deterministic() {
			let types = [Type::Uint32, Type::Bool, Type::Float64, Type::Int64];
			assert_eq!(MessageType::testing(&types).layout(), MessageType::testing(&types).layout());
		}
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use descriptor::{
	DescriptorError, DescriptorPool, EnumDescriptor, EnumType, FieldDescriptor, MessageDescriptor, MessageType,
	TypeHandle,
};
pub use layout::{MessageLayout, build_layout, slot_size};
pub use message::Message;
pub use protoslot_type::{Bytes, Error, Hash64, Label, RangeViolation, Result, Shared, Text, Type};
pub use repeated::RepeatedField;
pub use storage::MessageStorage;
pub use trace::{Reachability, Reference, Tracer, is_cyclic};
pub use value::Value;

pub mod descriptor;
pub mod layout;
mod message;
mod repeated;
pub mod slot;
mod storage;
mod trace;
mod value;

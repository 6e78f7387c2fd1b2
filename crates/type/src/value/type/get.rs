// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::{Bytes, Text, Type};

pub trait GetType {
	fn get_type() -> Type;
}

impl GetType for bool {
	fn get_type() -> Type {
		Type::Bool
	}
}

impl GetType for f32 {
	fn get_type() -> Type {
		Type::Float32
	}
}

impl GetType for f64 {
	fn get_type() -> Type {
		Type::Float64
	}
}

impl GetType for i32 {
	fn get_type() -> Type {
		Type::Int32
	}
}

impl GetType for i64 {
	fn get_type() -> Type {
		Type::Int64
	}
}

impl GetType for u32 {
	fn get_type() -> Type {
		Type::Uint32
	}
}

impl GetType for u64 {
	fn get_type() -> Type {
		Type::Uint64
	}
}

impl GetType for Text {
	fn get_type() -> Type {
		Type::String
	}
}

impl GetType for Bytes {
	fn get_type() -> Type {
		Type::Bytes
	}
}

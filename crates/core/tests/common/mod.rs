// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use protoslot_core::{
	DescriptorPool, MessageType, Type,
	descriptor::{EnumDef, FieldDef, MessageDef, PoolDef},
};

/// Routes library logging to the test output; set `RUST_LOG` to see it.
pub fn setup_logging() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
		)
		.with_test_writer()
		.try_init();
}

/// `Person { name: string, age: int32, active: bool, color: Color, best_friend: Person,
/// nicknames: [string], scores: [uint32] }` with `Color { RED: 0, GREEN: 1 }`.
pub fn people() -> DescriptorPool {
	setup_logging();
	DescriptorPool::new(
		PoolDef::new().enumeration(EnumDef::new("Color").value("RED", 0).value("GREEN", 1)).message(
			MessageDef::new("Person")
				.field(FieldDef::new("name", 1, Type::String))
				.field(FieldDef::new("age", 2, Type::Int32))
				.field(FieldDef::new("active", 3, Type::Bool))
				.field(FieldDef::enumeration("color", 4, "Color"))
				.field(FieldDef::message("best_friend", 5, "Person"))
				.field(FieldDef::new("nicknames", 6, Type::String).repeated())
				.field(FieldDef::new("scores", 7, Type::Uint32).repeated()),
		),
	)
	.unwrap()
}

pub fn person() -> MessageType {
	people().message("Person").unwrap()
}

/// A message with one field of `ty`, named `value`.
pub fn single(ty: Type) -> MessageType {
	setup_logging();
	let pool = DescriptorPool::new(
		PoolDef::new()
			.enumeration(EnumDef::new("Color").value("RED", 0).value("GREEN", 1))
			.message(MessageDef::new("Inner"))
			.message(MessageDef::new("Single").field(match ty {
				Type::Enum => FieldDef::enumeration("value", 1, "Color"),
				Type::Message => FieldDef::message("value", 1, "Inner"),
				ty => FieldDef::new("value", 1, ty),
			})),
	)
	.unwrap();
	pool.message("Single").unwrap()
}

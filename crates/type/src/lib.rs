// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use error::{Error, RangeViolation, Result};
pub use hash::{Hash64, combine, xxh3_64};
pub use value::{
	bytes::Bytes,
	label::Label,
	shared::Shared,
	text::Text,
	r#type::{GetType, REFERENCE_SIZE, Type},
};

pub mod error;
pub mod hash;
pub mod value;

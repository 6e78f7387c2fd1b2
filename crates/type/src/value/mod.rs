// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

pub mod bytes;
pub mod label;
pub mod shared;
pub mod text;
pub mod r#type;

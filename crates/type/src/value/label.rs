// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Field cardinality. Only `Repeated` changes how a field is stored.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
	#[default]
	Optional,
	Required,
	Repeated,
}

impl Label {
	pub fn is_repeated(&self) -> bool {
		matches!(self, Label::Repeated)
	}
}

impl Display for Label {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Label::Optional => f.write_str("optional"),
			Label::Required => f.write_str("required"),
			Label::Repeated => f.write_str("repeated"),
		}
	}
}

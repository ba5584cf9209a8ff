// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

pub mod document;
pub mod network;
pub mod write;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A structured description of a failure: a stable code, a human message,
/// and optional context for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.code)
	}
}

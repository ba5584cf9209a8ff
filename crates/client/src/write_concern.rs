// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use serde::{Deserialize, Serialize};
use vellum_type::Document;

/// How many nodes must acknowledge a write before the server replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acknowledgment {
	/// Fire and forget. The server sends no reply and the result carries
	/// no counters.
	Unacknowledged,
	/// A fixed number of nodes. `Nodes(1)` is the default.
	Nodes(u32),
	/// A majority of the replica set.
	Majority,
	/// A server-side tag set, by name.
	Custom(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteConcern {
	pub w: Acknowledgment,
	pub journal: Option<bool>,
	pub timeout_ms: Option<u32>,
}

impl Default for WriteConcern {
	fn default() -> Self {
		Self { w: Acknowledgment::Nodes(1), journal: None, timeout_ms: None }
	}
}

impl WriteConcern {
	pub fn unacknowledged() -> Self {
		Self { w: Acknowledgment::Unacknowledged, journal: None, timeout_ms: None }
	}

	pub fn majority() -> Self {
		Self { w: Acknowledgment::Majority, journal: None, timeout_ms: None }
	}

	/// An unacknowledged write cannot also demand journaling.
	pub fn is_valid(&self) -> bool {
		!(self.journal == Some(true) && !self.is_acknowledged())
	}

	pub fn is_acknowledged(&self) -> bool {
		!matches!(self.w, Acknowledgment::Unacknowledged | Acknowledgment::Nodes(0))
	}

	pub fn to_document(&self) -> Document {
		let mut doc = Document::new();
		match &self.w {
			Acknowledgment::Unacknowledged => doc.insert("w", 0i32),
			Acknowledgment::Nodes(n) => doc.insert("w", *n as i32),
			Acknowledgment::Majority => doc.insert("w", "majority"),
			Acknowledgment::Custom(tag) => doc.insert("w", tag.as_str()),
		};
		if let Some(journal) = self.journal {
			doc.insert("j", journal);
		}
		if let Some(timeout) = self.timeout_ms {
			doc.insert("wtimeout", timeout as i32);
		}
		doc
	}
}

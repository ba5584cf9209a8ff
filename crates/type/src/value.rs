// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::Document;

/// Identity of a single document. Generated ids are time-ordered so that
/// freshly inserted documents sort by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
	pub fn generate() -> Self {
		Self(Uuid::now_v7())
	}

	pub fn as_bytes(&self) -> &[u8; 16] {
		self.0.as_bytes()
	}

	pub fn from_bytes(bytes: [u8; 16]) -> Self {
		Self(Uuid::from_bytes(bytes))
	}
}

impl Display for DocumentId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

/// A single field value inside a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	None,
	Bool(bool),
	Int32(i32),
	Int64(i64),
	Float64(f64),
	Utf8(String),
	Id(DocumentId),
	Document(Document),
	Array(Vec<Value>),
}

impl Value {
	pub fn as_i32(&self) -> Option<i32> {
		match self {
			Value::Int32(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int32(v) => Some(i64::from(*v)),
			Value::Int64(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(v) => Some(v.as_str()),
			_ => None,
		}
	}

	pub fn as_document(&self) -> Option<&Document> {
		match self {
			Value::Document(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Value::Array(v) => Some(v.as_slice()),
			_ => None,
		}
	}

	pub(crate) fn to_json(&self) -> serde_json::Value {
		match self {
			Value::None => serde_json::Value::Null,
			Value::Bool(v) => serde_json::Value::Bool(*v),
			Value::Int32(v) => serde_json::Value::from(*v),
			Value::Int64(v) => serde_json::Value::from(*v),
			Value::Float64(v) => serde_json::Value::from(*v),
			Value::Utf8(v) => serde_json::Value::from(v.as_str()),
			Value::Id(v) => serde_json::Value::from(v.to_string()),
			Value::Document(v) => v.to_json(),
			Value::Array(values) => serde_json::Value::Array(
				values.iter().map(Value::to_json).collect(),
			),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int32(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int64(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float64(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl From<DocumentId> for Value {
	fn from(v: DocumentId) -> Self {
		Value::Id(v)
	}
}

impl From<Document> for Value {
	fn from(v: Document) -> Self {
		Value::Document(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::Array(v)
	}
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

//! Ordered-field documents and their wire codec.
//!
//! Every encoded document starts with a little-endian `u32` holding the total
//! encoded length, including the four prefix bytes themselves. A flat buffer
//! of back-to-back encoded documents is therefore self-describing and can be
//! walked with [`DocumentReader`] without any out-of-band index.

mod reader;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub use reader::{DocumentReader, RawDocument};

use crate::{
	Value, error,
	error::diagnostic::document::{malformed_document, truncated_document},
	return_error,
};

/// Smallest valid encoded document: the length prefix of an empty document.
pub const MIN_DOCUMENT_LEN: usize = 4;

const TAG_NONE: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_INT32: u8 = 0x02;
const TAG_INT64: u8 = 0x03;
const TAG_FLOAT64: u8 = 0x04;
const TAG_UTF8: u8 = 0x05;
const TAG_ID: u8 = 0x06;
const TAG_DOCUMENT: u8 = 0x07;
const TAG_ARRAY: u8 = 0x08;

/// A document: an ordered sequence of named values. Field order is
/// significant and preserved through encode/decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
	fields: Vec<(String, Value)>,
}

impl Document {
	pub fn new() -> Self {
		Self {
			fields: Vec::new(),
		}
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.fields.push((key.into(), value.into()));
		self
	}

	/// Inserts a field in front of every existing field. Used when a field
	/// must become the first field of the stored form, such as a generated
	/// document identity.
	pub fn prepend(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.fields.insert(0, (key.into(), value.into()));
		self
	}

	/// Appends every field of `other` after the fields of `self`.
	pub fn concat(&mut self, other: &Document) -> &mut Self {
		self.fields.extend(other.fields.iter().cloned());
		self
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.fields.iter().any(|(k, _)| k == key)
	}

	pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Exact byte length of the encoded form, prefix included. Always equals
	/// `self.encode().len()`.
	pub fn encoded_len(&self) -> usize {
		MIN_DOCUMENT_LEN + self.fields.iter().map(|(k, v)| field_len(k, v)).sum::<usize>()
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut buf = Vec::with_capacity(self.encoded_len());
		self.encode_into(&mut buf);
		buf
	}

	pub fn encode_into(&self, buf: &mut Vec<u8>) {
		let len = self.encoded_len();
		buf.extend_from_slice(&(len as u32).to_le_bytes());
		for (key, value) in &self.fields {
			buf.push(tag_of(value));
			buf.extend_from_slice(&(key.len() as u16).to_le_bytes());
			buf.extend_from_slice(key.as_bytes());
			encode_value(value, buf);
		}
	}

	/// Decodes exactly one document spanning the whole of `bytes`.
	pub fn decode(bytes: &[u8]) -> crate::Result<Document> {
		let mut cursor = Cursor::new(bytes);
		let declared = cursor.read_u32()? as usize;
		if declared < MIN_DOCUMENT_LEN || declared != bytes.len() {
			return_error!(malformed_document(format!(
				"declared length {} does not match buffer length {}",
				declared,
				bytes.len()
			)));
		}
		let mut fields = Vec::new();
		while !cursor.is_empty() {
			let tag = cursor.read_u8()?;
			let key_len = cursor.read_u16()? as usize;
			let key = String::from_utf8(cursor.read_bytes(key_len)?.to_vec())
				.map_err(|e| error!(malformed_document(format!("field name is not UTF-8: {}", e))))?;
			let value = decode_value(tag, &mut cursor)?;
			fields.push((key, value));
		}
		Ok(Document {
			fields,
		})
	}

	pub(crate) fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(
			self.fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
		)
	}
}

impl Display for Document {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.to_json().to_string())
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Document {
			fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

fn tag_of(value: &Value) -> u8 {
	match value {
		Value::None => TAG_NONE,
		Value::Bool(_) => TAG_BOOL,
		Value::Int32(_) => TAG_INT32,
		Value::Int64(_) => TAG_INT64,
		Value::Float64(_) => TAG_FLOAT64,
		Value::Utf8(_) => TAG_UTF8,
		Value::Id(_) => TAG_ID,
		Value::Document(_) => TAG_DOCUMENT,
		Value::Array(_) => TAG_ARRAY,
	}
}

fn value_len(value: &Value) -> usize {
	match value {
		Value::None => 0,
		Value::Bool(_) => 1,
		Value::Int32(_) => 4,
		Value::Int64(_) => 8,
		Value::Float64(_) => 8,
		Value::Utf8(s) => 4 + s.len(),
		Value::Id(_) => 16,
		Value::Document(doc) => doc.encoded_len(),
		Value::Array(values) => 4 + values.iter().map(|v| 1 + value_len(v)).sum::<usize>(),
	}
}

fn field_len(key: &str, value: &Value) -> usize {
	1 + 2 + key.len() + value_len(value)
}

fn encode_value(value: &Value, buf: &mut Vec<u8>) {
	match value {
		Value::None => {}
		Value::Bool(v) => buf.push(u8::from(*v)),
		Value::Int32(v) => buf.extend_from_slice(&v.to_le_bytes()),
		Value::Int64(v) => buf.extend_from_slice(&v.to_le_bytes()),
		Value::Float64(v) => buf.extend_from_slice(&v.to_le_bytes()),
		Value::Utf8(s) => {
			buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
			buf.extend_from_slice(s.as_bytes());
		}
		Value::Id(id) => buf.extend_from_slice(id.as_bytes()),
		Value::Document(doc) => doc.encode_into(buf),
		Value::Array(values) => {
			buf.extend_from_slice(&(values.len() as u32).to_le_bytes());
			for v in values {
				buf.push(tag_of(v));
				encode_value(v, buf);
			}
		}
	}
}

fn decode_value(tag: u8, cursor: &mut Cursor<'_>) -> crate::Result<Value> {
	let value = match tag {
		TAG_NONE => Value::None,
		TAG_BOOL => Value::Bool(cursor.read_u8()? != 0),
		TAG_INT32 => Value::Int32(i32::from_le_bytes(cursor.read_array()?)),
		TAG_INT64 => Value::Int64(i64::from_le_bytes(cursor.read_array()?)),
		TAG_FLOAT64 => Value::Float64(f64::from_le_bytes(cursor.read_array()?)),
		TAG_UTF8 => {
			let len = cursor.read_u32()? as usize;
			let bytes = cursor.read_bytes(len)?;
			Value::Utf8(String::from_utf8(bytes.to_vec()).map_err(|e| {
				error!(malformed_document(format!("string value is not UTF-8: {}", e)))
			})?)
		}
		TAG_ID => Value::Id(crate::DocumentId::from_bytes(cursor.read_array()?)),
		TAG_DOCUMENT => {
			let len = cursor.peek_u32()? as usize;
			if len < MIN_DOCUMENT_LEN {
				return_error!(malformed_document(format!(
					"nested document declares length {}",
					len
				)));
			}
			let bytes = cursor.read_bytes(len)?;
			Value::Document(Document::decode(bytes)?)
		}
		TAG_ARRAY => {
			let count = cursor.read_u32()? as usize;
			let mut values = Vec::with_capacity(count.min(1024));
			for _ in 0..count {
				let tag = cursor.read_u8()?;
				values.push(decode_value(tag, cursor)?);
			}
			Value::Array(values)
		}
		other => return_error!(malformed_document(format!("unknown value tag {:#04x}", other))),
	};
	Ok(value)
}

struct Cursor<'a> {
	buf: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	fn new(buf: &'a [u8]) -> Self {
		Self {
			buf,
			pos: 0,
		}
	}

	fn is_empty(&self) -> bool {
		self.pos == self.buf.len()
	}

	fn read_bytes(&mut self, len: usize) -> crate::Result<&'a [u8]> {
		if self.pos + len > self.buf.len() {
			return_error!(truncated_document(self.pos, len, self.buf.len()));
		}
		let bytes = &self.buf[self.pos..self.pos + len];
		self.pos += len;
		Ok(bytes)
	}

	fn read_array<const N: usize>(&mut self) -> crate::Result<[u8; N]> {
		let bytes = self.read_bytes(N)?;
		let mut out = [0u8; N];
		out.copy_from_slice(bytes);
		Ok(out)
	}

	fn read_u8(&mut self) -> crate::Result<u8> {
		Ok(self.read_bytes(1)?[0])
	}

	fn read_u16(&mut self) -> crate::Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	fn read_u32(&mut self) -> crate::Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	fn peek_u32(&self) -> crate::Result<u32> {
		if self.pos + 4 > self.buf.len() {
			return_error!(truncated_document(self.pos, 4, self.buf.len()));
		}
		let mut out = [0u8; 4];
		out.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
		Ok(u32::from_le_bytes(out))
	}
}

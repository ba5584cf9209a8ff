// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use crate::{
	Document,
	document::MIN_DOCUMENT_LEN,
	error::diagnostic::document::{malformed_document, truncated_document},
	return_error,
};

/// One encoded document borrowed out of a flat payload buffer. The slice
/// includes the four-byte length prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDocument<'a> {
	bytes: &'a [u8],
}

impl<'a> RawDocument<'a> {
	pub fn bytes(&self) -> &'a [u8] {
		self.bytes
	}

	/// Encoded length, prefix included.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	pub fn is_empty(&self) -> bool {
		false
	}

	pub fn decode(&self) -> crate::Result<Document> {
		Document::decode(self.bytes)
	}
}

/// Walks a flat buffer of back-to-back length-prefixed documents, yielding
/// one [`RawDocument`] at a time. [`offset`](Self::offset) reports the byte
/// position of the next unread document, which callers use to slice batches
/// out of the underlying buffer.
pub struct DocumentReader<'a> {
	buf: &'a [u8],
	offset: usize,
}

impl<'a> DocumentReader<'a> {
	pub fn new(buf: &'a [u8]) -> Self {
		Self {
			buf,
			offset: 0,
		}
	}

	/// Byte offset of the next unread document.
	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn remaining(&self) -> usize {
		self.buf.len() - self.offset
	}

	/// Reads the next document, or `None` at the end of the buffer.
	pub fn read(&mut self) -> crate::Result<Option<RawDocument<'a>>> {
		if self.offset == self.buf.len() {
			return Ok(None);
		}
		if self.remaining() < MIN_DOCUMENT_LEN {
			return_error!(truncated_document(self.offset, MIN_DOCUMENT_LEN, self.buf.len()));
		}
		let mut prefix = [0u8; 4];
		prefix.copy_from_slice(&self.buf[self.offset..self.offset + 4]);
		let len = u32::from_le_bytes(prefix) as usize;
		if len < MIN_DOCUMENT_LEN {
			return_error!(malformed_document(format!(
				"document at offset {} declares length {}",
				self.offset, len
			)));
		}
		if self.offset + len > self.buf.len() {
			return_error!(truncated_document(self.offset, len, self.buf.len()));
		}
		let bytes = &self.buf[self.offset..self.offset + len];
		self.offset += len;
		Ok(Some(RawDocument {
			bytes,
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Document;

	fn doc(key: &str, value: i32) -> Document {
		let mut doc = Document::new();
		doc.insert(key, value);
		doc
	}

	#[test]
	fn test_reads_back_to_back_documents() {
		let mut buf = Vec::new();
		doc("a", 1).encode_into(&mut buf);
		doc("b", 2).encode_into(&mut buf);
		doc("c", 3).encode_into(&mut buf);

		let mut reader = DocumentReader::new(&buf);
		let mut keys = Vec::new();
		while let Some(raw) = reader.read().unwrap() {
			let decoded = raw.decode().unwrap();
			keys.push(decoded.fields().next().unwrap().0.to_string());
		}
		assert_eq!(keys, vec!["a", "b", "c"]);
		assert_eq!(reader.offset(), buf.len());
	}

	#[test]
	fn test_empty_buffer_yields_none() {
		let mut reader = DocumentReader::new(&[]);
		assert!(reader.read().unwrap().is_none());
	}

	#[test]
	fn test_truncated_tail_is_an_error() {
		let mut buf = Vec::new();
		doc("a", 1).encode_into(&mut buf);
		buf.truncate(buf.len() - 2);

		let mut reader = DocumentReader::new(&buf);
		let err = reader.read().unwrap_err();
		assert_eq!(err.code, "DOCUMENT_003");
	}

	#[test]
	fn test_undersized_length_prefix_is_an_error() {
		let buf = 2u32.to_le_bytes();
		let mut reader = DocumentReader::new(&buf);
		let err = reader.read().unwrap_err();
		assert_eq!(err.code, "DOCUMENT_002");
	}

	#[test]
	fn test_raw_len_matches_encoded_len() {
		let document = doc("key", 42);
		let buf = document.encode();
		let mut reader = DocumentReader::new(&buf);
		let raw = reader.read().unwrap().unwrap();
		assert_eq!(raw.len(), document.encoded_len());
		assert_eq!(raw.decode().unwrap(), document);
	}
}

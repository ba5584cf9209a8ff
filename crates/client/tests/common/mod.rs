// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

#![allow(dead_code)]

use std::collections::VecDeque;

use vellum_client::{
	BulkWriteFlags, Document, DocumentReader, LegacyWriter, Namespace, ServerLimits, Transport,
	Value, WireRequest, WriteCommand, WriteKind, WriteResult,
};
use vellum_type::{Error, error::diagnostic::network::transport_error};

/// Everything the engine put on the wire for one send, decoded for
/// assertions.
pub struct RecordedRequest {
	pub command: Document,
	pub sequence_identifier: Option<String>,
	pub sequence_bytes: usize,
	pub documents: Vec<Document>,
	pub operation_id: i64,
}

/// Scripted transport. Replies are served in push order; without a script,
/// every send succeeds with `{ok: 1, n: <documents sent>}`.
pub struct MockTransport {
	pub limits: ServerLimits,
	pub replies: VecDeque<vellum_client::Result<Document>>,
	pub requests: Vec<RecordedRequest>,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::with_limits(ServerLimits::default())
	}

	pub fn with_limits(limits: ServerLimits) -> Self {
		Self { limits, replies: VecDeque::new(), requests: Vec::new() }
	}

	pub fn push_reply(&mut self, reply: Document) {
		self.replies.push_back(Ok(reply));
	}

	pub fn push_failure(&mut self) {
		self.replies.push_back(Err(Error(transport_error("connection reset"))));
	}
}

impl Transport for MockTransport {
	fn limits(&self) -> ServerLimits {
		self.limits.clone()
	}

	fn send(&mut self, request: WireRequest<'_>) -> vellum_client::Result<Document> {
		let mut documents = Vec::new();
		let mut sequence_identifier = None;
		let mut sequence_bytes = 0;
		if let Some(sequence) = &request.sequence {
			sequence_identifier = Some(sequence.identifier.to_string());
			sequence_bytes = sequence.payload.len();
			let mut reader = DocumentReader::new(sequence.payload);
			while let Some(raw) = reader.read().expect("sequence payload decodes") {
				documents.push(raw.decode().expect("sequence document decodes"));
			}
		}
		for field in ["documents", "updates", "deletes"] {
			if let Some(entries) = request.command.get(field).and_then(Value::as_array) {
				for entry in entries {
					if let Some(doc) = entry.as_document() {
						documents.push(doc.clone());
					}
				}
			}
		}
		let n = documents.len() as i64;
		self.requests.push(RecordedRequest {
			command: request.command.clone(),
			sequence_identifier,
			sequence_bytes,
			documents,
			operation_id: request.operation_id,
		});
		match self.replies.pop_front() {
			Some(reply) => reply,
			None => Ok(ok_reply(n)),
		}
	}
}

/// Records which writer method ran, with the offset it was handed.
#[derive(Default)]
pub struct MockLegacyWriter {
	pub calls: Vec<(&'static str, usize)>,
}

impl LegacyWriter for MockLegacyWriter {
	fn insert(
		&mut self,
		_namespace: Namespace<'_>,
		_command: &WriteCommand,
		offset: usize,
		_result: &mut WriteResult,
	) -> vellum_client::Result<()> {
		self.calls.push(("insert", offset));
		Ok(())
	}

	fn update(
		&mut self,
		_namespace: Namespace<'_>,
		_command: &WriteCommand,
		offset: usize,
		_result: &mut WriteResult,
	) -> vellum_client::Result<()> {
		self.calls.push(("update", offset));
		Ok(())
	}

	fn delete(
		&mut self,
		_namespace: Namespace<'_>,
		_command: &WriteCommand,
		offset: usize,
		_result: &mut WriteResult,
	) -> vellum_client::Result<()> {
		self.calls.push(("delete", offset));
		Ok(())
	}
}

pub fn namespace() -> Namespace<'static> {
	Namespace::new("app", "events")
}

pub fn ok_reply(n: i64) -> Document {
	let mut reply = Document::new();
	reply.insert("ok", 1i32);
	reply.insert("n", n);
	reply
}

pub fn write_error_entry(index: i64, code: i32, message: &str) -> Value {
	let mut entry = Document::new();
	entry.insert("index", index);
	entry.insert("code", code);
	entry.insert("errmsg", message);
	Value::Document(entry)
}

pub fn reply_with_write_errors(n: i64, errors: Vec<Value>) -> Document {
	let mut reply = ok_reply(n);
	reply.insert("writeErrors", errors);
	reply
}

/// A document whose encoded length is exactly `36 + pad_len` bytes once an
/// `_id` has been synthesized for it.
pub fn padded_doc(pad_len: usize) -> Document {
	let mut doc = Document::new();
	doc.insert("pad", "x".repeat(pad_len));
	doc
}

/// An insert command holding `count` documents of `36 + pad_len` encoded
/// bytes each.
pub fn insert_command(count: usize, pad_len: usize, flags: BulkWriteFlags) -> WriteCommand {
	let mut command = WriteCommand::new(WriteKind::Insert, flags, 1);
	for _ in 0..count {
		command.append_insert(&padded_doc(pad_len));
	}
	command
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use std::sync::atomic::{AtomicI64, Ordering};

use vellum_type::{Document, DocumentId};

use crate::write_concern::WriteConcern;

static OPERATION_ID: AtomicI64 = AtomicI64::new(1);

/// Returns a process-unique id correlating every batch of one logical
/// operation in logs and traces.
pub fn next_operation_id() -> i64 {
	OPERATION_ID.fetch_add(1, Ordering::Relaxed)
}

/// The three write operations a command can carry. A command holds documents
/// of exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
	Delete,
	Insert,
	Update,
}

impl WriteKind {
	/// The command name, also the envelope's first key.
	pub fn name(&self) -> &'static str {
		match self {
			WriteKind::Delete => "delete",
			WriteKind::Insert => "insert",
			WriteKind::Update => "update",
		}
	}

	/// The key under which the documents travel, in the envelope's array
	/// form or as a sequence identifier.
	pub fn field_name(&self) -> &'static str {
		match self {
			WriteKind::Delete => "deletes",
			WriteKind::Insert => "documents",
			WriteKind::Update => "updates",
		}
	}
}

/// Flags fixed at command construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkWriteFlags {
	/// Ordered commands stop at the first server write error; unordered
	/// commands attempt every document.
	pub ordered: bool,
	/// Tri-state: absent means the server default applies.
	pub bypass_document_validation: Option<bool>,
	/// Lets a legacy per-operation writer pack multiple inserts into one
	/// wire message. Only consulted by [`LegacyWriter`] implementations.
	///
	/// [`LegacyWriter`]: crate::dispatch::legacy::LegacyWriter
	pub allow_bulk_insert: bool,
	/// Sticky: set once any appended operation carries collation options,
	/// never cleared.
	pub has_collation: bool,
}

impl Default for BulkWriteFlags {
	fn default() -> Self {
		Self {
			ordered: true,
			bypass_document_validation: None,
			allow_bulk_insert: true,
			has_collation: false,
		}
	}
}

/// An accumulating write command. Appended operations are encoded
/// immediately into a single contiguous payload buffer; batch splitting
/// later slices that buffer without re-encoding.
#[derive(Debug)]
pub struct WriteCommand {
	kind: WriteKind,
	flags: BulkWriteFlags,
	operation_id: i64,
	payload: Vec<u8>,
	n_documents: usize,
}

impl WriteCommand {
	pub fn new(kind: WriteKind, flags: BulkWriteFlags, operation_id: i64) -> Self {
		Self { kind, flags, operation_id, payload: Vec::new(), n_documents: 0 }
	}

	/// A new insert command seeded with one document.
	pub fn insert(document: &Document, flags: BulkWriteFlags, operation_id: i64) -> Self {
		let mut command = Self::new(WriteKind::Insert, flags, operation_id);
		command.append_insert(document);
		command
	}

	/// A new update command seeded with one operation.
	pub fn update(
		selector: &Document,
		update: &Document,
		opts: Option<&Document>,
		flags: BulkWriteFlags,
		operation_id: i64,
	) -> Self {
		let mut command = Self::new(WriteKind::Update, flags, operation_id);
		command.append_update(selector, update, opts);
		command
	}

	/// A new delete command seeded with one operation.
	pub fn delete(
		selector: &Document,
		opts: Option<&Document>,
		flags: BulkWriteFlags,
		operation_id: i64,
	) -> Self {
		let mut command = Self::new(WriteKind::Delete, flags, operation_id);
		command.append_delete(selector, opts);
		command
	}

	pub fn kind(&self) -> WriteKind {
		self.kind
	}

	pub fn flags(&self) -> BulkWriteFlags {
		self.flags
	}

	pub fn operation_id(&self) -> i64 {
		self.operation_id
	}

	/// The raw payload: every appended document, encoded back to back.
	pub fn payload(&self) -> &[u8] {
		&self.payload
	}

	pub fn n_documents(&self) -> usize {
		self.n_documents
	}

	/// Appends one document to an insert command. A document without an
	/// `_id` gets a freshly generated one, prepended so it encodes first.
	pub fn append_insert(&mut self, document: &Document) {
		debug_assert!(matches!(self.kind, WriteKind::Insert));
		if document.contains_key("_id") {
			document.encode_into(&mut self.payload);
		} else {
			let mut with_id = document.clone();
			with_id.prepend("_id", DocumentId::generate());
			with_id.encode_into(&mut self.payload);
		}
		self.n_documents += 1;
	}

	/// Appends one operation to an update command, wrapping selector and
	/// update as `{q, u}` and splicing any option fields alongside them.
	pub fn append_update(&mut self, selector: &Document, update: &Document, opts: Option<&Document>) {
		debug_assert!(matches!(self.kind, WriteKind::Update));
		let mut operation = Document::new();
		operation.insert("q", selector.clone());
		operation.insert("u", update.clone());
		if let Some(opts) = opts {
			operation.concat(opts);
			self.note_collation(opts);
		}
		operation.encode_into(&mut self.payload);
		self.n_documents += 1;
	}

	/// Appends one operation to a delete command, wrapping the selector as
	/// `{q}` and splicing any option fields alongside it.
	pub fn append_delete(&mut self, selector: &Document, opts: Option<&Document>) {
		debug_assert!(matches!(self.kind, WriteKind::Delete));
		let mut operation = Document::new();
		operation.insert("q", selector.clone());
		if let Some(opts) = opts {
			operation.concat(opts);
			self.note_collation(opts);
		}
		operation.encode_into(&mut self.payload);
		self.n_documents += 1;
	}

	fn note_collation(&mut self, opts: &Document) {
		if opts.contains_key("collation") {
			self.flags.has_collation = true;
		}
	}

	/// Builds the command envelope shared by every batch of this command.
	/// Returns `None` when the command holds no documents.
	pub fn envelope(&self, collection: &str, write_concern: &WriteConcern) -> Option<Document> {
		if self.n_documents == 0 {
			return None;
		}
		let mut envelope = Document::new();
		envelope.insert(self.kind.name(), collection);
		envelope.insert("writeConcern", write_concern.to_document());
		envelope.insert("ordered", self.flags.ordered);
		if let Some(bypass) = self.flags.bypass_document_validation {
			envelope.insert("bypassDocumentValidation", bypass);
		}
		Some(envelope)
	}
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

//! Batch splitting over an accumulated payload buffer.

/// Extra room the server grants a command document beyond the maximum
/// document size, so a maximum-size document still fits once wrapped in its
/// envelope.
pub const DOCUMENT_ALLOWANCE: usize = 16 * 1024;

/// Whether adding `document_len` more bytes to a command already holding
/// `len_so_far` bytes and `n_documents_written` documents would exceed the
/// server's limits. A `max_batch_count` of zero means unlimited.
pub fn will_overflow(
	len_so_far: usize,
	document_len: usize,
	n_documents_written: usize,
	max_document_size: usize,
	max_batch_count: usize,
) -> bool {
	debug_assert!(max_document_size > 0);
	let max_command_size = max_document_size + DOCUMENT_ALLOWANCE;
	if len_so_far + document_len > max_command_size {
		return true;
	}
	max_batch_count > 0 && n_documents_written >= max_batch_count
}

/// One contiguous slice of the payload buffer, ready for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
	/// Byte offset of the first document within the payload buffer.
	pub offset_bytes: usize,
	/// Total encoded length of the batch's documents.
	pub len_bytes: usize,
	/// Index of the batch's first document within the command.
	pub first_index: usize,
	pub n_documents: usize,
}

impl Batch {
	pub fn starting_at(offset_bytes: usize, first_index: usize) -> Self {
		Self { offset_bytes, len_bytes: 0, first_index, n_documents: 0 }
	}

	pub fn is_empty(&self) -> bool {
		self.n_documents == 0
	}

	pub fn push(&mut self, document_len: usize) {
		self.len_bytes += document_len;
		self.n_documents += 1;
	}
}

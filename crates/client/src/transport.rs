// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use serde::{Deserialize, Serialize};
use vellum_type::{Document, DocumentId};

/// Wire protocol generation advertised by a server during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireVersion(pub i32);

impl WireVersion {
	/// First generation that understands collation options on updates and
	/// deletes.
	pub const COLLATION: WireVersion = WireVersion(5);
	/// First generation that understands the modern message framing with
	/// out-of-band document sequences.
	pub const MODERN_FRAMING: WireVersion = WireVersion(6);

	pub fn supports_collation(&self) -> bool {
		*self >= Self::COLLATION
	}

	pub fn supports_modern_framing(&self) -> bool {
		*self >= Self::MODERN_FRAMING
	}
}

/// Sizing limits advertised by the connected server. Batch splitting never
/// produces a message that violates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerLimits {
	/// Largest single document the server accepts, in bytes.
	pub max_document_size: usize,
	/// Largest wire message the server accepts, in bytes.
	pub max_message_size: usize,
	/// Most documents a single write command may carry. Zero means
	/// unlimited.
	pub max_write_batch_size: usize,
	pub wire_version: WireVersion,
}

impl Default for ServerLimits {
	fn default() -> Self {
		Self {
			max_document_size: 16 * 1024 * 1024,
			max_message_size: 48_000_000,
			max_write_batch_size: 1000,
			wire_version: WireVersion::MODERN_FRAMING,
		}
	}
}

/// A fully qualified collection name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace<'a> {
	pub database: &'a str,
	pub collection: &'a str,
}

impl<'a> Namespace<'a> {
	pub fn new(database: &'a str, collection: &'a str) -> Self {
		Self { database, collection }
	}
}

/// A logical session pinned to a sequence of commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
	pub id: DocumentId,
}

impl Session {
	pub fn new() -> Self {
		Self { id: DocumentId::generate() }
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}

/// A run of back-to-back encoded documents attached to a command outside its
/// body, under the given identifier. The bytes are a slice of the command's
/// payload buffer and are never re-encoded.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSequence<'a> {
	pub identifier: &'a str,
	pub payload: &'a [u8],
	pub n_documents: usize,
}

/// One command ready for the wire.
#[derive(Debug)]
pub struct WireRequest<'a> {
	pub database: &'a str,
	pub command: &'a Document,
	pub sequence: Option<DocumentSequence<'a>>,
	pub operation_id: i64,
	pub session: Option<&'a Session>,
}

/// The connection to a server. The engine stays agnostic of sockets and
/// framing; it hands over assembled requests and receives decoded replies.
pub trait Transport {
	fn limits(&self) -> ServerLimits;

	/// Delivers one request and returns the server's reply document.
	/// An error means the message could not be delivered or answered.
	fn send(&mut self, request: WireRequest<'_>) -> crate::Result<Document>;
}

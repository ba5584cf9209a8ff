// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

//! Aggregation of per-batch server replies into one caller-facing result.

use vellum_type::{
	Document, Error, Value,
	error::diagnostic::{
		document::document_too_large,
		write::{server_write_concern_errors, server_write_errors},
	},
};

use crate::command::WriteKind;
use crate::write_concern::WriteConcern;

/// Server error code reported for a document that exceeds the size limit
/// and is rejected locally without ever reaching the wire.
pub const DOCUMENT_TOO_LARGE_CODE: i32 = 2;

/// Which subsystem a synthesized final error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDomain {
	Server,
	Collection,
	WriteConcern,
	Command,
}

impl ErrorDomain {
	fn prefix(&self) -> &'static str {
		match self {
			ErrorDomain::Server => "SERVER",
			ErrorDomain::Collection => "COLLECTION",
			ErrorDomain::WriteConcern => "WRITE_CONCERN",
			ErrorDomain::Command => "COMMAND",
		}
	}
}

/// Error reporting contract selected by the application. Version two
/// attributes every server-sourced error to the server domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorApiVersion {
	Legacy,
	V2,
}

/// One upsert reported by the server, with the document index rebased to
/// the caller's original ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted {
	pub index: usize,
	pub id: Value,
}

/// One per-document failure, with the index rebased to the caller's
/// original ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteError {
	pub index: usize,
	pub code: i32,
	pub message: String,
}

/// Accumulated outcome of a dispatched write command. Each batch reply is
/// merged exactly once; [`WriteResult::complete`] then resolves the final
/// verdict.
#[derive(Debug, Default)]
pub struct WriteResult {
	pub n_inserted: i64,
	pub n_matched: i64,
	pub n_modified: i64,
	pub n_removed: i64,
	pub n_upserted: i64,
	pub upserted: Vec<Upserted>,
	pub write_errors: Vec<WriteError>,
	pub write_concern_errors: Vec<Document>,
	/// Set when any batch failed, locally or on the server.
	pub failed: bool,
	/// Set when dispatch must not send further batches.
	pub must_stop: bool,
	/// First error recorded; later errors never displace it.
	pub error: Option<Error>,
}

impl WriteResult {
	pub fn new() -> Self {
		Self::default()
	}

	/// Folds one batch reply into the result. `offset` is the absolute
	/// index of the batch's first document within the caller's sequence;
	/// every index in the reply is batch-local and gets rebased by it.
	pub fn merge(&mut self, kind: WriteKind, reply: &Document, offset: usize) {
		let affected = reply.get("n").and_then(Value::as_i64).unwrap_or(0);

		let write_errors = reply.get("writeErrors").and_then(Value::as_array);
		if write_errors.is_some_and(|errors| !errors.is_empty()) {
			self.failed = true;
		}

		match kind {
			WriteKind::Insert => self.n_inserted += affected,
			WriteKind::Delete => self.n_removed += affected,
			WriteKind::Update => {
				if let Some(entries) = reply.get("upserted").and_then(Value::as_array) {
					let mut n_upserted = 0i64;
					for entry in entries {
						let Some(doc) = entry.as_document() else { continue };
						let Some(index) = doc.get("index").and_then(Value::as_i64) else {
							continue;
						};
						let Some(id) = doc.get("_id") else { continue };
						self.upserted.push(Upserted {
							index: offset + index as usize,
							id: id.clone(),
						});
						n_upserted += 1;
					}
					self.n_upserted += n_upserted;
					// XXX the matched contribution for replies mixing
					// upserts and matches is suspect.
					self.n_matched += (affected - n_upserted).max(0);
				} else {
					self.n_matched += affected;
				}
				if let Some(n_modified) = reply.get("nModified").and_then(Value::as_i64) {
					self.n_modified += n_modified;
				}
			}
		}

		if let Some(entries) = write_errors {
			for entry in entries {
				let Some(doc) = entry.as_document() else { continue };
				let index =
					doc.get("index").and_then(Value::as_i64).unwrap_or(0) as usize + offset;
				let code = doc.get("code").and_then(Value::as_i32).unwrap_or(0);
				let message = doc
					.get("errmsg")
					.and_then(Value::as_str)
					.unwrap_or_default()
					.to_string();
				self.write_errors.push(WriteError { index, code, message });
			}
		}

		if let Some(wc_error) = reply.get("writeConcernError").and_then(Value::as_document) {
			self.write_concern_errors.push(wc_error.clone());
		}
	}

	/// Records a document rejected locally for exceeding the size limit.
	/// The rejection surfaces as a write error at the document's absolute
	/// index; dispatch of the remaining documents continues.
	pub fn record_too_large(&mut self, index: usize, len: usize, max_document_size: usize) {
		self.failed = true;
		let diagnostic = document_too_large(index, len, max_document_size);
		self.write_errors.push(WriteError {
			index,
			code: DOCUMENT_TOO_LARGE_CODE,
			message: diagnostic.message.clone(),
		});
		if self.error.is_none() {
			self.error = Some(Error(diagnostic));
		}
	}

	/// Records a failure to deliver a batch. No further batch may be sent;
	/// the server's state is unknown.
	pub fn record_transport_failure(&mut self, error: Error) {
		self.failed = true;
		self.must_stop = true;
		if self.error.is_none() {
			self.error = Some(error);
		}
	}

	/// Records a local failure to assemble a wire message. Nothing was
	/// sent for this batch and dispatch stops.
	pub fn record_assembly_failure(&mut self, error: Error) {
		self.failed = true;
		self.must_stop = true;
		if self.error.is_none() {
			self.error = Some(error);
		}
	}

	/// Records a precondition violation detected before any dispatch.
	pub fn record_error(&mut self, error: Error) {
		self.failed = true;
		if self.error.is_none() {
			self.error = Some(error);
		}
	}

	/// Resolves the final verdict: synthesizes a single error from the
	/// collected write errors (or, failing that, write concern errors),
	/// optionally renders the caller-facing reply document, and returns
	/// `Ok` only when nothing failed.
	///
	/// Domain resolution only applies to the errors synthesized here; an
	/// error recorded during dispatch already carries its domain in its
	/// diagnostic code and passes through unchanged.
	pub fn complete(
		&mut self,
		error_api: ErrorApiVersion,
		write_concern: &WriteConcern,
		domain_override: Option<ErrorDomain>,
		output: Option<&mut Document>,
	) -> crate::Result<()> {
		let domain = match (error_api, domain_override) {
			(ErrorApiVersion::V2, _) => ErrorDomain::Server,
			(_, Some(domain)) => domain,
			_ => ErrorDomain::Collection,
		};

		if let Some(out) = output {
			if write_concern.is_acknowledged() {
				self.render(out);
			}
		}

		if !self.write_errors.is_empty() {
			let code = self
				.write_errors
				.iter()
				.map(|error| error.code)
				.find(|code| *code != 0)
				.unwrap_or(0);
			if code != 0 {
				let messages: Vec<&str> =
					self.write_errors.iter().map(|error| error.message.as_str()).collect();
				let message = compose_error_message("write", &messages);
				self.error =
					Some(Error(server_write_errors(domain.prefix(), code, message)));
			}
		}

		if self.error.is_none() && !self.write_concern_errors.is_empty() {
			let mut code = 0i32;
			let mut messages = Vec::new();
			for doc in &self.write_concern_errors {
				if code == 0 {
					code = doc.get("code").and_then(Value::as_i32).unwrap_or(0);
				}
				messages.push(doc.get("errmsg").and_then(Value::as_str).unwrap_or_default());
			}
			let message = compose_error_message("write concern", &messages);
			self.error = Some(Error(server_write_concern_errors(code, message)));
		}

		match (&self.error, self.failed) {
			(None, false) => Ok(()),
			(Some(error), _) => Err(error.clone()),
			(None, true) => Err(Error(server_write_errors(
				domain.prefix(),
				0,
				"write operation failed".to_string(),
			))),
		}
	}

	fn render(&self, out: &mut Document) {
		out.insert("nInserted", self.n_inserted);
		out.insert("nMatched", self.n_matched);
		out.insert("nModified", self.n_modified);
		out.insert("nRemoved", self.n_removed);
		out.insert("nUpserted", self.n_upserted);
		if !self.upserted.is_empty() {
			let entries: Vec<Value> = self
				.upserted
				.iter()
				.map(|upserted| {
					let mut entry = Document::new();
					entry.insert("index", upserted.index as i64);
					entry.insert("_id", upserted.id.clone());
					Value::Document(entry)
				})
				.collect();
			out.insert("upserted", entries);
		}
		let errors: Vec<Value> = self
			.write_errors
			.iter()
			.map(|error| {
				let mut entry = Document::new();
				entry.insert("index", error.index as i64);
				entry.insert("code", error.code);
				entry.insert("errmsg", error.message.as_str());
				Value::Document(entry)
			})
			.collect();
		out.insert("writeErrors", errors);
		if !self.write_concern_errors.is_empty() {
			let entries: Vec<Value> = self
				.write_concern_errors
				.iter()
				.map(|doc| Value::Document(doc.clone()))
				.collect();
			out.insert("writeConcernErrors", entries);
		}
	}
}

fn compose_error_message(error_type: &str, messages: &[&str]) -> String {
	if messages.len() == 1 {
		return messages[0].to_string();
	}
	let quoted: Vec<String> = messages.iter().map(|message| format!("\"{}\"", message)).collect();
	format!("Multiple {} errors: {}", error_type, quoted.join(", "))
}

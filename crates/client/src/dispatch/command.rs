// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use tracing::debug;
use vellum_type::{DocumentReader, Value};

use crate::batch::will_overflow;
use crate::command::WriteCommand;
use crate::result::WriteResult;
use crate::transport::{Namespace, Session, Transport, WireRequest};
use crate::write_concern::WriteConcern;

/// Sends the command in rounds, inlining each round's documents as an array
/// field of the envelope. Every round is one self-contained command document
/// sized against the server's document limit, for servers that predate
/// out-of-band document sequences.
pub(crate) fn dispatch(
	command: &WriteCommand,
	transport: &mut dyn Transport,
	namespace: Namespace<'_>,
	write_concern: &WriteConcern,
	session: Option<&Session>,
	offset: usize,
	result: &mut WriteResult,
) {
	let limits = transport.limits();
	let field_name = command.kind().field_name();
	let mut reader = DocumentReader::new(command.payload());
	// A document read but not yet placed; carried into the next round.
	let mut pending = None;
	let mut round_offset = offset;

	loop {
		let Some(envelope) = command.envelope(namespace.collection, write_concern) else {
			return;
		};
		// Envelope plus the framing of an empty documents array.
		let overhead = envelope.encoded_len() + 1 + 2 + field_name.len() + 4;

		let mut entries: Vec<Value> = Vec::new();
		let mut array_bytes = 0usize;
		let mut has_more = false;
		let mut overflow_len = 0usize;

		loop {
			let raw = match pending.take() {
				Some(raw) => Some(raw),
				None => match reader.read() {
					Ok(raw) => raw,
					Err(error) => {
						result.record_assembly_failure(error);
						return;
					}
				},
			};
			let Some(raw) = raw else { break };
			let len = raw.len();
			if will_overflow(
				overhead,
				array_bytes + 1 + len,
				entries.len(),
				limits.max_document_size,
				limits.max_write_batch_size,
			) {
				pending = Some(raw);
				has_more = true;
				overflow_len = len;
				break;
			}
			match raw.decode() {
				Ok(doc) => entries.push(Value::Document(doc)),
				Err(error) => {
					result.record_assembly_failure(error);
					return;
				}
			}
			array_bytes += 1 + len;
		}

		if entries.is_empty() && !has_more {
			return;
		}

		let round_ok = if entries.is_empty() {
			// The round's first document alone exceeds the limit.
			// Nothing is sent; the document is skipped and keeps its
			// place in the numbering.
			result.record_too_large(round_offset, overflow_len, limits.max_document_size);
			pending = None;
			round_offset += 1;
			false
		} else {
			let n_sent = entries.len();
			let mut body = envelope;
			body.insert(field_name, Value::Array(entries));
			debug!(
				operation_id = command.operation_id(),
				kind = command.kind().name(),
				documents = n_sent,
				"sending write round"
			);
			let request = WireRequest {
				database: namespace.database,
				command: &body,
				sequence: None,
				operation_id: command.operation_id(),
				session,
			};
			// A reply carrying write errors fails the round; an
			// ordered command then sends nothing further.
			let errors_before = result.write_errors.len();
			let sent = match transport.send(request) {
				Ok(reply) => {
					result.merge(command.kind(), &reply, round_offset);
					result.write_errors.len() == errors_before
				}
				Err(error) => {
					result.record_transport_failure(error);
					false
				}
			};
			round_offset += n_sent;
			sent
		};

		if !(has_more && (round_ok || !command.flags().ordered) && !result.must_stop) {
			return;
		}
	}
}

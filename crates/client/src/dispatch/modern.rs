// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use tracing::debug;
use vellum_type::DocumentReader;

use crate::batch::{Batch, DOCUMENT_ALLOWANCE};
use crate::command::WriteCommand;
use crate::result::WriteResult;
use crate::transport::{DocumentSequence, Namespace, Session, Transport, WireRequest};
use crate::write_concern::WriteConcern;

/// Fixed wire overhead of one message around its command document and
/// document sequence: message header (16), flag bits (4), body section tag
/// (1), sequence section tag (1) and sequence size prefix (4).
const WIRE_HEADER_ALLOWANCE: usize = 26;

/// Streams the command's payload as batches with out-of-band document
/// sequences. Documents are never re-encoded; each batch is a contiguous
/// slice of the payload buffer sized against the server's message limit.
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
	let Some(envelope) = command.envelope(namespace.collection, write_concern) else {
		return;
	};
	let field_name = command.kind().field_name();
	let header_len = WIRE_HEADER_ALLOWANCE + envelope.encoded_len() + field_name.len() + 1;

	let payload = command.payload();
	let mut reader = DocumentReader::new(payload);
	let mut batch = Batch::starting_at(0, 0);
	let mut index = 0usize;

	loop {
		let raw = match reader.read() {
			Ok(raw) => raw,
			Err(error) => {
				result.record_assembly_failure(error);
				return;
			}
		};
		let Some(raw) = raw else { break };
		let len = raw.len();
		let doc_start = reader.offset() - len;

		if len > limits.max_document_size + DOCUMENT_ALLOWANCE {
			// The document can never fit into any batch. Flush what
			// came before it so the ones after keep their order, then
			// report it at its absolute index and move on.
			if !batch.is_empty()
				&& !ship(&batch, &envelope, command, transport, namespace, session, offset, result)
			{
				return;
			}
			result.record_too_large(offset + index, len, limits.max_document_size);
			batch = Batch::starting_at(reader.offset(), index + 1);
			index += 1;
			continue;
		}

		if batch.len_bytes + header_len + len > limits.max_message_size {
			if batch.is_empty() {
				// Under the document limit yet over the message
				// limit on its own. No batch can ever carry it.
				result.record_too_large(offset + index, len, limits.max_document_size);
				batch = Batch::starting_at(reader.offset(), index + 1);
				index += 1;
				continue;
			}
			if !ship(&batch, &envelope, command, transport, namespace, session, offset, result) {
				return;
			}
			batch = Batch::starting_at(doc_start, index);
		}

		batch.push(len);
		index += 1;

		if limits.max_write_batch_size > 0 && batch.n_documents >= limits.max_write_batch_size {
			if !ship(&batch, &envelope, command, transport, namespace, session, offset, result) {
				return;
			}
			batch = Batch::starting_at(reader.offset(), index);
		}
	}

	if !batch.is_empty() {
		ship(&batch, &envelope, command, transport, namespace, session, offset, result);
	}
}

/// Sends one batch and merges the reply. Returns `false` when dispatch must
/// stop.
#[allow(clippy::too_many_arguments)]
fn ship(
	batch: &Batch,
	envelope: &vellum_type::Document,
	command: &WriteCommand,
	transport: &mut dyn Transport,
	namespace: Namespace<'_>,
	session: Option<&Session>,
	offset: usize,
	result: &mut WriteResult,
) -> bool {
	let payload = command.payload();
	let sequence = DocumentSequence {
		identifier: command.kind().field_name(),
		payload: &payload[batch.offset_bytes..batch.offset_bytes + batch.len_bytes],
		n_documents: batch.n_documents,
	};
	debug!(
		operation_id = command.operation_id(),
		kind = command.kind().name(),
		documents = batch.n_documents,
		bytes = batch.len_bytes,
		"sending write batch"
	);
	let request = WireRequest {
		database: namespace.database,
		command: envelope,
		sequence: Some(sequence),
		operation_id: command.operation_id(),
		session,
	};
	match transport.send(request) {
		Ok(reply) => {
			result.merge(command.kind(), &reply, offset + batch.first_index);
			!result.must_stop
		}
		Err(error) => {
			result.record_transport_failure(error);
			false
		}
	}
}

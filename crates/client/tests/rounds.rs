// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

mod common;

use common::{
	MockTransport, insert_command, namespace, ok_reply, padded_doc, reply_with_write_errors,
	write_error_entry,
};
use vellum_client::{
	BulkWriteFlags, ExecuteContext, ServerLimits, Value, WireVersion, WriteCommand, WriteConcern,
	WriteKind, WriteResult, execute,
};

fn old_limits() -> ServerLimits {
	let mut limits = ServerLimits::default();
	limits.wire_version = WireVersion(5);
	limits
}

fn run(command: &WriteCommand, transport: &mut MockTransport) -> WriteResult {
	let mut result = WriteResult::new();
	let mut ctx = ExecuteContext {
		transport,
		legacy: None,
		namespace: namespace(),
		session: None,
	};
	execute(
		command,
		&mut ctx,
		Some(&WriteConcern::default()),
		&WriteConcern::default(),
		0,
		&mut result,
	);
	result
}

#[test]
fn test_rounds_split_on_batch_count() {
	let mut limits = old_limits();
	limits.max_write_batch_size = 2;
	let mut transport = MockTransport::with_limits(limits);
	let command = insert_command(5, 10, BulkWriteFlags::default());
	let result = run(&command, &mut transport);
	let counts: Vec<usize> =
		transport.requests.iter().map(|request| request.documents.len()).collect();
	assert_eq!(counts, vec![2, 2, 1]);
	assert_eq!(result.n_inserted, 5);
	for request in &transport.requests {
		assert!(request.sequence_identifier.is_none());
		assert_eq!(
			request.command.get("insert").and_then(Value::as_str),
			Some("events")
		);
	}
}

#[test]
fn test_round_error_indices_are_absolute() {
	let mut limits = old_limits();
	limits.max_write_batch_size = 2;
	let mut transport = MockTransport::with_limits(limits);
	transport.push_reply(ok_reply(2));
	transport.push_reply(reply_with_write_errors(
		1,
		vec![write_error_entry(0, 11000, "duplicate key")],
	));
	let command = insert_command(5, 10, BulkWriteFlags::default());
	let result = run(&command, &mut transport);
	assert_eq!(result.write_errors.len(), 1);
	// Round two starts at absolute index 2.
	assert_eq!(result.write_errors[0].index, 2);
}

#[test]
fn test_oversized_first_document_fails_round_without_sending() {
	let mut limits = old_limits();
	limits.max_document_size = 1024;
	let mut transport = MockTransport::with_limits(limits);
	let mut command = WriteCommand::new(WriteKind::Insert, BulkWriteFlags::default(), 1);
	command.append_insert(&padded_doc(20_000));
	command.append_insert(&padded_doc(10));
	let result = run(&command, &mut transport);
	// Ordered: the failed round ends the command before anything is sent.
	assert!(transport.requests.is_empty());
	assert!(result.failed);
	assert_eq!(result.write_errors.len(), 1);
	assert_eq!(result.write_errors[0].index, 0);
}

#[test]
fn test_unordered_continues_past_oversized_document() {
	let mut limits = old_limits();
	limits.max_document_size = 1024;
	let mut transport = MockTransport::with_limits(limits);
	let mut flags = BulkWriteFlags::default();
	flags.ordered = false;
	let mut command = WriteCommand::new(WriteKind::Insert, flags, 1);
	command.append_insert(&padded_doc(20_000));
	command.append_insert(&padded_doc(10));
	let result = run(&command, &mut transport);
	assert!(result.failed);
	assert_eq!(result.write_errors[0].index, 0);
	// The document after the oversized one still goes out, at its own
	// index.
	assert_eq!(transport.requests.len(), 1);
	assert_eq!(transport.requests[0].documents.len(), 1);
	assert_eq!(result.n_inserted, 1);
}

#[test]
fn test_ordered_stops_after_round_with_write_errors() {
	let mut limits = old_limits();
	limits.max_write_batch_size = 1;
	let mut transport = MockTransport::with_limits(limits);
	transport.push_reply(reply_with_write_errors(
		0,
		vec![write_error_entry(0, 11000, "duplicate key")],
	));
	let command = insert_command(3, 10, BulkWriteFlags::default());
	let result = run(&command, &mut transport);
	// The failing round ends an ordered command; rounds two and three
	// never go out.
	assert_eq!(transport.requests.len(), 1);
	assert!(result.failed);
	assert!(!result.must_stop);
	assert_eq!(result.write_errors.len(), 1);
	assert_eq!(result.write_errors[0].index, 0);
}

#[test]
fn test_unordered_continues_after_round_with_write_errors() {
	let mut limits = old_limits();
	limits.max_write_batch_size = 1;
	let mut transport = MockTransport::with_limits(limits);
	transport.push_reply(reply_with_write_errors(
		0,
		vec![write_error_entry(0, 11000, "duplicate key")],
	));
	let mut flags = BulkWriteFlags::default();
	flags.ordered = false;
	let command = insert_command(3, 10, flags);
	let result = run(&command, &mut transport);
	assert_eq!(transport.requests.len(), 3);
	assert!(result.failed);
	assert_eq!(result.n_inserted, 2);
	assert_eq!(result.write_errors.len(), 1);
}

#[test]
fn test_transport_failure_stops_rounds() {
	let mut limits = old_limits();
	limits.max_write_batch_size = 1;
	let mut transport = MockTransport::with_limits(limits);
	transport.push_failure();
	let command = insert_command(3, 10, BulkWriteFlags::default());
	let result = run(&command, &mut transport);
	assert_eq!(transport.requests.len(), 1);
	assert!(result.must_stop);
	assert_eq!(result.error.as_ref().unwrap().code, "NET_001");
}

#[test]
fn test_rounds_split_on_command_size() {
	let mut limits = old_limits();
	limits.max_document_size = 2048;
	let mut transport = MockTransport::with_limits(limits);
	// Documents of 1500 encoded bytes; the size cap of
	// max_document_size plus the allowance holds twelve of them, so
	// twenty documents need two rounds.
	let command = insert_command(20, 1464, BulkWriteFlags::default());
	let result = run(&command, &mut transport);
	assert!(transport.requests.len() > 1);
	let dispatched: usize =
		transport.requests.iter().map(|request| request.documents.len()).sum();
	assert_eq!(dispatched, 20);
	assert_eq!(result.n_inserted, 20);
}

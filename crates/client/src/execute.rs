// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use tracing::instrument;
use vellum_type::{
	Error,
	error::diagnostic::{
		network::assembly_error,
		write::{
			bypass_validation_unacknowledged, collation_unacknowledged, collation_unsupported,
			empty_operation, invalid_write_concern,
		},
	},
};

use crate::command::WriteCommand;
use crate::dispatch;
use crate::dispatch::legacy::LegacyWriter;
use crate::result::WriteResult;
use crate::transport::{Namespace, Session, Transport};
use crate::write_concern::WriteConcern;

/// Everything a command needs beyond itself to reach a server.
pub struct ExecuteContext<'a> {
	pub transport: &'a mut dyn Transport,
	/// Only consulted for unacknowledged writes against servers that
	/// predate write commands.
	pub legacy: Option<&'a mut dyn LegacyWriter>,
	pub namespace: Namespace<'a>,
	pub session: Option<&'a Session>,
}

/// Executes one accumulated write command: validates preconditions, picks
/// the dispatch strategy the server supports, and folds every batch reply
/// into `result`. Failures are recorded on the result rather than returned;
/// the caller resolves the final verdict with [`WriteResult::complete`].
///
/// `offset` is the absolute index of the command's first document within
/// the caller's larger operation, zero for a standalone command.
#[instrument(
	name = "client::write::execute",
	level = "debug",
	skip(command, ctx, write_concern, default_write_concern, result),
	fields(
		kind = command.kind().name(),
		documents = command.n_documents(),
		operation_id = command.operation_id()
	)
)]
pub fn execute(
	command: &WriteCommand,
	ctx: &mut ExecuteContext<'_>,
	write_concern: Option<&WriteConcern>,
	default_write_concern: &WriteConcern,
	offset: usize,
	result: &mut WriteResult,
) {
	let write_concern = write_concern.unwrap_or(default_write_concern);

	if !write_concern.is_valid() {
		result.record_error(Error(invalid_write_concern()));
		return;
	}

	let limits = ctx.transport.limits();

	if command.flags().has_collation {
		if !write_concern.is_acknowledged() {
			result.record_error(Error(collation_unacknowledged()));
			return;
		}
		if !limits.wire_version.supports_collation() {
			result.record_error(Error(collation_unsupported()));
			return;
		}
	}

	if command.flags().bypass_document_validation.is_some() && !write_concern.is_acknowledged() {
		result.record_error(Error(bypass_validation_unacknowledged()));
		return;
	}

	if command.n_documents() == 0 {
		result.record_error(Error(empty_operation(command.kind().name())));
		return;
	}

	if limits.wire_version.supports_modern_framing() {
		dispatch::modern::dispatch(
			command,
			ctx.transport,
			ctx.namespace,
			write_concern,
			ctx.session,
			offset,
			result,
		);
	} else if write_concern.is_acknowledged() {
		dispatch::command::dispatch(
			command,
			ctx.transport,
			ctx.namespace,
			write_concern,
			ctx.session,
			offset,
			result,
		);
	} else {
		match ctx.legacy.as_deref_mut() {
			Some(writer) => {
				dispatch::legacy::dispatch(command, writer, ctx.namespace, offset, result)
			}
			None => result.record_error(Error(assembly_error(
				"no legacy writer available for unacknowledged writes",
			))),
		}
	}
}

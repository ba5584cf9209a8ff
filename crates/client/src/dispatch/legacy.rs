// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use crate::command::{WriteCommand, WriteKind};
use crate::result::WriteResult;
use crate::transport::Namespace;

/// Per-operation writer for unacknowledged writes against servers that
/// predate write commands. Implementations walk the command's payload and
/// issue one legacy wire message per document, recording outcomes into the
/// result themselves.
pub trait LegacyWriter {
	fn insert(
		&mut self,
		namespace: Namespace<'_>,
		command: &WriteCommand,
		offset: usize,
		result: &mut WriteResult,
	) -> crate::Result<()>;

	fn update(
		&mut self,
		namespace: Namespace<'_>,
		command: &WriteCommand,
		offset: usize,
		result: &mut WriteResult,
	) -> crate::Result<()>;

	fn delete(
		&mut self,
		namespace: Namespace<'_>,
		command: &WriteCommand,
		offset: usize,
		result: &mut WriteResult,
	) -> crate::Result<()>;
}

/// Delegates the whole command to the writer method matching its kind.
pub(crate) fn dispatch(
	command: &WriteCommand,
	writer: &mut dyn LegacyWriter,
	namespace: Namespace<'_>,
	offset: usize,
	result: &mut WriteResult,
) {
	let outcome = match command.kind() {
		WriteKind::Delete => writer.delete(namespace, command, offset, result),
		WriteKind::Insert => writer.insert(namespace, command, offset, result),
		WriteKind::Update => writer.update(namespace, command, offset, result),
	};
	if let Err(error) = outcome {
		result.record_transport_failure(error);
	}
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

//! The write path of the VellumDB driver.
//!
//! A caller accumulates individual writes into a [`WriteCommand`], then
//! [`execute`]s it. Execution validates preconditions, splits the accumulated
//! documents into wire-sized batches, dispatches them over the protocol
//! variant the connected server supports, and folds every reply into a single
//! [`WriteResult`] whose error indices refer to the caller's original
//! document ordering.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod batch;
pub mod command;
pub mod dispatch;
mod execute;
pub mod result;
pub mod transport;
pub mod write_concern;

pub use command::{BulkWriteFlags, WriteCommand, WriteKind, next_operation_id};
pub use dispatch::legacy::LegacyWriter;
pub use execute::{ExecuteContext, execute};
pub use result::{ErrorApiVersion, ErrorDomain, Upserted, WriteError, WriteResult};
pub use transport::{
	DocumentSequence, Namespace, ServerLimits, Session, Transport, WireRequest, WireVersion,
};
pub use vellum_type::{Diagnostic, Document, DocumentId, DocumentReader, Error, RawDocument, Value};
pub use write_concern::{Acknowledgment, WriteConcern};

pub type Result<T> = std::result::Result<T, Error>;

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

//! Dispatch strategies. The executor picks one per command based on the
//! server's wire version and the effective write concern:
//!
//! - [`modern`]: one envelope per batch with the documents attached as an
//!   out-of-band sequence, split against the message size limit.
//! - [`command`]: the documents inlined as an array field of the envelope,
//!   split against the command document size limit, sent in rounds.
//! - [`legacy`]: delegation to a caller-supplied per-operation writer for
//!   unacknowledged writes against old servers.

pub(crate) mod command;
pub mod legacy;
pub(crate) mod modern;

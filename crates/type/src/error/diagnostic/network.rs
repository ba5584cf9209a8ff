// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use crate::error::diagnostic::Diagnostic;

/// The transport failed to deliver a wire message or receive its reply.
pub fn transport_error(message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "NET_001".to_string(),
		message: format!("Transport error: {}", message.into()),
		label: None,
		help: Some("Check network connectivity and server status".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// A wire message could not be assembled locally. No bytes were sent.
pub fn assembly_error(message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "NET_002".to_string(),
		message: format!("Failed to assemble wire message: {}", message.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

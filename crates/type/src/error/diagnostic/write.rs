// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use crate::error::diagnostic::Diagnostic;

pub fn invalid_write_concern() -> Diagnostic {
	Diagnostic {
		code: "WRITE_001".to_string(),
		message: "The write concern is invalid.".to_string(),
		label: Some("invalid write concern".to_string()),
		help: Some("unacknowledged writes cannot also request journaling".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn collation_unacknowledged() -> Diagnostic {
	Diagnostic {
		code: "WRITE_002".to_string(),
		message: "Cannot set collation for unacknowledged writes".to_string(),
		label: Some("collation requires an acknowledged write concern".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn collation_unsupported() -> Diagnostic {
	Diagnostic {
		code: "WRITE_003".to_string(),
		message: "Collation is not supported by the selected server".to_string(),
		label: Some("server wire version predates collation".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn bypass_validation_unacknowledged() -> Diagnostic {
	Diagnostic {
		code: "WRITE_004".to_string(),
		message: "Cannot set bypassDocumentValidation for unacknowledged writes".to_string(),
		label: Some("validation bypass requires an acknowledged write concern".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// The command holds zero documents. Keyed by operation kind so the message
/// names the operation the caller attempted.
pub fn empty_operation(kind_name: &str) -> Diagnostic {
	Diagnostic {
		code: "WRITE_005".to_string(),
		message: format!("Cannot do an empty {}", kind_name),
		label: Some(format!("empty {} operation", kind_name)),
		help: Some("append at least one document before executing".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Final error synthesized from the server's per-document write errors:
/// the first error code found, and every distinct message.
pub fn server_write_errors(domain: &str, code: i32, message: String) -> Diagnostic {
	Diagnostic {
		code: format!("{}_{}", domain, code),
		message,
		label: Some("the server rejected one or more writes".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Final error synthesized from the server's write concern errors.
pub fn server_write_concern_errors(code: i32, message: String) -> Diagnostic {
	Diagnostic {
		code: format!("WRITE_CONCERN_{}", code),
		message,
		label: Some("the write concern could not be satisfied".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

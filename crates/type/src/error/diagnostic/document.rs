// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

use crate::error::diagnostic::Diagnostic;

/// A single document exceeds the server's maximum document size and can
/// never fit into any batch.
pub fn document_too_large(index: usize, len: usize, max_document_size: usize) -> Diagnostic {
	Diagnostic {
		code: "DOCUMENT_001".to_string(),
		message: format!(
			"Document {} is too large for the cluster. Document is {} bytes, max is {}.",
			index, len, max_document_size
		),
		label: Some("document exceeds the server size limit".to_string()),
		help: Some("split the document or raise the server's document size limit".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn malformed_document(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "DOCUMENT_002".to_string(),
		message: format!("malformed document: {}", reason.into()),
		label: Some("document bytes do not form a valid encoding".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn truncated_document(offset: usize, needed: usize, available: usize) -> Diagnostic {
	Diagnostic {
		code: "DOCUMENT_003".to_string(),
		message: format!(
			"truncated document: {} bytes needed at offset {}, buffer holds {}",
			needed, offset, available
		),
		label: Some("buffer ends inside a document".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

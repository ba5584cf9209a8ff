// SPDX-License-Identifier: MIT
// Copyright (c) 2025 VellumDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod document;
pub mod error;
mod value;

pub use document::{Document, DocumentReader, RawDocument};
pub use error::{Error, diagnostic, diagnostic::Diagnostic};
pub use value::{DocumentId, Value};

pub type Result<T> = std::result::Result<T, Error>;

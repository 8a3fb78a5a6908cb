/*
 * Copyright 2025 Vijaykumar Singh
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Error taxonomy for the transcoding core.
//!
//! Every failure is surfaced to the caller of the failing operation; nothing
//! is retried or recovered here. A row- or field-level failure aborts the
//! whole transcode/assemble call and any partially built buffers are dropped.

use thiserror::Error;

use crate::schema::WireType;

#[derive(Error, Debug)]
pub enum TranscodeError {
    /// The describe-collection call reported a non-success status.
    #[error("Schema fetch failed: {reason}")]
    SchemaFetch { reason: String },

    /// A row carries a key that is not declared in the collection schema
    /// while dynamic fields are disabled.
    #[error("Row {row} contains undeclared field `{field}`")]
    UnknownField { row: usize, field: String },

    /// A vector value does not match the field's declared dimension.
    #[error("Row {row}: field `{field}` expects {expected} elements, got {actual}")]
    DimensionMismatch {
        row: usize,
        field: String,
        expected: usize,
        actual: usize,
    },

    /// No codec is registered for the resolved wire type.
    #[error("Unsupported wire type: {0}")]
    UnsupportedWireType(String),

    /// A JSON payload failed to decode. This always propagates; a malformed
    /// blob never silently defaults to an empty document.
    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// A batched server response violates its own framing (count/length
    /// agreement between topks, scores and ids).
    #[error("Malformed server response: {0}")]
    MalformedServerResponse(String),

    /// Fixed-schema result columns disagree on row count.
    #[error("Column `{field}` has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Hybrid timestamp input was non-numeric, negative, or out of range.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A row omits a declared non-JSON field. Column buffers are dense;
    /// a hole at any row index is not representable on the wire.
    #[error("Row {row} is missing declared field `{field}`")]
    MissingField { row: usize, field: String },

    /// A row value cannot be represented in the field's wire bucket.
    #[error("Row {row}: field `{field}` value does not fit wire type {expected:?}")]
    InvalidFieldValue {
        row: usize,
        field: String,
        expected: WireType,
    },
}

pub type Result<T> = std::result::Result<T, TranscodeError>;

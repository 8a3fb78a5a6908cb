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

//! # VectorWire - Columnar Transcoding for Vector Database Clients
//!
//! **rows in, columns out**
//!
//! VectorWire converts row-oriented records into the columnar wire format
//! vector database insert/search/query RPCs require, and converts the
//! batch-flattened columnar responses back into row-oriented results.
//!
//! ## What it covers
//!
//! - **Schema resolution**: server-described schemas into ordered field
//!   descriptor tables, with dynamic-field support
//! - **Row-to-column transcoding**: pre-sized, index-addressed column
//!   buffers for insert requests
//! - **Result assembly**: per-query hit lists from batched search
//!   responses, rows from query/get responses
//! - **Wire codecs**: dense float vectors, bit-packed binary vectors,
//!   scalar buckets, JSON blobs, hybrid logical-clock timestamps
//!
//! ## What it leaves to collaborators
//!
//! No network I/O, retries, deadlines or authentication happen here: the
//! RPC channel, the schema-description service and the placeholder-group
//! envelope encoder are external. Every transform is a synchronous, pure
//! function over request-scoped data, so distinct calls can run fully in
//! parallel with no locking.

pub mod codec;
pub mod error;
pub mod schema;
pub mod transcode;
pub mod wire;

pub use codec::{HybridTimestamp, ScalarValue};
pub use error::{Result, TranscodeError};
pub use schema::{CollectionSchema, FieldDescriptor, WireType};
pub use transcode::{
    assemble_query_response, assemble_query_results, assemble_search_response,
    assemble_search_results, resolve_round_decimal, rows_to_columns, rows_to_wire, ColumnBuffer,
    RowRecord, ScalarColumn, SearchHit, SearchResultSet, VectorColumn,
};
pub use wire::{FieldColumn, PlaceholderValue, QueryResponse, SearchResponse, Status};

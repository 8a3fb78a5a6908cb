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

//! Search placeholder values.
//!
//! Query vectors travel inside an opaque "placeholder group" envelope on the
//! search request. Building that envelope is an external collaborator's job;
//! this core only produces the tag/type/values triple, with each query
//! vector already encoded to bytes.

use serde::{Deserialize, Serialize};

use crate::codec::vector;
use crate::schema::WireType;

/// Placeholder tag the server expects for expression-based search requests.
pub const PLACEHOLDER_TAG: &str = "$0";

/// The tag/type/values triple an envelope encoder wraps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderValue {
    pub tag: String,
    #[serde(rename = "type")]
    pub vector_type: WireType,
    /// One encoded byte string per query vector
    pub values: Vec<Vec<u8>>,
}

impl PlaceholderValue {
    /// Encode float query vectors for the placeholder group.
    pub fn from_float_vectors(vectors: &[Vec<f32>]) -> Self {
        PlaceholderValue {
            tag: PLACEHOLDER_TAG.to_string(),
            vector_type: WireType::FloatVector,
            values: vectors.iter().map(|v| vector::encode_float(v)).collect(),
        }
    }

    /// Wrap binary query vectors (already `dim / 8` bytes each) for the
    /// placeholder group.
    pub fn from_binary_vectors(vectors: &[Vec<u8>]) -> Self {
        PlaceholderValue {
            tag: PLACEHOLDER_TAG.to_string(),
            vector_type: WireType::BinaryVector,
            values: vectors.to_vec(),
        }
    }

    /// Number of query vectors, the request-side `nq`.
    pub fn num_queries(&self) -> usize {
        self.values.len()
    }
}

/// Seam for the external envelope encoder: turns the triple into the opaque
/// bytes the search request carries.
pub trait PlaceholderGroupEncoder {
    fn encode(&self, placeholder: &PlaceholderValue) -> Vec<u8>;
}

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

//! Resolution of a server-described schema into the ordered descriptor
//! table the transcoder consumes.
//!
//! The describe call itself is an external collaborator; this module only
//! interprets its payload. Field order is taken verbatim from the server --
//! it is load-bearing for column-to-field alignment on the wire.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscodeError};
use crate::schema::types::{
    find_key_value, CollectionSchema, FieldDescriptor, KeyValuePair, WireType,
};
use crate::wire::Status;

/// One field as described by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFieldSchema {
    /// Field name
    pub name: String,
    /// String-typed wire type tag, e.g. `"Int64"` or `"FloatVector"`
    pub data_type: String,
    /// Type parameters (`dim`, `max_length`, ...)
    #[serde(default)]
    pub type_params: Vec<KeyValuePair>,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default, rename = "autoID")]
    pub auto_id: bool,
}

/// The schema block of a describe-collection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCollectionSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<RawFieldSchema>,
    #[serde(default)]
    pub enable_dynamic_field: bool,
}

/// Describe-collection response as returned by the schema service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeCollectionResponse {
    pub status: Status,
    pub schema: RawCollectionSchema,
}

impl CollectionSchema {
    /// Resolve a describe-collection response into an ordered descriptor
    /// table plus the dynamic-field flag.
    ///
    /// Fails with [`TranscodeError::SchemaFetch`] when the upstream call
    /// reported a non-success status; the server reason string is attached.
    pub fn from_describe(resp: &DescribeCollectionResponse) -> Result<CollectionSchema> {
        if !resp.status.is_success() {
            return Err(TranscodeError::SchemaFetch {
                reason: resp.status.reason.clone(),
            });
        }
        let mut fields = Vec::with_capacity(resp.schema.fields.len());
        for raw in &resp.schema.fields {
            fields.push(resolve_field(raw)?);
        }
        Ok(CollectionSchema {
            fields,
            dynamic_field_enabled: resp.schema.enable_dynamic_field,
        })
    }
}

fn resolve_field(raw: &RawFieldSchema) -> Result<FieldDescriptor> {
    let wire_type = WireType::from_tag(&raw.data_type)?;
    let dim = parse_type_param(raw, "dim")?;
    let max_length = parse_type_param(raw, "max_length")?;
    Ok(FieldDescriptor {
        name: raw.name.clone(),
        wire_type,
        dim,
        max_length,
        is_primary_key: raw.is_primary_key,
        is_auto_id: raw.auto_id,
    })
}

/// Locate an integer type parameter by key. Absent keys resolve to `None`;
/// a present but non-integer value is a malformed server payload.
fn parse_type_param(raw: &RawFieldSchema, key: &str) -> Result<Option<usize>> {
    match find_key_value(&raw.type_params, key) {
        None => Ok(None),
        Some(v) => v.parse::<usize>().map(Some).map_err(|_| {
            TranscodeError::MalformedServerResponse(format!(
                "field `{}` has non-integer `{}` type param: {:?}",
                raw.name, key, v
            ))
        }),
    }
}

/// Build the default two-field schema used when a caller creates a
/// collection without spelling out fields: a primary key plus one float
/// vector field of the given dimension.
pub fn default_schema(
    primary_field_name: &str,
    id_type: WireType,
    auto_id: bool,
    vector_field_name: &str,
    dimension: usize,
) -> CollectionSchema {
    CollectionSchema {
        fields: vec![
            FieldDescriptor {
                name: primary_field_name.to_string(),
                wire_type: id_type,
                dim: None,
                max_length: None,
                is_primary_key: true,
                is_auto_id: auto_id,
            },
            FieldDescriptor {
                name: vector_field_name.to_string(),
                wire_type: WireType::FloatVector,
                dim: Some(dimension),
                max_length: None,
                is_primary_key: false,
                is_auto_id: false,
            },
        ],
        dynamic_field_enabled: false,
    }
}

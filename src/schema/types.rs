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

//! Resolved schema model: wire types, field descriptors and the ordered
//! collection schema the transcoder works against.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscodeError};

/// Wire-level data types supported by the remote server.
///
/// This is a closed enum: every variant has exactly one scalar or vector
/// codec, and an unrecognized server tag fails with
/// [`TranscodeError::UnsupportedWireType`] instead of falling through to a
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    VarChar,
    #[serde(rename = "JSON")]
    Json,
    FloatVector,
    BinaryVector,
}

impl WireType {
    /// Parse the server's string tag for a field type.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "Bool" => Ok(WireType::Bool),
            "Int8" => Ok(WireType::Int8),
            "Int16" => Ok(WireType::Int16),
            "Int32" => Ok(WireType::Int32),
            "Int64" => Ok(WireType::Int64),
            "Float" => Ok(WireType::Float),
            "Double" => Ok(WireType::Double),
            "VarChar" => Ok(WireType::VarChar),
            "JSON" => Ok(WireType::Json),
            "FloatVector" => Ok(WireType::FloatVector),
            "BinaryVector" => Ok(WireType::BinaryVector),
            other => Err(TranscodeError::UnsupportedWireType(other.to_string())),
        }
    }

    /// The server's string tag for this type.
    pub fn tag(&self) -> &'static str {
        match self {
            WireType::Bool => "Bool",
            WireType::Int8 => "Int8",
            WireType::Int16 => "Int16",
            WireType::Int32 => "Int32",
            WireType::Int64 => "Int64",
            WireType::Float => "Float",
            WireType::Double => "Double",
            WireType::VarChar => "VarChar",
            WireType::Json => "JSON",
            WireType::FloatVector => "FloatVector",
            WireType::BinaryVector => "BinaryVector",
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, WireType::FloatVector | WireType::BinaryVector)
    }

    /// The scalar payload key this type maps to on the wire. Narrow integers
    /// (Int8/16/32) share the `int_data` bucket; Int64 rides `long_data`.
    /// Vector types have no scalar bucket.
    pub fn scalar_key(&self) -> Option<&'static str> {
        match self {
            WireType::Bool => Some("bool_data"),
            WireType::Int8 | WireType::Int16 | WireType::Int32 => Some("int_data"),
            WireType::Int64 => Some("long_data"),
            WireType::Float => Some("float_data"),
            WireType::Double => Some("double_data"),
            WireType::VarChar => Some("string_data"),
            WireType::Json => Some("json_data"),
            WireType::FloatVector | WireType::BinaryVector => None,
        }
    }
}

/// One resolved field of a collection schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Wire-level data type
    pub wire_type: WireType,
    /// Vector dimension, resolved from the `dim` type parameter
    pub dim: Option<usize>,
    /// Maximum length, resolved from the `max_length` type parameter (VarChar)
    pub max_length: Option<usize>,
    /// Whether this field is the primary key
    pub is_primary_key: bool,
    /// Whether the server assigns this field's value on insert
    pub is_auto_id: bool,
}

impl FieldDescriptor {
    /// Per-row element count a supplied vector value must have: `dim` for
    /// float vectors, `dim / 8` bytes for binary vectors.
    pub fn expected_vector_len(&self) -> Option<usize> {
        let dim = self.dim?;
        match self.wire_type {
            WireType::FloatVector => Some(dim),
            WireType::BinaryVector => Some(dim / 8),
            _ => None,
        }
    }
}

/// A resolved collection schema.
///
/// Field order matches the server's declaration order. That order is the
/// wire contract: insert columns must be emitted in the same sequence so the
/// server can align columns to fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    /// Ordered field descriptors
    pub fields: Vec<FieldDescriptor>,
    /// Whether undeclared row keys are collected into the dynamic column
    pub dynamic_field_enabled: bool,
}

impl CollectionSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Schema view for write requests: auto-id primary keys are excluded
    /// because the server assigns their values. Order is preserved.
    pub fn for_insert(&self) -> CollectionSchema {
        CollectionSchema {
            fields: self
                .fields
                .iter()
                .filter(|f| !(f.is_primary_key && f.is_auto_id))
                .cloned()
                .collect(),
            dynamic_field_enabled: self.dynamic_field_enabled,
        }
    }

    /// The collection's vector field, used as the anns field on search
    /// requests. Collections carry exactly one vector field; the first one
    /// wins if the server ever declares more.
    pub fn vector_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.wire_type.is_vector())
    }

    /// Default output fields for search: every non-vector field.
    pub fn default_output_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| !f.wire_type.is_vector())
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn primary_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.is_primary_key)
    }
}

/// A key/value string pair as carried in type-parameter and request
/// parameter lists on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

/// Find the value for `key` in a key/value pair list.
pub fn find_key_value<'a>(pairs: &'a [KeyValuePair], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|p| p.key == key)
        .map(|p| p.value.as_str())
}

/// Flatten `{row_count: "4"}` into `[{key: "row_count", value: "4"}]`.
pub fn parse_to_key_value(map: &HashMap<String, String>) -> Vec<KeyValuePair> {
    map.iter()
        .map(|(k, v)| KeyValuePair {
            key: k.clone(),
            value: v.clone(),
        })
        .collect()
}

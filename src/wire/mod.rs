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

//! Hardcoded mirrors of the RPC wire shapes.
//!
//! These structs spell the wire field names out verbatim; the names are the
//! contract, not an implementation detail. Keeping them as plain serde
//! structs avoids any runtime schema machinery and gives compile-time
//! safety on the shapes the transcoder produces and consumes.

pub mod placeholder;

use serde::{Deserialize, Serialize};

pub use placeholder::{PlaceholderGroupEncoder, PlaceholderValue};

/// Reserved column name that carries schema-undeclared row keys as one JSON
/// document per row.
pub const DYNAMIC_FIELD_NAME: &str = "$meta";

/// Server status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success,
    IndexNotExist,
    UnexpectedError,
    EmptyCollection,
    /// Forward compatibility: a code this client does not know yet.
    #[serde(other)]
    Unrecognized,
}

/// Per-response server status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub error_code: ErrorCode,
    #[serde(default)]
    pub reason: String,
}

impl Status {
    pub fn success() -> Self {
        Status {
            error_code: ErrorCode::Success,
            reason: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_code == ErrorCode::Success
    }
}

/// A homogeneous value array wrapper, the `{data: [...]}` shape used inside
/// scalar and vector payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataArray<T> {
    pub data: Vec<T>,
}

impl<T> DataArray<T> {
    pub fn new(data: Vec<T>) -> Self {
        DataArray { data }
    }
}

/// Scalar column payload, externally tagged by its wire bucket key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarsPayload {
    #[serde(rename = "bool_data")]
    Bool(DataArray<bool>),
    #[serde(rename = "int_data")]
    Int(DataArray<i32>),
    #[serde(rename = "long_data")]
    Long(DataArray<i64>),
    #[serde(rename = "float_data")]
    Float(DataArray<f32>),
    #[serde(rename = "double_data")]
    Double(DataArray<f64>),
    #[serde(rename = "string_data")]
    String(DataArray<String>),
    #[serde(rename = "json_data")]
    Json(DataArray<Vec<u8>>),
}

impl ScalarsPayload {
    /// Number of rows in this payload.
    pub fn len(&self) -> usize {
        match self {
            ScalarsPayload::Bool(a) => a.data.len(),
            ScalarsPayload::Int(a) => a.data.len(),
            ScalarsPayload::Long(a) => a.data.len(),
            ScalarsPayload::Float(a) => a.data.len(),
            ScalarsPayload::Double(a) => a.data.len(),
            ScalarsPayload::String(a) => a.data.len(),
            ScalarsPayload::Json(a) => a.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vector column payload body: one flat value sequence for all rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VectorPayloadData {
    /// Flat f32 components, row-major, `row_count * dim` entries
    #[serde(rename = "float_vector")]
    Float(DataArray<f32>),
    /// Bit-packed bytes, `row_count * dim / 8` entries
    #[serde(rename = "binary_vector")]
    Binary(Vec<u8>),
}

/// Vector column payload: dimension plus the flat data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorsPayload {
    pub dim: i64,
    #[serde(flatten)]
    pub data: VectorPayloadData,
}

/// One column record on the wire, for insert requests and for result
/// `fields_data` entries alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldColumn {
    pub field_name: String,
    #[serde(rename = "wireType")]
    pub wire_type: crate::schema::WireType,
    #[serde(default)]
    pub is_dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalars: Option<ScalarsPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectors: Option<VectorsPayload>,
}

/// Result id column: one of the two arrays is populated and `id_field`
/// names which.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_id: Option<DataArray<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub str_id: Option<DataArray<String>>,
}

/// Materialized id values from an [`IdsData`] record.
#[derive(Debug, Clone, PartialEq)]
pub enum IdValues {
    Int(Vec<i64>),
    Str(Vec<String>),
}

impl IdValues {
    pub fn len(&self) -> usize {
        match self {
            IdValues::Int(v) => v.len(),
            IdValues::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn value_at(&self, i: usize) -> serde_json::Value {
        match self {
            IdValues::Int(v) => serde_json::Value::from(v[i]),
            IdValues::Str(v) => serde_json::Value::String(v[i].clone()),
        }
    }
}

impl IdsData {
    /// Pick the populated id array, honoring `id_field` when present.
    pub fn values(&self) -> Option<IdValues> {
        match self.id_field.as_deref() {
            Some("int_id") => self.int_id.as_ref().map(|a| IdValues::Int(a.data.clone())),
            Some("str_id") => self.str_id.as_ref().map(|a| IdValues::Str(a.data.clone())),
            _ => self
                .int_id
                .as_ref()
                .map(|a| IdValues::Int(a.data.clone()))
                .or_else(|| self.str_id.as_ref().map(|a| IdValues::Str(a.data.clone()))),
        }
    }
}

/// The `results` block of a batched search response. All per-hit sequences
/// are flat across queries; `topks` re-splits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultsData {
    #[serde(default)]
    pub num_queries: i64,
    /// Hits actually returned per query, `num_queries` entries
    pub topks: Vec<i64>,
    /// Flat score sequence, `sum(topks)` entries
    pub scores: Vec<f32>,
    #[serde(default)]
    pub fields_data: Vec<FieldColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<IdsData>,
    #[serde(default)]
    pub output_fields: Vec<String>,
}

/// Full search RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: Status,
    pub results: SearchResultsData,
}

/// Query/get RPC response: un-batched, one row set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub status: Status,
    #[serde(default)]
    pub fields_data: Vec<FieldColumn>,
    #[serde(default)]
    pub output_fields: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::WireType;

    #[test]
    fn test_scalar_payload_wire_keys() {
        let payload = ScalarsPayload::Long(DataArray::new(vec![1, 2, 3]));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["long_data"]["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_field_column_wire_shape() {
        let column = FieldColumn {
            field_name: "vec".to_string(),
            wire_type: WireType::FloatVector,
            is_dynamic: false,
            scalars: None,
            vectors: Some(VectorsPayload {
                dim: 2,
                data: VectorPayloadData::Float(DataArray::new(vec![1.0, 2.0])),
            }),
        };
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["field_name"], "vec");
        assert_eq!(json["wireType"], "FloatVector");
        assert_eq!(json["vectors"]["dim"], 2);
        assert_eq!(json["vectors"]["float_vector"]["data"][1], 2.0);
        assert!(json.get("scalars").is_none());
    }

    #[test]
    fn test_ids_honor_id_field_tag() {
        let ids = IdsData {
            id_field: Some("str_id".to_string()),
            int_id: None,
            str_id: Some(DataArray::new(vec!["a".to_string(), "b".to_string()])),
        };
        match ids.values().unwrap() {
            IdValues::Str(v) => assert_eq!(v, vec!["a", "b"]),
            other => panic!("unexpected ids: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_error_code_deserializes() {
        let status: Status =
            serde_json::from_str(r#"{"error_code": "RateLimited", "reason": "slow down"}"#).unwrap();
        assert_eq!(status.error_code, ErrorCode::Unrecognized);
        assert!(!status.is_success());
    }
}

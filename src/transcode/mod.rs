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

//! Row/column transcoding.
//!
//! [`insert`] turns row records into pre-sized column buffers for the
//! insert RPC; [`search`] and [`query`] turn columnar responses back into
//! row-oriented results. All transforms are synchronous, stateless and
//! request-scoped: nothing here persists across calls and distinct calls
//! can run fully in parallel.

pub mod arena;
pub mod insert;
pub mod query;
pub mod search;

use std::collections::HashMap;

use serde_json::Value;

use crate::codec::scalar::{codec_for, ScalarValue};
use crate::error::{Result, TranscodeError};
use crate::schema::WireType;
use crate::wire::{
    DataArray, FieldColumn, ScalarsPayload, VectorPayloadData, VectorsPayload, DYNAMIC_FIELD_NAME,
};

pub use insert::{rows_to_columns, rows_to_wire, RowRecord};
pub use query::{assemble_query_response, assemble_query_results, RowData};
pub use search::{
    assemble_search_response, assemble_search_results, resolve_round_decimal, SearchHit,
    SearchResultSet,
};

/// Flat vector storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorValues {
    /// `row_count * dim` f32 components
    Float(Vec<f32>),
    /// `row_count * dim / 8` bit-packed bytes
    Binary(Vec<u8>),
}

/// Vector encodings carried by a [`VectorColumn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorEncoding {
    Float,
    Binary,
}

/// One vector column: all rows' components concatenated flat, no per-row
/// delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorColumn {
    pub name: String,
    pub dim: usize,
    pub values: VectorValues,
}

impl VectorColumn {
    pub fn encoding(&self) -> VectorEncoding {
        match self.values {
            VectorValues::Float(_) => VectorEncoding::Float,
            VectorValues::Binary(_) => VectorEncoding::Binary,
        }
    }

    /// Flat entries each row occupies.
    fn stride(&self) -> usize {
        match self.values {
            VectorValues::Float(_) => self.dim,
            VectorValues::Binary(_) => self.dim / 8,
        }
    }

    pub fn row_count(&self) -> usize {
        let stride = self.stride().max(1);
        match &self.values {
            VectorValues::Float(v) => v.len() / stride,
            VectorValues::Binary(v) => v.len() / stride,
        }
    }
}

/// One scalar column: one cell per row, dense.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarColumn {
    pub name: String,
    pub wire_type: WireType,
    pub values: Vec<ScalarValue>,
}

/// A column buffer, the unit both the insert request and result assembly
/// work in.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnBuffer {
    Vector(VectorColumn),
    Scalar(ScalarColumn),
}

impl ColumnBuffer {
    pub fn name(&self) -> &str {
        match self {
            ColumnBuffer::Vector(c) => &c.name,
            ColumnBuffer::Scalar(c) => &c.name,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.name() == DYNAMIC_FIELD_NAME
    }

    pub fn row_count(&self) -> usize {
        match self {
            ColumnBuffer::Vector(c) => c.row_count(),
            ColumnBuffer::Scalar(c) => c.values.len(),
        }
    }

    /// Convert into the column wire record for an insert request.
    pub fn into_wire(self) -> FieldColumn {
        match self {
            ColumnBuffer::Vector(c) => {
                let is_dynamic = c.name == DYNAMIC_FIELD_NAME;
                let (wire_type, data) = match c.values {
                    VectorValues::Float(values) => (
                        WireType::FloatVector,
                        VectorPayloadData::Float(DataArray::new(values)),
                    ),
                    VectorValues::Binary(bytes) => {
                        (WireType::BinaryVector, VectorPayloadData::Binary(bytes))
                    }
                };
                FieldColumn {
                    field_name: c.name,
                    wire_type,
                    is_dynamic,
                    scalars: None,
                    vectors: Some(VectorsPayload {
                        dim: c.dim as i64,
                        data,
                    }),
                }
            }
            ColumnBuffer::Scalar(c) => {
                let is_dynamic = c.name == DYNAMIC_FIELD_NAME;
                FieldColumn {
                    field_name: c.name,
                    wire_type: c.wire_type,
                    is_dynamic,
                    scalars: Some(scalar_cells_to_payload(c.wire_type, c.values)),
                    vectors: None,
                }
            }
        }
    }

    /// Parse a column wire record from a server response.
    pub fn from_wire(column: &FieldColumn) -> Result<ColumnBuffer> {
        if let Some(vectors) = &column.vectors {
            let dim = usize::try_from(vectors.dim).map_err(|_| {
                TranscodeError::MalformedServerResponse(format!(
                    "column `{}` has negative dim {}",
                    column.field_name, vectors.dim
                ))
            })?;
            let values = match &vectors.data {
                VectorPayloadData::Float(a) => VectorValues::Float(a.data.clone()),
                VectorPayloadData::Binary(b) => VectorValues::Binary(b.clone()),
            };
            return Ok(ColumnBuffer::Vector(VectorColumn {
                name: column.field_name.clone(),
                dim,
                values,
            }));
        }
        if let Some(scalars) = &column.scalars {
            return Ok(ColumnBuffer::Scalar(ScalarColumn {
                name: column.field_name.clone(),
                wire_type: column.wire_type,
                values: scalar_payload_to_cells(scalars),
            }));
        }
        Err(TranscodeError::MalformedServerResponse(format!(
            "column `{}` carries neither scalars nor vectors",
            column.field_name
        )))
    }

    /// Decode every row of this column into an untyped value: vectors split
    /// by their per-row stride, JSON blobs parsed (decode failures
    /// propagate), plain scalars converted directly.
    pub fn decode_values(&self) -> Result<Vec<Value>> {
        match self {
            ColumnBuffer::Vector(c) => {
                let stride = c.stride();
                if stride == 0 {
                    return Err(TranscodeError::MalformedServerResponse(format!(
                        "vector column `{}` has zero dim",
                        c.name
                    )));
                }
                Ok(match &c.values {
                    VectorValues::Float(v) => v
                        .chunks(stride)
                        .map(|row| Value::Array(row.iter().map(|f| (*f).into()).collect()))
                        .collect(),
                    VectorValues::Binary(v) => v
                        .chunks(stride)
                        .map(|row| Value::Array(row.iter().map(|b| (*b).into()).collect()))
                        .collect(),
                })
            }
            ColumnBuffer::Scalar(c) => {
                let codec = codec_for(c.wire_type)?;
                c.values.iter().map(|cell| (codec.decode)(cell)).collect()
            }
        }
    }
}

fn scalar_cells_to_payload(wire_type: WireType, cells: Vec<ScalarValue>) -> ScalarsPayload {
    // cells were produced by this type's codec, so every variant matches
    match wire_type {
        WireType::Bool => ScalarsPayload::Bool(DataArray::new(
            cells
                .into_iter()
                .map(|c| match c {
                    ScalarValue::Bool(v) => v,
                    _ => false,
                })
                .collect(),
        )),
        WireType::Int8 | WireType::Int16 | WireType::Int32 => ScalarsPayload::Int(DataArray::new(
            cells
                .into_iter()
                .map(|c| match c {
                    ScalarValue::Int(v) => v,
                    _ => 0,
                })
                .collect(),
        )),
        WireType::Int64 => ScalarsPayload::Long(DataArray::new(
            cells
                .into_iter()
                .map(|c| match c {
                    ScalarValue::Long(v) => v,
                    _ => 0,
                })
                .collect(),
        )),
        WireType::Float => ScalarsPayload::Float(DataArray::new(
            cells
                .into_iter()
                .map(|c| match c {
                    ScalarValue::Float(v) => v,
                    _ => 0.0,
                })
                .collect(),
        )),
        WireType::Double => ScalarsPayload::Double(DataArray::new(
            cells
                .into_iter()
                .map(|c| match c {
                    ScalarValue::Double(v) => v,
                    _ => 0.0,
                })
                .collect(),
        )),
        WireType::VarChar => ScalarsPayload::String(DataArray::new(
            cells
                .into_iter()
                .map(|c| match c {
                    ScalarValue::VarChar(v) => v,
                    _ => String::new(),
                })
                .collect(),
        )),
        // Json and anything else lands in the json_data bucket
        _ => ScalarsPayload::Json(DataArray::new(
            cells
                .into_iter()
                .map(|c| match c {
                    ScalarValue::Json(v) => v,
                    _ => b"{}".to_vec(),
                })
                .collect(),
        )),
    }
}

fn scalar_payload_to_cells(payload: &ScalarsPayload) -> Vec<ScalarValue> {
    match payload {
        ScalarsPayload::Bool(a) => a.data.iter().map(|v| ScalarValue::Bool(*v)).collect(),
        ScalarsPayload::Int(a) => a.data.iter().map(|v| ScalarValue::Int(*v)).collect(),
        ScalarsPayload::Long(a) => a.data.iter().map(|v| ScalarValue::Long(*v)).collect(),
        ScalarsPayload::Float(a) => a.data.iter().map(|v| ScalarValue::Float(*v)).collect(),
        ScalarsPayload::Double(a) => a.data.iter().map(|v| ScalarValue::Double(*v)).collect(),
        ScalarsPayload::String(a) => a
            .data
            .iter()
            .map(|v| ScalarValue::VarChar(v.clone()))
            .collect(),
        ScalarsPayload::Json(a) => a.data.iter().map(|v| ScalarValue::Json(v.clone())).collect(),
    }
}

/// Decode a set of response columns into per-field row values, keyed by
/// field name. The dynamic column sits in the map under its own name.
pub(crate) fn decode_column_map(columns: &[FieldColumn]) -> Result<HashMap<String, Vec<Value>>> {
    let mut map = HashMap::with_capacity(columns.len());
    for column in columns {
        let buffer = ColumnBuffer::from_wire(column)?;
        map.insert(column.field_name.clone(), buffer.decode_values()?);
    }
    Ok(map)
}

/// Resolve one requested output field at a row index: declared columns are
/// read directly, anything else is projected out of the parsed dynamic
/// document. A missing dynamic sub-key yields `None`, never an error.
pub(crate) fn project_field(
    column_map: &HashMap<String, Vec<Value>>,
    field_name: &str,
    index: usize,
    dynamic_field_enabled: bool,
) -> Option<Value> {
    if let Some(values) = column_map.get(field_name) {
        return values.get(index).cloned();
    }
    if !dynamic_field_enabled {
        return None;
    }
    let meta = column_map.get(DYNAMIC_FIELD_NAME)?.get(index)?;
    meta.get(field_name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vector_column_round_trip_through_wire() {
        let buffer = ColumnBuffer::Vector(VectorColumn {
            name: "vec".to_string(),
            dim: 2,
            values: VectorValues::Float(vec![1.0, 2.0, 3.0, 4.0]),
        });
        assert_eq!(buffer.row_count(), 2);
        let wire = buffer.clone().into_wire();
        assert_eq!(wire.field_name, "vec");
        let back = ColumnBuffer::from_wire(&wire).unwrap();
        assert_eq!(back, buffer);
    }

    #[test]
    fn test_decode_values_splits_vectors_by_dim() {
        let buffer = ColumnBuffer::Vector(VectorColumn {
            name: "vec".to_string(),
            dim: 2,
            values: VectorValues::Float(vec![1.0, 2.0, 3.0, 4.0]),
        });
        let rows = buffer.decode_values().unwrap();
        assert_eq!(rows, vec![json!([1.0, 2.0]), json!([3.0, 4.0])]);
    }

    #[test]
    fn test_decode_values_splits_binary_vectors_by_dim_over_8() {
        let buffer = ColumnBuffer::Vector(VectorColumn {
            name: "bvec".to_string(),
            dim: 16,
            values: VectorValues::Binary(vec![0xAB, 0xCD, 0x01, 0x02]),
        });
        let rows = buffer.decode_values().unwrap();
        assert_eq!(rows, vec![json!([0xAB, 0xCD]), json!([0x01, 0x02])]);
    }

    #[test]
    fn test_column_without_payload_is_malformed() {
        let column = FieldColumn {
            field_name: "ghost".to_string(),
            wire_type: WireType::Int64,
            is_dynamic: false,
            scalars: None,
            vectors: None,
        };
        assert!(matches!(
            ColumnBuffer::from_wire(&column),
            Err(TranscodeError::MalformedServerResponse(_))
        ));
    }

    #[test]
    fn test_project_field_prefers_declared_column() {
        let mut map = HashMap::new();
        map.insert("age".to_string(), vec![json!(1)]);
        map.insert(DYNAMIC_FIELD_NAME.to_string(), vec![json!({"age": 99, "nick": "x"})]);
        assert_eq!(project_field(&map, "age", 0, true), Some(json!(1)));
        assert_eq!(project_field(&map, "nick", 0, true), Some(json!("x")));
        assert_eq!(project_field(&map, "missing", 0, true), None);
        assert_eq!(project_field(&map, "nick", 0, false), None);
    }
}

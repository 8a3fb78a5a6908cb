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

//! Row-to-column transcoding for the insert RPC.
//!
//! The server consumes columnar insert payloads: one buffer per schema
//! field, columns emitted in server-declared field order. Rows are
//! partitioned into declared and undeclared keys; undeclared keys either
//! fail the call or, with dynamic fields enabled, collapse into one JSON
//! document per row stored in the trailing `$meta` column.
//!
//! There is no partial success. The first bad row aborts the call and all
//! partially built buffers are dropped.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, TranscodeError};
use crate::schema::{CollectionSchema, FieldDescriptor, WireType};
use crate::transcode::arena::ColumnArena;
use crate::transcode::ColumnBuffer;
use crate::wire::{FieldColumn, DYNAMIC_FIELD_NAME};

/// One user-supplied row: field name to untyped value. May carry keys
/// absent from the schema when dynamic fields are enabled.
pub type RowRecord = Map<String, Value>;

/// Transcode rows into ordered column buffers for an insert request.
///
/// Auto-id primary keys are excluded (the server assigns their values); the
/// remaining columns come back in schema order, followed by the dynamic
/// `$meta` column when the collection enables dynamic fields.
pub fn rows_to_columns(
    rows: &[RowRecord],
    schema: &CollectionSchema,
) -> Result<Vec<ColumnBuffer>> {
    let insert_schema = schema.for_insert();
    let row_count = rows.len();

    // one pre-sized arena per retained field, index-addressed by row
    let mut arenas = Vec::with_capacity(insert_schema.fields.len());
    let mut arena_index: HashMap<&str, usize> = HashMap::with_capacity(insert_schema.fields.len());
    for descriptor in &insert_schema.fields {
        arena_index.insert(descriptor.name.as_str(), arenas.len());
        arenas.push(ColumnArena::new(descriptor.clone(), row_count)?);
    }

    let dynamic = insert_schema.dynamic_field_enabled;
    let mut dynamic_arena = if dynamic {
        Some(ColumnArena::new(dynamic_descriptor(), row_count)?)
    } else {
        None
    };

    for (row_index, row) in rows.iter().enumerate() {
        let mut meta = Map::new();
        for (key, value) in row {
            match arena_index.get(key.as_str()) {
                Some(&i) => arenas[i].write(row_index, value)?,
                None if dynamic => {
                    meta.insert(key.clone(), value.clone());
                }
                None => {
                    return Err(TranscodeError::UnknownField {
                        row: row_index,
                        field: key.clone(),
                    });
                }
            }
        }
        if let Some(arena) = dynamic_arena.as_mut() {
            // every row writes a document, the empty mapping included
            arena.write(row_index, &Value::Object(meta))?;
        }
    }

    let mut columns = Vec::with_capacity(arenas.len() + 1);
    for arena in arenas {
        columns.push(arena.finalize()?);
    }
    if let Some(arena) = dynamic_arena {
        columns.push(arena.finalize()?);
    }

    debug!(
        rows = row_count,
        columns = columns.len(),
        dynamic,
        "built insert column buffers"
    );
    Ok(columns)
}

/// Transcode rows straight to the wire `fields_data` records of an insert
/// request.
pub fn rows_to_wire(rows: &[RowRecord], schema: &CollectionSchema) -> Result<Vec<FieldColumn>> {
    Ok(rows_to_columns(rows, schema)?
        .into_iter()
        .map(ColumnBuffer::into_wire)
        .collect())
}

fn dynamic_descriptor() -> FieldDescriptor {
    FieldDescriptor {
        name: DYNAMIC_FIELD_NAME.to_string(),
        wire_type: WireType::Json,
        dim: None,
        max_length: None,
        is_primary_key: false,
        is_auto_id: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::scalar::{decode_json, ScalarValue};
    use crate::transcode::{ScalarColumn, VectorValues};
    use serde_json::json;

    fn field(
        name: &str,
        wire_type: WireType,
        dim: Option<usize>,
        pk: bool,
        auto: bool,
    ) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            wire_type,
            dim,
            max_length: None,
            is_primary_key: pk,
            is_auto_id: auto,
        }
    }

    fn row(value: Value) -> RowRecord {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_auto_id_column_absent_and_vectors_flat() {
        let schema = CollectionSchema {
            fields: vec![
                field("id", WireType::Int64, None, true, true),
                field("vec", WireType::FloatVector, Some(4), false, false),
                field("tag", WireType::Int32, None, false, false),
            ],
            dynamic_field_enabled: false,
        };
        let rows = vec![
            row(json!({"vec": [1.0, 2.0, 3.0, 4.0], "tag": 5})),
            row(json!({"vec": [5.0, 6.0, 7.0, 8.0], "tag": 6})),
        ];
        let columns = rows_to_columns(&rows, &schema).unwrap();
        assert_eq!(columns.len(), 2);
        assert!(columns.iter().all(|c| c.name() != "id"));

        match &columns[0] {
            ColumnBuffer::Vector(c) => {
                assert_eq!(c.dim, 4);
                match &c.values {
                    VectorValues::Float(v) => assert_eq!(v.len(), 8),
                    other => panic!("unexpected values: {other:?}"),
                }
            }
            other => panic!("unexpected buffer: {other:?}"),
        }
        match &columns[1] {
            ColumnBuffer::Scalar(ScalarColumn { values, .. }) => {
                assert_eq!(values, &vec![ScalarValue::Int(5), ScalarValue::Int(6)]);
            }
            other => panic!("unexpected buffer: {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_key_fails_when_dynamic_disabled() {
        let schema = CollectionSchema {
            fields: vec![field("age", WireType::Int64, None, false, false)],
            dynamic_field_enabled: false,
        };
        let rows = vec![row(json!({"age": 1})), row(json!({"age": 2, "nick": "x"}))];
        let err = rows_to_columns(&rows, &schema).unwrap_err();
        match err {
            TranscodeError::UnknownField { row, field } => {
                assert_eq!(row, 1);
                assert_eq!(field, "nick");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_keys_collapse_into_dynamic_column() {
        let schema = CollectionSchema {
            fields: vec![field("age", WireType::Int64, None, false, false)],
            dynamic_field_enabled: true,
        };
        let rows = vec![
            row(json!({"age": 1, "nick": "x"})),
            row(json!({"age": 2})),
        ];
        let columns = rows_to_columns(&rows, &schema).unwrap();
        assert_eq!(columns.len(), 2);

        let dynamic = columns.last().unwrap();
        assert!(dynamic.is_dynamic());
        match dynamic {
            ColumnBuffer::Scalar(ScalarColumn { values, .. }) => {
                let first = match &values[0] {
                    ScalarValue::Json(b) => decode_json(b).unwrap(),
                    other => panic!("unexpected cell: {other:?}"),
                };
                assert_eq!(first, json!({"nick": "x"}));
                // a row with no undeclared keys still writes a document
                let second = match &values[1] {
                    ScalarValue::Json(b) => decode_json(b).unwrap(),
                    other => panic!("unexpected cell: {other:?}"),
                };
                assert_eq!(second, json!({}));
            }
            other => panic!("unexpected buffer: {other:?}"),
        }
    }

    #[test]
    fn test_binary_vector_length_checked_per_row() {
        let schema = CollectionSchema {
            fields: vec![field("bvec", WireType::BinaryVector, Some(16), false, false)],
            dynamic_field_enabled: false,
        };
        let rows = vec![row(json!({"bvec": [7]}))];
        let err = rows_to_columns(&rows, &schema).unwrap_err();
        assert!(matches!(
            err,
            TranscodeError::DimensionMismatch { row: 0, .. }
        ));
    }

    #[test]
    fn test_omitted_json_field_stores_empty_mapping() {
        let schema = CollectionSchema {
            fields: vec![
                field("age", WireType::Int64, None, false, false),
                field("profile", WireType::Json, None, false, false),
            ],
            dynamic_field_enabled: false,
        };
        let rows = vec![row(json!({"age": 1}))];
        let columns = rows_to_columns(&rows, &schema).unwrap();
        match &columns[1] {
            ColumnBuffer::Scalar(ScalarColumn { values, .. }) => {
                let doc = match &values[0] {
                    ScalarValue::Json(b) => decode_json(b).unwrap(),
                    other => panic!("unexpected cell: {other:?}"),
                };
                assert_eq!(doc, json!({}));
            }
            other => panic!("unexpected buffer: {other:?}"),
        }
    }

    #[test]
    fn test_omitted_scalar_field_is_an_error() {
        let schema = CollectionSchema {
            fields: vec![field("age", WireType::Int64, None, false, false)],
            dynamic_field_enabled: false,
        };
        let rows = vec![row(json!({"age": 1})), row(json!({}))];
        let err = rows_to_columns(&rows, &schema).unwrap_err();
        assert!(matches!(err, TranscodeError::MissingField { row: 1, .. }));
    }

    #[test]
    fn test_wire_conversion_marks_dynamic_column() {
        let schema = CollectionSchema {
            fields: vec![field("age", WireType::Int64, None, false, false)],
            dynamic_field_enabled: true,
        };
        let rows = vec![row(json!({"age": 1, "nick": "x"}))];
        let wire = rows_to_wire(&rows, &schema).unwrap();
        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0].field_name, "age");
        assert!(!wire[0].is_dynamic);
        assert_eq!(wire[1].field_name, DYNAMIC_FIELD_NAME);
        assert!(wire[1].is_dynamic);
        assert_eq!(wire[1].wire_type, WireType::Json);
    }
}

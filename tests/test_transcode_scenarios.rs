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

//! End-to-end transcoding scenarios: resolve a described schema, build
//! insert columns from rows, and reassemble rows from columnar responses.

use serde_json::json;
use vectorwire::codec::{decode_json, vector, HybridTimestamp, ScalarValue};
use vectorwire::schema::{DescribeCollectionResponse, KeyValuePair, RawCollectionSchema, RawFieldSchema};
use vectorwire::transcode::{
    assemble_search_results, rows_to_columns, rows_to_wire, SearchResultSet,
};
use vectorwire::wire::{
    DataArray, FieldColumn, IdsData, ScalarsPayload, SearchResultsData, Status, DYNAMIC_FIELD_NAME,
};
use vectorwire::{CollectionSchema, ColumnBuffer, RowRecord, TranscodeError, WireType};

fn raw_field(
    name: &str,
    data_type: &str,
    params: &[(&str, &str)],
    pk: bool,
    auto: bool,
) -> RawFieldSchema {
    RawFieldSchema {
        name: name.to_string(),
        data_type: data_type.to_string(),
        type_params: params
            .iter()
            .map(|(k, v)| KeyValuePair {
                key: k.to_string(),
                value: v.to_string(),
            })
            .collect(),
        is_primary_key: pk,
        auto_id: auto,
    }
}

fn described(fields: Vec<RawFieldSchema>, dynamic: bool) -> DescribeCollectionResponse {
    DescribeCollectionResponse {
        status: Status::success(),
        schema: RawCollectionSchema {
            name: "test_collection".to_string(),
            description: String::new(),
            fields,
            enable_dynamic_field: dynamic,
        },
    }
}

fn row(value: serde_json::Value) -> RowRecord {
    value.as_object().unwrap().clone()
}

/// Scenario 1: auto-id primary key excluded, vectors flat, scalars dense.
#[test]
fn test_insert_excludes_auto_id_and_flattens_vectors() {
    let schema = CollectionSchema::from_describe(&described(
        vec![
            raw_field("id", "Int64", &[], true, true),
            raw_field("vec", "FloatVector", &[("dim", "4")], false, false),
            raw_field("tag", "Int32", &[], false, false),
        ],
        false,
    ))
    .unwrap();

    let rows = vec![
        row(json!({"vec": [1.0, 2.0, 3.0, 4.0], "tag": 5})),
        row(json!({"vec": [5.0, 6.0, 7.0, 8.0], "tag": 6})),
    ];
    let columns = rows_to_columns(&rows, &schema).unwrap();

    assert!(columns.iter().all(|c| c.name() != "id"));
    let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["vec", "tag"]);

    match &columns[0] {
        ColumnBuffer::Vector(c) => match &c.values {
            vectorwire::transcode::VectorValues::Float(v) => {
                assert_eq!(v.len(), 8);
                assert_eq!(v[4], 5.0);
            }
            other => panic!("unexpected values: {other:?}"),
        },
        other => panic!("unexpected buffer: {other:?}"),
    }
    match &columns[1] {
        ColumnBuffer::Scalar(c) => {
            assert_eq!(c.values, vec![ScalarValue::Int(5), ScalarValue::Int(6)]);
        }
        other => panic!("unexpected buffer: {other:?}"),
    }
}

/// Scenario 2: undeclared keys collapse into the `$meta` column.
#[test]
fn test_insert_dynamic_field_collects_undeclared_keys() {
    let schema = CollectionSchema::from_describe(&described(
        vec![raw_field("age", "Int64", &[], false, false)],
        true,
    ))
    .unwrap();

    let rows = vec![row(json!({"age": 1, "nick": "x"}))];
    let wire = rows_to_wire(&rows, &schema).unwrap();

    assert_eq!(wire.len(), 2);
    assert_eq!(wire[0].field_name, "age");
    let dynamic = &wire[1];
    assert_eq!(dynamic.field_name, DYNAMIC_FIELD_NAME);
    assert!(dynamic.is_dynamic);
    match dynamic.scalars.as_ref().unwrap() {
        ScalarsPayload::Json(a) => {
            assert_eq!(decode_json(&a.data[0]).unwrap(), json!({"nick": "x"}));
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

/// Scenario 3: a two-query batch re-splits by topks and consumes every
/// flat score entry exactly once.
#[test]
fn test_search_batch_resplit() {
    let results = SearchResultsData {
        num_queries: 2,
        topks: vec![3, 1],
        scores: vec![0.4, 0.3, 0.2, 0.9],
        fields_data: vec![FieldColumn {
            field_name: "tag".to_string(),
            wire_type: WireType::Int32,
            is_dynamic: false,
            scalars: Some(ScalarsPayload::Int(DataArray::new(vec![5, 6, 7, 8]))),
            vectors: None,
        }],
        ids: Some(IdsData {
            id_field: Some("int_id".to_string()),
            int_id: Some(DataArray::new(vec![100, 101, 102, 103])),
            str_id: None,
        }),
        output_fields: vec!["tag".to_string()],
    };

    match assemble_search_results(2, &results, false, None).unwrap() {
        SearchResultSet::Batched(queries) => {
            assert_eq!(queries.len(), 2);
            assert_eq!(queries[0].len(), 3);
            assert_eq!(queries[1].len(), 1);
            assert_eq!(queries[0][0].fields["id"], json!(100));
            assert_eq!(queries[0][0].fields["tag"], json!(5));
            assert_eq!(queries[1][0].fields["id"], json!(103));
            assert!((queries[1][0].score - 0.9).abs() < 1e-6);
        }
        other => panic!("unexpected set: {other:?}"),
    }
}

/// Scenario 4: binary vector with dim 16 expects 2 bytes per row.
#[test]
fn test_insert_binary_vector_dimension_mismatch() {
    let schema = CollectionSchema::from_describe(&described(
        vec![raw_field("bvec", "BinaryVector", &[("dim", "16")], false, false)],
        false,
    ))
    .unwrap();

    let rows = vec![row(json!({"bvec": [255]}))];
    match rows_to_columns(&rows, &schema).unwrap_err() {
        TranscodeError::DimensionMismatch {
            row,
            field,
            expected,
            actual,
        } => {
            assert_eq!(row, 0);
            assert_eq!(field, "bvec");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Scenario 5: golden hybrid timestamp conversion.
#[test]
fn test_hybrid_timestamp_golden_value() {
    let ts: HybridTimestamp = "429642767925248000".parse().unwrap();
    assert_eq!(ts.to_unix_seconds(), (429642767925248000u64 >> 18) / 1000);
    assert_eq!(ts.to_unix_seconds(), 1638957092);
}

/// Scenario 6: a row omitting a declared JSON field stores the empty
/// mapping, and decoding yields an empty mapping, not an error.
#[test]
fn test_insert_omitted_json_field_round_trips_empty() {
    let schema = CollectionSchema::from_describe(&described(
        vec![
            raw_field("age", "Int64", &[], false, false),
            raw_field("profile", "JSON", &[], false, false),
        ],
        false,
    ))
    .unwrap();

    let rows = vec![row(json!({"age": 1}))];
    let columns = rows_to_columns(&rows, &schema).unwrap();
    let profile = columns.iter().find(|c| c.name() == "profile").unwrap();
    match profile {
        ColumnBuffer::Scalar(c) => match &c.values[0] {
            ScalarValue::Json(blob) => {
                assert_eq!(decode_json(blob).unwrap(), json!({}));
            }
            other => panic!("unexpected cell: {other:?}"),
        },
        other => panic!("unexpected buffer: {other:?}"),
    }
}

/// Conservation: assembling then flattening yields every flat entry once,
/// in order.
#[test]
fn test_search_conservation() {
    let topks = vec![2i64, 0, 3];
    let total = 5usize;
    let results = SearchResultsData {
        num_queries: 3,
        topks,
        scores: (0..total).map(|i| i as f32 / 10.0).collect(),
        fields_data: vec![],
        ids: Some(IdsData {
            id_field: Some("int_id".to_string()),
            int_id: Some(DataArray::new((0..total as i64).collect())),
            str_id: None,
        }),
        output_fields: vec![],
    };
    let set = assemble_search_results(3, &results, false, None).unwrap();
    assert_eq!(set.total_hits(), total);
    let flat_ids: Vec<serde_json::Value> = set
        .into_batched()
        .into_iter()
        .flatten()
        .map(|h| h.fields["id"].clone())
        .collect();
    assert_eq!(flat_ids, (0..total as i64).map(serde_json::Value::from).collect::<Vec<_>>());
}

/// Vector codec round-trips across the wire representation.
#[test]
fn test_vector_codec_round_trips() {
    let v = vec![0.25f32, -1.5, 3.75, 100.0];
    assert_eq!(vector::decode_float(&vector::encode_float(&v)).unwrap(), v);

    let bits: Vec<bool> = (0..16).map(|i| i % 3 == 0).collect();
    let packed = vector::encode_binary(&bits);
    assert_eq!(packed.len(), 2);
    assert_eq!(vector::decode_binary(&packed), bits);
}

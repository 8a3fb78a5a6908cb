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

//! Reconstruction of rows from query/get responses.
//!
//! Query responses are un-batched: one row set, one column per requested
//! field. Every fixed-schema column must agree on row count; the rows are
//! zipped back together per index, with dynamic fields projected out of the
//! `$meta` column the same way search hits are.

use serde_json::{Map, Value};

use crate::error::{Result, TranscodeError};
use crate::transcode::{decode_column_map, project_field};
use crate::wire::{FieldColumn, QueryResponse};

/// One reconstructed row.
pub type RowData = Map<String, Value>;

/// Assemble a query/get response into rows. Callers check the response
/// status; the body of a failed response is not decoded meaningfully.
pub fn assemble_query_response(
    response: &QueryResponse,
    dynamic_field_enabled: bool,
) -> Result<Vec<RowData>> {
    let output_fields = if response.output_fields.is_empty() {
        None
    } else {
        Some(response.output_fields.as_slice())
    };
    assemble_query_results(&response.fields_data, output_fields, dynamic_field_enabled)
}

/// Assemble requested-field columns into rows.
///
/// `output_fields` drives which keys each row carries; when absent
/// (pre-explicit-output-fields servers) the column names are used.
pub fn assemble_query_results(
    fields_data: &[FieldColumn],
    output_fields: Option<&[String]>,
    dynamic_field_enabled: bool,
) -> Result<Vec<RowData>> {
    let column_map = decode_column_map(fields_data)?;

    // fixed-schema columns must agree on row count
    let mut row_count: Option<(usize, &str)> = None;
    for column in fields_data {
        if column.is_dynamic {
            continue;
        }
        let len = column_map
            .get(&column.field_name)
            .map(Vec::len)
            .unwrap_or(0);
        match row_count {
            None => row_count = Some((len, &column.field_name)),
            Some((expected, _)) if expected != len => {
                return Err(TranscodeError::ColumnLengthMismatch {
                    field: column.field_name.clone(),
                    expected,
                    actual: len,
                });
            }
            Some(_) => {}
        }
    }
    let n = row_count
        .map(|(len, _)| len)
        .or_else(|| {
            // dynamic-only result set
            fields_data
                .first()
                .and_then(|c| column_map.get(&c.field_name))
                .map(Vec::len)
        })
        .unwrap_or(0);

    let names: Vec<String> = match output_fields {
        Some(fields) => fields.to_vec(),
        None => fields_data.iter().map(|c| c.field_name.clone()).collect(),
    };

    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let mut row = Map::new();
        for name in &names {
            if let Some(value) = project_field(&column_map, name, i, dynamic_field_enabled) {
                row.insert(name.clone(), value);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

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

//! Reconstruction of per-query rows from batched search responses.
//!
//! The server answers a multi-vector search with one flat response: all
//! hits' scores, ids and output columns concatenated across queries, plus a
//! per-query hit-count array (`topks`) to re-split them. The assembler
//! walks a cursor over the flat sequences and rebuilds one hit list per
//! query vector.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, TranscodeError};
use crate::transcode::{decode_column_map, project_field};
use crate::wire::{IdValues, SearchResponse, SearchResultsData};

/// One ranked hit: similarity score plus the requested output fields. The
/// hit's id sits in the field map under `"id"`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub score: f64,
    pub fields: Map<String, Value>,
}

/// Assembled search results: flat for a single query vector, nested for a
/// batch.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResultSet {
    Single(Vec<SearchHit>),
    Batched(Vec<Vec<SearchHit>>),
}

impl SearchResultSet {
    pub fn total_hits(&self) -> usize {
        match self {
            SearchResultSet::Single(hits) => hits.len(),
            SearchResultSet::Batched(queries) => queries.iter().map(Vec::len).sum(),
        }
    }

    /// Normalize to the nested form regardless of query count.
    pub fn into_batched(self) -> Vec<Vec<SearchHit>> {
        match self {
            SearchResultSet::Single(hits) => vec![hits],
            SearchResultSet::Batched(queries) => queries,
        }
    }
}

/// Resolve the score precision option from its two possible sources: the
/// value on the search parameters wins over the generic params map.
pub fn resolve_round_decimal(
    search_params_value: Option<i32>,
    params_value: Option<i32>,
) -> Option<i32> {
    search_params_value.or(params_value)
}

/// Apply the precision option to a raw score. `None` and `-1` leave the
/// score untouched; otherwise the decimal digits are truncated to the
/// requested count (`3.1738... @ 3` is `3.173`).
fn apply_round_decimal(score: f64, round_decimal: Option<i32>) -> f64 {
    let precision = match round_decimal {
        Some(p) if p >= 0 => p as usize,
        _ => return score,
    };
    let text = score.to_string();
    match text.split_once('.') {
        Some((integral, fraction)) => {
            let fraction = &fraction[..fraction.len().min(precision)];
            let truncated = if fraction.is_empty() {
                integral.parse()
            } else {
                format!("{integral}.{fraction}").parse()
            };
            truncated.unwrap_or(score)
        }
        None => score,
    }
}

/// Assemble a full search response. A non-success status yields an empty
/// result set with no decoding attempted, matching the RPC contract that
/// the response body is meaningless on failure.
pub fn assemble_search_response(
    nq: usize,
    response: &SearchResponse,
    dynamic_field_enabled: bool,
    round_decimal: Option<i32>,
) -> Result<SearchResultSet> {
    if !response.status.is_success() {
        return Ok(if nq == 1 {
            SearchResultSet::Single(Vec::new())
        } else {
            SearchResultSet::Batched(vec![Vec::new(); nq])
        });
    }
    assemble_search_results(nq, &response.results, dynamic_field_enabled, round_decimal)
}

/// Assemble the `results` block of a search response into per-query hits.
pub fn assemble_search_results(
    nq: usize,
    results: &SearchResultsData,
    dynamic_field_enabled: bool,
    round_decimal: Option<i32>,
) -> Result<SearchResultSet> {
    if results.topks.len() != nq {
        return Err(TranscodeError::MalformedServerResponse(format!(
            "topks has {} entries for {} queries",
            results.topks.len(),
            nq
        )));
    }

    let mut total: usize = 0;
    for k in &results.topks {
        let k = usize::try_from(*k).map_err(|_| {
            TranscodeError::MalformedServerResponse(format!("negative topk entry {k}"))
        })?;
        total += k;
    }
    if results.scores.len() != total {
        return Err(TranscodeError::MalformedServerResponse(format!(
            "sum(topks) = {} but {} scores returned",
            total,
            results.scores.len()
        )));
    }

    let ids = match results.ids.as_ref().and_then(|ids| ids.values()) {
        Some(ids) => ids,
        None if total == 0 => IdValues::Int(Vec::new()),
        None => {
            return Err(TranscodeError::MalformedServerResponse(
                "id sequence missing from search results".to_string(),
            ));
        }
    };
    if ids.len() != total {
        return Err(TranscodeError::MalformedServerResponse(format!(
            "sum(topks) = {} but {} ids returned",
            total,
            ids.len()
        )));
    }

    let column_map = decode_column_map(&results.fields_data)?;

    // compat: servers predating explicit output_fields echo none back
    let output_fields: Vec<String> = if results.output_fields.is_empty() {
        results
            .fields_data
            .iter()
            .map(|c| c.field_name.clone())
            .collect()
    } else {
        results.output_fields.clone()
    };

    let mut queries = Vec::with_capacity(nq);
    let mut cursor = 0usize;
    for k in &results.topks {
        let k = *k as usize;
        let mut hits = Vec::with_capacity(k);
        for i in cursor..cursor + k {
            let mut fields = Map::new();
            fields.insert("id".to_string(), ids.value_at(i));
            for name in &output_fields {
                if name == "id" {
                    continue;
                }
                if let Some(value) = project_field(&column_map, name, i, dynamic_field_enabled) {
                    fields.insert(name.clone(), value);
                }
            }
            hits.push(SearchHit {
                score: apply_round_decimal(results.scores[i] as f64, round_decimal),
                fields,
            });
        }
        // an empty hit list still occupies its query slot
        queries.push(hits);
        cursor += k;
    }

    debug!(nq, total_hits = total, "assembled search results");

    Ok(if nq == 1 {
        SearchResultSet::Single(queries.pop().unwrap_or_default())
    } else {
        SearchResultSet::Batched(queries)
    })
}

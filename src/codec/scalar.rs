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

//! Scalar wire codecs.
//!
//! A closed table maps every scalar wire type to exactly one encode/decode
//! pair. Lookup of a type with no registered codec fails with
//! [`TranscodeError::UnsupportedWireType`]; there is no default branch.
//!
//! Narrow integers (Int8/Int16/Int32) unify into the i32 `int_data` bucket
//! on the wire. JSON values travel as serialized UTF-8 blobs; an absent or
//! null value always encodes as the serialized empty mapping, never as
//! zero-length bytes.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{Result, TranscodeError};
use crate::schema::WireType;

/// One scalar cell in a column buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    /// Int8/Int16/Int32 unified wire bucket
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    VarChar(String),
    /// Serialized JSON document blob
    Json(Vec<u8>),
}

/// Encode/decode pair for one scalar wire type.
///
/// `encode` turns an untyped row value into the bucket's typed cell and
/// returns `None` when the value cannot be represented (the transcoder
/// attaches row/field context to that failure). `decode` turns a cell back
/// into an untyped value for row-oriented results.
#[derive(Debug)]
pub struct ScalarCodec {
    pub wire_type: WireType,
    pub encode: fn(&Value) -> Option<ScalarValue>,
    pub decode: fn(&ScalarValue) -> Result<Value>,
}

fn encode_bool(v: &Value) -> Option<ScalarValue> {
    v.as_bool().map(ScalarValue::Bool)
}

fn encode_int(v: &Value) -> Option<ScalarValue> {
    v.as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .map(ScalarValue::Int)
}

fn encode_long(v: &Value) -> Option<ScalarValue> {
    v.as_i64().map(ScalarValue::Long)
}

fn encode_float(v: &Value) -> Option<ScalarValue> {
    v.as_f64().map(|n| ScalarValue::Float(n as f32))
}

fn encode_double(v: &Value) -> Option<ScalarValue> {
    v.as_f64().map(ScalarValue::Double)
}

fn encode_varchar(v: &Value) -> Option<ScalarValue> {
    v.as_str().map(|s| ScalarValue::VarChar(s.to_string()))
}

fn encode_json_cell(v: &Value) -> Option<ScalarValue> {
    Some(ScalarValue::Json(encode_json(Some(v))))
}

fn decode_plain(v: &ScalarValue) -> Result<Value> {
    Ok(match v {
        ScalarValue::Bool(b) => Value::Bool(*b),
        ScalarValue::Int(n) => Value::from(*n),
        ScalarValue::Long(n) => Value::from(*n),
        ScalarValue::Float(f) => serde_json::Number::from_f64(*f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ScalarValue::Double(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ScalarValue::VarChar(s) => Value::String(s.clone()),
        ScalarValue::Json(bytes) => decode_json(bytes)?,
    })
}

fn decode_json_cell(v: &ScalarValue) -> Result<Value> {
    match v {
        ScalarValue::Json(bytes) => decode_json(bytes),
        other => decode_plain(other),
    }
}

/// Serialize a JSON document for the wire. `None` and `null` both encode as
/// the empty mapping.
pub fn encode_json(value: Option<&Value>) -> Vec<u8> {
    match value {
        None | Some(Value::Null) => b"{}".to_vec(),
        // serializing an in-memory Value cannot fail
        Some(v) => serde_json::to_vec(v).unwrap_or_else(|_| b"{}".to_vec()),
    }
}

/// Parse a JSON document blob. Malformed bytes propagate as
/// [`TranscodeError::JsonDecode`]; this never falls back to an empty value.
pub fn decode_json(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

macro_rules! codec {
    ($wire_type:expr, $encode:expr, $decode:expr) => {
        (
            $wire_type,
            ScalarCodec {
                wire_type: $wire_type,
                encode: $encode,
                decode: $decode,
            },
        )
    };
}

static SCALAR_CODECS: Lazy<HashMap<WireType, ScalarCodec>> = Lazy::new(|| {
    HashMap::from([
        codec!(WireType::Bool, encode_bool, decode_plain),
        codec!(WireType::Int8, encode_int, decode_plain),
        codec!(WireType::Int16, encode_int, decode_plain),
        codec!(WireType::Int32, encode_int, decode_plain),
        codec!(WireType::Int64, encode_long, decode_plain),
        codec!(WireType::Float, encode_float, decode_plain),
        codec!(WireType::Double, encode_double, decode_plain),
        codec!(WireType::VarChar, encode_varchar, decode_plain),
        codec!(WireType::Json, encode_json_cell, decode_json_cell),
    ])
});

/// Look up the codec for a scalar wire type.
pub fn codec_for(wire_type: WireType) -> Result<&'static ScalarCodec> {
    SCALAR_CODECS
        .get(&wire_type)
        .ok_or_else(|| TranscodeError::UnsupportedWireType(wire_type.tag().to_string()))
}

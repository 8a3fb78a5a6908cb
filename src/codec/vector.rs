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

//! Vector wire encodings.
//!
//! Float vectors pack one IEEE-754 single per component, little-endian,
//! contiguous across rows with no per-row delimiters. Binary vectors pack 8
//! logical dimensions per byte, LSB first: dimension `i` lives in bit
//! `i % 8` of byte `i / 8`.
//!
//! Dimension agreement between a supplied value and the field's `dim` is the
//! transcoder's job; these primitives trust their input length.

use crate::error::{Result, TranscodeError};

/// Pack float vector components into contiguous little-endian bytes.
pub fn encode_float(values: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * 4);
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Inverse of [`encode_float`].
pub fn decode_float(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(TranscodeError::MalformedServerResponse(format!(
            "float vector payload length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Pack logical dimensions into bytes, 8 per byte. Output length is
/// `ceil(bits.len() / 8)`.
pub fn encode_binary(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; (bits.len() + 7) / 8];
    for (i, bit) in bits.iter().enumerate() {
        if *bit {
            bytes[i / 8] |= 1 << (i % 8);
        }
    }
    bytes
}

/// Inverse of [`encode_binary`]. Returns `bytes.len() * 8` dimensions; the
/// caller truncates when `dim` is not a multiple of 8.
pub fn decode_binary(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for i in 0..8 {
            bits.push(byte & (1 << i) != 0);
        }
    }
    bits
}

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

//! Pre-sized column arenas for the insert path.
//!
//! Every arena is allocated to its final length before any row is written
//! and rows write to fixed index offsets, never append. Row order therefore
//! stays deterministic and the same layout is safe if rows are ever fanned
//! out to parallel workers.

use serde_json::Value;

use crate::codec::scalar::{codec_for, encode_json, ScalarValue};
use crate::error::{Result, TranscodeError};
use crate::schema::{FieldDescriptor, WireType};
use crate::transcode::{ColumnBuffer, ScalarColumn, VectorColumn, VectorValues};

enum ArenaSlots {
    FloatVector {
        dim: usize,
        data: Vec<f32>,
        written: Vec<bool>,
    },
    BinaryVector {
        bytes_per_row: usize,
        data: Vec<u8>,
        written: Vec<bool>,
    },
    Scalar {
        cells: Vec<Option<ScalarValue>>,
    },
}

/// Index-addressed builder for one column.
pub(crate) struct ColumnArena {
    descriptor: FieldDescriptor,
    slots: ArenaSlots,
}

impl ColumnArena {
    /// Allocate an arena sized for `row_count` rows of this field.
    pub fn new(descriptor: FieldDescriptor, row_count: usize) -> Result<Self> {
        let slots = match descriptor.wire_type {
            WireType::FloatVector => {
                let dim = vector_dim(&descriptor)?;
                ArenaSlots::FloatVector {
                    dim,
                    data: vec![0.0; row_count * dim],
                    written: vec![false; row_count],
                }
            }
            WireType::BinaryVector => {
                let bytes_per_row = vector_dim(&descriptor)? / 8;
                ArenaSlots::BinaryVector {
                    bytes_per_row,
                    data: vec![0; row_count * bytes_per_row],
                    written: vec![false; row_count],
                }
            }
            _ => ArenaSlots::Scalar {
                cells: vec![None; row_count],
            },
        };
        Ok(ColumnArena { descriptor, slots })
    }

    /// Write one row's value at its fixed offset.
    pub fn write(&mut self, row: usize, value: &Value) -> Result<()> {
        let name = &self.descriptor.name;
        match &mut self.slots {
            ArenaSlots::FloatVector { dim, data, written } => {
                let components = value.as_array().ok_or_else(|| {
                    TranscodeError::InvalidFieldValue {
                        row,
                        field: name.clone(),
                        expected: WireType::FloatVector,
                    }
                })?;
                if components.len() != *dim {
                    return Err(TranscodeError::DimensionMismatch {
                        row,
                        field: name.clone(),
                        expected: *dim,
                        actual: components.len(),
                    });
                }
                for (j, component) in components.iter().enumerate() {
                    let f = component.as_f64().ok_or_else(|| {
                        TranscodeError::InvalidFieldValue {
                            row,
                            field: name.clone(),
                            expected: WireType::FloatVector,
                        }
                    })?;
                    data[row * *dim + j] = f as f32;
                }
                written[row] = true;
            }
            ArenaSlots::BinaryVector {
                bytes_per_row,
                data,
                written,
            } => {
                let bytes = value.as_array().ok_or_else(|| {
                    TranscodeError::InvalidFieldValue {
                        row,
                        field: name.clone(),
                        expected: WireType::BinaryVector,
                    }
                })?;
                if bytes.len() != *bytes_per_row {
                    return Err(TranscodeError::DimensionMismatch {
                        row,
                        field: name.clone(),
                        expected: *bytes_per_row,
                        actual: bytes.len(),
                    });
                }
                for (j, byte) in bytes.iter().enumerate() {
                    let b = byte
                        .as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| TranscodeError::InvalidFieldValue {
                            row,
                            field: name.clone(),
                            expected: WireType::BinaryVector,
                        })?;
                    data[row * *bytes_per_row + j] = b;
                }
                written[row] = true;
            }
            ArenaSlots::Scalar { cells } => {
                let codec = codec_for(self.descriptor.wire_type)?;
                let cell = (codec.encode)(value).ok_or_else(|| {
                    TranscodeError::InvalidFieldValue {
                        row,
                        field: name.clone(),
                        expected: self.descriptor.wire_type,
                    }
                })?;
                cells[row] = Some(cell);
            }
        }
        Ok(())
    }

    /// Seal the arena into a dense column buffer.
    ///
    /// JSON slots left unwritten finalize as the serialized empty mapping;
    /// any other unwritten slot is a hole the wire cannot carry and fails
    /// with [`TranscodeError::MissingField`] at the first offending row.
    pub fn finalize(self) -> Result<ColumnBuffer> {
        let name = self.descriptor.name;
        match self.slots {
            ArenaSlots::FloatVector { dim, data, written } => {
                if let Some(row) = first_unwritten(&written) {
                    return Err(TranscodeError::MissingField { row, field: name });
                }
                Ok(ColumnBuffer::Vector(VectorColumn {
                    name,
                    dim,
                    values: VectorValues::Float(data),
                }))
            }
            ArenaSlots::BinaryVector {
                bytes_per_row,
                data,
                written,
            } => {
                if let Some(row) = first_unwritten(&written) {
                    return Err(TranscodeError::MissingField { row, field: name });
                }
                Ok(ColumnBuffer::Vector(VectorColumn {
                    name,
                    dim: bytes_per_row * 8,
                    values: VectorValues::Binary(data),
                }))
            }
            ArenaSlots::Scalar { cells } => {
                let wire_type = self.descriptor.wire_type;
                let mut values = Vec::with_capacity(cells.len());
                for (row, cell) in cells.into_iter().enumerate() {
                    match cell {
                        Some(v) => values.push(v),
                        None if wire_type == WireType::Json => {
                            values.push(ScalarValue::Json(encode_json(None)));
                        }
                        None => {
                            return Err(TranscodeError::MissingField { row, field: name });
                        }
                    }
                }
                Ok(ColumnBuffer::Scalar(ScalarColumn {
                    name,
                    wire_type,
                    values,
                }))
            }
        }
    }
}

fn vector_dim(descriptor: &FieldDescriptor) -> Result<usize> {
    descriptor.dim.filter(|d| *d > 0).ok_or_else(|| {
        TranscodeError::MalformedServerResponse(format!(
            "vector field `{}` resolved without a dim type param",
            descriptor.name
        ))
    })
}

fn first_unwritten(written: &[bool]) -> Option<usize> {
    written.iter().position(|w| !w)
}

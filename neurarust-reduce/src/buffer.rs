use std::fmt::Debug;
use std::sync::Arc;

use crate::error::NeuraRustError;
use crate::types::DType;

/// Typed, shared storage behind a tensor.
///
/// The inner `Vec` is wrapped in an `Arc` so that detached tensors (e.g. the
/// cached output a backward node keeps) share the values without copying.
#[derive(Debug, Clone)]
pub enum Buffer {
    /// Buffer holding f32 data.
    F32(Arc<Vec<f32>>),
    /// Buffer holding f64 data.
    F64(Arc<Vec<f64>>),
    /// Buffer holding i64 data (arg-reduction indices).
    I64(Arc<Vec<i64>>),
}

impl Buffer {
    /// The data type stored in this buffer.
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::F32(_) => DType::F32,
            Buffer::F64(_) => DType::F64,
            Buffer::I64(_) => DType::I64,
        }
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Buffer::F32(data) => data.len(),
            Buffer::F64(data) => data.len(),
            Buffer::I64(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f32>>`.
    ///
    /// Returns an error if the buffer is not of type F32.
    pub fn try_get_f32(&self) -> Result<&Arc<Vec<f32>>, NeuraRustError> {
        match self {
            Buffer::F32(data_arc) => Ok(data_arc),
            other => Err(NeuraRustError::DataTypeMismatch {
                expected: DType::F32,
                actual: other.dtype(),
                operation: "try_get_f32".to_string(),
            }),
        }
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f64>>`.
    pub fn try_get_f64(&self) -> Result<&Arc<Vec<f64>>, NeuraRustError> {
        match self {
            Buffer::F64(data_arc) => Ok(data_arc),
            other => Err(NeuraRustError::DataTypeMismatch {
                expected: DType::F64,
                actual: other.dtype(),
                operation: "try_get_f64".to_string(),
            }),
        }
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<i64>>`.
    pub fn try_get_i64(&self) -> Result<&Arc<Vec<i64>>, NeuraRustError> {
        match self {
            Buffer::I64(data_arc) => Ok(data_arc),
            other => Err(NeuraRustError::DataTypeMismatch {
                expected: DType::I64,
                actual: other.dtype(),
                operation: "try_get_i64".to_string(),
            }),
        }
    }

    /// Copies the values out as `f64`, whatever the stored type.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Buffer::F32(data) => data.iter().map(|&x| x as f64).collect(),
            Buffer::F64(data) => data.as_ref().clone(),
            Buffer::I64(data) => data.iter().map(|&x| x as f64).collect(),
        }
    }

    /// Returns a buffer holding the same values converted to `dtype`.
    ///
    /// Converting to the buffer's own type only clones the `Arc`.
    pub fn cast(&self, dtype: DType) -> Buffer {
        match (self, dtype) {
            (Buffer::F32(_), DType::F32) | (Buffer::F64(_), DType::F64) | (Buffer::I64(_), DType::I64) => {
                self.clone()
            }
            (Buffer::F32(data), DType::F64) => {
                Buffer::F64(Arc::new(data.iter().map(|&x| x as f64).collect()))
            }
            (Buffer::F64(data), DType::F32) => {
                Buffer::F32(Arc::new(data.iter().map(|&x| x as f32).collect()))
            }
            (Buffer::I64(data), DType::F32) => {
                Buffer::F32(Arc::new(data.iter().map(|&x| x as f32).collect()))
            }
            (Buffer::I64(data), DType::F64) => {
                Buffer::F64(Arc::new(data.iter().map(|&x| x as f64).collect()))
            }
            (Buffer::F32(data), DType::I64) => {
                Buffer::I64(Arc::new(data.iter().map(|&x| x as i64).collect()))
            }
            (Buffer::F64(data), DType::I64) => {
                Buffer::I64(Arc::new(data.iter().map(|&x| x as i64).collect()))
            }
        }
    }
}

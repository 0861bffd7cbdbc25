// src/tensor/mod.rs

use crate::buffer::Buffer;
use crate::error::NeuraRustError;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod autograd_methods;
pub mod create;
mod reduction_methods;
pub mod utils;

pub use create::{full, ones, ones_like, zeros, zeros_like};

/// Represents a multi-dimensional array (tensor).
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally to allow for:
/// 1.  **Shared Ownership:** clones point to the same data (cheap clones).
/// 2.  **Interior Mutability:** autograd metadata (`requires_grad`, `grad`,
///     `grad_fn`) can be updated through a shared reference. The write lock
///     is also what serializes gradient accumulation when a tensor feeds
///     several graph edges.
///
/// Element values are never modified after creation.
#[derive(Clone, Debug)]
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a new CPU F32 tensor with the given data and shape.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        Ok(Self::from_data(TensorData::new(data_vec, shape)?))
    }

    /// Creates a new F64 tensor with the given data and shape.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        Ok(Self::from_data(TensorData::new_f64(data_vec, shape)?))
    }

    /// Creates a new I64 tensor. Integer tensors never require grad.
    pub fn new_i64(data_vec: Vec<i64>, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        Self::from_buffer(Buffer::I64(Arc::new(data_vec)), shape)
    }

    /// Creates a new F32 tensor (alias of [`Tensor::new`]).
    pub fn from_vec_f32(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        Self::new(data_vec, shape)
    }

    pub(crate) fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        Ok(Self::from_data(TensorData::from_buffer(buffer, shape)?))
    }

    pub(crate) fn from_data(tensor_data: TensorData) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        }
    }

    /// Returns the data type (`DType`) of the tensor elements.
    pub fn dtype(&self) -> DType {
        self.read_data().dtype
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns a clone of the tensor's strides.
    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// A poisoned lock is recovered: tensor values are immutable, so the only
    /// state a panicking writer can leave half-done is autograd metadata.
    pub fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().unwrap_or_else(|poisoned| {
            log::warn!("RwLock for tensor data was poisoned. Recovering reader guard.");
            poisoned.into_inner()
        })
    }

    /// Acquires a write lock on the tensor's data.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().unwrap_or_else(|poisoned| {
            log::warn!("RwLock for tensor data was poisoned. Recovering writer guard.");
            poisoned.into_inner()
        })
    }

    /// Returns a clone of the shared buffer handle.
    pub(crate) fn buffer(&self) -> Arc<Buffer> {
        Arc::clone(&self.read_data().buffer)
    }

    /// Returns the tensor data as a `Vec<f32>`; errors if the dtype is not F32.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, NeuraRustError> {
        let guard = self.read_data();
        Ok(guard.buffer().try_get_f32()?.as_ref().clone())
    }

    /// Returns the tensor data as a `Vec<f64>`; errors if the dtype is not F64.
    pub fn get_f64_data(&self) -> Result<Vec<f64>, NeuraRustError> {
        let guard = self.read_data();
        Ok(guard.buffer().try_get_f64()?.as_ref().clone())
    }

    /// Returns the tensor data as a `Vec<i64>`; errors if the dtype is not I64.
    pub fn get_i64_data(&self) -> Result<Vec<i64>, NeuraRustError> {
        let guard = self.read_data();
        Ok(guard.buffer().try_get_i64()?.as_ref().clone())
    }

    /// Copies the values out as `f64`, whatever the dtype.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.read_data().buffer().to_f64_vec()
    }

    /// Returns the single value of a one-element tensor as `f64`.
    pub fn item(&self) -> Result<f64, NeuraRustError> {
        let guard = self.read_data();
        if guard.numel() != 1 {
            return Err(NeuraRustError::ShapeMismatch {
                expected: vec![1],
                actual: guard.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(guard.buffer().to_f64_vec()[0])
    }

    /// Returns a new tensor sharing this tensor's values but detached from
    /// the graph (`requires_grad = false`, no `grad_fn`).
    pub fn detach(&self) -> Tensor {
        let guard = self.read_data();
        Tensor::from_data(TensorData::shared(Arc::clone(&guard.buffer), guard.shape.clone()))
    }

    /// Returns a detached tensor holding the values converted to `dtype`.
    ///
    /// Casting to the current dtype only shares the buffer.
    pub fn cast(&self, dtype: DType) -> Tensor {
        let guard = self.read_data();
        let buffer = if guard.dtype == dtype {
            Arc::clone(&guard.buffer)
        } else {
            Arc::new(guard.buffer.cast(dtype))
        };
        Tensor::from_data(TensorData::shared(buffer, guard.shape.clone()))
    }
}

impl PartialEq for Tensor {
    /// Two tensors are equal when dtype, shape and values match.
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        let a = self.read_data();
        let b = other.read_data();
        if a.dtype != b.dtype || a.shape != b.shape {
            return false;
        }
        match (a.buffer.as_ref(), b.buffer.as_ref()) {
            (Buffer::F32(x), Buffer::F32(y)) => x == y,
            (Buffer::F64(x), Buffer::F64(y)) => x == y,
            (Buffer::I64(x), Buffer::I64(y)) => x == y,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

// src/tensor_data.rs
use std::fmt::Debug;
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::buffer::Buffer;
use crate::error::NeuraRustError;
use crate::tensor::utils::calculate_strides;
use crate::tensor::Tensor;
use crate::types::DType;

/// Internal storage and metadata for a Tensor.
///
/// This struct holds the data buffer, shape, strides, data type and the
/// autograd-related information. It is wrapped in `Arc<RwLock<TensorData>>`
/// by the `Tensor` struct to allow shared ownership and interior mutability.
///
/// Data is always dense and row-major: reductions never produce views.
#[derive(Debug)]
pub struct TensorData {
    /// The underlying typed buffer. Wrapped in Arc so detached handles share it.
    pub(crate) buffer: Arc<Buffer>,
    /// The data type of the elements in the buffer.
    pub(crate) dtype: DType,
    /// The shape (dimensions) of the tensor.
    pub(crate) shape: Vec<usize>,
    /// Contiguous strides for each dimension.
    pub(crate) strides: Vec<usize>,

    /// Flag indicating if the tensor requires gradient computation.
    pub(crate) requires_grad: bool,
    /// Accumulated gradient, same shape and dtype as this tensor.
    pub(crate) grad: Option<Tensor>,
    /// The backward node of the operation that produced this tensor.
    /// Leaf tensors have `grad_fn = None`.
    pub(crate) grad_fn: Option<Arc<dyn BackwardOp + Send + Sync>>,
}

impl TensorData {
    /// Creates a new `TensorData` from a typed buffer and a shape.
    ///
    /// # Errors
    /// - `TensorCreationError` if the buffer length does not match the shape.
    /// - `InvalidShape` if any dimension is zero.
    pub fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        if shape.iter().any(|&d| d == 0) {
            return Err(NeuraRustError::InvalidShape { shape });
        }
        let numel: usize = shape.iter().product();
        let data_len = buffer.len();
        if data_len != numel {
            return Err(NeuraRustError::TensorCreationError { data_len, shape });
        }

        let strides = calculate_strides(&shape);
        Ok(TensorData {
            dtype: buffer.dtype(),
            buffer: Arc::new(buffer),
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        })
    }

    /// Creates a new `TensorData` with the given f32 data and shape.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        Self::from_buffer(Buffer::F32(Arc::new(data_vec)), shape)
    }

    /// Creates a new `TensorData` with the given f64 data and shape.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        Self::from_buffer(Buffer::F64(Arc::new(data_vec)), shape)
    }

    /// Creates a `TensorData` sharing an existing buffer. Used for detached
    /// handles; carries no autograd metadata.
    pub(crate) fn shared(buffer: Arc<Buffer>, shape: Vec<usize>) -> Self {
        let strides = calculate_strides(&shape);
        TensorData {
            dtype: buffer.dtype(),
            buffer,
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        }
    }

    /// Provides immutable access to the underlying shared data buffer.
    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

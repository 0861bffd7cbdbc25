//! Element-wise arithmetic needed by the autograd core.
//!
//! Only same-shape addition is provided: it is what gradient accumulation
//! uses. The result never tracks gradients.

use crate::buffer::Buffer;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Adds two tensors of identical shape element-wise.
///
/// `b` is converted to `a`'s dtype first.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NeuraRustError> {
    let a_shape = a.shape();
    let b_shape = b.shape();
    if a_shape != b_shape {
        return Err(NeuraRustError::ShapeMismatch {
            expected: a_shape,
            actual: b_shape,
            operation: "add_op".to_string(),
        });
    }

    let b = b.cast(a.dtype());
    let a_buffer = a.buffer();
    let b_buffer = b.buffer();
    let result = match (a_buffer.as_ref(), b_buffer.as_ref()) {
        (Buffer::F32(x), Buffer::F32(y)) => {
            Buffer::F32(Arc::new(x.iter().zip(y.iter()).map(|(p, q)| p + q).collect()))
        }
        (Buffer::F64(x), Buffer::F64(y)) => {
            Buffer::F64(Arc::new(x.iter().zip(y.iter()).map(|(p, q)| p + q).collect()))
        }
        (Buffer::I64(x), Buffer::I64(y)) => {
            Buffer::I64(Arc::new(x.iter().zip(y.iter()).map(|(p, q)| p + q).collect()))
        }
        (x, y) => {
            return Err(NeuraRustError::InternalError(format!(
                "add_op: buffers differ after cast ({:?} vs {:?})",
                x.dtype(),
                y.dtype()
            )))
        }
    };
    Tensor::from_buffer(result, a_shape)
}

//! Index-of-extremum reductions.
//!
//! `argmax`/`argmin` return an `I64` tensor in the keep-dims output shape. Each
//! value is the position of the winning element inside its reduction group:
//! the coordinate along the axis for a single-axis reduction, the row-major
//! position inside the reduced sub-block for several axes, and the flat index
//! when every axis is reduced. Ties resolve to the first occurrence, and a NaN
//! wins over every number.
//!
//! The result is never differentiable.

use super::axis::{resolve_axes, AxisSpec};
use super::utils::ReductionLayout;
use crate::buffer::Buffer;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use num_traits::Float;
use std::sync::Arc;

/// Which extremum an arg reduction locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    ArgMax,
    ArgMin,
}

impl ArgKind {
    pub const ALL: [ArgKind; 2] = [ArgKind::ArgMax, ArgKind::ArgMin];

    pub fn name(&self) -> &'static str {
        match self {
            ArgKind::ArgMax => "argmax",
            ArgKind::ArgMin => "argmin",
        }
    }
}

fn arg_kernel<T: Float>(
    input: &[T],
    layout: &ReductionLayout,
    better: impl Fn(T, T) -> bool,
) -> Vec<i64> {
    let positions = layout.positions_in_group();
    let mut best: Vec<Option<T>> = vec![None; layout.output_numel()];
    let mut indices = vec![0i64; layout.output_numel()];
    for (i, &x) in input.iter().enumerate() {
        let o = layout.output_index(i);
        let take = match best[o] {
            None => true,
            Some(current) if current.is_nan() => false,
            Some(current) => x.is_nan() || better(x, current),
        };
        if take {
            best[o] = Some(x);
            indices[o] = positions[i] as i64;
        }
    }
    indices
}

pub(crate) fn argmax_kernel<T: Float>(input: &[T], layout: &ReductionLayout) -> Vec<i64> {
    arg_kernel(input, layout, |x, current| x > current)
}

pub(crate) fn argmin_kernel<T: Float>(input: &[T], layout: &ReductionLayout) -> Vec<i64> {
    arg_kernel(input, layout, |x, current| x < current)
}

/// Computes `kind` over `axis` of `tensor`.
///
/// Integer inputs are compared through their `f64` value. The output never
/// requires grad, whatever the input does.
pub fn arg_reduce_op(tensor: &Tensor, kind: ArgKind, axis: &AxisSpec) -> Result<Tensor, NeuraRustError> {
    let resolved = resolve_axes(tensor.rank(), axis)?;
    let layout = ReductionLayout::new(&tensor.shape(), &resolved);

    let buffer = tensor.buffer();
    let indices = match &*buffer {
        Buffer::F32(data) => match kind {
            ArgKind::ArgMax => argmax_kernel(data.as_slice(), &layout),
            ArgKind::ArgMin => argmin_kernel(data.as_slice(), &layout),
        },
        Buffer::F64(data) => match kind {
            ArgKind::ArgMax => argmax_kernel(data.as_slice(), &layout),
            ArgKind::ArgMin => argmin_kernel(data.as_slice(), &layout),
        },
        Buffer::I64(_) => {
            let values = buffer.to_f64_vec();
            match kind {
                ArgKind::ArgMax => argmax_kernel(values.as_slice(), &layout),
                ArgKind::ArgMin => argmin_kernel(values.as_slice(), &layout),
            }
        }
    };

    log::debug!(
        "{} over {:?}: {:?} -> {:?}",
        kind.name(),
        resolved,
        layout.input_shape(),
        layout.output_shape()
    );
    Tensor::from_buffer(Buffer::I64(Arc::new(indices)), layout.output_shape().to_vec())
}

/// Backward of an arg reduction. Always fails: the result is an index, which
/// has no gradient.
pub fn arg_backward(kind: ArgKind) -> Result<Tensor, NeuraRustError> {
    Err(NeuraRustError::UndefinedGradient {
        operation: kind.name().to_string(),
    })
}

/// Index of the maximum along `axis` (keep-dims, `I64`).
pub fn argmax_op(tensor: &Tensor, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
    arg_reduce_op(tensor, ArgKind::ArgMax, &axis.into())
}

/// Index of the minimum along `axis` (keep-dims, `I64`).
pub fn argmin_op(tensor: &Tensor, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
    arg_reduce_op(tensor, ArgKind::ArgMin, &axis.into())
}

#[cfg(test)]
#[path = "arg_test.rs"]
mod tests;

//! Forward and backward drivers shared by every differentiable reduction.
//!
//! The drivers resolve axes, pick the compute dtype, dispatch to the typed
//! kernel of a [`ReductionKind`] and wire the autograd node. Kernels only
//! ever see contiguous `&[T]` slices of one float type.

use super::axis::{resolve_axes, AxisSpec, ResolvedAxes};
use super::config::ReduceConfig;
use super::kind::ReductionKind;
use super::utils::ReductionLayout;
use crate::autograd::BackwardOp;
use crate::buffer::Buffer;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use crate::types::DType;
use std::sync::Arc;

/// The dtype a reduction computes in: the configured one, else the input's.
pub(crate) fn compute_dtype(
    kind: ReductionKind,
    input_dtype: DType,
    config: &ReduceConfig,
) -> Result<DType, NeuraRustError> {
    let dtype = config.dtype.unwrap_or(input_dtype);
    if !dtype.is_float() {
        return Err(NeuraRustError::DataTypeMismatch {
            expected: DType::F32,
            actual: dtype,
            operation: kind.name().to_string(),
        });
    }
    Ok(dtype)
}

/// The dtype of a gradient flowing back to `input`.
fn gradient_dtype(input_dtype: DType, compute: DType) -> DType {
    if input_dtype.is_float() {
        input_dtype
    } else {
        compute
    }
}

/// Fails with `UndefinedGradient` when `input` is a constant.
pub(crate) fn ensure_differentiable(input: &Tensor, operation: &str) -> Result<(), NeuraRustError> {
    if input.requires_grad() {
        Ok(())
    } else {
        Err(NeuraRustError::UndefinedGradient {
            operation: format!("{} on an input that does not require grad", operation),
        })
    }
}

/// Runs the forward kernel of `kind` over `input` cast to `dtype`.
/// The result is detached.
pub(crate) fn forward_values(
    kind: ReductionKind,
    input: &Tensor,
    layout: &ReductionLayout,
    dtype: DType,
) -> Result<Tensor, NeuraRustError> {
    let values = input.cast(dtype).buffer();
    let output = match &*values {
        Buffer::F32(data) => Buffer::F32(Arc::new(kind.forward_kernel(data.as_slice(), layout)?)),
        Buffer::F64(data) => Buffer::F64(Arc::new(kind.forward_kernel(data.as_slice(), layout)?)),
        Buffer::I64(_) => {
            return Err(NeuraRustError::InternalError(format!(
                "{} kernel reached with an integer buffer",
                kind.name()
            )))
        }
    };
    Tensor::from_buffer(output, layout.output_shape().to_vec())
}

/// Runs the backward kernel of `kind` and returns the gradient for `input`.
///
/// `output` and `upstream` must already be in `layout`'s output shape; they
/// are cast to `dtype` together with `input`. The gradient comes back in the
/// input's dtype (or `dtype` for integer inputs) and is detached.
#[allow(clippy::too_many_arguments)]
pub(crate) fn backward_values(
    kind: ReductionKind,
    input: &Tensor,
    output: &Tensor,
    upstream: &Tensor,
    layout: &ReductionLayout,
    count: usize,
    dtype: DType,
    config: &ReduceConfig,
) -> Result<Tensor, NeuraRustError> {
    let x = input.cast(dtype).buffer();
    let y = output.cast(dtype).buffer();
    let g = upstream.cast(dtype).buffer();
    let policy = config.degeneracy;

    let grad = match (&*x, &*y, &*g) {
        (Buffer::F32(x), Buffer::F32(y), Buffer::F32(g)) => Buffer::F32(Arc::new(kind.backward_kernel(
            x.as_slice(),
            y.as_slice(),
            g.as_slice(),
            layout,
            count,
            policy,
        )?)),
        (Buffer::F64(x), Buffer::F64(y), Buffer::F64(g)) => Buffer::F64(Arc::new(kind.backward_kernel(
            x.as_slice(),
            y.as_slice(),
            g.as_slice(),
            layout,
            count,
            policy,
        )?)),
        _ => {
            return Err(NeuraRustError::InternalError(format!(
                "{} backward reached with mixed or integer buffers",
                kind.name()
            )))
        }
    };

    let grad = Tensor::from_buffer(grad, layout.input_shape().to_vec())?;
    Ok(grad.cast(gradient_dtype(input.dtype(), dtype)))
}

/// Reduces `input` with `kind` over `axis`.
///
/// The output keeps every reduced axis with size 1. When `input` requires
/// grad, the output does too and records a backward node holding `input` and
/// a detached copy of the output.
///
/// # Errors
/// - `InvalidAxis` if `axis` does not resolve against the input rank.
/// - `DataTypeMismatch` if the compute dtype is not a float type.
pub fn reduce_op(
    input: &Tensor,
    kind: ReductionKind,
    axis: &AxisSpec,
    config: &ReduceConfig,
) -> Result<Tensor, NeuraRustError> {
    let resolved = resolve_axes(input.rank(), axis)?;
    let dtype = compute_dtype(kind, input.dtype(), config)?;
    let layout = ReductionLayout::new(&input.shape(), &resolved);

    let output = forward_values(kind, input, &layout, dtype)?;
    log::debug!(
        "{} over {:?} in {:?}: {:?} -> {:?}",
        kind.name(),
        resolved,
        dtype,
        layout.input_shape(),
        layout.output_shape()
    );

    if input.requires_grad() {
        let grad_fn: Arc<dyn BackwardOp + Send + Sync> = Arc::new(ReductionBackward {
            kind,
            input: input.clone(),
            output: output.detach(),
            axes: resolved,
            config: config.clone(),
        });
        output.attach_grad_fn(grad_fn);
    }
    Ok(output)
}

/// Gradient of `kind` with respect to `input`, given the cached forward
/// `output` and the `upstream` gradient.
///
/// # Errors
/// - `UndefinedGradient` if `input` does not require grad.
/// - `InvalidAxis` if `axis` does not resolve against the input rank.
/// - `ShapeMismatch` if `output` or `upstream` is not in the keep-dims
///   output shape.
/// - `NumericDegeneracy` for a zero input to `Prod` under
///   [`DegeneracyPolicy::Raise`](super::config::DegeneracyPolicy::Raise).
pub fn reduce_backward(
    kind: ReductionKind,
    input: &Tensor,
    output: &Tensor,
    axis: &AxisSpec,
    upstream: &Tensor,
    config: &ReduceConfig,
) -> Result<Tensor, NeuraRustError> {
    ensure_differentiable(input, kind.backward_name())?;
    let resolved = resolve_axes(input.rank(), axis)?;
    reduce_backward_resolved(kind, input, output, &resolved, upstream, config)
}

fn reduce_backward_resolved(
    kind: ReductionKind,
    input: &Tensor,
    output: &Tensor,
    axes: &ResolvedAxes,
    upstream: &Tensor,
    config: &ReduceConfig,
) -> Result<Tensor, NeuraRustError> {
    let dtype = compute_dtype(kind, input.dtype(), config)?;
    let layout = ReductionLayout::new(&input.shape(), axes);

    for (tensor, what) in [(output, "output"), (upstream, "upstream gradient")] {
        let shape = tensor.shape();
        if shape != layout.output_shape() {
            return Err(NeuraRustError::ShapeMismatch {
                expected: layout.output_shape().to_vec(),
                actual: shape,
                operation: format!("{} backward ({})", kind.name(), what),
            });
        }
    }

    log::trace!("{} for input shape {:?}", kind.backward_name(), layout.input_shape());
    backward_values(kind, input, output, upstream, &layout, layout.reduced_count(), dtype, config)
}

/// Backward node recorded by [`reduce_op`].
#[derive(Debug)]
struct ReductionBackward {
    kind: ReductionKind,
    input: Tensor,
    /// Detached, so the node does not keep its own output alive.
    output: Tensor,
    axes: ResolvedAxes,
    config: ReduceConfig,
}

impl BackwardOp for ReductionBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        let grad = reduce_backward_resolved(
            self.kind,
            &self.input,
            &self.output,
            &self.axes,
            grad_output,
            &self.config,
        )?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }

    fn name(&self) -> &'static str {
        self.kind.backward_name()
    }
}

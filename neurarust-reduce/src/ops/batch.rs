//! Reductions over a batch of independently shaped samples.
//!
//! Samples are never padded or stacked. An all-axes reduction folds every
//! sample to one partial value (on the rayon pool when
//! [`ReduceConfig::parallel`] is set) and combines the partials serially into
//! a single `[1]` tensor. Any other axis specification reduces each sample on
//! its own.

use crate::autograd::BackwardOp;
use crate::buffer::Buffer;
use crate::error::NeuraRustError;
use crate::ops::reduction::axis::{AxisSpec, ResolvedAxes};
use crate::ops::reduction::config::ReduceConfig;
use crate::ops::reduction::kind::ReductionKind;
use crate::ops::reduction::mean::count_as;
use crate::ops::reduction::reduce::{
    backward_values, ensure_differentiable, forward_values, reduce_backward, reduce_op,
};
use crate::ops::reduction::sum::sum_kernel;
use crate::ops::reduction::utils::ReductionLayout;
use crate::tensor::Tensor;
use crate::types::DType;
use num_traits::Float;
use rayon::prelude::*;
use std::sync::Arc;

/// An ordered, non-empty list of samples.
#[derive(Debug, Clone)]
pub struct Batch {
    samples: Vec<Tensor>,
}

/// Result of [`Batch::reduce`].
#[derive(Debug, Clone)]
pub enum BatchReduction {
    /// All-axes reduction: one `[1]` tensor for the whole batch.
    Combined(Tensor),
    /// One keep-dims result per sample, in sample order.
    PerSample(Vec<Tensor>),
}

impl BatchReduction {
    /// Number of tensors held.
    pub fn len(&self) -> usize {
        match self {
            BatchReduction::Combined(_) => 1,
            BatchReduction::PerSample(results) => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the combined tensor, if this is an all-axes result.
    pub fn combined(&self) -> Option<&Tensor> {
        match self {
            BatchReduction::Combined(t) => Some(t),
            BatchReduction::PerSample(_) => None,
        }
    }

    /// Returns the per-sample results, if this is not an all-axes result.
    pub fn per_sample(&self) -> Option<&[Tensor]> {
        match self {
            BatchReduction::Combined(_) => None,
            BatchReduction::PerSample(results) => Some(results),
        }
    }
}

impl Batch {
    /// # Errors
    /// `EmptyBatch` if `samples` is empty.
    pub fn new(samples: Vec<Tensor>) -> Result<Self, NeuraRustError> {
        if samples.is_empty() {
            return Err(NeuraRustError::EmptyBatch);
        }
        Ok(Batch { samples })
    }

    pub fn samples(&self) -> &[Tensor] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total element count across every sample.
    pub fn total_numel(&self) -> usize {
        self.samples.iter().map(Tensor::numel).sum()
    }

    /// Reduces the batch with `kind` over `axis`.
    ///
    /// `AxisSpec::All` gives [`BatchReduction::Combined`]; any other axis gives
    /// [`BatchReduction::PerSample`], each sample reduced as by
    /// [`reduce_op`](crate::ops::reduction::reduce_op).
    pub fn reduce(
        &self,
        kind: ReductionKind,
        axis: &AxisSpec,
        config: &ReduceConfig,
    ) -> Result<BatchReduction, NeuraRustError> {
        match axis {
            AxisSpec::All => self.reduce_all(kind, config).map(BatchReduction::Combined),
            _ => {
                let results = map_samples(&self.samples, config.parallel, |sample| {
                    reduce_op(sample, kind, axis, config)
                })?;
                Ok(BatchReduction::PerSample(results))
            }
        }
    }

    /// All-axes reduction of the whole batch into a `[1]` tensor.
    ///
    /// The result requires grad when any sample does; its backward node
    /// lists every sample as an input.
    pub fn reduce_all(&self, kind: ReductionKind, config: &ReduceConfig) -> Result<Tensor, NeuraRustError> {
        let dtype = batch_dtype(kind, &self.samples, config)?;
        let total = self.total_numel();

        // Mean folds partial sums and divides once by the batch-wide count.
        let partial_kind = match kind {
            ReductionKind::Mean => ReductionKind::Sum,
            other => other,
        };
        let partials = map_samples(&self.samples, config.parallel, |sample| {
            let layout = ReductionLayout::new(&sample.shape(), &ResolvedAxes::All);
            forward_values(partial_kind, sample, &layout, dtype)
        })?;

        let combined = match dtype {
            DType::F32 => {
                let values = partials
                    .iter()
                    .map(|p| p.buffer().try_get_f32().map(|d| d[0]))
                    .collect::<Result<Vec<f32>, _>>()?;
                Buffer::F32(Arc::new(vec![combine(kind, &values, total)?]))
            }
            DType::F64 => {
                let values = partials
                    .iter()
                    .map(|p| p.buffer().try_get_f64().map(|d| d[0]))
                    .collect::<Result<Vec<f64>, _>>()?;
                Buffer::F64(Arc::new(vec![combine(kind, &values, total)?]))
            }
            DType::I64 => {
                return Err(NeuraRustError::InternalError(
                    "batch combine reached with an integer dtype".to_string(),
                ))
            }
        };
        let output = Tensor::from_buffer(combined, vec![1])?;
        log::debug!(
            "batch {} over {} sample(s), {} element(s) in {:?}",
            kind.name(),
            self.samples.len(),
            total,
            dtype
        );

        if self.samples.iter().any(Tensor::requires_grad) {
            let grad_fn: Arc<dyn BackwardOp + Send + Sync> = Arc::new(BatchReduceBackward {
                kind,
                samples: self.samples.clone(),
                output: output.detach(),
                config: config.clone(),
            });
            output.attach_grad_fn(grad_fn);
        }
        Ok(output)
    }

    /// Gradients of a batch reduction, one per sample with that sample's shape.
    ///
    /// `reduction` is the forward result and `upstream` the gradient of the
    /// same layout: both `Combined` for `AxisSpec::All`, both `PerSample`
    /// with one tensor per sample otherwise.
    ///
    /// # Errors
    /// - `UndefinedGradient` if any sample does not require grad.
    /// - `ArityMismatch` if `reduction` or `upstream` does not hold the
    ///   expected number of tensors.
    /// - `ShapeMismatch` if a cached output or upstream has the wrong shape.
    pub fn reduce_backward(
        &self,
        kind: ReductionKind,
        axis: &AxisSpec,
        reduction: &BatchReduction,
        upstream: &BatchReduction,
        config: &ReduceConfig,
    ) -> Result<Vec<Tensor>, NeuraRustError> {
        let operation = format!("batch {} backward", kind.name());
        for (i, sample) in self.samples.iter().enumerate() {
            ensure_differentiable(sample, &format!("{} (sample {})", operation, i))?;
        }
        match (axis, reduction, upstream) {
            (AxisSpec::All, BatchReduction::Combined(output), BatchReduction::Combined(grad)) => {
                for tensor in [output, grad] {
                    if tensor.shape() != [1usize] {
                        return Err(NeuraRustError::ShapeMismatch {
                            expected: vec![1],
                            actual: tensor.shape(),
                            operation,
                        });
                    }
                }
                batch_all_backward(kind, &self.samples, output, grad, config)
            }
            (AxisSpec::All, _, _) => Err(NeuraRustError::ArityMismatch {
                operation,
                expected: 1,
                actual: reduction.len().max(upstream.len()),
            }),
            (_, BatchReduction::PerSample(outputs), BatchReduction::PerSample(grads))
                if outputs.len() == self.samples.len() && grads.len() == self.samples.len() =>
            {
                let indices: Vec<usize> = (0..self.samples.len()).collect();
                let grads = map_indices(&indices, config.parallel, |i| {
                    reduce_backward(kind, &self.samples[i], &outputs[i], axis, &grads[i], config)
                })?;
                Ok(grads)
            }
            _ => Err(NeuraRustError::ArityMismatch {
                operation,
                expected: self.samples.len(),
                actual: if reduction.len() != self.samples.len() {
                    reduction.len()
                } else {
                    upstream.len()
                },
            }),
        }
    }
}

/// Compute dtype of a batch: the configured one, else `F64` as soon as one
/// sample is `F64`, else `F32`.
fn batch_dtype(kind: ReductionKind, samples: &[Tensor], config: &ReduceConfig) -> Result<DType, NeuraRustError> {
    let dtype = match config.dtype {
        Some(dtype) => dtype,
        None if samples.iter().any(|s| s.dtype() == DType::F64) => DType::F64,
        None => DType::F32,
    };
    if !dtype.is_float() {
        return Err(NeuraRustError::DataTypeMismatch {
            expected: DType::F32,
            actual: dtype,
            operation: format!("batch {}", kind.name()),
        });
    }
    Ok(dtype)
}

/// Folds the per-sample partial values into the batch result.
fn combine<T: Float>(kind: ReductionKind, partials: &[T], total: usize) -> Result<T, NeuraRustError> {
    let layout = ReductionLayout::flat(partials.len());
    match kind {
        ReductionKind::Mean => Ok(sum_kernel(partials, &layout)[0] / count_as::<T>(total)?),
        other => Ok(other.forward_kernel(partials, &layout)?[0]),
    }
}

/// Per-sample gradients of an all-axes batch reduction.
///
/// Every sample is differentiated against the combined `output`, so max/min
/// compare with the global extremum and mean divides by the batch-wide count.
fn batch_all_backward(
    kind: ReductionKind,
    samples: &[Tensor],
    output: &Tensor,
    upstream: &Tensor,
    config: &ReduceConfig,
) -> Result<Vec<Tensor>, NeuraRustError> {
    let dtype = batch_dtype(kind, samples, config)?;
    let total: usize = samples.iter().map(Tensor::numel).sum();
    map_samples(samples, config.parallel, |sample| {
        let layout = ReductionLayout::new(&sample.shape(), &ResolvedAxes::All);
        backward_values(kind, sample, output, upstream, &layout, total, dtype, config)
    })
}

fn map_samples<F>(samples: &[Tensor], parallel: bool, f: F) -> Result<Vec<Tensor>, NeuraRustError>
where
    F: Fn(&Tensor) -> Result<Tensor, NeuraRustError> + Send + Sync,
{
    if parallel {
        samples.par_iter().map(f).collect()
    } else {
        samples.iter().map(f).collect()
    }
}

fn map_indices<F>(indices: &[usize], parallel: bool, f: F) -> Result<Vec<Tensor>, NeuraRustError>
where
    F: Fn(usize) -> Result<Tensor, NeuraRustError> + Send + Sync,
{
    if parallel {
        indices.par_iter().map(|&i| f(i)).collect()
    } else {
        indices.iter().map(|&i| f(i)).collect()
    }
}

/// Backward node of [`Batch::reduce_all`]. One input per sample.
#[derive(Debug)]
struct BatchReduceBackward {
    kind: ReductionKind,
    samples: Vec<Tensor>,
    output: Tensor,
    config: ReduceConfig,
}

impl BackwardOp for BatchReduceBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        batch_all_backward(self.kind, &self.samples, &self.output, grad_output, &self.config)
    }

    fn inputs(&self) -> Vec<Tensor> {
        self.samples.clone()
    }

    fn name(&self) -> &'static str {
        "BatchReduceBackward"
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;

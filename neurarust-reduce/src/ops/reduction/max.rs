//! Max and min reductions. Both share the tie rule of their gradient.

use super::axis::AxisSpec;
use super::config::ReduceConfig;
use super::kind::ReductionKind;
use super::reduce::reduce_op;
use super::utils::ReductionLayout;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use num_traits::Float;

/// Folds each group with `better(candidate, current)`; NaN wins once seen.
fn extremum_kernel<T: Float>(
    input: &[T],
    layout: &ReductionLayout,
    init: T,
    better: impl Fn(T, T) -> bool,
) -> Vec<T> {
    let mut output = vec![init; layout.output_numel()];
    for (i, &x) in input.iter().enumerate() {
        let o = layout.output_index(i);
        let current = output[o];
        if current.is_nan() {
            continue;
        }
        if x.is_nan() || better(x, current) {
            output[o] = x;
        }
    }
    output
}

pub(crate) fn max_kernel<T: Float>(input: &[T], layout: &ReductionLayout) -> Vec<T> {
    extremum_kernel(input, layout, T::neg_infinity(), |x, current| x > current)
}

pub(crate) fn min_kernel<T: Float>(input: &[T], layout: &ReductionLayout) -> Vec<T> {
    extremum_kernel(input, layout, T::infinity(), |x, current| x < current)
}

/// Gradient of max and min.
///
/// The upstream value goes to every input equal to the cached extremum. Ties
/// are not split: each tied position receives the full upstream value. A NaN
/// extremum compares equal to nothing, so its upstream value goes to the
/// first NaN of the group, the element the forward pass picked.
pub(crate) fn extremum_backward_kernel<T: Float>(
    input: &[T],
    output: &[T],
    grad_output: &[T],
    layout: &ReductionLayout,
) -> Vec<T> {
    let mut nan_routed = vec![false; output.len()];
    input
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let o = layout.output_index(i);
            if x == output[o] {
                grad_output[o]
            } else if x.is_nan() && output[o].is_nan() && !nan_routed[o] {
                nan_routed[o] = true;
                grad_output[o]
            } else {
                T::zero()
            }
        })
        .collect()
}

/// Maximum of `tensor` along `axis`, keeping reduced axes with size 1.
pub fn max_op(tensor: &Tensor, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
    reduce_op(tensor, ReductionKind::Max, &axis.into(), &ReduceConfig::default())
}

/// Minimum of `tensor` along `axis`, keeping reduced axes with size 1.
pub fn min_op(tensor: &Tensor, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
    reduce_op(tensor, ReductionKind::Min, &axis.into(), &ReduceConfig::default())
}

#[cfg(test)]
#[path = "max_test.rs"]
mod tests;

use super::axis::AxisSpec;
use super::config::ReduceConfig;
use super::kind::ReductionKind;
use super::reduce::reduce_op;
use super::utils::ReductionLayout;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use num_traits::Float;

/// Sums the input into one accumulator per output element.
pub(crate) fn sum_kernel<T: Float>(input: &[T], layout: &ReductionLayout) -> Vec<T> {
    let mut output = vec![T::zero(); layout.output_numel()];
    for (i, &x) in input.iter().enumerate() {
        let o = layout.output_index(i);
        output[o] = output[o] + x;
    }
    output
}

/// Gradient of sum: the upstream value is copied to every folded position.
pub(crate) fn sum_backward_kernel<T: Float>(grad_output: &[T], layout: &ReductionLayout) -> Vec<T> {
    (0..layout.input_numel())
        .map(|i| grad_output[layout.output_index(i)])
        .collect()
}

/// Sums `tensor` along `axis`, keeping reduced axes with size 1.
pub fn sum_op(tensor: &Tensor, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
    reduce_op(tensor, ReductionKind::Sum, &axis.into(), &ReduceConfig::default())
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;

use super::axis::AxisSpec;
use super::config::{DegeneracyPolicy, ReduceConfig};
use super::kind::ReductionKind;
use super::reduce::reduce_op;
use super::utils::ReductionLayout;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use num_traits::Float;

pub(crate) fn prod_kernel<T: Float>(input: &[T], layout: &ReductionLayout) -> Vec<T> {
    let mut output = vec![T::one(); layout.output_numel()];
    for (i, &x) in input.iter().enumerate() {
        let o = layout.output_index(i);
        output[o] = output[o] * x;
    }
    output
}

/// Gradient of product: `upstream * output / x`.
///
/// A zero input makes the division degenerate. With
/// [`DegeneracyPolicy::Propagate`] the IEEE result (`±inf` or NaN) is kept;
/// with [`DegeneracyPolicy::Raise`] the first zero (lowest flat index) fails
/// the whole call.
pub(crate) fn prod_backward_kernel<T: Float>(
    input: &[T],
    output: &[T],
    grad_output: &[T],
    layout: &ReductionLayout,
    policy: DegeneracyPolicy,
) -> Result<Vec<T>, NeuraRustError> {
    let mut degenerate = 0usize;
    let mut grad_input = Vec::with_capacity(input.len());
    for (i, &x) in input.iter().enumerate() {
        if x == T::zero() {
            match policy {
                DegeneracyPolicy::Raise => {
                    return Err(NeuraRustError::NumericDegeneracy {
                        operation: ReductionKind::Prod.name().to_string(),
                        index: i,
                    });
                }
                DegeneracyPolicy::Propagate => degenerate += 1,
            }
        }
        let o = layout.output_index(i);
        grad_input.push(grad_output[o] * output[o] / x);
    }
    if degenerate > 0 {
        log::warn!(
            "prod backward divided by zero at {} position(s); gradients there are non-finite",
            degenerate
        );
    }
    Ok(grad_input)
}

/// Product of `tensor` along `axis`, keeping reduced axes with size 1.
pub fn prod_op(tensor: &Tensor, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
    reduce_op(tensor, ReductionKind::Prod, &axis.into(), &ReduceConfig::default())
}

#[cfg(test)]
#[path = "prod_test.rs"]
mod tests;

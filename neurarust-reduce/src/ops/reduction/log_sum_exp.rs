use super::axis::AxisSpec;
use super::config::ReduceConfig;
use super::kind::ReductionKind;
use super::max::max_kernel;
use super::reduce::reduce_op;
use super::utils::ReductionLayout;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use num_traits::Float;

/// `log(sum(exp(x)))` per group, computed as `m + log(sum(exp(x - m)))` with
/// `m` the group maximum so that large inputs do not overflow.
///
/// A group whose maximum is not finite returns that maximum (`+inf`, `-inf`
/// when every element is `-inf`, or NaN).
pub(crate) fn log_sum_exp_kernel<T: Float>(input: &[T], layout: &ReductionLayout) -> Vec<T> {
    let maxes = max_kernel(input, layout);
    let mut sums = vec![T::zero(); layout.output_numel()];
    for (i, &x) in input.iter().enumerate() {
        let o = layout.output_index(i);
        if maxes[o].is_finite() {
            sums[o] = sums[o] + (x - maxes[o]).exp();
        }
    }
    maxes
        .into_iter()
        .zip(sums)
        .map(|(m, s)| if m.is_finite() { m + s.ln() } else { m })
        .collect()
}

/// Gradient of log-sum-exp: `upstream * exp(x - output)`, i.e. the softmax of
/// the group scaled by the upstream value. Uses the cached output so nothing
/// is exponentiated un-shifted.
pub(crate) fn log_sum_exp_backward_kernel<T: Float>(
    input: &[T],
    output: &[T],
    grad_output: &[T],
    layout: &ReductionLayout,
) -> Vec<T> {
    input
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let o = layout.output_index(i);
            grad_output[o] * (x - output[o]).exp()
        })
        .collect()
}

/// Numerically stable log-sum-exp of `tensor` along `axis` (keep-dims).
pub fn log_sum_exp_op(tensor: &Tensor, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
    reduce_op(tensor, ReductionKind::LogSumExp, &axis.into(), &ReduceConfig::default())
}

#[cfg(test)]
#[path = "log_sum_exp_test.rs"]
mod tests;

use super::axis::AxisSpec;
use super::config::ReduceConfig;
use super::kind::ReductionKind;
use super::reduce::reduce_op;
use super::sum::sum_kernel;
use super::utils::ReductionLayout;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use num_traits::Float;

/// Converts an element count to the kernel's float type.
pub(crate) fn count_as<T: Float>(count: usize) -> Result<T, NeuraRustError> {
    if count == 0 {
        return Err(NeuraRustError::InternalError(
            "mean over zero elements".to_string(),
        ));
    }
    T::from(count).ok_or_else(|| {
        NeuraRustError::InternalError(format!("Failed to convert element count {} to float", count))
    })
}

/// Mean: the sum divided by the number of folded elements.
pub(crate) fn mean_kernel<T: Float>(input: &[T], layout: &ReductionLayout) -> Result<Vec<T>, NeuraRustError> {
    let n = count_as::<T>(layout.reduced_count())?;
    Ok(sum_kernel(input, layout).into_iter().map(|s| s / n).collect())
}

/// Gradient of mean: upstream / `count` at every folded position.
///
/// `count` is passed explicitly because a batch-wide mean divides by the
/// element count of the whole batch, not of one sample.
pub(crate) fn mean_backward_kernel<T: Float>(
    grad_output: &[T],
    layout: &ReductionLayout,
    count: usize,
) -> Result<Vec<T>, NeuraRustError> {
    let n = count_as::<T>(count)?;
    Ok((0..layout.input_numel())
        .map(|i| grad_output[layout.output_index(i)] / n)
        .collect())
}

/// Averages `tensor` along `axis`, keeping reduced axes with size 1.
pub fn mean_op(tensor: &Tensor, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
    reduce_op(tensor, ReductionKind::Mean, &axis.into(), &ReduceConfig::default())
}

#[cfg(test)]
#[path = "mean_test.rs"]
mod tests;

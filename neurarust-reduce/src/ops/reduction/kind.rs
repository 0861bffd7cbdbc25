use super::config::DegeneracyPolicy;
use super::log_sum_exp::{log_sum_exp_backward_kernel, log_sum_exp_kernel};
use super::max::{extremum_backward_kernel, max_kernel, min_kernel};
use super::mean::{mean_backward_kernel, mean_kernel};
use super::prod::{prod_backward_kernel, prod_kernel};
use super::sum::{sum_backward_kernel, sum_kernel};
use super::utils::ReductionLayout;
use crate::error::NeuraRustError;
use num_traits::Float;
use std::fmt;

/// The differentiable reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReductionKind {
    Sum,
    Mean,
    Max,
    Min,
    LogSumExp,
    Prod,
}

impl ReductionKind {
    pub const ALL: [ReductionKind; 6] = [
        ReductionKind::Sum,
        ReductionKind::Mean,
        ReductionKind::Max,
        ReductionKind::Min,
        ReductionKind::LogSumExp,
        ReductionKind::Prod,
    ];

    /// Canonical operator name, as accepted by the registry.
    pub fn name(&self) -> &'static str {
        match self {
            ReductionKind::Sum => "reduce_sum",
            ReductionKind::Mean => "reduce_mean",
            ReductionKind::Max => "reduce_max",
            ReductionKind::Min => "reduce_min",
            ReductionKind::LogSumExp => "reduce_log_sum_exp",
            ReductionKind::Prod => "reduce_prod",
        }
    }

    /// Name of the backward node recorded in the graph.
    pub fn backward_name(&self) -> &'static str {
        match self {
            ReductionKind::Sum => "SumBackward",
            ReductionKind::Mean => "MeanBackward",
            ReductionKind::Max => "MaxBackward",
            ReductionKind::Min => "MinBackward",
            ReductionKind::LogSumExp => "LogSumExpBackward",
            ReductionKind::Prod => "ProdBackward",
        }
    }

    /// Runs the forward kernel of this reduction over `input`.
    pub(crate) fn forward_kernel<T: Float>(
        &self,
        input: &[T],
        layout: &ReductionLayout,
    ) -> Result<Vec<T>, NeuraRustError> {
        Ok(match self {
            ReductionKind::Sum => sum_kernel(input, layout),
            ReductionKind::Mean => mean_kernel(input, layout)?,
            ReductionKind::Max => max_kernel(input, layout),
            ReductionKind::Min => min_kernel(input, layout),
            ReductionKind::LogSumExp => log_sum_exp_kernel(input, layout),
            ReductionKind::Prod => prod_kernel(input, layout),
        })
    }

    /// Runs the backward kernel of this reduction.
    ///
    /// `output` and `grad_output` are laid out in `layout`'s output shape.
    /// `count` is the number of elements each output averaged over (only read
    /// by `Mean`).
    pub(crate) fn backward_kernel<T: Float>(
        &self,
        input: &[T],
        output: &[T],
        grad_output: &[T],
        layout: &ReductionLayout,
        count: usize,
        policy: DegeneracyPolicy,
    ) -> Result<Vec<T>, NeuraRustError> {
        match self {
            ReductionKind::Sum => Ok(sum_backward_kernel(grad_output, layout)),
            ReductionKind::Mean => mean_backward_kernel(grad_output, layout, count),
            ReductionKind::Max | ReductionKind::Min => {
                Ok(extremum_backward_kernel(input, output, grad_output, layout))
            }
            ReductionKind::LogSumExp => Ok(log_sum_exp_backward_kernel(input, output, grad_output, layout)),
            ReductionKind::Prod => prod_backward_kernel(input, output, grad_output, layout, policy),
        }
    }
}

impl fmt::Display for ReductionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use crate::error::NeuraRustError;
use crate::ops::reduction::{
    arg_reduce_op, reduce_op, ArgKind, AxisSpec, ReduceConfig, ReductionKind,
};
use crate::tensor::Tensor;

impl Tensor {
    /// Sums the tensor elements over `axis`, keeping reduced axes with size 1.
    /// Delegates to `ops::reduction::sum::sum_op`.
    pub fn sum(&self, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
        crate::ops::reduction::sum::sum_op(self, axis)
    }

    /// Computes the mean of the tensor elements over `axis`.
    /// Delegates to `ops::reduction::mean::mean_op`.
    pub fn mean(&self, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
        crate::ops::reduction::mean::mean_op(self, axis)
    }

    /// Computes the maximum of the tensor elements over `axis`.
    /// Delegates to `ops::reduction::max::max_op`.
    pub fn max(&self, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
        crate::ops::reduction::max::max_op(self, axis)
    }

    /// Computes the minimum of the tensor elements over `axis`.
    pub fn min(&self, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
        crate::ops::reduction::max::min_op(self, axis)
    }

    pub fn log_sum_exp(&self, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
        crate::ops::reduction::log_sum_exp::log_sum_exp_op(self, axis)
    }

    pub fn prod(&self, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
        crate::ops::reduction::prod::prod_op(self, axis)
    }

    /// Index of the maximum over `axis`, as an `I64` tensor.
    pub fn argmax(&self, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
        arg_reduce_op(self, ArgKind::ArgMax, &axis.into())
    }

    /// Index of the minimum over `axis`, as an `I64` tensor.
    pub fn argmin(&self, axis: impl Into<AxisSpec>) -> Result<Tensor, NeuraRustError> {
        arg_reduce_op(self, ArgKind::ArgMin, &axis.into())
    }

    /// Runs any differentiable reduction with an explicit configuration.
    pub fn reduce(
        &self,
        kind: ReductionKind,
        axis: impl Into<AxisSpec>,
        config: &ReduceConfig,
    ) -> Result<Tensor, NeuraRustError> {
        reduce_op(self, kind, &axis.into(), config)
    }
}

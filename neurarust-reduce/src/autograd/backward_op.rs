use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use std::fmt::Debug;

/// Defines the interface for the backward pass of a differentiable tensor operation.
///
/// Any operation that creates a non-leaf `Tensor` (an output computed from inputs
/// that require gradients) attaches an implementation of this trait to the
/// output's `grad_fn`. `Tensor::backward` walks these nodes in reverse
/// topological order and calls them to propagate gradients by the chain rule.
///
/// `Debug + Send + Sync` are required because nodes are shared through
/// `Arc<dyn BackwardOp>` and may be reached from worker threads.
pub trait BackwardOp: Debug + Send + Sync {
    /// Computes dL/dInput_i for every input, given dL/dOutput (`grad_output`).
    ///
    /// # Returns
    /// One gradient per input, in the order returned by [`BackwardOp::inputs`].
    /// Each gradient has the shape of the corresponding input.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError>;

    /// The input tensors that participated in the forward operation.
    ///
    /// Holding the inputs (not the output) keeps the graph acyclic in memory.
    fn inputs(&self) -> Vec<Tensor>;

    /// Short operation name used in logs and error messages.
    fn name(&self) -> &'static str;
}

//! Late-bound access to the reduction operators.
//!
//! A host graph names operators by string (`"reduce_sum"`, `"ReduceMax"`,
//! `"argmin"`, ...). [`OpKind`] parses those names into a closed enum and
//! [`OpKind::entry`] returns the forward/backward functions to call.
//! [`evaluate_forward`] and [`evaluate_backward`] are the evaluation
//! contract: several inputs are accepted only with `AxisSpec::All`, in which
//! case they are treated as one batch.

use crate::error::NeuraRustError;
use crate::ops::batch::{Batch, BatchReduction};
use crate::ops::reduction::{
    arg_backward, arg_reduce_op, reduce_backward, reduce_op, ArgKind, AxisSpec, ReduceConfig, ReductionKind,
};
use crate::tensor::Tensor;
use std::fmt;
use std::str::FromStr;

/// Every operator the registry knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Reduce(ReductionKind),
    Arg(ArgKind),
}

/// Forward function of a registered operator.
pub type ForwardFn = fn(OpKind, &[Tensor], &AxisSpec, &ReduceConfig) -> Result<Tensor, NeuraRustError>;

/// Backward function of a registered operator: `(kind, inputs, cached_output,
/// axis, upstream, config)`, one gradient per input.
pub type BackwardFn =
    fn(OpKind, &[Tensor], &Tensor, &AxisSpec, &Tensor, &ReduceConfig) -> Result<Vec<Tensor>, NeuraRustError>;

/// Registration record of one operator. Arg-reductions have no backward.
#[derive(Clone, Copy)]
pub struct OpEntry {
    pub kind: OpKind,
    pub forward: ForwardFn,
    pub backward: Option<BackwardFn>,
}

impl fmt::Debug for OpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpEntry")
            .field("kind", &self.kind)
            .field("differentiable", &self.backward.is_some())
            .finish()
    }
}

impl OpKind {
    pub const ALL: [OpKind; 8] = [
        OpKind::Reduce(ReductionKind::Sum),
        OpKind::Reduce(ReductionKind::Mean),
        OpKind::Reduce(ReductionKind::Max),
        OpKind::Reduce(ReductionKind::Min),
        OpKind::Reduce(ReductionKind::LogSumExp),
        OpKind::Reduce(ReductionKind::Prod),
        OpKind::Arg(ArgKind::ArgMax),
        OpKind::Arg(ArgKind::ArgMin),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Reduce(kind) => kind.name(),
            OpKind::Arg(kind) => kind.name(),
        }
    }

    pub fn is_differentiable(&self) -> bool {
        matches!(self, OpKind::Reduce(_))
    }

    pub fn entry(&self) -> OpEntry {
        match self {
            OpKind::Reduce(_) => OpEntry {
                kind: *self,
                forward: evaluate_forward,
                backward: Some(evaluate_backward),
            },
            OpKind::Arg(_) => OpEntry {
                kind: *self,
                forward: evaluate_forward,
                backward: None,
            },
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OpKind {
    type Err = NeuraRustError;

    /// Case-insensitive; underscores are ignored and a leading `reduce` is
    /// optional, so `"reduce_sum"`, `"ReduceSum"` and `"sum"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let short = normalized.strip_prefix("reduce").unwrap_or(&normalized);
        let kind = match short {
            "sum" => OpKind::Reduce(ReductionKind::Sum),
            "mean" => OpKind::Reduce(ReductionKind::Mean),
            "max" => OpKind::Reduce(ReductionKind::Max),
            "min" => OpKind::Reduce(ReductionKind::Min),
            "logsumexp" => OpKind::Reduce(ReductionKind::LogSumExp),
            "prod" => OpKind::Reduce(ReductionKind::Prod),
            "argmax" => OpKind::Arg(ArgKind::ArgMax),
            "argmin" => OpKind::Arg(ArgKind::ArgMin),
            _ => {
                return Err(NeuraRustError::UnsupportedOperation(format!(
                    "Unknown reduction operator '{}'",
                    s
                )))
            }
        };
        Ok(kind)
    }
}

fn arity_error(kind: OpKind, actual: usize) -> NeuraRustError {
    NeuraRustError::ArityMismatch {
        operation: kind.name().to_string(),
        expected: 1,
        actual,
    }
}

/// Forward evaluation of `kind`.
///
/// One input is reduced over `axis`. Several inputs are only accepted by the
/// differentiable reductions with `AxisSpec::All`, and produce the combined
/// `[1]` result of the whole batch.
///
/// The all-axes output shape depends on the input count: a single input of
/// rank `r` keeps every axis and gives `[1; r]` (`[1, 1]` for a matrix),
/// while a batch of two or more inputs gives `[1]`, since the samples may
/// differ in rank. [`evaluate_backward`] expects `cached_output` and
/// `upstream` in that same shape.
///
/// # Errors
/// `ArityMismatch` for zero inputs, or several inputs with any other axis
/// specification or an arg-reduction.
pub fn evaluate_forward(
    kind: OpKind,
    inputs: &[Tensor],
    axis: &AxisSpec,
    config: &ReduceConfig,
) -> Result<Tensor, NeuraRustError> {
    log::debug!("evaluate_forward: {} on {} input(s)", kind, inputs.len());
    match (kind, inputs) {
        (_, []) => Err(arity_error(kind, 0)),
        (OpKind::Reduce(reduction), [input]) => reduce_op(input, reduction, axis, config),
        (OpKind::Reduce(reduction), samples) if *axis == AxisSpec::All => {
            Batch::new(samples.to_vec())?.reduce_all(reduction, config)
        }
        (OpKind::Arg(arg), [input]) => arg_reduce_op(input, arg, axis),
        (_, several) => Err(arity_error(kind, several.len())),
    }
}

/// Backward evaluation of `kind`: one gradient per input, in input order,
/// each with its input's shape.
///
/// # Errors
/// - `UndefinedGradient` for arg-reductions.
/// - `ArityMismatch` under the same rules as [`evaluate_forward`].
/// - Any error of the underlying backward (`ShapeMismatch`,
///   `NumericDegeneracy`, ...).
pub fn evaluate_backward(
    kind: OpKind,
    inputs: &[Tensor],
    cached_output: &Tensor,
    axis: &AxisSpec,
    upstream: &Tensor,
    config: &ReduceConfig,
) -> Result<Vec<Tensor>, NeuraRustError> {
    log::debug!("evaluate_backward: {} on {} input(s)", kind, inputs.len());
    match (kind, inputs) {
        (OpKind::Arg(arg), _) => arg_backward(arg).map(|grad| vec![grad]),
        (_, []) => Err(arity_error(kind, 0)),
        (OpKind::Reduce(reduction), [input]) => {
            reduce_backward(reduction, input, cached_output, axis, upstream, config).map(|grad| vec![grad])
        }
        (OpKind::Reduce(reduction), samples) if *axis == AxisSpec::All => Batch::new(samples.to_vec())?
            .reduce_backward(
                reduction,
                axis,
                &BatchReduction::Combined(cached_output.clone()),
                &BatchReduction::Combined(upstream.clone()),
                config,
            ),
        (_, several) => Err(arity_error(kind, several.len())),
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

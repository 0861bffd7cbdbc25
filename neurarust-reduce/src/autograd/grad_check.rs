use crate::error::NeuraRustError;
use crate::tensor::create::from_f64_values;
use crate::tensor::Tensor;
use crate::types::DType;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input tensor at index {input_index}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(NeuraRustError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(NeuraRustError),
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(NeuraRustError),
    #[error("Unsupported data type for gradient check: {0:?}")]
    UnsupportedDType(DType),
    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Gradient check input tensor must be a leaf node (no grad_fn). Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
}

impl From<NeuraRustError> for GradCheckError {
    fn from(err: NeuraRustError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks analytical gradients against numerical gradients using central
/// finite differences.
///
/// The scalar loss is `sum(func(inputs) * output_grad)`, so the analytical
/// side is the gradient obtained by calling `backward(Some(output_grad))` on
/// the output. Every input that requires grad is perturbed element by
/// element by `±epsilon`.
///
/// Inputs may be `F32` or `F64`; perturbed copies keep the input's dtype.
/// A gradient passes when it is within `tolerance` absolutely or relatively.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, NeuraRustError>,
{
    for (i, input) in inputs.iter().enumerate() {
        let dtype = input.dtype();
        if !dtype.is_float() {
            return Err(GradCheckError::UnsupportedDType(dtype));
        }
        if input.requires_grad() && !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
    }
    if !output_grad.dtype().is_float() {
        return Err(GradCheckError::UnsupportedDType(output_grad.dtype()));
    }

    // --- Analytical gradients ---
    for input in inputs.iter().filter(|t| t.requires_grad()) {
        input.clear_grad();
    }
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    if inputs.iter().any(Tensor::requires_grad) && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }
    if output.requires_grad() {
        output
            .backward(Some(output_grad.clone()))
            .map_err(GradCheckError::BackwardPassError)?;
    }
    let weights = output_grad.to_f64_vec();

    // --- Numerical gradients ---
    for (i, original_input) in inputs.iter().enumerate() {
        if !original_input.requires_grad() {
            continue;
        }
        let analytical = original_input
            .grad()
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?
            .to_f64_vec();
        let original_values = original_input.to_f64_vec();

        for elem_idx in 0..original_values.len() {
            let perturbed_loss = |delta: f64| -> Result<f64, GradCheckError> {
                let mut values = original_values.clone();
                values[elem_idx] += delta;
                let perturbed = from_f64_values(values, original_input.shape(), original_input.dtype())?;
                let mut perturbed_inputs = inputs.to_vec();
                perturbed_inputs[i] = perturbed;
                let out = func(&perturbed_inputs).map_err(GradCheckError::ForwardPassError)?;
                calculate_loss(&out, &weights)
            };
            let loss_plus = perturbed_loss(epsilon)?;
            let loss_minus = perturbed_loss(-epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical[elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }

            if !approx::relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
        log::trace!("grad_check: input {} passed ({} elements)", i, original_values.len());
    }

    Ok(())
}

/// `sum(output * weights)` in f64.
fn calculate_loss(output: &Tensor, weights: &[f64]) -> Result<f64, GradCheckError> {
    let values = output.to_f64_vec();
    if values.len() != weights.len() {
        return Err(GradCheckError::TensorError(NeuraRustError::ShapeMismatch {
            expected: vec![weights.len()],
            actual: output.shape(),
            operation: "calculate_loss (grad_check)".to_string(),
        }));
    }
    Ok(values.iter().zip(weights).map(|(v, w)| v * w).sum())
}

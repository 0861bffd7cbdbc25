use crate::autograd::graph::{topological_sort, NodeId};
use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::arithmetic::add_op;
use crate::tensor::create::ones_like;
use crate::tensor::Tensor;
use std::collections::HashMap;
use std::sync::Arc;

impl Tensor {
    /// Checks if this tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` flag for this tensor.
    ///
    /// Only floating-point tensors can track gradients.
    pub fn set_requires_grad(&self, requires_grad: bool) -> Result<(), NeuraRustError> {
        let mut guard = self.write_data();
        if requires_grad && !guard.dtype.is_float() {
            return Err(NeuraRustError::UnsupportedOperation(format!(
                "Only floating-point tensors can require grad, got {:?}",
                guard.dtype
            )));
        }
        if requires_grad && guard.grad_fn.is_some() {
            log::warn!("Setting requires_grad=true on a non-leaf tensor. Gradients will not accumulate here during backward().");
        }
        guard.requires_grad = requires_grad;
        Ok(())
    }

    /// Returns a clone of the accumulated gradient, if any.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Clears the accumulated gradient.
    pub fn clear_grad(&self) {
        self.write_data().grad = None;
    }

    /// True for tensors not produced by a differentiable operation.
    pub fn is_leaf(&self) -> bool {
        self.read_data().grad_fn.is_none()
    }

    /// Graph identity of this tensor (shared by all clones of the handle).
    pub fn node_id(&self) -> NodeId {
        Arc::as_ptr(&self.data)
    }

    /// Accumulates `grad_to_add` into this tensor's gradient buffer.
    ///
    /// Existing values are added to, never overwritten. The write guard is held
    /// for the whole read-add-store so concurrent accumulations serialize.
    pub fn acc_grad(&self, grad_to_add: Tensor) -> Result<(), NeuraRustError> {
        let mut guard = self.write_data();
        if grad_to_add.shape() != guard.shape {
            return Err(NeuraRustError::ShapeMismatch {
                expected: guard.shape.clone(),
                actual: grad_to_add.shape(),
                operation: "acc_grad".to_string(),
            });
        }
        let grad_to_add = grad_to_add.cast(guard.dtype);
        let new_grad = match guard.grad.take() {
            Some(existing_grad) => add_op(&existing_grad, &grad_to_add)?,
            None => grad_to_add,
        };
        guard.grad = Some(new_grad);
        Ok(())
    }

    /// Returns a clone of the backward node that produced this tensor.
    pub fn grad_fn(&self) -> Option<Arc<dyn BackwardOp + Send + Sync>> {
        self.read_data().grad_fn.clone()
    }

    /// Records `grad_fn` as the operation that produced this tensor and marks
    /// the tensor as requiring grad.
    pub(crate) fn attach_grad_fn(&self, grad_fn: Arc<dyn BackwardOp + Send + Sync>) {
        let mut guard = self.write_data();
        guard.requires_grad = true;
        guard.grad_fn = Some(grad_fn);
    }

    /// Performs the backward pass starting from this tensor.
    ///
    /// # Arguments
    /// * `gradient`: initial dL/dself. If `None`, this tensor must hold a single
    ///   element and the initial gradient is one.
    ///
    /// # Errors
    /// * `UndefinedGradient` if this tensor does not require grad (constant
    ///   input, arg-reduction result, ...).
    /// * `ShapeMismatch` if `gradient` does not have this tensor's shape, or a
    ///   backward node returns a gradient of the wrong shape.
    /// * `BackwardNonScalar` if `gradient` is `None` for a multi-element tensor.
    pub fn backward(&self, gradient: Option<Tensor>) -> Result<(), NeuraRustError> {
        if !self.requires_grad() {
            return Err(NeuraRustError::UndefinedGradient {
                operation: "backward on a tensor that does not require grad".to_string(),
            });
        }

        let grad_init = match gradient {
            Some(g) => {
                if g.shape() != self.shape() {
                    return Err(NeuraRustError::ShapeMismatch {
                        expected: self.shape(),
                        actual: g.shape(),
                        operation: "backward".to_string(),
                    });
                }
                g.cast(self.dtype())
            }
            None => {
                if self.numel() != 1 {
                    return Err(NeuraRustError::BackwardNonScalar);
                }
                ones_like(self)?
            }
        };

        let sorted_nodes = topological_sort(self);
        let mut grad_map: HashMap<NodeId, Tensor> = HashMap::new();
        grad_map.insert(self.node_id(), grad_init);

        for node in sorted_nodes.iter().rev() {
            let Some(accumulated_grad) = grad_map.remove(&node.node_id()) else {
                continue;
            };

            let Some(op) = node.grad_fn() else {
                if node.requires_grad() {
                    node.acc_grad(accumulated_grad)?;
                }
                continue;
            };

            log::trace!("backward: running {}", op.name());
            let input_grads = op.backward(&accumulated_grad)?;
            let inputs = op.inputs();
            if input_grads.len() != inputs.len() {
                return Err(NeuraRustError::InternalError(format!(
                    "{} returned {} gradients for {} inputs",
                    op.name(),
                    input_grads.len(),
                    inputs.len()
                )));
            }

            for (input, grad) in inputs.iter().zip(input_grads) {
                if !input.requires_grad() {
                    continue;
                }
                if grad.shape() != input.shape() {
                    return Err(NeuraRustError::ShapeMismatch {
                        expected: input.shape(),
                        actual: grad.shape(),
                        operation: format!("{} backward", op.name()),
                    });
                }
                let merged = match grad_map.remove(&input.node_id()) {
                    Some(existing) => add_op(&existing, &grad)?,
                    None => grad,
                };
                grad_map.insert(input.node_id(), merged);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;

//! # Tensor Operations Module (`ops`)
//!
//! ## Structure:
//!
//! - **`_op` Functions:** Each operation has a core function (named `xxx_op`)
//!   that performs the forward computation and sets up the backward pass for
//!   autograd. The `Tensor` methods delegate to them.
//! - **`Backward` Structs:** Each differentiable operation records a struct
//!   implementing [`BackwardOp`](crate::autograd::BackwardOp) that keeps the
//!   forward context needed to compute gradients.
//!
//! ## Key Submodules:
//!
//! - [`reduction`]: sum, mean, max, min, log-sum-exp, prod, argmax, argmin.
//! - [`batch`]: reductions over batches of independently shaped samples.
//! - [`registry`]: name-based lookup and the forward/backward evaluation
//!   contract.
//! - [`arithmetic`]: element-wise addition used for gradient accumulation.

pub mod arithmetic;
pub mod batch;
pub mod reduction;
pub mod registry;

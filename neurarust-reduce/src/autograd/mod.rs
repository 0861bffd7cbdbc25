//! Reverse-mode automatic differentiation: backward nodes, graph ordering and
//! finite-difference gradient checking.

pub mod backward_op;
pub mod grad_check;
pub mod graph;

pub use backward_op::BackwardOp;
pub use graph::NodeId;

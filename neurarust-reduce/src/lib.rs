//! Differentiable reduction operators over dense tensors.
//!
//! Sum, mean, max, min, log-sum-exp and product reduce over one axis, several
//! axes or every axis, always keeping reduced axes with size 1, and
//! participate in reverse-mode autograd. Argmax and argmin return indices.
//! [`ops::batch::Batch`] applies the same operators to batches of
//! differently shaped samples, and [`ops::registry`] exposes them by name.
//!
//! ```
//! use neurarust_reduce::ops::reduction::AxisSpec;
//! use neurarust_reduce::Tensor;
//!
//! let x = Tensor::new(vec![1.0, 2.0, 4.0, 5.0], vec![2, 2]).unwrap();
//! x.set_requires_grad(true).unwrap();
//! let m = x.mean(AxisSpec::Index(0)).unwrap();
//! assert_eq!(m.shape(), vec![1, 2]);
//! m.backward(Some(neurarust_reduce::tensor::ones(&[1, 2]).unwrap())).unwrap();
//! assert_eq!(x.grad().unwrap().get_f32_data().unwrap(), vec![0.5; 4]);
//! ```

pub mod autograd;
pub mod buffer;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod types;
pub mod utils;

pub use error::NeuraRustError;
pub use tensor::Tensor;
pub use types::DType;
// Re-export traits required by public functions/structs
pub use num_traits;

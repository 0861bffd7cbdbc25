//! Reduction operators: sum, mean, max, min, log-sum-exp, prod, argmax and
//! argmin.
//!
//! Every reduction keeps the reduced axes with size 1, so an input of shape
//! `[2, 3]` reduced over axis 1 gives `[2, 1]`. The `xxx_op` functions use a
//! default [`ReduceConfig`]; [`reduce_op`] and [`reduce_backward`] take one
//! explicitly.

pub mod arg;
pub mod axis;
pub mod config;
pub mod kind;
pub mod log_sum_exp;
pub mod max;
pub mod mean;
pub mod prod;
pub mod reduce;
pub mod sum;
pub mod utils;

pub use arg::{arg_backward, arg_reduce_op, argmax_op, argmin_op, ArgKind};
pub use axis::{normalize_axis, resolve_axes, AxisSpec, ResolvedAxes};
pub use config::{DegeneracyPolicy, ReduceConfig};
pub use kind::ReductionKind;
pub use log_sum_exp::log_sum_exp_op;
pub use max::{max_op, min_op};
pub use mean::mean_op;
pub use prod::prod_op;
pub use reduce::{reduce_backward, reduce_op};
pub use sum::sum_op;
pub use utils::ReductionLayout;

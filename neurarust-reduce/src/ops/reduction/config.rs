use crate::types::DType;

/// What product backward does when an input element is zero.
///
/// The analytic rule `upstream * output / x` divides by the element itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneracyPolicy {
    /// Perform the IEEE division: `±inf` for a lone zero, `NaN` when the
    /// product is zero too. Deterministic, logged at `warn` level.
    #[default]
    Propagate,
    /// Fail with `NeuraRustError::NumericDegeneracy`.
    Raise,
}

/// Explicit settings passed to every forward/backward reduction call.
///
/// ```
/// use neurarust_reduce::ops::reduction::{DegeneracyPolicy, ReduceConfig};
/// use neurarust_reduce::DType;
///
/// let config = ReduceConfig::default()
///     .with_dtype(DType::F64)
///     .with_degeneracy_policy(DegeneracyPolicy::Raise);
/// assert_eq!(config.dtype, Some(DType::F64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceConfig {
    /// Compute precision. `None` computes in the input's own dtype.
    pub dtype: Option<DType>,
    /// Division-by-zero handling in product backward.
    pub degeneracy: DegeneracyPolicy,
    /// Reduce the samples of a batch on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        ReduceConfig {
            dtype: None,
            degeneracy: DegeneracyPolicy::default(),
            parallel: true,
        }
    }
}

impl ReduceConfig {
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = Some(dtype);
        self
    }

    pub fn with_degeneracy_policy(mut self, policy: DegeneracyPolicy) -> Self {
        self.degeneracy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

//! Axis resolution for reduction operations.

use crate::error::NeuraRustError;

/// Axes a reduction runs over, as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AxisSpec {
    /// A single axis. Negative values count from the last axis (`-1` is the last).
    Index(isize),
    /// Several axes; negative values allowed, duplicates ignored.
    /// An empty list reduces every axis.
    Indices(Vec<isize>),
    /// Every axis. Over a batch this also folds every sample into one value.
    All,
}

impl From<isize> for AxisSpec {
    fn from(axis: isize) -> Self {
        AxisSpec::Index(axis)
    }
}

impl From<&[isize]> for AxisSpec {
    fn from(axes: &[isize]) -> Self {
        AxisSpec::Indices(axes.to_vec())
    }
}

/// Canonical, non-negative form of an [`AxisSpec`] for a given rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedAxes {
    /// One axis in `[0, rank)`.
    Axis(usize),
    /// Sorted, unique axes, each in `[0, rank)`.
    Axes(Vec<usize>),
    /// Every axis.
    All,
}

impl ResolvedAxes {
    /// The reduced axes as a sorted list for a tensor of `rank`.
    pub fn dims(&self, rank: usize) -> Vec<usize> {
        match self {
            ResolvedAxes::Axis(axis) => vec![*axis],
            ResolvedAxes::Axes(axes) => axes.clone(),
            ResolvedAxes::All => (0..rank).collect(),
        }
    }
}

/// Resolves one possibly negative axis against `rank`.
pub fn normalize_axis(axis: isize, rank: usize) -> Result<usize, NeuraRustError> {
    let rank_i = rank as isize;
    let resolved = if axis < 0 { rank_i + axis } else { axis };
    if resolved < 0 || resolved >= rank_i {
        return Err(NeuraRustError::InvalidAxis { axis, rank });
    }
    Ok(resolved as usize)
}

/// Resolves an axis specification against a tensor of `rank`.
///
/// - `Index(a)`: `a` if `0 <= a < rank`, `rank + a` for negative `a`.
/// - `Indices`: every entry resolved the same way, then sorted and
///   deduplicated. An empty list means every axis.
/// - `All`: every axis.
///
/// # Errors
/// `InvalidAxis` carrying the axis as given when it falls outside `[0, rank)`
/// after resolution.
pub fn resolve_axes(rank: usize, spec: &AxisSpec) -> Result<ResolvedAxes, NeuraRustError> {
    match spec {
        AxisSpec::Index(axis) => normalize_axis(*axis, rank).map(ResolvedAxes::Axis),
        AxisSpec::Indices(axes) if axes.is_empty() => Ok(ResolvedAxes::All),
        AxisSpec::Indices(axes) => {
            let mut resolved = axes
                .iter()
                .map(|&a| normalize_axis(a, rank))
                .collect::<Result<Vec<_>, _>>()?;
            resolved.sort_unstable();
            resolved.dedup();
            Ok(ResolvedAxes::Axes(resolved))
        }
        AxisSpec::All => Ok(ResolvedAxes::All),
    }
}

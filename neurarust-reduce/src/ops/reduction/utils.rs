//! Shape bookkeeping shared by the reduction kernels.

use super::axis::ResolvedAxes;
use crate::tensor::utils::calculate_strides;

/// Calculates the keep-dims output shape of a reduction: every reduced axis
/// is kept with size 1.
pub(crate) fn calculate_reduction_output_shape(input_shape: &[usize], axes: &ResolvedAxes) -> Vec<usize> {
    let dims = axes.dims(input_shape.len());
    input_shape
        .iter()
        .enumerate()
        .map(|(i, &size)| if dims.contains(&i) { 1 } else { size })
        .collect()
}

/// Maps every input element of a reduction to the output element it folds into.
///
/// Kernels iterate the input once in row-major order and use
/// [`ReductionLayout::output_index`] to find the accumulator slot, so a single
/// layout serves single-axis, multi-axis and all-axes reductions alike.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionLayout {
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    output_indices: Vec<usize>,
    reduced_count: usize,
}

impl ReductionLayout {
    pub fn new(input_shape: &[usize], axes: &ResolvedAxes) -> Self {
        let output_shape = calculate_reduction_output_shape(input_shape, axes);
        let input_numel: usize = input_shape.iter().product();
        let output_numel: usize = output_shape.iter().product();

        let output_strides = calculate_strides(&output_shape);
        let rank = input_shape.len();
        let mut coords = vec![0usize; rank];
        let mut output_indices = Vec::with_capacity(input_numel);
        for _ in 0..input_numel {
            let out: usize = (0..rank)
                .filter(|&d| output_shape[d] != 1)
                .map(|d| coords[d] * output_strides[d])
                .sum();
            output_indices.push(out);

            // Row-major increment of the input coordinates.
            for d in (0..rank).rev() {
                coords[d] += 1;
                if coords[d] < input_shape[d] {
                    break;
                }
                coords[d] = 0;
            }
        }

        ReductionLayout {
            input_shape: input_shape.to_vec(),
            output_shape,
            output_indices,
            reduced_count: input_numel / output_numel.max(1),
        }
    }

    /// Layout folding a whole tensor of `numel` elements into one value.
    pub fn flat(numel: usize) -> Self {
        ReductionLayout {
            input_shape: vec![numel],
            output_shape: vec![1],
            output_indices: vec![0; numel],
            reduced_count: numel,
        }
    }

    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    pub fn input_numel(&self) -> usize {
        self.output_indices.len()
    }

    pub fn output_numel(&self) -> usize {
        self.output_shape.iter().product()
    }

    /// Number of input elements folded into each output element.
    pub fn reduced_count(&self) -> usize {
        self.reduced_count
    }

    #[inline]
    pub fn output_index(&self, input_index: usize) -> usize {
        self.output_indices[input_index]
    }

    /// Position of each input element inside its own reduction group, in
    /// row-major order of the reduced coordinates (0 for the first element
    /// folded into an output, 1 for the second, ...).
    pub fn positions_in_group(&self) -> Vec<usize> {
        let mut seen = vec![0usize; self.output_numel()];
        self.output_indices
            .iter()
            .map(|&o| {
                let pos = seen[o];
                seen[o] += 1;
                pos
            })
            .collect()
    }
}

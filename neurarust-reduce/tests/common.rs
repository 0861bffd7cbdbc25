// Shared by several integration test crates; not every helper is used by each.
#![allow(dead_code)]

use neurarust_reduce::tensor::create;
use neurarust_reduce::utils::testing::check_tensor_near;
use neurarust_reduce::{DType, Tensor};

pub const DTYPES: [DType; 2] = [DType::F32, DType::F64];

/// One input and the single axis it is reduced over.
#[derive(Debug, Clone)]
pub struct Operand {
    pub data: Vec<f64>,
    pub shape: Vec<usize>,
    pub axis: isize,
}

/// Inputs and axes exercised for every operator, both precisions.
pub fn operand_table() -> Vec<Operand> {
    let matrix = vec![1.0, 2.0, 4.0, 5.0];
    let cube = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    vec![
        Operand { data: vec![1.0], shape: vec![1, 1], axis: 0 },
        Operand { data: matrix.clone(), shape: vec![2, 2], axis: 0 },
        Operand { data: matrix.clone(), shape: vec![2, 2], axis: 1 },
        Operand { data: matrix, shape: vec![2, 2], axis: -1 },
        Operand { data: cube.clone(), shape: vec![2, 2, 2], axis: -2 },
        Operand { data: cube, shape: vec![2, 2, 2], axis: 2 },
    ]
}

pub fn tensor(data: &[f64], shape: &[usize], dtype: DType) -> Tensor {
    create::from_f64_values(data.to_vec(), shape.to_vec(), dtype).expect("Test tensor creation failed")
}

pub fn grad_tensor(data: &[f64], shape: &[usize], dtype: DType) -> Tensor {
    let t = tensor(data, shape, dtype);
    t.set_requires_grad(true).expect("Failed to set requires_grad");
    t
}

pub fn normalize(axis: isize, rank: usize) -> usize {
    if axis < 0 {
        (rank as isize + axis) as usize
    } else {
        axis as usize
    }
}

pub fn keep_dims(shape: &[usize], axis: usize) -> Vec<usize> {
    let mut out = shape.to_vec();
    out[axis] = 1;
    out
}

/// Flat input indices folded together when reducing `axis` of `shape`, one
/// group per output element in row-major output order.
pub fn reference_groups(shape: &[usize], axis: usize) -> Vec<Vec<usize>> {
    let outer: usize = shape[..axis].iter().product();
    let n = shape[axis];
    let inner: usize = shape[axis + 1..].iter().product();
    let mut groups = Vec::with_capacity(outer * inner);
    for o in 0..outer {
        for i in 0..inner {
            groups.push((0..n).map(|k| o * n * inner + k * inner + i).collect());
        }
    }
    groups
}

pub fn tolerance(dtype: DType) -> f64 {
    match dtype {
        DType::F32 => 1e-4,
        _ => 1e-10,
    }
}

pub fn assert_close(actual: &Tensor, expected_shape: &[usize], expected: &[f64], dtype: DType) {
    assert_eq!(actual.dtype(), dtype, "dtype mismatch");
    check_tensor_near(actual, expected_shape, expected, tolerance(dtype));
}

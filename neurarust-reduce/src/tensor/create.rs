// src/tensor/create.rs

use crate::buffer::Buffer;
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use crate::types::DType;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};
use std::sync::Arc;

/// Creates a tensor of the given dtype filled with `value`.
pub fn full_dtype(shape: &[usize], value: f64, dtype: DType) -> Result<Tensor, NeuraRustError> {
    let numel: usize = shape.iter().product();
    let buffer = match dtype {
        DType::F32 => Buffer::F32(Arc::new(vec![value as f32; numel])),
        DType::F64 => Buffer::F64(Arc::new(vec![value; numel])),
        DType::I64 => Buffer::I64(Arc::new(vec![value as i64; numel])),
    };
    Tensor::from_buffer(buffer, shape.to_vec())
}

/// Creates a new F32 tensor filled with zeros.
pub fn zeros(shape: &[usize]) -> Result<Tensor, NeuraRustError> {
    full_dtype(shape, 0.0, DType::F32)
}

/// Creates a new F64 tensor filled with zeros.
pub fn zeros_f64(shape: &[usize]) -> Result<Tensor, NeuraRustError> {
    full_dtype(shape, 0.0, DType::F64)
}

/// Creates a new F32 tensor filled with ones.
pub fn ones(shape: &[usize]) -> Result<Tensor, NeuraRustError> {
    full_dtype(shape, 1.0, DType::F32)
}

/// Creates a new F64 tensor filled with ones.
pub fn ones_f64(shape: &[usize]) -> Result<Tensor, NeuraRustError> {
    full_dtype(shape, 1.0, DType::F64)
}

/// Creates a new F32 tensor filled with `value`.
pub fn full(shape: &[usize], value: f32) -> Result<Tensor, NeuraRustError> {
    full_dtype(shape, value as f64, DType::F32)
}

/// Creates a new F64 tensor filled with `value`.
pub fn full_f64(shape: &[usize], value: f64) -> Result<Tensor, NeuraRustError> {
    full_dtype(shape, value, DType::F64)
}

pub fn from_vec_f32(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Tensor, NeuraRustError> {
    Tensor::new(data_vec, shape)
}

pub fn from_vec_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Tensor, NeuraRustError> {
    Tensor::new_f64(data_vec, shape)
}

/// Creates a tensor of values given as `f64`, stored with `dtype`.
pub fn from_f64_values(values: Vec<f64>, shape: Vec<usize>, dtype: DType) -> Result<Tensor, NeuraRustError> {
    Tensor::from_buffer(Buffer::F64(Arc::new(values)), shape).map(|t| t.cast(dtype))
}

/// Zeros with the shape and dtype of `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, NeuraRustError> {
    full_dtype(&tensor.shape(), 0.0, tensor.dtype())
}

/// Ones with the shape and dtype of `tensor`.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, NeuraRustError> {
    full_dtype(&tensor.shape(), 1.0, tensor.dtype())
}

/// Samples a tensor from the standard normal distribution using `rng`.
pub fn randn_with_rng<R: Rng + ?Sized>(
    shape: &[usize],
    dtype: DType,
    rng: &mut R,
) -> Result<Tensor, NeuraRustError> {
    let numel: usize = shape.iter().product();
    let values: Vec<f64> = (0..numel)
        .map(|_| {
            let v: f64 = StandardNormal.sample(&mut *rng);
            v
        })
        .collect();
    from_f64_values(values, shape.to_vec(), dtype)
}

/// Samples a tensor from the standard normal distribution (thread RNG).
pub fn randn(shape: &[usize], dtype: DType) -> Result<Tensor, NeuraRustError> {
    randn_with_rng(shape, dtype, &mut rand::thread_rng())
}

/// Samples a tensor uniformly from `[low, high)` using `rng`.
pub fn rand_uniform_with_rng<R: Rng + ?Sized>(
    shape: &[usize],
    low: f64,
    high: f64,
    dtype: DType,
    rng: &mut R,
) -> Result<Tensor, NeuraRustError> {
    if !(low < high) {
        return Err(NeuraRustError::UnsupportedOperation(format!(
            "rand_uniform requires low < high, got [{}, {})",
            low, high
        )));
    }
    let numel: usize = shape.iter().product();
    let dist = Uniform::new(low, high);
    let values: Vec<f64> = (0..numel).map(|_| dist.sample(&mut *rng)).collect();
    from_f64_values(values, shape.to_vec(), dtype)
}

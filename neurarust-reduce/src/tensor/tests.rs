use super::*;
use approx::assert_relative_eq;

#[test]
fn test_tensor_creation() {
    let t = Tensor::new(vec![1.0_f32, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
    assert_eq!(t.shape(), vec![2, 2]);
    assert_eq!(t.numel(), 4);
    assert_eq!(t.rank(), 2);
    assert_eq!(t.strides(), vec![2, 1]);
    assert_eq!(t.dtype(), DType::F32);
    assert!(!t.requires_grad());
    assert!(t.is_leaf());
}

#[test]
fn test_tensor_creation_error() {
    let result = Tensor::new(vec![1.0_f32, 2.0, 3.0], vec![2, 2]);
    assert_eq!(
        result.err(),
        Some(NeuraRustError::TensorCreationError {
            data_len: 3,
            shape: vec![2, 2]
        })
    );
}

#[test]
fn test_zero_sized_dimension_is_rejected() {
    let result = Tensor::new(vec![], vec![2, 0]);
    assert_eq!(result.err(), Some(NeuraRustError::InvalidShape { shape: vec![2, 0] }));
}

#[test]
fn test_scalar_tensor() {
    let t = Tensor::new_f64(vec![3.5], vec![]).unwrap();
    assert_eq!(t.rank(), 0);
    assert_eq!(t.numel(), 1);
    assert_relative_eq!(t.item().unwrap(), 3.5);
}

#[test]
fn test_item_requires_single_element() {
    let t = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    assert!(matches!(t.item(), Err(NeuraRustError::ShapeMismatch { .. })));
}

#[test]
fn test_tensor_equality() {
    let t1 = Tensor::new(vec![1.0_f32, 2.0], vec![2]).unwrap();
    let t2 = Tensor::new(vec![1.0_f32, 2.0], vec![2]).unwrap();
    let t3 = t1.clone();
    let t4 = Tensor::new(vec![1.0_f32, 2.0], vec![1, 2]).unwrap();
    let t5 = Tensor::new_f64(vec![1.0, 2.0], vec![2]).unwrap();

    assert_eq!(t1, t2);
    assert_eq!(t1, t3);
    assert_ne!(t1, t4);
    assert_ne!(t1, t5);
    assert_eq!(t1.node_id(), t3.node_id());
    assert_ne!(t1.node_id(), t2.node_id());
}

#[test]
fn test_typed_accessors() {
    let t = Tensor::new_i64(vec![1, -2], vec![2]).unwrap();
    assert_eq!(t.get_i64_data().unwrap(), vec![1, -2]);
    assert!(matches!(
        t.get_f32_data(),
        Err(NeuraRustError::DataTypeMismatch {
            expected: DType::F32,
            actual: DType::I64,
            ..
        })
    ));
    assert_eq!(t.to_f64_vec(), vec![1.0, -2.0]);
}

#[test]
fn test_cast_and_detach_share_or_convert() {
    let t = Tensor::new(vec![1.5_f32, -2.0], vec![2]).unwrap();
    t.set_requires_grad(true).unwrap();

    let same = t.cast(DType::F32);
    assert!(Arc::ptr_eq(&same.buffer(), &t.buffer()));
    assert!(!same.requires_grad());

    let wide = t.cast(DType::F64);
    assert_eq!(wide.get_f64_data().unwrap(), vec![1.5, -2.0]);

    let detached = t.detach();
    assert!(!detached.requires_grad());
    assert!(detached.is_leaf());
    assert_eq!(detached, t);
}

#[test]
fn test_reduction_methods_delegate() {
    use crate::ops::reduction::{AxisSpec, ReduceConfig, ReductionKind};

    let t = Tensor::new(vec![1.0, 2.0, 4.0, 5.0], vec![2, 2]).unwrap();
    assert_eq!(t.sum(AxisSpec::Index(0)).unwrap().get_f32_data().unwrap(), vec![5.0, 7.0]);
    assert_eq!(t.mean(AxisSpec::All).unwrap().get_f32_data().unwrap(), vec![3.0]);
    assert_eq!(t.max(-1isize).unwrap().get_f32_data().unwrap(), vec![2.0, 5.0]);
    assert_eq!(t.min(AxisSpec::Index(1)).unwrap().get_f32_data().unwrap(), vec![1.0, 4.0]);
    assert_eq!(t.prod(AxisSpec::All).unwrap().get_f32_data().unwrap(), vec![40.0]);
    assert_eq!(t.argmax(AxisSpec::Index(0)).unwrap().get_i64_data().unwrap(), vec![1, 1]);
    assert_eq!(t.argmin(AxisSpec::All).unwrap().get_i64_data().unwrap(), vec![0]);

    let config = ReduceConfig::default().with_dtype(DType::F64);
    let lse = t.reduce(ReductionKind::LogSumExp, AxisSpec::All, &config).unwrap();
    assert_eq!(lse.dtype(), DType::F64);
    let expected = [1f64, 2.0, 4.0, 5.0].iter().map(|x| x.exp()).sum::<f64>().ln();
    assert_relative_eq!(lse.item().unwrap(), expected, epsilon = 1e-12);
    assert_relative_eq!(t.log_sum_exp(AxisSpec::All).unwrap().item().unwrap(), expected, epsilon = 1e-5);
}

#[test]
fn test_integer_input_needs_float_compute_dtype() {
    use crate::ops::reduction::{AxisSpec, ReduceConfig, ReductionKind};

    let t = Tensor::new_i64(vec![1, 2, 3], vec![3]).unwrap();
    assert!(matches!(
        t.sum(AxisSpec::All),
        Err(NeuraRustError::DataTypeMismatch { actual: DType::I64, .. })
    ));
    let config = ReduceConfig::default().with_dtype(DType::F64);
    let result = t.reduce(ReductionKind::Sum, AxisSpec::All, &config).unwrap();
    assert_eq!(result.get_f64_data().unwrap(), vec![6.0]);
}

#[test]
fn test_tensor_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tensor>();
}

use super::*;
use crate::ops::batch::Batch;
use crate::ops::reduction::{AxisSpec, ReduceConfig, ReductionKind};
use crate::types::DType;
use crate::utils::testing::{check_tensor_near, create_test_tensor_with_grad};

#[test]
fn test_detach_basic() {
    let t1 = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0], vec![3]);
    let summed = t1.sum(AxisSpec::All).unwrap();
    assert!(summed.requires_grad(), "Result of sum should require grad");
    assert!(summed.grad_fn().is_some(), "Result of sum should have grad_fn");

    let t2 = summed.detach();
    assert!(!t2.requires_grad(), "Detached tensor should not require grad");
    assert!(t2.grad_fn().is_none(), "Detached tensor should not have grad_fn");
    assert!(t2.grad().is_none(), "Detached tensor should not have grad");
    assert_eq!(summed.shape(), t2.shape(), "Shapes should be equal");
    assert_eq!(summed.get_f32_data().unwrap(), t2.get_f32_data().unwrap());
}

#[test]
fn test_set_requires_grad_rejects_integers() {
    let t = Tensor::new_i64(vec![1, 2], vec![2]).unwrap();
    assert!(matches!(
        t.set_requires_grad(true),
        Err(NeuraRustError::UnsupportedOperation(_))
    ));
    assert!(t.set_requires_grad(false).is_ok());
}

#[test]
fn test_gradient_accumulates_across_consumers() {
    let x = create_test_tensor_with_grad(vec![1.0, 3.0, 2.0, 0.5], vec![2, 2]);
    let s = x.sum(AxisSpec::All).unwrap();
    let m = x.max(AxisSpec::All).unwrap();
    let total = Batch::new(vec![s, m])
        .unwrap()
        .reduce_all(ReductionKind::Sum, &ReduceConfig::default())
        .unwrap();
    total.backward(None).unwrap();

    // d(sum)/dx = 1 everywhere, d(max)/dx = 1 at the maximum.
    check_tensor_near(&x.grad().unwrap(), &[2, 2], &[1.0, 2.0, 1.0, 1.0], 1e-6);
}

#[test]
fn test_repeated_backward_accumulates_into_grad() {
    let x = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
    x.sum(AxisSpec::All).unwrap().backward(None).unwrap();
    x.sum(AxisSpec::All).unwrap().backward(None).unwrap();
    check_tensor_near(&x.grad().unwrap(), &[2], &[2.0, 2.0], 1e-6);

    x.clear_grad();
    assert!(x.grad().is_none());
}

#[test]
fn test_chained_reductions() {
    let x = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let row_max = x.max(AxisSpec::Index(1)).unwrap();
    let mean = row_max.mean(AxisSpec::All).unwrap();
    mean.backward(None).unwrap();
    check_tensor_near(&x.grad().unwrap(), &[2, 3], &[0.0, 0.0, 0.5, 0.0, 0.0, 0.5], 1e-6);
    // Intermediate results are not leaves and keep no gradient.
    assert!(row_max.grad().is_none());
}

#[test]
fn test_backward_on_constant_is_undefined() {
    let c = Tensor::new(vec![2.0, 2.0, 2.0], vec![3]).unwrap();
    let mean = c.mean(AxisSpec::All).unwrap();
    check_tensor_near(&mean, &[1], &[2.0], 1e-6);
    assert!(matches!(
        mean.backward(None),
        Err(NeuraRustError::UndefinedGradient { .. })
    ));
}

#[test]
fn test_backward_non_scalar_needs_gradient() {
    let x = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let rows = x.sum(AxisSpec::Index(1)).unwrap();
    assert_eq!(rows.backward(None), Err(NeuraRustError::BackwardNonScalar));
}

#[test]
fn test_backward_gradient_shape_is_checked() {
    let x = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let rows = x.sum(AxisSpec::Index(1)).unwrap();
    let wrong = Tensor::new(vec![1.0, 1.0], vec![1, 2]).unwrap();
    assert_eq!(
        rows.backward(Some(wrong)),
        Err(NeuraRustError::ShapeMismatch {
            expected: vec![2, 1],
            actual: vec![1, 2],
            operation: "backward".to_string(),
        })
    );
}

#[test]
fn test_compute_dtype_gradient_returns_in_input_dtype() {
    let x = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0], vec![3]);
    let config = ReduceConfig::default().with_dtype(DType::F64);
    let lse = x.reduce(ReductionKind::LogSumExp, AxisSpec::All, &config).unwrap();
    assert_eq!(lse.dtype(), DType::F64);
    lse.backward(None).unwrap();
    let grad = x.grad().unwrap();
    assert_eq!(grad.dtype(), DType::F32);
    let total: f64 = grad.to_f64_vec().iter().sum();
    approx::assert_relative_eq!(total, 1.0, epsilon = 1e-6);
}

#[test]
fn test_acc_grad_shape_mismatch() {
    let x = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
    let g = Tensor::new(vec![1.0], vec![1]).unwrap();
    assert!(matches!(
        x.acc_grad(g),
        Err(NeuraRustError::ShapeMismatch { .. })
    ));
}

use super::*;
use crate::autograd::grad_check::check_grad;
use crate::ops::reduction::ResolvedAxes;
use crate::tensor::create;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};
use approx::assert_relative_eq;

#[test]
fn test_sum_kernel_rows() {
    let layout = ReductionLayout::new(&[2, 3], &ResolvedAxes::Axis(1));
    let out = sum_kernel(&[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &layout);
    assert_eq!(out, vec![6.0, 15.0]);
}

#[test]
fn test_sum_all() -> Result<(), NeuraRustError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, AxisSpec::All)?;
    check_tensor_near(&result, &[1, 1], &[21.0], 1e-6);
    Ok(())
}

#[test]
fn test_sum_axis_0() -> Result<(), NeuraRustError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, AxisSpec::Index(0))?;
    check_tensor_near(&result, &[1, 3], &[5.0, 7.0, 9.0], 1e-6);
    Ok(())
}

#[test]
fn test_sum_multiple_axes() -> Result<(), NeuraRustError> {
    let t = create::from_vec_f64((0..24).map(|x| x as f64).collect(), vec![2, 3, 4])?;
    let result = sum_op(&t, AxisSpec::Indices(vec![0, 2]))?;
    // Row j sums 0..4 + 4j and 12..16 + 4j.
    check_tensor_near(&result, &[1, 3, 1], &[60.0, 92.0, 124.0], 1e-9);
    assert_eq!(result.dtype(), crate::DType::F64);
    Ok(())
}

#[test]
fn test_sum_backward_broadcasts_upstream() -> Result<(), NeuraRustError> {
    let t = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, AxisSpec::Index(1))?;
    assert!(result.requires_grad());
    assert_eq!(result.grad_fn().map(|op| op.name()), Some("SumBackward"));

    let upstream = Tensor::new(vec![2.0, -1.0], vec![2, 1])?;
    result.backward(Some(upstream))?;
    let grad = t.grad().expect("grad missing");
    check_tensor_near(&grad, &[2, 3], &[2.0, 2.0, 2.0, -1.0, -1.0, -1.0], 1e-6);
    Ok(())
}

#[test]
fn test_sum_no_grad_when_input_is_constant() -> Result<(), NeuraRustError> {
    let t = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let result = sum_op(&t, AxisSpec::All)?;
    assert!(!result.requires_grad());
    assert!(result.grad_fn().is_none());
    Ok(())
}

#[test]
fn test_sum_grad_check() {
    let t = create::from_vec_f64(vec![0.5, -1.5, 2.0, 3.0, 1.25, -0.75], vec![3, 2]).unwrap();
    t.set_requires_grad(true).unwrap();
    let output_grad = create::from_vec_f64(vec![1.0, -2.0], vec![1, 2]).unwrap();
    let result = check_grad(|inputs| sum_op(&inputs[0], AxisSpec::Index(-2)), &[t], &output_grad, 1e-6, 1e-6);
    assert!(result.is_ok(), "{:?}", result.err());
}

#[test]
fn test_sum_f32_and_f64_agree() -> Result<(), NeuraRustError> {
    let values = vec![0.1, 0.2, 0.3, 0.4];
    let a = Tensor::new(values.iter().map(|&v| v as f32).collect(), vec![4])?;
    let b = create::from_vec_f64(values, vec![4])?;
    let sa = sum_op(&a, AxisSpec::All)?.item()?;
    let sb = sum_op(&b, AxisSpec::All)?.item()?;
    assert_relative_eq!(sa, sb, epsilon = 1e-6);
    Ok(())
}

use super::*;
use crate::ops::reduction::ResolvedAxes;
use crate::types::DType;
use crate::utils::testing::{create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_argmax_axis_1() -> Result<(), NeuraRustError> {
    let t = create_test_tensor(vec![1.0, 2.0, 4.0, 5.0], vec![2, 2]);
    let result = argmax_op(&t, AxisSpec::Index(1))?;
    assert_eq!(result.dtype(), DType::I64);
    assert_eq!(result.shape(), vec![2, 1]);
    assert_eq!(result.get_i64_data()?, vec![1, 1]);
    Ok(())
}

#[test]
fn test_argmin_axis_1() -> Result<(), NeuraRustError> {
    let t = create_test_tensor(vec![1.0, 2.0, 4.0, 5.0], vec![2, 2]);
    let result = argmin_op(&t, AxisSpec::Index(1))?;
    assert_eq!(result.get_i64_data()?, vec![0, 0]);
    Ok(())
}

#[test]
fn test_arg_ties_pick_first_occurrence() -> Result<(), NeuraRustError> {
    let t = create_test_tensor(vec![3.0, 7.0, 7.0, 1.0, 1.0, 0.0], vec![2, 3]);
    assert_eq!(argmax_op(&t, AxisSpec::Index(1))?.get_i64_data()?, vec![1, 0]);
    assert_eq!(argmin_op(&t, AxisSpec::Index(1))?.get_i64_data()?, vec![0, 2]);
    Ok(())
}

#[test]
fn test_argmax_all_is_flat_index() -> Result<(), NeuraRustError> {
    let t = create_test_tensor(vec![1.0, 9.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = argmax_op(&t, AxisSpec::All)?;
    assert_eq!(result.shape(), vec![1, 1]);
    assert_eq!(result.get_i64_data()?, vec![1]);
    Ok(())
}

#[test]
fn test_argmax_multiple_axes_is_index_in_sub_block() -> Result<(), NeuraRustError> {
    // Shape [2, 2, 2]; reduce axes 0 and 2 -> groups of 4 per middle index.
    let t = create_test_tensor(vec![0.0, 1.0, 10.0, 2.0, 5.0, 4.0, 3.0, 20.0], vec![2, 2, 2]);
    let result = argmax_op(&t, AxisSpec::Indices(vec![0, 2]))?;
    assert_eq!(result.shape(), vec![1, 2, 1]);
    // Group j=0: [0, 1, 5, 4] -> position 2; group j=1: [10, 2, 3, 20] -> position 3.
    assert_eq!(result.get_i64_data()?, vec![2, 3]);
    Ok(())
}

#[test]
fn test_arg_nan_wins() {
    let layout = ReductionLayout::new(&[4], &ResolvedAxes::All);
    assert_eq!(argmax_kernel(&[1.0f32, f32::NAN, 5.0, f32::NAN], &layout), vec![1]);
    assert_eq!(argmin_kernel(&[1.0f32, f32::NAN, -5.0, f32::NAN], &layout), vec![1]);
}

#[test]
fn test_arg_integer_input() -> Result<(), NeuraRustError> {
    let t = Tensor::new_i64(vec![4, -2, 9], vec![3])?;
    assert_eq!(argmax_op(&t, AxisSpec::Index(0))?.get_i64_data()?, vec![2]);
    assert_eq!(argmin_op(&t, AxisSpec::Index(-1))?.get_i64_data()?, vec![1]);
    Ok(())
}

#[test]
fn test_arg_result_never_requires_grad() -> Result<(), NeuraRustError> {
    let t = create_test_tensor_with_grad(vec![1.0, 2.0, 4.0, 5.0], vec![2, 2]);
    let result = argmax_op(&t, AxisSpec::Index(1))?;
    assert!(!result.requires_grad());
    assert!(matches!(
        result.backward(None),
        Err(NeuraRustError::UndefinedGradient { .. })
    ));
    for kind in ArgKind::ALL {
        let result = arg_reduce_op(&t, kind, &AxisSpec::All)?;
        assert!(!result.requires_grad(), "{}", kind.name());
        assert_eq!(
            arg_backward(kind).err(),
            Some(NeuraRustError::UndefinedGradient {
                operation: kind.name().to_string()
            })
        );
    }
    Ok(())
}

#[test]
fn test_arg_invalid_axis() {
    let t = create_test_tensor(vec![1.0, 2.0], vec![2]);
    assert_eq!(
        argmax_op(&t, AxisSpec::Index(-2)).err(),
        Some(NeuraRustError::InvalidAxis { axis: -2, rank: 1 })
    );
}

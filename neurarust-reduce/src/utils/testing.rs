use crate::tensor::Tensor;

/// Checks that two tensors are approximately equal (shape and data within
/// tolerance). Works for every dtype by comparing through `f64`.
///
/// Panics if shapes differ or data differs significantly. Non-finite expected
/// values must match exactly (same infinity, or both NaN).
pub fn check_tensor_near(actual: &Tensor, expected_shape: &[usize], expected_data: &[f64], tolerance: f64) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data_vec = actual.to_f64_vec();
    assert_eq!(
        actual_data_vec.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data_vec.iter().zip(expected_data.iter()).enumerate() {
        if !e.is_finite() {
            let same = (a.is_nan() && e.is_nan()) || a == e;
            assert!(same, "Data mismatch at index {}: actual={:?}, expected={:?}", i, a, e);
            continue;
        }
        let diff = (*a - *e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Helper to create a simple f32 tensor for testing purposes.
pub fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Failed to create test tensor")
}

/// Helper to create a simple f32 tensor that requires gradient for testing.
pub fn create_test_tensor_with_grad(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    let tensor = Tensor::new(data, shape).expect("Failed to create test tensor with grad");
    tensor
        .set_requires_grad(true)
        .expect("Failed to set requires_grad");
    tensor
}

/// Helper to create an f64 tensor that requires gradient for testing.
pub fn create_test_tensor_f64_with_grad(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    let tensor = Tensor::new_f64(data, shape).expect("Failed to create test tensor with grad");
    tensor
        .set_requires_grad(true)
        .expect("Failed to set requires_grad");
    tensor
}

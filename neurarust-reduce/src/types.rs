/// Defines the possible data types for Tensor elements.
///
/// Reductions compute in one of the two floating-point precisions; `I64`
/// only appears as the output of the arg-reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
    /// 64-bit integer type (indices).
    I64,
}

impl DType {
    /// Returns true for the floating-point types gradients can flow through.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }
}

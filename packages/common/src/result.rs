use crate::error::ReconcileError;

/// Common Result type alias
pub type ReconcileResult<T> = Result<T, ReconcileError>;

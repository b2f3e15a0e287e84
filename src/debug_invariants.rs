//! Invariant checking for the structures built during mesh loading.

use crate::mesh_error::MeshError;

/// Validation hook for structures with internal consistency rules.
///
/// `validate_invariants` is always available and returns the first violation;
/// `debug_assert_invariants` panics on a violation, but only in debug builds
/// or with the `check-invariants` / `strict-invariants` features.
pub trait DebugInvariants {
    fn debug_assert_invariants(&self);
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Run a fallible invariant check and panic with context when checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// Turn a failed condition into [`MeshError::InvariantViolation`].
#[inline]
pub(crate) fn ensure(cond: bool, msg: impl FnOnce() -> String) -> Result<(), MeshError> {
    if cond {
        Ok(())
    } else {
        Err(MeshError::InvariantViolation(msg()))
    }
}

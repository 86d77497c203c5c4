use thiserror::Error;

/// Violations of the interpreter's own invariants.
///
/// These never describe a mistake in the interpreted program. Seeing one means
/// a phase produced state that a later phase cannot use, e.g. the evaluator
/// met a call that validation should have rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// An operation ran with no active call frame.
    #[error("Internal error: no active call frame.")]
    MissingFrame,
    /// A scope was popped that was never pushed.
    #[error("Internal error: scope stack underflow.")]
    ScopeUnderflow,
    /// A function disappeared between validation and evaluation.
    #[error("Internal error: function '{name}' is not registered.")]
    MissingFunction {
        /// The function.
        name: String,
    },
    /// A value did not have the shape its static type promised.
    #[error("Internal error: expected {expected}, found a value of type '{found}'.")]
    UnexpectedValue {
        /// The expected shape.
        expected: &'static str,
        /// The type of the value actually found.
        found:    String,
    },
}

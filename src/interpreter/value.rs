/// Core value representation.
///
/// Defines the `Value` enum produced by evaluation: the four builtin scalar
/// types and struct instances tagged with their fully-qualified type name.
pub mod core;

/// Numeric conversion helpers.
///
/// This module provides the conversions between integer literals, `i32` and
/// `f32` that the operations and the validator need, with the rounding and
/// saturation behaviour spelled out in one place.
pub mod num;
/// Stack growth for deep recursion.
///
/// Parsing, validation, evaluation and formatting all recurse over the tree;
/// they run their recursive steps through [`stack::guarded`].
pub mod stack;

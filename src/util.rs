/// Numeric lane helpers.
///
/// This module provides the raw-buffer conversions the evaluator uses for
/// built-in arithmetic: sign-extending integers of any registered width to
/// 64 bits, widening floats to `f64`, and narrowing results back to the
/// target type's size. All functions operate on native-byte-order buffers.
pub mod num;

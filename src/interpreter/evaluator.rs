/// Binary operator evaluation.
///
/// Implements the built-in integer and decimal lanes for arithmetic,
/// comparison, logical and bitwise operators, and dispatches operators on
/// user types to their `operator` methods.
pub mod binary;

/// Function and method calls.
///
/// Resolves callees, marshals arguments by value or by reference, runs
/// native callbacks and script bodies, and moves return values through the
/// context return slot.
pub mod call;

/// Core execution logic and context management.
///
/// Contains the execution context (scope level, current line, stack pool,
/// return slot, jump flag) and statement execution.
pub mod core;

/// Expression evaluation.
///
/// Resolves expressions to values or to addressable instance storage,
/// including member chain traversal and pointer dereferencing.
pub mod expression;

/// The value representation.
///
/// Defines `Value` (a type usage plus a byte buffer in one of three
/// ownership modes), the shallow-copy and write-through semantics, and the
/// `Primitive` trait hosts use for typed reads and writes.
pub mod core;

/// Addresses, allocations and pools.
///
/// Defines the abstract address space pointer values store into their
/// buffers, the weak-slot address table that resolves them, and the
/// bounded bump pools for instance storage and string literals.
pub mod memory;

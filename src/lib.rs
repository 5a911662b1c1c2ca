//! # cleat
//!
//! cleat is an embeddable, tree-walking interpreter for a strict subset of
//! a C-like statically-typed language, written in Rust.
//! A host application registers native types, variables, functions and
//! methods into an [`Environment`], then feeds it source text; the
//! interpreter preprocesses, tokenizes, parses and evaluates the program
//! against the shared symbol table, so scripts can call native functions,
//! read and mutate native variables, and construct instances of
//! native-registered aggregate types.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Expression` and `Statement` enums that
/// represent the syntactic structure of source code as a tree. The AST is
/// built by the parser and walked by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
/// - Defines the binary, unary and assignment operator enums.
pub mod ast;
/// The embedding surface exposed to hosts.
///
/// This module defines the `Environment`: type, function and variable
/// registration, textual type usage parsing, and the `load` pipeline that
/// runs programs and reports their errors.
///
/// # Responsibilities
/// - Owns the root namespace, the memory, the literal pool and the
///   retained programs.
/// - Exposes the registration API and variable access.
/// - Coordinates preprocessing, tokenizing, parsing and execution.
pub mod environment;
/// Provides unified error types for compilation and execution.
///
/// This module defines all errors that can be raised while tokenizing,
/// parsing, or executing code. Errors carry the source line they occurred
/// on and format to the `[Compile Error] Line N: ...` / `[Runtime Error]
/// Line N: ...` messages hosts read back.
///
/// # Responsibilities
/// - Defines the closed compile and runtime error taxonomies.
/// - Attaches line numbers and offending names for context.
/// - Wraps both taxonomies into the single error `load` returns.
pub mod error;
/// Orchestrates the process of code execution.
///
/// This module ties together preprocessing, lexing, parsing, the symbol
/// model, the value representation, and evaluation to provide the complete
/// runtime for the embedded language.
///
/// # Responsibilities
/// - Coordinates all core components: preprocessor, lexer, parser,
///   symbols, values and evaluator.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities shared across the interpreter.
///
/// This module provides the numeric lane conversions used by built-in
/// arithmetic: sign extension, widening, and narrowing over raw value
/// buffers.
pub mod util;

pub use crate::{
    environment::Environment,
    error::{CompileError, EnvironmentError, RuntimeError},
    interpreter::{
        symbols::{
            function::{Function, Method},
            types::{TypeRef, TypeUsage},
        },
        value::core::Value,
    },
};

/// Runs a program in a throwaway environment.
///
/// This is a convenience for scripts that only use the built-in types; a
/// host that registers native symbols drives an [`Environment`] directly.
///
/// # Errors
/// Returns the first compile or runtime error raised by the program.
///
/// # Examples
/// ```
/// // A program that runs to completion.
/// assert!(cleat::run("int x = 2 + 3;").is_ok());
///
/// // Division by zero is a runtime error.
/// let error = cleat::run("int x = 1 / 0;").unwrap_err();
/// assert_eq!(error.to_string(), "[Runtime Error] Line 1: division by zero");
/// ```
pub fn run(code: &str) -> Result<(), EnvironmentError> {
    let mut environment = Environment::new();
    environment.load("program", code)
}

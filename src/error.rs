/// Compile errors.
///
/// Defines all error types that can occur during tokenizing and parsing of
/// source code, including unexpected symbols, undefined variables, invalid
/// member access operators, and missing operator methods on user types.
pub mod compile_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: null
/// pointer access along a member chain, invalid array indices, and division
/// by zero.
pub mod runtime_error;

pub use compile_error::CompileError;
pub use runtime_error::RuntimeError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// The error type returned by [`Environment::load`](crate::Environment::load).
///
/// Wraps the two error taxonomies so a failed load reports exactly one
/// formatted message, either `[Compile Error] Line N: ...` or
/// `[Runtime Error] Line N: ...`.
pub enum EnvironmentError {
    /// The program failed to tokenize or parse.
    Compile(CompileError),
    /// The program failed during execution.
    Runtime(RuntimeError),
}

impl std::fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compile(error) => write!(f, "{error}"),
            Self::Runtime(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for EnvironmentError {}

impl From<CompileError> for EnvironmentError {
    fn from(error: CompileError) -> Self {
        Self::Compile(error)
    }
}

impl From<RuntimeError> for EnvironmentError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}

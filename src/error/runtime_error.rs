#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can be raised while executing a program.
///
/// Runtime errors short-circuit statement execution; the first one raised
/// becomes the environment's error message for the failed load. The line is
/// the one the execution context was at when the error occurred.
pub enum RuntimeError {
    /// A null pointer was dereferenced along a member access chain.
    NullPointerAccess {
        /// The name of the dereferenced symbol.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An array was indexed outside its extent.
    ///
    /// Reserved: array indexing is not evaluated in this revision, so this
    /// error is never raised yet.
    InvalidArrayIndex {
        /// The name of the indexed symbol.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Division by an integer zero, or by a decimal within `1e-9` of zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl RuntimeError {
    /// Gets the source line the error was raised on.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::NullPointerAccess { line, .. }
            | Self::InvalidArrayIndex { line, .. }
            | Self::DivisionByZero { line } => *line,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NullPointerAccess { name, line } => {
                write!(f, "[Runtime Error] Line {line}: null pointer access ('{name}')")
            },
            Self::InvalidArrayIndex { name, line } => {
                write!(f, "[Runtime Error] Line {line}: invalid array index ('{name}')")
            },
            Self::DivisionByZero { line } => {
                write!(f, "[Runtime Error] Line {line}: division by zero")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can be detected while tokenizing or parsing a
/// program.
///
/// Compile errors stop statement parsing; the first one raised becomes the
/// environment's error message for the failed load.
pub enum CompileError {
    /// A token appeared in a position where it cannot start or continue a
    /// statement.
    UnexpectedSymbol {
        /// The text of the offending symbol.
        symbol: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// An identifier was used as a variable without a matching instance.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A variable was declared again at the same scope level.
    VariableRedefinition {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A struct or class variable was declared without an initializer, but
    /// its type has no zero-argument constructor.
    NoDefaultConstructor {
        /// The name of the type.
        type_name: String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// The `.` member access operator was applied to a pointer.
    InvalidMemberAccessOperatorPtr {
        /// The name of the accessed symbol.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The `->` member access operator was applied to a non-pointer.
    InvalidMemberAccessOperatorNonPtr {
        /// The name of the accessed symbol.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A binary operator was used on a user type that defines no matching
    /// `operator` method.
    InvalidOperator {
        /// The name of the type.
        type_name: String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// A member access chain named a member the type does not have.
    MissingMember {
        /// The name of the missing member.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// `++` or `--` was applied to a variable of non-integer type.
    NonIntegerValue {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
}

impl CompileError {
    /// Gets the source line the error was raised on.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::UnexpectedSymbol { line, .. }
            | Self::UndefinedVariable { line, .. }
            | Self::VariableRedefinition { line, .. }
            | Self::NoDefaultConstructor { line, .. }
            | Self::InvalidMemberAccessOperatorPtr { line, .. }
            | Self::InvalidMemberAccessOperatorNonPtr { line, .. }
            | Self::InvalidOperator { line, .. }
            | Self::MissingMember { line, .. }
            | Self::NonIntegerValue { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedSymbol { symbol, line } => {
                write!(f, "[Compile Error] Line {line}: unexpected symbol after '{symbol}'")
            },
            Self::UndefinedVariable { name, line } => {
                write!(f, "[Compile Error] Line {line}: undefined variable ('{name}')")
            },
            Self::VariableRedefinition { name, line } => {
                write!(f, "[Compile Error] Line {line}: variable redefinition ('{name}')")
            },
            Self::NoDefaultConstructor { type_name, line } => write!(f,
                "[Compile Error] Line {line}: no default constructor defined for the '{type_name}' type"),
            Self::InvalidMemberAccessOperatorPtr { name, line } => write!(f,
                "[Compile Error] Line {line}: invalid member access operator ('{name}' is a pointer)"),
            Self::InvalidMemberAccessOperatorNonPtr { name, line } => write!(f,
                "[Compile Error] Line {line}: invalid member access operator ('{name}' is not a pointer)"),
            Self::InvalidOperator { type_name, line } => {
                write!(f, "[Compile Error] Line {line}: invalid operator for the '{type_name}' type")
            },
            Self::MissingMember { name, line } => {
                write!(f, "[Compile Error] Line {line}: no member named '{name}'")
            },
            Self::NonIntegerValue { name, line } => {
                write!(f, "[Compile Error] Line {line}: '{name}' must be an integer value")
            },
        }
    }
}

impl std::error::Error for CompileError {}

use std::rc::Rc;

use crate::interpreter::{
    symbols::{identifier::Identifier, types::TypeUsage},
    value::core::Value,
};

/// An abstract syntax tree node representing an expression.
///
/// `Expression` covers every value-producing construct the parser can build:
/// literals, variable and member access, unary and binary operations,
/// parenthesized groups, address-of, conditionals, and function and method
/// calls. Each variant carries the source line it started on.
#[derive(Debug, Clone)]
pub enum Expression {
    /// The `nullptr` literal.
    NullPointer {
        /// Line number in the source code.
        line: usize,
    },
    /// A literal value resolved at parse time (number, string, boolean).
    Literal {
        /// The constant value.
        value: Value,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    VariableAccess {
        /// Name of the variable.
        identifier: Identifier,
        /// Line number in the source code.
        line:       usize,
    },
    /// A `.`/`->` member access chain, starting at a variable.
    MemberAccess {
        /// The chain: the leading variable followed by member names.
        identifiers: Vec<Identifier>,
        /// Line number in the source code.
        line:        usize,
    },
    /// A unary operation.
    UnaryOp {
        /// The operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// A binary operation.
    BinaryOp {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A parenthesized sub-expression.
    Parenthesized {
        /// The grouped expression.
        inner: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// The unary `&` address-of operation.
    AddressOf {
        /// The expression whose address is taken; must resolve to a
        /// variable.
        inner: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A `condition ? then : else` conditional expression.
    Conditional {
        /// The condition expression.
        condition: Box<Self>,
        /// Evaluated when the condition is true.
        then_expr: Box<Self>,
        /// Evaluated when the condition is false.
        else_expr: Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A free (possibly `::`-qualified) function call.
    FunctionCall {
        /// The function name.
        identifier: Identifier,
        /// Argument expressions, in call order.
        arguments:  Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// A method call through a member access chain.
    MethodCall {
        /// The receiver chain; its last identifier is the method name.
        member_access: Box<Self>,
        /// Argument expressions, in call order.
        arguments:     Vec<Self>,
        /// Line number in the source code.
        line:          usize,
    },
}

impl Expression {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::NullPointer { line }
            | Self::Literal { line, .. }
            | Self::VariableAccess { line, .. }
            | Self::MemberAccess { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Parenthesized { line, .. }
            | Self::AddressOf { line, .. }
            | Self::Conditional { line, .. }
            | Self::FunctionCall { line, .. }
            | Self::MethodCall { line, .. } => *line,
        }
    }
}

/// An abstract syntax tree node representing a statement.
///
/// Statements are the units the program executes in source order. A
/// statement exclusively owns its child statements and expressions; function
/// declaration bodies are shared with the function registry through `Rc`.
#[derive(Debug, Clone)]
pub enum Statement {
    /// An expression evaluated for its side effects.
    Expression {
        /// The expression to evaluate.
        expression: Expression,
        /// Line number in the source code.
        line:       usize,
    },
    /// A `{ ... }` block opening a scope.
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// A `using namespace ...;` directive.
    UsingDirective {
        /// The namespace path.
        namespace: Identifier,
        /// Line number in the source code.
        line:      usize,
    },
    /// A `namespace X { ... }` declaration.
    ///
    /// Symbol lookup is still flat in this revision; the body statements
    /// execute in source order.
    NamespaceDeclaration {
        /// The namespace name.
        identifier: Identifier,
        /// The declarations inside the namespace.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// A variable declaration with an optional initializer.
    VariableDeclaration {
        /// The declared type.
        type_usage:    TypeUsage,
        /// The variable name.
        identifier:    Identifier,
        /// The initializer, when present.
        initial_value: Option<Expression>,
        /// Line number in the source code.
        line:          usize,
    },
    /// A script function declaration.
    FunctionDeclaration {
        /// The declared return type; `None` for `void`.
        return_type:     Option<TypeUsage>,
        /// The function name.
        identifier:      Identifier,
        /// The ordered parameter types.
        parameter_types: Vec<TypeUsage>,
        /// The parameter names, parallel to the types.
        parameter_names: Vec<Identifier>,
        /// The body block, shared with the function registry.
        body:            Rc<Self>,
        /// Line number in the source code.
        line:            usize,
    },
    /// An assignment to addressable storage.
    Assignment {
        /// The target; a variable or member access.
        target: Expression,
        /// The assignment operator.
        op:     AssignmentOperator,
        /// The assigned expression.
        value:  Expression,
        /// Line number in the source code.
        line:   usize,
    },
    /// The `++` statement on an integer variable.
    Increment {
        /// The variable name.
        identifier: Identifier,
        /// Line number in the source code.
        line:       usize,
    },
    /// The `--` statement on an integer variable.
    Decrement {
        /// The variable name.
        identifier: Identifier,
        /// Line number in the source code.
        line:       usize,
    },
    /// An `if` statement with an optional `else` branch.
    If {
        /// The parenthesized condition.
        condition:   Expression,
        /// Executed when the condition is true.
        then_branch: Box<Self>,
        /// Executed when the condition is false, when present.
        else_branch: Option<Box<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// A `while` loop.
    While {
        /// The loop condition, re-evaluated each iteration.
        condition: Expression,
        /// The loop body.
        body:      Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A `for` loop; the scope it opens also contains the initialization.
    For {
        /// The initialization statement, when present.
        initialization: Option<Box<Self>>,
        /// The loop condition; defaults to true when omitted.
        condition:      Option<Expression>,
        /// The step statement, when present.
        step:           Option<Box<Self>>,
        /// The loop body.
        body:           Box<Self>,
        /// Line number in the source code.
        line:           usize,
    },
    /// The `break` statement.
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// The `continue` statement.
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// The `return` statement with an optional result expression.
    Return {
        /// The returned expression, when present.
        expression: Option<Expression>,
        /// Line number in the source code.
        line:       usize,
    },
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Expression { line, .. }
            | Self::Block { line, .. }
            | Self::UsingDirective { line, .. }
            | Self::NamespaceDeclaration { line, .. }
            | Self::VariableDeclaration { line, .. }
            | Self::FunctionDeclaration { line, .. }
            | Self::Assignment { line, .. }
            | Self::Increment { line, .. }
            | Self::Decrement { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Break { line }
            | Self::Continue { line }
            | Self::Return { line, .. } => *line,
        }
    }
}

/// A named, retained program: an ordered sequence of top-level statements.
#[derive(Debug, Clone)]
pub struct Program {
    /// The name the program was loaded under.
    pub name:       String,
    /// The retained source text.
    pub code:       String,
    /// The top-level statements in source order.
    pub statements: Vec<Rc<Statement>>,
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`&&`); both sides evaluate.
    And,
    /// Logical or (`||`); both sides evaluate.
    Or,
    /// Bitwise and (`&`)
    BitAnd,
    /// Bitwise or (`|`)
    BitOr,
    /// Bitwise xor (`^`)
    BitXor,
}

impl BinaryOperator {
    /// The operator's source symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
        }
    }

    /// The name of the method a user type must define for this operator,
    /// e.g. `operator+`.
    #[must_use]
    pub fn method_name(&self) -> String {
        format!("operator{}", self.symbol())
    }

    /// Returns `true` for operators that produce a boolean result.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(self,
                 Self::Equal
                 | Self::NotEqual
                 | Self::Less
                 | Self::Greater
                 | Self::LessEqual
                 | Self::GreaterEqual
                 | Self::And
                 | Self::Or)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`!x`).
    Not,
}

/// Represents an assignment operator.
///
/// Compound operators are recognized by the parser; the evaluator currently
/// executes only plain assignment and leaves the others inert.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// Plain assignment (`=`)
    Assign,
    /// Compound addition (`+=`)
    AddAssign,
    /// Compound subtraction (`-=`)
    SubAssign,
    /// Compound multiplication (`*=`)
    MulAssign,
    /// Compound division (`/=`)
    DivAssign,
}

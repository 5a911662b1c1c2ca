use crate::{
    ast::Statement,
    environment::Environment,
    error::CompileError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::statement::parse_statement,
    },
};

/// Result type used by the parser.
///
/// Parsing functions return either a parsed node or the [`CompileError`]
/// that stopped the parse.
pub type ParseResult<T> = Result<T, CompileError>;

/// Mutable state threaded through a parse.
///
/// Carries the token vector with a cursor, the current lexical scope level
/// (parse-time instances are tagged with it), and the namespaces brought in
/// by `using namespace` directives, which type resolution consults.
#[derive(Debug)]
pub struct ParsingContext {
    /// The token stream produced by the lexer.
    pub tokens:           Vec<Token>,
    /// Index of the token being looked at.
    pub cursor:           usize,
    /// Current scope depth; the program scope is level 1.
    pub scope_level:      u32,
    /// Namespace paths named by `using namespace` directives so far.
    pub using_namespaces: Vec<String>,
}

impl ParsingContext {
    /// Creates a context over a token stream, positioned at the start.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self { tokens,
               cursor: 0,
               scope_level: 1,
               using_namespaces: Vec::new() }
    }

    /// The token at an absolute index.
    #[must_use]
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The token kind at an absolute index.
    #[must_use]
    pub fn kind(&self, index: usize) -> Option<&TokenKind> {
        self.tokens.get(index).map(|token| &token.kind)
    }

    /// The token under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// The line of the token under the cursor, falling back to the last
    /// token's line at the end of input.
    #[must_use]
    pub fn line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map_or(0, |token| token.line)
    }
}

/// Parses a whole token stream into the program's statement list.
///
/// Statements are parsed in order; the first compile error stops the parse.
///
/// # Parameters
/// - `env`: The environment providing type, function and instance lookup.
/// - `ctx`: The parsing context positioned at the first token.
///
/// # Returns
/// The top-level statements in source order.
///
/// # Errors
/// Returns the first [`CompileError`] raised by any statement.
pub fn parse_program(env: &mut Environment, ctx: &mut ParsingContext) -> ParseResult<Vec<Statement>> {
    let mut statements = Vec::new();

    while ctx.cursor < ctx.tokens.len() {
        if matches!(ctx.kind(ctx.cursor), Some(TokenKind::Semicolon)) {
            ctx.cursor += 1;
            continue;
        }

        if let Some(statement) = parse_statement(env, ctx)? {
            statements.push(statement);
        }
    }

    Ok(statements)
}

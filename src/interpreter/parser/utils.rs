use crate::{
    error::CompileError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, ParsingContext},
    },
};

/// Builds an [`CompileError::UnexpectedSymbol`] from the token under the
/// cursor.
#[must_use]
pub fn unexpected(ctx: &ParsingContext) -> CompileError {
    let symbol = ctx.current()
                    .map_or_else(|| "<end of input>".to_string(), |token| token.kind.text());

    CompileError::UnexpectedSymbol { symbol,
                                     line: ctx.line() }
}

/// Finds the index of the token closing the construct the cursor is inside.
///
/// Scans forward from the cursor, balancing `opening`/`closing` pairs; a
/// cursor already at the closing token matches immediately.
///
/// # Errors
/// Returns [`CompileError::UnexpectedSymbol`] when the stream ends before
/// the closing token.
pub fn find_closing(ctx: &ParsingContext,
                    opening: &TokenKind,
                    closing: &TokenKind)
                    -> ParseResult<usize> {
    if ctx.kind(ctx.cursor) == Some(closing) {
        return Ok(ctx.cursor);
    }

    let mut depth = 0u32;

    for index in ctx.cursor..ctx.tokens.len() {
        let kind = &ctx.tokens[index].kind;

        if kind == closing {
            if depth == 0 {
                return Ok(index);
            }

            depth -= 1;
        } else if kind == opening {
            depth += 1;
        }
    }

    Err(unexpected(ctx))
}

/// Finds the index of the semicolon terminating the current statement.
///
/// # Errors
/// Returns [`CompileError::UnexpectedSymbol`] when no semicolon follows.
pub fn find_statement_end(ctx: &ParsingContext) -> ParseResult<usize> {
    for index in ctx.cursor..ctx.tokens.len() {
        if ctx.tokens[index].kind == TokenKind::Semicolon {
            return Ok(index);
        }
    }

    Err(unexpected(ctx))
}

/// Finds the first index of `kind` at parenthesis depth zero within
/// `[first, last]`, or `None`.
#[must_use]
pub fn find_at_depth_zero(ctx: &ParsingContext,
                          first: usize,
                          last: usize,
                          kind: &TokenKind)
                          -> Option<usize> {
    let mut depth = 0u32;

    for index in first..=last {
        let current = &ctx.tokens[index].kind;

        if current == kind && depth == 0 {
            return Some(index);
        }

        if *current == TokenKind::LParen {
            depth += 1;
        } else if *current == TokenKind::RParen {
            depth = depth.saturating_sub(1);
        }
    }

    None
}

/// Finds the first assignment operator at parenthesis depth zero within
/// `[first, last]`, or `None`.
#[must_use]
pub fn find_assignment_operator(ctx: &ParsingContext, first: usize, last: usize) -> Option<usize> {
    let mut depth = 0u32;

    for index in first..=last {
        let kind = &ctx.tokens[index].kind;

        if depth == 0 && kind.assignment_operator().is_some() {
            return Some(index);
        }

        if *kind == TokenKind::LParen {
            depth += 1;
        } else if *kind == TokenKind::RParen {
            depth = depth.saturating_sub(1);
        }
    }

    None
}

use std::rc::Rc;

use crate::{
    ast::Statement,
    environment::Environment,
    error::CompileError,
    interpreter::{
        lexer::TokenKind,
        parser::{
            core::{ParseResult, ParsingContext},
            expression::parse_expression,
            types::parse_type_usage,
            utils::{
                find_assignment_operator, find_closing, find_statement_end, unexpected,
            },
        },
        symbols::{identifier::Identifier, types::TypeUsage},
        value::core::Value,
    },
};

/// Parses a single statement starting at the cursor.
///
/// The leading token selects the production: blocks, `using` directives,
/// namespace declarations, control flow, `void` function declarations, and
/// the identifier-led family (declarations, assignments, calls, increments)
/// resolved by type lookup and lookahead. Each production consumes its
/// terminating token.
///
/// # Parameters
/// - `env`: The environment providing symbol lookup and registration.
/// - `ctx`: The parsing context positioned at the statement's first token.
///
/// # Returns
/// The parsed statement, or `None` for productions with no runtime body.
///
/// # Errors
/// Returns the [`CompileError`] describing the first problem found.
pub fn parse_statement(env: &mut Environment,
                       ctx: &mut ParsingContext)
                       -> ParseResult<Option<Statement>> {
    let line = ctx.line();

    match ctx.kind(ctx.cursor) {
        Some(TokenKind::LBrace) => Ok(Some(parse_statement_block(env, ctx)?)),
        Some(TokenKind::Semicolon) => {
            ctx.cursor += 1;
            Ok(None)
        },
        Some(TokenKind::Using) => parse_using_directive(ctx, line).map(Some),
        Some(TokenKind::Namespace) => parse_namespace_declaration(env, ctx, line).map(Some),
        Some(TokenKind::If) => {
            ctx.cursor += 1;
            parse_statement_if(env, ctx, line).map(Some)
        },
        Some(TokenKind::While) => {
            ctx.cursor += 1;
            parse_statement_while(env, ctx, line).map(Some)
        },
        Some(TokenKind::For) => {
            ctx.cursor += 1;
            parse_statement_for(env, ctx, line).map(Some)
        },
        Some(TokenKind::Break) => {
            ctx.cursor += 1;

            if ctx.kind(ctx.cursor) != Some(&TokenKind::Semicolon) {
                return Err(CompileError::UnexpectedSymbol { symbol: "break".to_string(),
                                                            line });
            }

            ctx.cursor += 1;
            Ok(Some(Statement::Break { line }))
        },
        Some(TokenKind::Continue) => {
            ctx.cursor += 1;

            if ctx.kind(ctx.cursor) != Some(&TokenKind::Semicolon) {
                return Err(CompileError::UnexpectedSymbol { symbol: "continue".to_string(),
                                                            line });
            }

            ctx.cursor += 1;
            Ok(Some(Statement::Continue { line }))
        },
        Some(TokenKind::Return) => {
            ctx.cursor += 1;

            let expression = if ctx.kind(ctx.cursor) == Some(&TokenKind::Semicolon) {
                None
            } else {
                let end = find_statement_end(ctx)?;
                Some(parse_expression(env, ctx, end - 1)?)
            };

            ctx.cursor += 1;
            Ok(Some(Statement::Return { expression, line }))
        },
        Some(TokenKind::Void) => {
            ctx.cursor += 1;
            parse_function_declaration(env, ctx, None, line).map(Some)
        },
        Some(TokenKind::Const) => {
            // the qualifier belongs to the declaration that follows
            ctx.cursor += 1;
            parse_statement(env, ctx)
        },
        Some(TokenKind::Identifier(_)) => parse_identifier_statement(env, ctx, line),
        _ => Err(unexpected(ctx)),
    }
}

/// Parses a `{ ... }` block, opening a parse-time scope for the declarations
/// inside it.
pub fn parse_statement_block(env: &mut Environment, ctx: &mut ParsingContext) -> ParseResult<Statement> {
    let line = ctx.line();

    if ctx.kind(ctx.cursor) != Some(&TokenKind::LBrace) {
        return Err(unexpected(ctx));
    }

    ctx.cursor += 1;
    ctx.scope_level += 1;

    let mut statements = Vec::new();
    let mut result = Ok(());

    loop {
        match ctx.kind(ctx.cursor) {
            Some(TokenKind::RBrace) => {
                ctx.cursor += 1;
                break;
            },
            Some(_) => match parse_statement(env, ctx) {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {},
                Err(error) => {
                    result = Err(error);
                    break;
                },
            },
            None => {
                result = Err(unexpected(ctx));
                break;
            },
        }
    }

    env.release_instances(ctx.scope_level);
    ctx.scope_level -= 1;
    result?;

    Ok(Statement::Block { statements, line })
}

/// Records a `using namespace ...;` directive in the parsing context and
/// emits its statement.
fn parse_using_directive(ctx: &mut ParsingContext, line: usize) -> ParseResult<Statement> {
    ctx.cursor += 1;

    if ctx.kind(ctx.cursor) != Some(&TokenKind::Namespace) {
        return Err(CompileError::UnexpectedSymbol { symbol: "using".to_string(),
                                                    line });
    }

    ctx.cursor += 1;
    let mut path = String::new();

    loop {
        match ctx.kind(ctx.cursor) {
            Some(TokenKind::Identifier(segment)) => path.push_str(segment),
            Some(TokenKind::DoubleColon) => path.push_str("::"),
            Some(TokenKind::Semicolon) => {
                ctx.cursor += 1;
                break;
            },
            _ => return Err(unexpected(ctx)),
        }

        ctx.cursor += 1;
    }

    if path.is_empty() {
        return Err(CompileError::UnexpectedSymbol { symbol: "namespace".to_string(),
                                                    line });
    }

    ctx.using_namespaces.push(path.clone());

    Ok(Statement::UsingDirective { namespace: Identifier::new(&path),
                                   line })
}

/// Parses a `namespace X { ... }` declaration.
///
/// Lookup remains flat in this revision, so the body statements simply
/// execute in source order; no scope is opened.
fn parse_namespace_declaration(env: &mut Environment,
                               ctx: &mut ParsingContext,
                               line: usize)
                               -> ParseResult<Statement> {
    ctx.cursor += 1;

    let Some(TokenKind::Identifier(name)) = ctx.kind(ctx.cursor) else {
        return Err(CompileError::UnexpectedSymbol { symbol: "namespace".to_string(),
                                                    line });
    };
    let identifier = Identifier::new(name);
    ctx.cursor += 1;

    if ctx.kind(ctx.cursor) != Some(&TokenKind::LBrace) {
        return Err(unexpected(ctx));
    }

    ctx.cursor += 1;
    let mut statements = Vec::new();

    loop {
        match ctx.kind(ctx.cursor) {
            Some(TokenKind::RBrace) => {
                ctx.cursor += 1;
                break;
            },
            Some(_) => {
                if let Some(statement) = parse_statement(env, ctx)? {
                    statements.push(statement);
                }
            },
            None => return Err(unexpected(ctx)),
        }
    }

    Ok(Statement::NamespaceDeclaration { identifier,
                                         statements,
                                         line })
}

/// Parses an `if (...) statement [else statement]`.
fn parse_statement_if(env: &mut Environment,
                      ctx: &mut ParsingContext,
                      line: usize)
                      -> ParseResult<Statement> {
    if ctx.kind(ctx.cursor) != Some(&TokenKind::LParen) {
        return Err(CompileError::UnexpectedSymbol { symbol: "if".to_string(),
                                                    line });
    }

    ctx.cursor += 1;
    let closing = find_closing(ctx, &TokenKind::LParen, &TokenKind::RParen)?;
    let condition = parse_expression(env, ctx, closing - 1)?;
    ctx.cursor = closing + 1;

    let then_branch = parse_statement(env, ctx)?.ok_or_else(|| unexpected(ctx))?;

    let else_branch = if ctx.kind(ctx.cursor) == Some(&TokenKind::Else) {
        ctx.cursor += 1;
        Some(Box::new(parse_statement(env, ctx)?.ok_or_else(|| unexpected(ctx))?))
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch: Box::new(then_branch),
                       else_branch,
                       line })
}

/// Parses a `while (...) statement`.
fn parse_statement_while(env: &mut Environment,
                         ctx: &mut ParsingContext,
                         line: usize)
                         -> ParseResult<Statement> {
    if ctx.kind(ctx.cursor) != Some(&TokenKind::LParen) {
        return Err(CompileError::UnexpectedSymbol { symbol: "while".to_string(),
                                                    line });
    }

    ctx.cursor += 1;
    let closing = find_closing(ctx, &TokenKind::LParen, &TokenKind::RParen)?;
    let condition = parse_expression(env, ctx, closing - 1)?;
    ctx.cursor = closing + 1;

    let body = parse_statement(env, ctx)?.ok_or_else(|| unexpected(ctx))?;

    Ok(Statement::While { condition,
                          body: Box::new(body),
                          line })
}

/// Parses a `for (init; condition; step) statement`.
///
/// The loop opens a scope that also contains the initialization, so a
/// variable declared there does not survive the loop.
fn parse_statement_for(env: &mut Environment,
                       ctx: &mut ParsingContext,
                       line: usize)
                       -> ParseResult<Statement> {
    if ctx.kind(ctx.cursor) != Some(&TokenKind::LParen) {
        return Err(CompileError::UnexpectedSymbol { symbol: "for".to_string(),
                                                    line });
    }

    ctx.cursor += 1;
    ctx.scope_level += 1;

    let result = parse_statement_for_inner(env, ctx, line);

    env.release_instances(ctx.scope_level);
    ctx.scope_level -= 1;

    result
}

fn parse_statement_for_inner(env: &mut Environment,
                             ctx: &mut ParsingContext,
                             line: usize)
                             -> ParseResult<Statement> {
    // initialization; consumes its own terminating semicolon
    let initialization = if ctx.kind(ctx.cursor) == Some(&TokenKind::Semicolon) {
        ctx.cursor += 1;
        None
    } else {
        parse_statement(env, ctx)?.map(Box::new)
    };

    // condition; defaults to true when omitted
    let condition = if ctx.kind(ctx.cursor) == Some(&TokenKind::Semicolon) {
        ctx.cursor += 1;
        None
    } else {
        let end = find_statement_end(ctx)?;
        let expression = parse_expression(env, ctx, end - 1)?;
        ctx.cursor = end + 1;
        Some(expression)
    };

    // step; runs to the loop's closing parenthesis
    let step = if ctx.kind(ctx.cursor) == Some(&TokenKind::RParen) {
        ctx.cursor += 1;
        None
    } else {
        let closing = find_closing(ctx, &TokenKind::LParen, &TokenKind::RParen)?;
        let statement = parse_for_step(env, ctx, closing - 1)?;
        ctx.cursor = closing + 1;
        Some(Box::new(statement))
    };

    let body = parse_statement(env, ctx)?.ok_or_else(|| unexpected(ctx))?;

    Ok(Statement::For { initialization,
                        condition,
                        step,
                        body: Box::new(body),
                        line })
}

/// Parses a for-loop step: an assignment, an increment or decrement, or a
/// bare expression, none of them semicolon-terminated.
fn parse_for_step(env: &mut Environment,
                  ctx: &mut ParsingContext,
                  last: usize)
                  -> ParseResult<Statement> {
    let line = ctx.line();

    if let Some(operator_index) = find_assignment_operator(ctx, ctx.cursor, last) {
        return parse_assignment_slice(env, ctx, operator_index, last, line);
    }

    if let (Some(TokenKind::Identifier(name)), Some(next)) =
        (ctx.kind(ctx.cursor), ctx.kind(ctx.cursor + 1))
        && matches!(next, TokenKind::PlusPlus | TokenKind::MinusMinus)
    {
        let identifier = Identifier::new(name);
        let decrement = *next == TokenKind::MinusMinus;
        check_integer_variable(env, &identifier, line)?;
        ctx.cursor += 2;

        return Ok(if decrement {
            Statement::Decrement { identifier, line }
        } else {
            Statement::Increment { identifier, line }
        });
    }

    let expression = parse_expression(env, ctx, last)?;
    Ok(Statement::Expression { expression, line })
}

/// Parses the statements led by an identifier: declarations when the tokens
/// resolve to a type, otherwise assignments, calls and increments told apart
/// by lookahead.
fn parse_identifier_statement(env: &mut Environment,
                              ctx: &mut ParsingContext,
                              line: usize)
                              -> ParseResult<Option<Statement>> {
    if let Some(type_usage) = parse_type_usage(env, ctx) {
        return parse_declaration(env, ctx, type_usage, line).map(Some);
    }

    // not a declaration; scan ahead for a top-level assignment operator
    let end = find_statement_end(ctx)?;

    if let Some(operator_index) = find_assignment_operator(ctx, ctx.cursor, end - 1) {
        let statement = parse_assignment_slice(env, ctx, operator_index, end - 1, line)?;
        ctx.cursor = end + 1;
        return Ok(Some(statement));
    }

    match ctx.kind(ctx.cursor + 1) {
        Some(TokenKind::PlusPlus | TokenKind::MinusMinus) => {
            let Some(TokenKind::Identifier(name)) = ctx.kind(ctx.cursor) else {
                return Err(unexpected(ctx));
            };
            let identifier = Identifier::new(name);
            let decrement = ctx.kind(ctx.cursor + 1) == Some(&TokenKind::MinusMinus);

            check_integer_variable(env, &identifier, line)?;
            ctx.cursor += 2;

            if ctx.kind(ctx.cursor) != Some(&TokenKind::Semicolon) {
                return Err(unexpected(ctx));
            }

            ctx.cursor += 1;

            Ok(Some(if decrement {
                Statement::Decrement { identifier, line }
            } else {
                Statement::Increment { identifier, line }
            }))
        },
        // calls, member and method calls, qualified accesses and bare
        // variable reads all evaluate as expression statements
        _ => {
            let expression = parse_expression(env, ctx, end - 1)?;
            ctx.cursor = end + 1;

            Ok(Some(Statement::Expression { expression, line }))
        },
    }
}

/// Parses the rest of a declaration once its type is known: either a
/// variable (with optional initializer) or a function declaration.
fn parse_declaration(env: &mut Environment,
                     ctx: &mut ParsingContext,
                     type_usage: TypeUsage,
                     line: usize)
                     -> ParseResult<Statement> {
    let Some(TokenKind::Identifier(name)) = ctx.kind(ctx.cursor) else {
        return Err(unexpected(ctx));
    };
    let identifier = Identifier::new(name);
    ctx.cursor += 1;

    let Some(next) = ctx.kind(ctx.cursor) else {
        return Err(unexpected(ctx));
    };

    if !next.is_operator() && !next.is_punctuation() {
        return Err(CompileError::UnexpectedSymbol { symbol: identifier.name,
                                                    line });
    }

    match next {
        TokenKind::Equals | TokenKind::Semicolon => {
            if let Some((_, scope_level)) = env.retrieve_instance_type(&identifier)
                && scope_level == ctx.scope_level
            {
                return Err(CompileError::VariableRedefinition { name: identifier.name,
                                                                line });
            }

            let initial_value = if *next == TokenKind::Equals {
                ctx.cursor += 1;
                let end = find_statement_end(ctx)?;
                let expression = parse_expression(env, ctx, end - 1)?;
                ctx.cursor = end + 1;
                Some(expression)
            } else {
                // a struct or class declared without an initializer needs a
                // default constructor to run
                if !type_usage.ty.borrow().is_built_in() && !type_usage.is_pointer() {
                    let ty = type_usage.ty.borrow();

                    if ty.default_constructor().is_none() {
                        return Err(CompileError::NoDefaultConstructor { type_name:
                                                                            ty.identifier.name.clone(),
                                                                        line });
                    }
                }

                ctx.cursor += 1;
                None
            };

            env.register_instance_at(ctx.scope_level,
                                     type_usage.clone(),
                                     identifier.clone(),
                                     Value::uninitialized(type_usage.clone()));

            Ok(Statement::VariableDeclaration { type_usage,
                                                identifier,
                                                initial_value,
                                                line })
        },
        TokenKind::LParen => {
            ctx.cursor -= 1;
            parse_function_declaration(env, ctx, Some(type_usage), line)
        },
        _ => Err(unexpected(ctx)),
    }
}

/// Parses a function declaration positioned at the function name.
fn parse_function_declaration(env: &mut Environment,
                              ctx: &mut ParsingContext,
                              return_type: Option<TypeUsage>,
                              line: usize)
                              -> ParseResult<Statement> {
    let Some(TokenKind::Identifier(name)) = ctx.kind(ctx.cursor) else {
        return Err(unexpected(ctx));
    };
    let identifier = Identifier::new(name);
    ctx.cursor += 1;

    if ctx.kind(ctx.cursor) != Some(&TokenKind::LParen) {
        return Err(unexpected(ctx));
    }

    ctx.cursor += 1;

    let mut parameter_types = Vec::new();
    let mut parameter_names = Vec::new();

    loop {
        match ctx.kind(ctx.cursor) {
            Some(TokenKind::RParen) => {
                ctx.cursor += 1;
                break;
            },
            Some(TokenKind::Comma) => ctx.cursor += 1,
            Some(_) => {
                let parameter_type =
                    parse_type_usage(env, ctx).ok_or_else(|| unexpected(ctx))?;

                let Some(TokenKind::Identifier(parameter)) = ctx.kind(ctx.cursor) else {
                    return Err(unexpected(ctx));
                };
                let parameter_identifier = Identifier::new(parameter);
                ctx.cursor += 1;

                // parameters are visible one scope inside the body
                env.register_instance_at(ctx.scope_level + 1,
                                         parameter_type.clone(),
                                         parameter_identifier.clone(),
                                         Value::uninitialized(parameter_type.clone()));

                parameter_types.push(parameter_type);
                parameter_names.push(parameter_identifier);
            },
            None => return Err(unexpected(ctx)),
        }
    }

    let body = parse_statement_block(env, ctx)?;

    Ok(Statement::FunctionDeclaration { return_type,
                                        identifier,
                                        parameter_types,
                                        parameter_names,
                                        body: Rc::new(body),
                                        line })
}

/// Parses an assignment whose operator sits at `operator_index`, with the
/// value expression running through `last`.
fn parse_assignment_slice(env: &mut Environment,
                          ctx: &mut ParsingContext,
                          operator_index: usize,
                          last: usize,
                          line: usize)
                          -> ParseResult<Statement> {
    let target = parse_expression(env, ctx, operator_index - 1)?;

    let Some(op) = ctx.tokens[operator_index].kind.assignment_operator() else {
        ctx.cursor = operator_index;
        return Err(unexpected(ctx));
    };

    ctx.cursor = operator_index + 1;
    let value = parse_expression(env, ctx, last)?;

    Ok(Statement::Assignment { target,
                               op,
                               value,
                               line })
}

/// Verifies that `identifier` names an integer-typed variable, as `++` and
/// `--` require.
fn check_integer_variable(env: &Environment,
                          identifier: &Identifier,
                          line: usize)
                          -> ParseResult<()> {
    let Some((type_usage, _)) = env.retrieve_instance_type(identifier) else {
        return Err(CompileError::UndefinedVariable { name: identifier.name.clone(),
                                                     line });
    };

    if !type_usage.ty.borrow().is_integer() {
        return Err(CompileError::NonIntegerValue { name: identifier.name.clone(),
                                                   line });
    }

    Ok(())
}

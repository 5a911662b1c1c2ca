use crate::{
    ast::{Expression, UnaryOperator},
    environment::Environment,
    error::CompileError,
    interpreter::{
        lexer::TokenKind,
        parser::{
            core::{ParseResult, ParsingContext},
            utils::{find_at_depth_zero, find_closing, unexpected},
        },
        symbols::{identifier::Identifier, types::TypeUsage},
    },
};

/// Parses the expression held by the token slice `[cursor, last]`.
///
/// The grammar is deliberately flat: the slice is split at the last binary
/// operator at parenthesis depth zero, which yields strictly left-
/// associative evaluation with no precedence table (`a + b * 2` groups as
/// `(a + b) * 2`). Conditionals split earlier at `?`/`:`, and the remaining
/// single-operand forms (parenthesized groups, calls, member chains,
/// address-of, unary operators, literals) are recognized by their leading
/// token.
///
/// On success the cursor is left at `last + 1`.
///
/// # Parameters
/// - `env`: The environment providing symbol lookup.
/// - `ctx`: The parsing context; the cursor marks the slice start.
/// - `last`: The index of the slice's final token, inclusive.
///
/// # Returns
/// The parsed expression node.
///
/// # Errors
/// Returns a [`CompileError`] for malformed expressions, unknown variables,
/// and invalid operators on user types.
pub fn parse_expression(env: &mut Environment,
                        ctx: &mut ParsingContext,
                        last: usize)
                        -> ParseResult<Expression> {
    let first = ctx.cursor;

    if first > last || last >= ctx.tokens.len() {
        return Err(unexpected(ctx));
    }

    let expression = if first == last {
        parse_single_token(env, ctx)?
    } else if let Some(question_index) = find_at_depth_zero(ctx, first, last, &TokenKind::Question) {
        parse_conditional(env, ctx, question_index, last)?
    } else if let Some(operator_index) = find_split_operator(ctx, first, last) {
        parse_binary_operation(env, ctx, operator_index, last)?
    } else {
        match ctx.kind(first) {
            Some(TokenKind::LParen) => {
                let line = ctx.line();
                ctx.cursor += 1;
                let closing = find_closing(ctx, &TokenKind::LParen, &TokenKind::RParen)?;
                let inner = parse_expression(env, ctx, closing - 1)?;

                Expression::Parenthesized { inner: Box::new(inner),
                                            line }
            },
            Some(TokenKind::Identifier(_)) => parse_identifier_leader(env, ctx, last)?,
            Some(TokenKind::Ampersand) => {
                let line = ctx.line();
                ctx.cursor += 1;
                let inner = parse_expression(env, ctx, last)?;

                Expression::AddressOf { inner: Box::new(inner),
                                        line }
            },
            Some(TokenKind::Minus) => {
                let line = ctx.line();
                ctx.cursor += 1;
                let operand = parse_expression(env, ctx, last)?;

                Expression::UnaryOp { op: UnaryOperator::Negate,
                                      operand: Box::new(operand),
                                      line }
            },
            Some(TokenKind::Bang) => {
                let line = ctx.line();
                ctx.cursor += 1;
                let operand = parse_expression(env, ctx, last)?;

                Expression::UnaryOp { op: UnaryOperator::Not,
                                      operand: Box::new(operand),
                                      line }
            },
            _ => return Err(unexpected(ctx)),
        }
    };

    ctx.cursor = last + 1;
    Ok(expression)
}

/// Parses the expression forms that fit in one token: numeric, string and
/// boolean literals, `nullptr`, and variable accesses.
fn parse_single_token(env: &mut Environment, ctx: &mut ParsingContext) -> ParseResult<Expression> {
    let line = ctx.line();

    match ctx.kind(ctx.cursor).cloned() {
        Some(TokenKind::Number(text)) => parse_number_literal(env, &text, line),
        Some(TokenKind::Str(text)) => Ok(Expression::Literal { value: env.intern_string_literal(&text),
                                                               line }),
        Some(TokenKind::True) => Ok(Expression::Literal { value: env.bool_literal(true),
                                                          line }),
        Some(TokenKind::False) => Ok(Expression::Literal { value: env.bool_literal(false),
                                                           line }),
        Some(TokenKind::NullPtr) => Ok(Expression::NullPointer { line }),
        Some(TokenKind::Identifier(name)) => {
            let identifier = Identifier::new(&name);

            if env.retrieve_instance_type(&identifier).is_none() {
                return Err(CompileError::UndefinedVariable { name, line });
            }

            Ok(Expression::VariableAccess { identifier, line })
        },
        _ => Err(unexpected(ctx)),
    }
}

/// Resolves a numeric literal's type from its suffix: `f` is a float, a
/// bare `.` a double, `u` a uint32_t, a `0x` prefix a hexadecimal int, and
/// anything else an int.
fn parse_number_literal(env: &Environment, text: &str, line: usize) -> ParseResult<Expression> {
    let invalid = || CompileError::UnexpectedSymbol { symbol: text.to_string(),
                                                      line };

    let value = if text.contains('.') {
        if let Some(mantissa) = text.strip_suffix('f') {
            #[allow(clippy::cast_possible_truncation)]
            let number = mantissa.parse::<f64>().map_err(|_| invalid())? as f32;
            env.float_literal(number)
        } else {
            let number: f64 = text.parse().map_err(|_| invalid())?;
            env.double_literal(number)
        }
    } else if let Some(digits) = text.strip_suffix('u') {
        let number: u32 = digits.parse().map_err(|_| invalid())?;
        env.uint_literal(number)
    } else if let Some(digits) = text.strip_prefix("0x") {
        #[allow(clippy::cast_possible_truncation)]
        let number = i64::from_str_radix(digits, 16).map_err(|_| invalid())? as i32;
        env.int_literal(number)
    } else {
        let number: i32 = text.parse().map_err(|_| invalid())?;
        env.int_literal(number)
    };

    Ok(Expression::Literal { value, line })
}

/// Finds the split point for a binary operation: the index of the last
/// operator at parenthesis depth zero whose left neighbour can end an
/// operand. Operators preceded by another operator or an opening
/// parenthesis are unary and never split.
fn find_split_operator(ctx: &ParsingContext, first: usize, last: usize) -> Option<usize> {
    let mut depth = 0u32;

    // the boundary tokens take part in depth tracking but can never split
    for index in (first..=last).rev() {
        let kind = &ctx.tokens[index].kind;

        if *kind == TokenKind::RParen {
            depth += 1;
        } else if *kind == TokenKind::LParen {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && index > first && index < last && kind.is_operator() {
            let previous = &ctx.tokens[index - 1].kind;

            if !previous.is_operator() && *previous != TokenKind::LParen {
                return Some(index);
            }
        }
    }

    None
}

/// Parses a binary operation split at `operator_index`.
///
/// The left operand parses first; when its type is a user type, the
/// operator must have a matching `operator` method registered on it.
fn parse_binary_operation(env: &mut Environment,
                          ctx: &mut ParsingContext,
                          operator_index: usize,
                          last: usize)
                          -> ParseResult<Expression> {
    let left = parse_expression(env, ctx, operator_index - 1)?;

    let operator_token = &ctx.tokens[operator_index];
    let line = operator_token.line;
    let Some(op) = operator_token.kind.binary_operator() else {
        ctx.cursor = operator_index;
        return Err(unexpected(ctx));
    };

    if let Some(left_usage) = expression_type_usage(env, ctx, &left) {
        let ty = left_usage.ty.borrow();

        if !ty.is_built_in() && !left_usage.is_pointer() && ty.find_method(&op.method_name()).is_none() {
            return Err(CompileError::InvalidOperator { type_name: ty.identifier.name.clone(),
                                                       line });
        }
    }

    ctx.cursor = operator_index + 1;
    let right = parse_expression(env, ctx, last)?;

    Ok(Expression::BinaryOp { op,
                              left: Box::new(left),
                              right: Box::new(right),
                              line })
}

/// Parses a `condition ? then : else` expression split at `question_index`.
fn parse_conditional(env: &mut Environment,
                     ctx: &mut ParsingContext,
                     question_index: usize,
                     last: usize)
                     -> ParseResult<Expression> {
    let line = ctx.tokens[question_index].line;

    let colon_index =
        find_matching_colon(ctx, question_index + 1, last).ok_or_else(|| unexpected(ctx))?;

    let condition = parse_expression(env, ctx, question_index - 1)?;
    ctx.cursor = question_index + 1;
    let then_expr = parse_expression(env, ctx, colon_index - 1)?;
    ctx.cursor = colon_index + 1;
    let else_expr = parse_expression(env, ctx, last)?;

    Ok(Expression::Conditional { condition: Box::new(condition),
                                 then_expr: Box::new(then_expr),
                                 else_expr: Box::new(else_expr),
                                 line })
}

/// Finds the `:` matching an already-seen `?`, balancing nested
/// conditionals and parentheses.
fn find_matching_colon(ctx: &ParsingContext, first: usize, last: usize) -> Option<usize> {
    let mut paren_depth = 0u32;
    let mut conditional_depth = 0u32;

    for index in first..=last {
        match &ctx.tokens[index].kind {
            TokenKind::LParen => paren_depth += 1,
            TokenKind::RParen => paren_depth = paren_depth.saturating_sub(1),
            TokenKind::Question if paren_depth == 0 => conditional_depth += 1,
            TokenKind::Colon if paren_depth == 0 => {
                if conditional_depth == 0 {
                    return Some(index);
                }

                conditional_depth -= 1;
            },
            _ => {},
        }
    }

    None
}

/// Parses the multi-token forms led by an identifier: function calls,
/// member access chains (possibly ending in a method call), and
/// `::`-qualified accesses.
fn parse_identifier_leader(env: &mut Environment,
                           ctx: &mut ParsingContext,
                           last: usize)
                           -> ParseResult<Expression> {
    let line = ctx.line();

    match ctx.kind(ctx.cursor + 1) {
        // function call
        Some(TokenKind::LParen) => {
            let Some(TokenKind::Identifier(name)) = ctx.kind(ctx.cursor) else {
                return Err(unexpected(ctx));
            };
            let identifier = Identifier::new(name);

            ctx.cursor += 1;
            let arguments = parse_call_arguments(env, ctx)?;

            Ok(Expression::FunctionCall { identifier,
                                          arguments,
                                          line })
        },
        // member access, possibly a method call
        Some(TokenKind::Dot | TokenKind::Arrow) => {
            let (member_access, _) = parse_member_access(env, ctx)?;

            if ctx.kind(ctx.cursor) == Some(&TokenKind::LParen) && ctx.cursor <= last {
                let arguments = parse_call_arguments(env, ctx)?;

                Ok(Expression::MethodCall { member_access: Box::new(member_access),
                                            arguments,
                                            line })
            } else {
                Ok(member_access)
            }
        },
        // static access through a qualified name
        Some(TokenKind::DoubleColon) => {
            let Some(TokenKind::Identifier(first_segment)) = ctx.kind(ctx.cursor) else {
                return Err(unexpected(ctx));
            };

            let mut name = first_segment.clone();

            while ctx.kind(ctx.cursor + 1) == Some(&TokenKind::DoubleColon) {
                let Some(TokenKind::Identifier(segment)) = ctx.kind(ctx.cursor + 2) else {
                    ctx.cursor += 1;
                    return Err(unexpected(ctx));
                };

                name.push_str("::");
                name.push_str(segment);
                ctx.cursor += 2;
            }

            let identifier = Identifier::new(&name);
            ctx.cursor += 1;

            // a qualified name followed by '(' is a static call
            if ctx.kind(ctx.cursor) == Some(&TokenKind::LParen) && ctx.cursor <= last {
                let arguments = parse_call_arguments(env, ctx)?;

                Ok(Expression::FunctionCall { identifier,
                                              arguments,
                                              line })
            } else {
                Ok(Expression::VariableAccess { identifier, line })
            }
        },
        _ => Err(unexpected(ctx)),
    }
}

/// Parses a comma-separated argument list.
///
/// The cursor must sit on the opening parenthesis; each argument slice is
/// delimited by the next comma or the closing parenthesis at depth zero. On
/// success the cursor is left after the closing parenthesis.
pub fn parse_call_arguments(env: &mut Environment,
                            ctx: &mut ParsingContext)
                            -> ParseResult<Vec<Expression>> {
    if ctx.kind(ctx.cursor) != Some(&TokenKind::LParen) {
        return Err(unexpected(ctx));
    }

    ctx.cursor += 1;
    let closing = find_closing(ctx, &TokenKind::LParen, &TokenKind::RParen)?;
    let mut arguments = Vec::new();

    while ctx.cursor < closing {
        let separator = find_at_depth_zero(ctx, ctx.cursor, closing - 1, &TokenKind::Comma)
            .unwrap_or(closing);

        arguments.push(parse_expression(env, ctx, separator - 1)?);
        ctx.cursor = separator + 1;
    }

    ctx.cursor = closing + 1;
    Ok(arguments)
}

/// Parses a `.`/`->` member access chain starting at a variable.
///
/// The resulting type usage is tracked through every member lookup so the
/// access operators can be validated: `.` requires a non-pointer receiver
/// and `->` a pointer receiver. A chain ending at `(` leaves its final
/// identifier unresolved; it names a method and is handled by the caller.
///
/// # Returns
/// The member access expression and the type usage of the final resolved
/// segment (`None` when the chain ends in a method name).
pub fn parse_member_access(env: &Environment,
                           ctx: &mut ParsingContext)
                           -> ParseResult<(Expression, Option<TypeUsage>)> {
    let line = ctx.line();
    let mut identifiers: Vec<Identifier> = Vec::new();
    let mut type_usage: Option<TypeUsage> = None;

    loop {
        let Some(TokenKind::Identifier(name)) = ctx.kind(ctx.cursor) else {
            return Err(unexpected(ctx));
        };
        let identifier = Identifier::new(name);
        let token_line = ctx.line();

        let separator = ctx.kind(ctx.cursor + 1);
        let dot_access = separator == Some(&TokenKind::Dot);
        let arrow_access = separator == Some(&TokenKind::Arrow);
        let has_more = dot_access || arrow_access;

        if identifiers.is_empty() {
            let Some((instance_usage, _)) = env.retrieve_instance_type(&identifier) else {
                return Err(CompileError::UndefinedVariable { name: identifier.name,
                                                            line: token_line });
            };

            type_usage = Some(instance_usage);
        } else if separator == Some(&TokenKind::LParen) {
            // the chain ends in a method name; leave it unresolved
            type_usage = None;
        } else if let Some(current_usage) = &type_usage {
            let ty = current_usage.ty.borrow();

            if ty.is_built_in() {
                // built-in types carry no member table to validate
                // against; resolution is deferred to evaluation
                drop(ty);
                type_usage = None;
            } else {
                let Some(member) = ty.find_member(&identifier) else {
                    return Err(CompileError::MissingMember { name: identifier.name,
                                                             line: token_line });
                };

                let member_usage = member.type_usage.clone();
                drop(ty);
                type_usage = Some(member_usage);
            }
        }

        identifiers.push(identifier);

        if has_more {
            if let Some(current_usage) = &type_usage {
                let name = &identifiers[identifiers.len() - 1].name;

                if current_usage.is_pointer() && dot_access {
                    return Err(CompileError::InvalidMemberAccessOperatorPtr { name: name.clone(),
                                                                              line: token_line });
                }

                if !current_usage.is_pointer() && arrow_access {
                    return Err(CompileError::InvalidMemberAccessOperatorNonPtr { name: name.clone(),
                                                                                 line: token_line });
                }
            }

            ctx.cursor += 2;
        } else {
            ctx.cursor += 1;
            break;
        }
    }

    Ok((Expression::MemberAccess { identifiers, line }, type_usage))
}

/// Derives the compile-time type of an expression, where one is known.
///
/// This is the parser's type tracker: it resolves just enough typing to
/// validate operators against left operands. Chains and calls whose types
/// are not yet registered yield `None`, which skips validation.
pub fn expression_type_usage(env: &Environment,
                             ctx: &ParsingContext,
                             expression: &Expression)
                             -> Option<TypeUsage> {
    match expression {
        Expression::Literal { value, .. } => Some(value.type_usage.clone()),
        Expression::VariableAccess { identifier, .. } => {
            env.retrieve_instance_type(identifier).map(|(usage, _)| usage)
        },
        Expression::BinaryOp { left, .. } => expression_type_usage(env, ctx, left),
        Expression::Parenthesized { inner, .. } => expression_type_usage(env, ctx, inner),
        Expression::AddressOf { inner, .. } => {
            expression_type_usage(env, ctx, inner).map(|usage| usage.referenced())
        },
        Expression::UnaryOp { operand, .. } => expression_type_usage(env, ctx, operand),
        Expression::Conditional { then_expr, .. } => expression_type_usage(env, ctx, then_expr),
        Expression::FunctionCall { identifier, .. } => {
            env.lookup_function_named(&identifier.name, &ctx.using_namespaces)
               .and_then(|function| function.return_type)
        },
        Expression::NullPointer { .. }
        | Expression::MemberAccess { .. }
        | Expression::MethodCall { .. } => None,
    }
}

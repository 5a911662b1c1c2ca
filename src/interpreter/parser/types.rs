use crate::{
    environment::Environment,
    interpreter::{
        lexer::TokenKind,
        parser::core::ParsingContext,
        symbols::types::TypeUsage,
    },
};

/// Attempts to parse a type usage starting at the cursor.
///
/// A type usage is a possibly `::`-qualified type name, optionally preceded
/// by `const` and followed by one `*` or `&`. Unqualified names that fail to
/// resolve are retried under each `using namespace` prefix recorded so far.
///
/// On success the cursor is left on the first token after the type; when no
/// registered type matches, the cursor is restored and `None` is returned so
/// the caller can try other statement interpretations.
///
/// # Parameters
/// - `env`: The environment providing type lookup.
/// - `ctx`: The parsing context positioned at a candidate type name.
///
/// # Returns
/// The parsed type usage, or `None` when the tokens do not name a type.
pub fn parse_type_usage(env: &Environment, ctx: &mut ParsingContext) -> Option<TypeUsage> {
    let start = ctx.cursor;

    let Some(TokenKind::Identifier(first_segment)) = ctx.kind(ctx.cursor) else {
        return None;
    };

    let mut name = first_segment.clone();

    while ctx.kind(ctx.cursor + 1) == Some(&TokenKind::DoubleColon) {
        let Some(TokenKind::Identifier(segment)) = ctx.kind(ctx.cursor + 2) else {
            break;
        };

        name.push_str("::");
        name.push_str(segment);
        ctx.cursor += 2;
    }

    let Some(ty) = env.lookup_type(&name, &ctx.using_namespaces) else {
        ctx.cursor = start;
        return None;
    };

    let mut type_usage = TypeUsage::of(&ty);

    type_usage.is_const = start > 0 && ctx.kind(start - 1) == Some(&TokenKind::Const);

    match ctx.kind(ctx.cursor + 1) {
        Some(TokenKind::Star) => {
            type_usage.pointer_level = 1;
            ctx.cursor += 1;
        },
        Some(TokenKind::Ampersand) => {
            type_usage.is_reference = true;
            ctx.cursor += 1;
        },
        _ => {},
    }

    ctx.cursor += 1;
    Some(type_usage)
}

/// Core parsing state and the program entry point.
///
/// Contains the parsing context (token vector, cursor, scope level, using
/// directives) and the top-level statement loop.
pub mod core;

/// Expression parsing.
///
/// Splits token slices at depth-zero operators (left-associative, flat
/// precedence), and recognizes literals, accesses, calls, conditionals and
/// address-of forms.
pub mod expression;

/// Statement parsing.
///
/// Dispatches on the leading token to the statement productions: blocks,
/// control flow, declarations, assignments, calls and directives.
pub mod statement;

/// Type usage parsing.
///
/// Resolves possibly qualified type names against the registries, with
/// `const`, pointer and reference adornments.
pub mod types;

/// Token-scanning helpers.
///
/// Balanced-pair searches and depth-zero scans shared by the statement and
/// expression parsers.
pub mod utils;

/// The evaluator module executes AST nodes against the symbol table.
///
/// The evaluator walks statements in source order, maintains the scope
/// stack of instances, drives native and script function bodies, and
/// propagates break/continue/return through the execution context's jump
/// flag.
///
/// # Responsibilities
/// - Executes every statement and expression form the parser produces.
/// - Manages scope-bound instance storage and the stack pool it lives in.
/// - Marshals call arguments and dispatches native callbacks.
/// - Reports runtime errors such as division by zero or null pointer
///   access, decorated with the current line.
pub mod evaluator;
/// The lexer module tokenizes preprocessed source for parsing.
///
/// The lexer reads the preprocessed text and produces a stream of tokens
/// with their source lines: punctuation, operators, keywords, identifiers,
/// and numeric and string literals.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with kind and line.
/// - Applies longest-match recognition so two-character operators and
///   keywords win over their prefixes.
/// - Reports unrecognized character sequences as compile errors.
pub mod lexer;
/// The parser module builds the abstract syntax tree from tokens.
///
/// The parser walks the token vector with a cursor, dispatching statements
/// on their leading token and splitting expression slices at depth-zero
/// operators. It validates what it can at parse time: variable and member
/// existence, member access operators, operator methods on user types.
///
/// # Responsibilities
/// - Converts tokens into statement and expression nodes.
/// - Tracks parse-time scopes and instances for redefinition and type
///   checks.
/// - Resolves type usages, consulting `using namespace` directives.
pub mod parser;
/// The preprocessor module prepares raw source text.
///
/// Comments and `#`-prefixed directive lines are elided while every line
/// break is preserved, keeping downstream line numbers faithful to the
/// original source.
pub mod preprocessor;
/// The symbols module defines the interpreter's symbol model.
///
/// Identifiers, types and type usages, members, functions and methods,
/// instances, and namespaces: everything the registries hold and the
/// parser and evaluator look up.
///
/// # Responsibilities
/// - Defines the descriptor types shared across parse and evaluation.
/// - Implements hash-keyed registries with overload lists and the
///   stack-like instance vector with back-to-front lookup.
pub mod symbols;
/// The value module defines the runtime value representation.
///
/// A value pairs a type usage with a byte buffer in one of three ownership
/// modes (external, stack-pool, heap). The module also provides the
/// address table that makes instance storage addressable and the bounded
/// memory pools.
///
/// # Responsibilities
/// - Defines `Value`, its buffer modes, and the typed accessors hosts use.
/// - Implements the write-through rules for references and assignments.
/// - Manages addresses, allocations and bump-allocated pools.
pub mod value;

use logos::Logos;

use crate::{
    ast::{AssignmentOperator, BinaryOperator},
    error::CompileError,
};

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number so every token can be tagged with its
/// source line for error reporting.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Represents a lexical token in the preprocessed source.
///
/// Recognition follows the longest match: two-character punctuation and
/// operators win over their one-character prefixes, and keywords only match
/// when not followed by further identifier characters.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum TokenKind {
    /// String literal tokens, with quotes stripped and `\"`/`\\` unescaped.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    Str(String),
    /// Numeric literal tokens in the permissive digit/`.`/`f`/`x`/`u` form;
    /// the parser resolves the final numeric type from the suffix.
    #[regex(r"[0-9][0-9\.fxu]*", |lex| lex.slice().to_string())]
    Number(String),

    /// `->`
    #[token("->")]
    Arrow,
    /// `::`
    #[token("::")]
    DoubleColon,
    /// `.`
    #[token(".")]
    Dot,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `?`
    #[token("?")]
    Question,

    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `+=`
    #[token("+=")]
    PlusEquals,
    /// `-=`
    #[token("-=")]
    MinusEquals,
    /// `*=`
    #[token("*=")]
    StarEquals,
    /// `/=`
    #[token("/=")]
    SlashEquals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `&&`
    #[token("&&")]
    AmpAmp,
    /// `||`
    #[token("||")]
    PipePipe,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equals,
    /// `>`
    #[token(">")]
    Greater,
    /// `<`
    #[token("<")]
    Less,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `~`
    #[token("~")]
    Tilde,
    /// `^`
    #[token("^")]
    Caret,

    /// `break`
    #[token("break")]
    Break,
    /// `case`
    #[token("case")]
    Case,
    /// `class`
    #[token("class")]
    Class,
    /// `const`
    #[token("const")]
    Const,
    /// `const_cast`
    #[token("const_cast")]
    ConstCast,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `default`
    #[token("default")]
    Default,
    /// `delete`
    #[token("delete")]
    Delete,
    /// `do`
    #[token("do")]
    Do,
    /// `dynamic_cast`
    #[token("dynamic_cast")]
    DynamicCast,
    /// `else`
    #[token("else")]
    Else,
    /// `enum`
    #[token("enum")]
    Enum,
    /// `false`
    #[token("false")]
    False,
    /// `for`
    #[token("for")]
    For,
    /// `if`
    #[token("if")]
    If,
    /// `namespace`
    #[token("namespace")]
    Namespace,
    /// `new`
    #[token("new")]
    New,
    /// `nullptr`
    #[token("nullptr")]
    NullPtr,
    /// `operator`
    #[token("operator")]
    Operator,
    /// `private`
    #[token("private")]
    Private,
    /// `protected`
    #[token("protected")]
    Protected,
    /// `public`
    #[token("public")]
    Public,
    /// `reinterpret_cast`
    #[token("reinterpret_cast")]
    ReinterpretCast,
    /// `return`
    #[token("return")]
    Return,
    /// `sizeof`
    #[token("sizeof")]
    Sizeof,
    /// `static`
    #[token("static")]
    Static,
    /// `static_cast`
    #[token("static_cast")]
    StaticCast,
    /// `struct`
    #[token("struct")]
    Struct,
    /// `switch`
    #[token("switch")]
    Switch,
    /// `this`
    #[token("this")]
    This,
    /// `true`
    #[token("true")]
    True,
    /// `typedef`
    #[token("typedef")]
    Typedef,
    /// `union`
    #[token("union")]
    Union,
    /// `unsigned`
    #[token("unsigned")]
    Unsigned,
    /// `using`
    #[token("using")]
    Using,
    /// `virtual`
    #[token("virtual")]
    Virtual,
    /// `void`
    #[token("void")]
    Void,
    /// `while`
    #[token("while")]
    While,

    /// Identifier tokens; variable, type or function names such as `x` or
    /// `Vec3`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// Newlines advance the line counter and are discarded.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Other whitespace is discarded.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

impl TokenKind {
    /// Returns `true` for operator tokens.
    ///
    /// The expression parser scans for these at parenthesis depth zero to
    /// find the binary-operator split point.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(self,
                 Self::PlusPlus
                 | Self::MinusMinus
                 | Self::PlusEquals
                 | Self::MinusEquals
                 | Self::StarEquals
                 | Self::SlashEquals
                 | Self::EqualEqual
                 | Self::BangEqual
                 | Self::GreaterEqual
                 | Self::LessEqual
                 | Self::AmpAmp
                 | Self::PipePipe
                 | Self::Plus
                 | Self::Minus
                 | Self::Star
                 | Self::Slash
                 | Self::Bang
                 | Self::Equals
                 | Self::Greater
                 | Self::Less
                 | Self::Ampersand
                 | Self::Pipe
                 | Self::Tilde
                 | Self::Caret)
    }

    /// Returns `true` for punctuation tokens.
    #[must_use]
    pub const fn is_punctuation(&self) -> bool {
        matches!(self,
                 Self::Arrow
                 | Self::DoubleColon
                 | Self::Dot
                 | Self::Comma
                 | Self::Colon
                 | Self::Semicolon
                 | Self::LParen
                 | Self::RParen
                 | Self::LBrace
                 | Self::RBrace
                 | Self::LBracket
                 | Self::RBracket
                 | Self::Question)
    }

    /// Maps an operator token to the binary operator it denotes.
    #[must_use]
    pub const fn binary_operator(&self) -> Option<BinaryOperator> {
        match self {
            Self::Plus => Some(BinaryOperator::Add),
            Self::Minus => Some(BinaryOperator::Sub),
            Self::Star => Some(BinaryOperator::Mul),
            Self::Slash => Some(BinaryOperator::Div),
            Self::EqualEqual => Some(BinaryOperator::Equal),
            Self::BangEqual => Some(BinaryOperator::NotEqual),
            Self::Less => Some(BinaryOperator::Less),
            Self::Greater => Some(BinaryOperator::Greater),
            Self::LessEqual => Some(BinaryOperator::LessEqual),
            Self::GreaterEqual => Some(BinaryOperator::GreaterEqual),
            Self::AmpAmp => Some(BinaryOperator::And),
            Self::PipePipe => Some(BinaryOperator::Or),
            Self::Ampersand => Some(BinaryOperator::BitAnd),
            Self::Pipe => Some(BinaryOperator::BitOr),
            Self::Caret => Some(BinaryOperator::BitXor),
            _ => None,
        }
    }

    /// Maps an operator token to the assignment operator it denotes.
    #[must_use]
    pub const fn assignment_operator(&self) -> Option<AssignmentOperator> {
        match self {
            Self::Equals => Some(AssignmentOperator::Assign),
            Self::PlusEquals => Some(AssignmentOperator::AddAssign),
            Self::MinusEquals => Some(AssignmentOperator::SubAssign),
            Self::StarEquals => Some(AssignmentOperator::MulAssign),
            Self::SlashEquals => Some(AssignmentOperator::DivAssign),
            _ => None,
        }
    }

    /// A short source-like rendering used in error messages.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Str(text) => format!("\"{text}\""),
            Self::Number(text) | Self::Identifier(text) => text.clone(),
            Self::Arrow => "->".to_string(),
            Self::DoubleColon => "::".to_string(),
            Self::Dot => ".".to_string(),
            Self::Comma => ",".to_string(),
            Self::Colon => ":".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::LBrace => "{".to_string(),
            Self::RBrace => "}".to_string(),
            Self::LBracket => "[".to_string(),
            Self::RBracket => "]".to_string(),
            Self::Question => "?".to_string(),
            Self::PlusPlus => "++".to_string(),
            Self::MinusMinus => "--".to_string(),
            Self::PlusEquals => "+=".to_string(),
            Self::MinusEquals => "-=".to_string(),
            Self::StarEquals => "*=".to_string(),
            Self::SlashEquals => "/=".to_string(),
            Self::EqualEqual => "==".to_string(),
            Self::BangEqual => "!=".to_string(),
            Self::GreaterEqual => ">=".to_string(),
            Self::LessEqual => "<=".to_string(),
            Self::AmpAmp => "&&".to_string(),
            Self::PipePipe => "||".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::Slash => "/".to_string(),
            Self::Bang => "!".to_string(),
            Self::Equals => "=".to_string(),
            Self::Greater => ">".to_string(),
            Self::Less => "<".to_string(),
            Self::Ampersand => "&".to_string(),
            Self::Pipe => "|".to_string(),
            Self::Tilde => "~".to_string(),
            Self::Caret => "^".to_string(),
            Self::Break => "break".to_string(),
            Self::Case => "case".to_string(),
            Self::Class => "class".to_string(),
            Self::Const => "const".to_string(),
            Self::ConstCast => "const_cast".to_string(),
            Self::Continue => "continue".to_string(),
            Self::Default => "default".to_string(),
            Self::Delete => "delete".to_string(),
            Self::Do => "do".to_string(),
            Self::DynamicCast => "dynamic_cast".to_string(),
            Self::Else => "else".to_string(),
            Self::Enum => "enum".to_string(),
            Self::False => "false".to_string(),
            Self::For => "for".to_string(),
            Self::If => "if".to_string(),
            Self::Namespace => "namespace".to_string(),
            Self::New => "new".to_string(),
            Self::NullPtr => "nullptr".to_string(),
            Self::Operator => "operator".to_string(),
            Self::Private => "private".to_string(),
            Self::Protected => "protected".to_string(),
            Self::Public => "public".to_string(),
            Self::ReinterpretCast => "reinterpret_cast".to_string(),
            Self::Return => "return".to_string(),
            Self::Sizeof => "sizeof".to_string(),
            Self::Static => "static".to_string(),
            Self::StaticCast => "static_cast".to_string(),
            Self::Struct => "struct".to_string(),
            Self::Switch => "switch".to_string(),
            Self::This => "this".to_string(),
            Self::True => "true".to_string(),
            Self::Typedef => "typedef".to_string(),
            Self::Union => "union".to_string(),
            Self::Unsigned => "unsigned".to_string(),
            Self::Using => "using".to_string(),
            Self::Virtual => "virtual".to_string(),
            Self::Void => "void".to_string(),
            Self::While => "while".to_string(),
            Self::NewLine => "\\n".to_string(),
            Self::Ignored => " ".to_string(),
        }
    }
}

/// A token paired with the source line it appeared on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was recognized.
    pub kind: TokenKind,
    /// The source line, starting at 1.
    pub line: usize,
}

/// Tokenizes preprocessed source text.
///
/// # Parameters
/// - `source`: The preprocessed source; comments and directives must already
///   be elided.
///
/// # Returns
/// The ordered token sequence.
///
/// # Errors
/// Returns [`CompileError::UnexpectedSymbol`] when a character sequence
/// matches no token rule.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let mut lexer = TokenKind::lexer_with_extras(source, LexerExtras { line: 1 });
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Token { kind,
                                            line: lexer.extras.line }),
            Err(()) => {
                return Err(CompileError::UnexpectedSymbol { symbol: lexer.slice().to_string(),
                                                            line:   lexer.extras.line, });
            },
        }
    }

    Ok(tokens)
}

/// Strips the quotes off a string literal and resolves escaped quotes and
/// backslashes.
fn parse_string(lex: &mut logos::Lexer<TokenKind>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}

//! Token types produced by the lexer.
//!
//! The checker never builds a syntax tree; every analysis downstream of the
//! lexer works directly on this token stream. Kinds are a closed enum with
//! per-variant payloads so match arms stay exhaustive.

/// Reserved words recognized by the lexer.
///
/// Anything in this set is classified [`TokenKind::Keyword`] instead of
/// [`TokenKind::Ident`]. The set is deliberately small: only the words the
/// definition scan and the instantiation-context heuristic care about, plus
/// the type/qualifier words that may prefix a parameter declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Module,
    Endmodule,
    Begin,
    End,
    Case,
    Endcase,
    Generate,
    Endgenerate,
    Parameter,
    Localparam,
    Type,
    Real,
    Integer,
    Logic,
    Wire,
    Reg,
    Time,
    Realtime,
    Assign,
    Posedge,
    Negedge,
}

impl Keyword {
    /// Classify an identifier-shaped word, if it is reserved.
    pub fn lookup(word: &str) -> Option<Keyword> {
        Some(match word {
            "module" => Keyword::Module,
            "endmodule" => Keyword::Endmodule,
            "begin" => Keyword::Begin,
            "end" => Keyword::End,
            "case" => Keyword::Case,
            "endcase" => Keyword::Endcase,
            "generate" => Keyword::Generate,
            "endgenerate" => Keyword::Endgenerate,
            "parameter" => Keyword::Parameter,
            "localparam" => Keyword::Localparam,
            "type" => Keyword::Type,
            "real" => Keyword::Real,
            "integer" => Keyword::Integer,
            "logic" => Keyword::Logic,
            "wire" => Keyword::Wire,
            "reg" => Keyword::Reg,
            "time" => Keyword::Time,
            "realtime" => Keyword::Realtime,
            "assign" => Keyword::Assign,
            "posedge" => Keyword::Posedge,
            "negedge" => Keyword::Negedge,
            _ => return None,
        })
    }
}

/// Punctuation and operators. Each distinct punctuation is its own variant;
/// the two-character operators are matched before their one-character
/// prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    Semi,
    Comma,
    Hash,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Assign,
    Question,
    Colon,
    Bang,
    Lt,
    Gt,
    Tilde,
    Pipe,
    Amp,
    Caret,
    Plus,
    Minus,
    Star,
    Percent,
    At,
    Slash,
    Le,
    Ge,
    AndAnd,
    OrOr,
}

impl Punct {
    /// Two-character operator lookup, tried before single characters.
    pub fn from_pair(a: u8, b: u8) -> Option<Punct> {
        Some(match (a, b) {
            (b'<', b'=') => Punct::Le,
            (b'>', b'=') => Punct::Ge,
            (b'&', b'&') => Punct::AndAnd,
            (b'|', b'|') => Punct::OrOr,
            _ => return None,
        })
    }

    pub fn from_byte(b: u8) -> Option<Punct> {
        Some(match b {
            b';' => Punct::Semi,
            b',' => Punct::Comma,
            b'#' => Punct::Hash,
            b'(' => Punct::LParen,
            b')' => Punct::RParen,
            b'{' => Punct::LBrace,
            b'}' => Punct::RBrace,
            b'[' => Punct::LBracket,
            b']' => Punct::RBracket,
            b'=' => Punct::Assign,
            b'?' => Punct::Question,
            b':' => Punct::Colon,
            b'!' => Punct::Bang,
            b'<' => Punct::Lt,
            b'>' => Punct::Gt,
            b'~' => Punct::Tilde,
            b'|' => Punct::Pipe,
            b'&' => Punct::Amp,
            b'^' => Punct::Caret,
            b'+' => Punct::Plus,
            b'-' => Punct::Minus,
            b'*' => Punct::Star,
            b'%' => Punct::Percent,
            b'@' => Punct::At,
            b'/' => Punct::Slash,
            _ => return None,
        })
    }

    /// Opening delimiters increase group nesting.
    pub fn opens_group(self) -> bool {
        matches!(self, Punct::LParen | Punct::LBrace | Punct::LBracket)
    }

    /// Closing delimiters decrease group nesting.
    pub fn closes_group(self) -> bool {
        matches!(self, Punct::RParen | Punct::RBrace | Punct::RBracket)
    }
}

/// One lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident(String),
    /// Named-parameter-binding marker: `.name`, stored without the dot.
    Binding(String),
    Number(String),
    /// Delay introducer `#<digits>`, stored without the hash.
    Delay(String),
    Str(String),
    /// Preprocessor macro reference: `` `name ``, stored without the backtick.
    Macro(String),
    Punct(Punct),
}

/// A token with the physical line it started on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32) -> Self {
        Self { kind, line }
    }

    /// Identifier text, if this token is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(s) => Some(s),
            _ => None,
        }
    }
}

//! Hand-rolled lexer for the subset of Verilog the checker cares about.
//!
//! The lexer is a forward-only cursor over one file's text with a single
//! token of pushback. Match rules are tried in a fixed order at the current
//! position; the order matters (a `#` followed by a digit is a delay, the
//! bare `#` only matches as punctuation afterwards). The running line
//! counter lives in the cursor itself and is advanced for every physical
//! line consumed, including lines inside block comments and strings.
//!
//! Unrecognized input is not fatal: the lexer reports a warning, throws away
//! the rest of the physical line, and keeps scanning.

use crate::report::Report;
use crate::token::{Keyword, Punct, Token, TokenKind};
use std::path::Path;

/// Character class for the body of an identifier. The leading character is
/// the same class minus digits. Dots are part of identifiers (hierarchical
/// names) and dollars appear in system task names.
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.'
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b == b'.'
}

/// Body of a number literal: digits, the base quote, the radix letters, and
/// separators. Hex digits outside `b o d h x z s` end the token; the crude
/// charset is good enough for telling numbers apart from identifiers, which
/// is all the analysis needs.
fn is_number_byte(b: u8) -> bool {
    b.is_ascii_digit()
        || b == b'\''
        || b == b'_'
        || b == b'.'
        || matches!(b.to_ascii_lowercase(), b'b' | b'o' | b'd' | b'h' | b'x' | b'z' | b's')
}

/// Token cursor over a single file.
pub struct Lexer<'a> {
    path: &'a Path,
    src: &'a str,
    pos: usize,
    line: u32,
    pushback: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(path: &'a Path, src: &'a str) -> Self {
        Self {
            path,
            src,
            pos: 0,
            line: 1,
            pushback: None,
        }
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    /// Un-read one token. At most one token deep; a second pushback before
    /// the first is consumed again would lose a token, so callers never do
    /// that.
    pub fn push_back(&mut self, token: Token) {
        debug_assert!(self.pushback.is_none());
        self.pushback = Some(token);
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self, report: &mut Report) -> Option<Token> {
        if let Some(token) = self.pushback.take() {
            return Some(token);
        }

        loop {
            self.skip_trivia();
            let bytes = self.src.as_bytes();
            let b = *bytes.get(self.pos)?;
            let start = self.pos;
            let line = self.line;

            // Identifier, keyword, or `.name` binding marker.
            if is_ident_start(b) {
                self.pos += 1;
                while self.pos < bytes.len() && is_ident_byte(bytes[self.pos]) {
                    self.pos += 1;
                }
                let word = &self.src[start..self.pos];
                let stripped = word.strip_prefix('.').unwrap_or(word);
                let kind = if let Some(kw) = Keyword::lookup(stripped) {
                    TokenKind::Keyword(kw)
                } else if word.starts_with('.') {
                    TokenKind::Binding(stripped.to_string())
                } else {
                    TokenKind::Ident(word.to_string())
                };
                return Some(Token::new(kind, line));
            }

            // Escaped identifier: backslash up to the next whitespace.
            if b == b'\\' {
                self.pos += 1;
                while self.pos < bytes.len() && !bytes[self.pos].is_ascii_whitespace() {
                    self.pos += 1;
                }
                let text = self.src[start + 1..self.pos].to_string();
                return Some(Token::new(TokenKind::Ident(text), line));
            }

            // Number: digit or base-quote lead.
            if b.is_ascii_digit() || b == b'\'' {
                self.pos += 1;
                while self.pos < bytes.len() && is_number_byte(bytes[self.pos]) {
                    self.pos += 1;
                }
                let text = self.src[start..self.pos].to_string();
                return Some(Token::new(TokenKind::Number(text), line));
            }

            // Delay: `#` immediately followed by digits or a dot. Checked
            // before generic punctuation so the bare `#` stays distinct.
            if b == b'#'
                && bytes
                    .get(self.pos + 1)
                    .is_some_and(|&n| n.is_ascii_digit() || n == b'.')
            {
                self.pos += 1;
                let digits_start = self.pos;
                while self.pos < bytes.len()
                    && (bytes[self.pos].is_ascii_digit() || bytes[self.pos] == b'.')
                {
                    self.pos += 1;
                }
                let text = self.src[digits_start..self.pos].to_string();
                return Some(Token::new(TokenKind::Delay(text), line));
            }

            // Punctuation, two-character operators first.
            if let Some(&next) = bytes.get(self.pos + 1) {
                if let Some(p) = Punct::from_pair(b, next) {
                    self.pos += 2;
                    return Some(Token::new(TokenKind::Punct(p), line));
                }
            }
            if let Some(p) = Punct::from_byte(b) {
                self.pos += 1;
                return Some(Token::new(TokenKind::Punct(p), line));
            }

            // String literal. `\"` is unescaped in the stored text; embedded
            // newlines are legal and counted.
            if b == b'"' {
                return Some(Token::new(self.scan_string(), line));
            }

            // Macro reference: backtick plus an identifier-like run.
            if b == b'`' {
                self.pos += 1;
                let name_start = self.pos;
                while self.pos < bytes.len() && is_ident_byte(bytes[self.pos]) {
                    self.pos += 1;
                }
                let text = self.src[name_start..self.pos].to_string();
                return Some(Token::new(TokenKind::Macro(text), line));
            }

            // Nothing matched: warn, drop the rest of the physical line,
            // and resume on the next one.
            let eol = self.src[self.pos..]
                .find('\n')
                .map(|i| self.pos + i)
                .unwrap_or(self.src.len());
            report.warn(
                self.path,
                line,
                format!("failed to recognize token '{}'", &self.src[self.pos..eol]),
            );
            self.pos = eol;
            if self.pos < bytes.len() {
                self.pos += 1;
                self.line += 1;
            }
        }
    }

    fn scan_string(&mut self) -> TokenKind {
        let bytes = self.src.as_bytes();
        self.pos += 1;
        let mut text = String::new();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'"' => {
                    self.pos += 1;
                    break;
                }
                b'\\' if bytes.get(self.pos + 1) == Some(&b'"') => {
                    text.push('"');
                    self.pos += 2;
                }
                b'\n' => {
                    text.push('\n');
                    self.line += 1;
                    self.pos += 1;
                }
                _ => {
                    let rest = &self.src[self.pos..];
                    let ch = rest.chars().next().unwrap_or('\u{fffd}');
                    text.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
        TokenKind::Str(text)
    }

    /// Skip whitespace, comments, and backslash line continuations.
    fn skip_trivia(&mut self) {
        let bytes = self.src.as_bytes();
        loop {
            match bytes.get(self.pos) {
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(b) if b.is_ascii_whitespace() => {
                    self.pos += 1;
                }
                // Line continuation: a backslash at end of line. A backslash
                // followed by non-whitespace is an escaped identifier and is
                // left for the token cascade.
                Some(b'\\')
                    if bytes
                        .get(self.pos + 1)
                        .is_none_or(|b| b.is_ascii_whitespace()) =>
                {
                    self.pos += 1;
                }
                Some(b'/') if bytes.get(self.pos + 1) == Some(&b'/') => {
                    while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                Some(b'/') if bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.pos += 2;
                    loop {
                        match bytes.get(self.pos) {
                            None => break,
                            Some(b'*') if bytes.get(self.pos + 1) == Some(&b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(b'\n') => {
                                self.line += 1;
                                self.pos += 1;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                }
                _ => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn lex(src: &str) -> (Vec<Token>, Report) {
        let path = PathBuf::from("test.v");
        let mut report = Report::new();
        let mut lexer = Lexer::new(&path, src);
        let mut tokens = Vec::new();
        while let Some(tok) = lexer.next_token(&mut report) {
            tokens.push(tok);
        }
        (tokens, report)
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_stream() {
        assert_eq!(
            kinds("module foo;"),
            vec![
                TokenKind::Keyword(Keyword::Module),
                TokenKind::Ident("foo".to_string()),
                TokenKind::Punct(Punct::Semi),
            ]
        );
    }

    #[test]
    fn test_binding_marker_strips_dot() {
        assert_eq!(
            kinds(".WIDTH(8)"),
            vec![
                TokenKind::Binding("WIDTH".to_string()),
                TokenKind::Punct(Punct::LParen),
                TokenKind::Number("8".to_string()),
                TokenKind::Punct(Punct::RParen),
            ]
        );
    }

    #[test]
    fn test_dotted_reserved_word_is_keyword() {
        // Classification strips the leading dot before the reserved-word
        // test, so `.wire` comes out as a keyword.
        assert_eq!(kinds(".wire"), vec![TokenKind::Keyword(Keyword::Wire)]);
    }

    #[test]
    fn test_escaped_identifier() {
        assert_eq!(
            kinds("\\my+odd+name x"),
            vec![
                TokenKind::Ident("my+odd+name".to_string()),
                TokenKind::Ident("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_delay_vs_hash() {
        assert_eq!(
            kinds("#10 #("),
            vec![
                TokenKind::Delay("10".to_string()),
                TokenKind::Punct(Punct::Hash),
                TokenKind::Punct(Punct::LParen),
            ]
        );
    }

    #[test]
    fn test_based_number() {
        assert_eq!(
            kinds("4'b1010"),
            vec![TokenKind::Number("4'b1010".to_string())]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("a <= b && c"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Punct(Punct::Le),
                TokenKind::Ident("b".to_string()),
                TokenKind::Punct(Punct::AndAnd),
                TokenKind::Ident("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_line_count_through_block_comment() {
        let (tokens, _) = lex("/* a\n b\n c */ x");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn test_line_comment_and_continuation() {
        let (tokens, _) = lex("// nothing here\na \\\nb");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            kinds(r#""he said \"hi\"""#),
            vec![TokenKind::Str("he said \"hi\"".to_string())]
        );
    }

    #[test]
    fn test_macro_reference() {
        assert_eq!(
            kinds("`WIDTH"),
            vec![TokenKind::Macro("WIDTH".to_string())]
        );
    }

    #[test]
    fn test_unrecognized_input_recovers_on_next_line() {
        let (tokens, report) = lex("\u{7f}garbage here\nwire");
        assert_eq!(tokens, vec![Token::new(TokenKind::Keyword(Keyword::Wire), 2)]);
        assert_eq!(report.diagnostics().len(), 1);
        assert!(report.diagnostics()[0]
            .message
            .starts_with("failed to recognize token '"));
    }

    #[test]
    fn test_pushback() {
        let path = PathBuf::from("test.v");
        let mut report = Report::new();
        let mut lexer = Lexer::new(&path, "a b");
        let first = lexer.next_token(&mut report).unwrap();
        lexer.push_back(first.clone());
        assert_eq!(lexer.next_token(&mut report), Some(first));
        assert_eq!(
            lexer.next_token(&mut report).unwrap().kind,
            TokenKind::Ident("b".to_string())
        );
    }
}

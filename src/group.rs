//! Comma-separated token groups between matching delimiters.
//!
//! Both the definition scan and the instantiation check read parameter lists
//! the same way: the caller consumes the opening `#(` and hands the cursor
//! over with the nesting depth already at 1.

use crate::lexer::Lexer;
use crate::report::Report;
use crate::token::{Punct, Token, TokenKind};

/// Read groups up to the delimiter matching the already-consumed opener.
///
/// Commas split groups only at depth 1; nested delimiters are tracked but
/// the delimiter tokens themselves are not kept. The group that is open when
/// the outer closer arrives is the last group, so an empty list `()` yields
/// one empty group. Hitting end of input returns whatever was collected.
pub fn read_groups(lexer: &mut Lexer<'_>, report: &mut Report) -> Vec<Vec<Token>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut depth = 1usize;
    while let Some(token) = lexer.next_token(report) {
        match token.kind {
            TokenKind::Punct(p) if p.opens_group() => depth += 1,
            TokenKind::Punct(p) if p.closes_group() => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::Punct(Punct::Comma) if depth == 1 => {
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(token),
        }
    }
    groups.push(current);
    groups
}

/// Lookahead for a `#(` parameter-list introducer.
///
/// Consumes one token; if it is not `#`, reports absent. Otherwise consumes a
/// second token and requires it to be `(`. Tokens examined by a failed
/// lookahead are NOT pushed back; the stream has already moved past them and
/// callers rely on that. Do not make this backtrack.
pub fn maybe_read_param_lparen(lexer: &mut Lexer<'_>, report: &mut Report) -> bool {
    match lexer.next_token(report) {
        Some(Token {
            kind: TokenKind::Punct(Punct::Hash),
            ..
        }) => {}
        _ => return false,
    }
    matches!(
        lexer.next_token(report),
        Some(Token {
            kind: TokenKind::Punct(Punct::LParen),
            ..
        })
    )
}

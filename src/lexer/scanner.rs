// Author: Dustin Pilgrim
// License: MIT

use super::*;

/// Advance the character iterator and update offset/line/column tracking
pub(super) fn bump(lexer: &mut Lexer) -> Option<char> {
    let curr = lexer.peek;
    if let Some(c) = curr {
        lexer.pos += c.len_utf8();
        if c == '\n' {
            lexer.line += 1;
            lexer.column = 0;
        } else {
            lexer.column += 1;
        }
    }
    lexer.peek = lexer.input.next();
    curr
}

/// The character after `peek`, without consuming anything
pub(super) fn peek_second(lexer: &Lexer) -> Option<char> {
    lexer.input.clone().next()
}

/// Up to `n` characters starting at `peek`
pub(super) fn lookahead(lexer: &Lexer, n: usize) -> String {
    lexer
        .peek
        .into_iter()
        .chain(lexer.input.clone().take(n.saturating_sub(1)))
        .collect()
}

/// Skip whitespace and comments, noting whether a line break was crossed
pub(super) fn skip_trivia(lexer: &mut Lexer) {
    if lexer.pos == 0 && lexer.peek == Some('#') && peek_second(lexer) == Some('!') {
        skip_line(lexer);
    }

    while let Some(c) = lexer.peek {
        match c {
            '\n' => {
                lexer.saw_newline = true;
                bump(lexer);
            }
            c if c.is_whitespace() || c == '\u{feff}' => {
                bump(lexer);
            }
            '/' => match peek_second(lexer) {
                Some('/') => skip_line(lexer),
                Some('*') => skip_block_comment(lexer),
                _ => break,
            },
            _ => break,
        }
    }
}

fn skip_line(lexer: &mut Lexer) {
    while let Some(ch) = lexer.peek {
        if ch == '\n' {
            break;
        }
        bump(lexer);
    }
}

fn skip_block_comment(lexer: &mut Lexer) {
    bump(lexer); // '/'
    bump(lexer); // '*'
    while let Some(ch) = bump(lexer) {
        if ch == '\n' {
            lexer.saw_newline = true;
        }
        if ch == '*' && lexer.peek == Some('/') {
            bump(lexer);
            return;
        }
    }
}

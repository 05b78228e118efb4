// Author: Dustin Pilgrim
// License: MIT

use super::*;
use super::scanner::bump;
use super::tokenizer::read_escape;

/// Opening backtick: either a whole template or the head of one.
pub(super) fn tokenize_template_start(lexer: &mut Lexer) -> Result<Token, ThemeError> {
    bump(lexer); // consume '`'
    scan_template_text(lexer, true)
}

/// Called on the `}` that closes a `${` substitution.
pub(super) fn continue_template(lexer: &mut Lexer) -> Result<Token, ThemeError> {
    bump(lexer); // consume '}'
    scan_template_text(lexer, false)
}

fn scan_template_text(lexer: &mut Lexer, is_start: bool) -> Result<Token, ThemeError> {
    let (line, column) = (lexer.line, lexer.column);
    let mut cooked = String::new();

    loop {
        match lexer.peek {
            Some('`') => {
                bump(lexer);
                return Ok(if is_start {
                    Token::Template(cooked)
                } else {
                    Token::TemplateTail(cooked)
                });
            }
            Some('$') if super::scanner::peek_second(lexer) == Some('{') => {
                bump(lexer); // '$'
                bump(lexer); // '{'
                lexer.brace_stack.push(true);
                return Ok(if is_start {
                    Token::TemplateHead(cooked)
                } else {
                    Token::TemplateMiddle(cooked)
                });
            }
            Some('\\') => {
                bump(lexer);
                if read_escape(lexer, &mut cooked).is_none() {
                    break;
                }
            }
            Some(ch) => {
                cooked.push(ch);
                bump(lexer);
            }
            None => break,
        }
    }

    Err(ThemeError::UnclosedTemplate {
        line,
        column,
        hint: Some("Template literal not closed with '`'".into()),
        code: Some(105),
    })
}

/// `/pattern/flags`. Only called where a regex is grammatically allowed.
pub(super) fn tokenize_regex(lexer: &mut Lexer) -> Result<Token, ThemeError> {
    let (line, column) = (lexer.line, lexer.column);
    bump(lexer); // consume opening '/'

    let mut pattern = String::new();
    let mut in_class = false;

    loop {
        match bump(lexer) {
            Some('\\') => {
                pattern.push('\\');
                if let Some(next) = bump(lexer) {
                    pattern.push(next);
                }
            }
            Some('[') => {
                in_class = true;
                pattern.push('[');
            }
            Some(']') => {
                in_class = false;
                pattern.push(']');
            }
            Some('/') if !in_class => break,
            Some('\n') | None => {
                return Err(ThemeError::Syntax {
                    message: "Unterminated regular expression".into(),
                    line,
                    column,
                    hint: Some("Close the regex with '/'".into()),
                    code: Some(106),
                });
            }
            Some(ch) => pattern.push(ch),
        }
    }

    // flags
    while let Some(ch) = lexer.peek {
        if ch.is_ascii_alphabetic() {
            bump(lexer);
        } else {
            break;
        }
    }

    Ok(Token::Regex(pattern))
}

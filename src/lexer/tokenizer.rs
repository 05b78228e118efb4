// Author: Dustin Pilgrim
// License: MIT

use super::*;
use super::scanner::{bump, lookahead, peek_second};
use super::template::{continue_template, tokenize_regex, tokenize_template_start};

/// Multi-character punctuators, longest first.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>",
];

pub(super) fn next_token(lexer: &mut Lexer) -> Result<Token, ThemeError> {
    let token = match lexer.peek {
        None => Ok(Token::Eof),
        Some('{') => {
            lexer.brace_stack.push(false);
            tokenize_symbol(lexer, Token::LBrace)
        }
        Some('}') => {
            if lexer.brace_stack.pop() == Some(true) {
                // closes a `${` substitution: the template text continues
                continue_template(lexer)
            } else {
                tokenize_symbol(lexer, Token::RBrace)
            }
        }
        Some('(') => tokenize_symbol(lexer, Token::LParen),
        Some(')') => tokenize_symbol(lexer, Token::RParen),
        Some('[') => tokenize_symbol(lexer, Token::LBracket),
        Some(']') => tokenize_symbol(lexer, Token::RBracket),
        Some(';') => tokenize_symbol(lexer, Token::Semicolon),
        Some(',') => tokenize_symbol(lexer, Token::Comma),
        Some(':') => tokenize_symbol(lexer, Token::Colon),
        Some('@') => tokenize_symbol(lexer, Token::At),
        Some('`') => tokenize_template_start(lexer),
        Some('"') | Some('\'') => tokenize_string(lexer),
        Some('.') if peek_second(lexer).is_some_and(|c| c.is_ascii_digit()) => tokenize_number(lexer),
        Some('/') if lexer.regex_allowed => tokenize_regex(lexer),
        Some(c) if c.is_ascii_digit() => tokenize_number(lexer),
        Some(c) if is_ident_start(c) => tokenize_identifier_or_keyword(lexer),
        Some('#') if peek_second(lexer).is_some_and(is_ident_start) => {
            tokenize_identifier_or_keyword(lexer)
        }
        Some(_) => tokenize_punctuator(lexer),
    };

    token
}

pub(super) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\u{200c}' || c == '\u{200d}'
}

fn tokenize_symbol(lexer: &mut Lexer, token: Token) -> Result<Token, ThemeError> {
    bump(lexer);
    Ok(token)
}

fn tokenize_punctuator(lexer: &mut Lexer) -> Result<Token, ThemeError> {
    let ahead = lookahead(lexer, 4);

    let matched = PUNCTUATORS
        .iter()
        .find(|p| ahead.starts_with(**p))
        .map(|p| p.to_string())
        .or_else(|| {
            let first = ahead.chars().next()?;
            ".=<>!+-*/%&|^~?".contains(first).then(|| first.to_string())
        });

    let Some(op) = matched else {
        let ch = lexer.peek.unwrap_or('\0');
        bump(lexer);
        return Err(ThemeError::UnexpectedCharacter {
            character: ch,
            line: lexer.line,
            column: lexer.column,
            hint: Some("Unexpected character in input".into()),
            code: Some(104),
        });
    };

    // `a?.5:b` is a conditional, not optional chaining
    if op == "?." && ahead.chars().nth(2).is_some_and(|c| c.is_ascii_digit()) {
        bump(lexer);
        return Ok(Token::Question);
    }

    for _ in 0..op.chars().count() {
        bump(lexer);
    }

    Ok(match op.as_str() {
        "." => Token::Dot,
        "..." => Token::Ellipsis,
        "=>" => Token::Arrow,
        "?." => Token::QuestionDot,
        "=" => Token::Equals,
        "?" => Token::Question,
        _ => Token::Operator(op),
    })
}

fn tokenize_string(lexer: &mut Lexer) -> Result<Token, ThemeError> {
    let (line, column) = (lexer.line, lexer.column);
    let quote = bump(lexer).unwrap_or('"');
    let mut content = String::new();

    loop {
        match lexer.peek {
            Some(ch) if ch == quote => {
                bump(lexer); // consume the closing quote
                return Ok(Token::String(content));
            }
            Some('\\') => {
                bump(lexer); // consume '\'
                read_escape(lexer, &mut content).ok_or(ThemeError::UnclosedString {
                    quote,
                    line,
                    column,
                    hint: Some("Trailing backslash in string".into()),
                    code: Some(103),
                })?;
            }
            Some('\n') | None => {
                return Err(ThemeError::UnclosedString {
                    quote,
                    line,
                    column,
                    hint: Some("String literal not closed before end of line".into()),
                    code: Some(103),
                });
            }
            Some(ch) => {
                content.push(ch);
                bump(lexer);
            }
        }
    }
}

/// Reads one escape sequence (after the backslash) into `out`. `None` at EOF.
pub(super) fn read_escape(lexer: &mut Lexer, out: &mut String) -> Option<()> {
    let ch = bump(lexer)?;
    let escaped = match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        '0' if !lexer.peek.is_some_and(|c| c.is_ascii_digit()) => '\0',
        'x' => {
            let digits: String = (0..2).filter_map(|_| bump(lexer)).collect();
            char_from_hex(&digits).unwrap_or('\u{fffd}')
        }
        'u' => {
            let digits = if lexer.peek == Some('{') {
                bump(lexer);
                let mut d = String::new();
                while let Some(c) = bump(lexer) {
                    if c == '}' {
                        break;
                    }
                    d.push(c);
                }
                d
            } else {
                (0..4).filter_map(|_| bump(lexer)).collect()
            };
            char_from_hex(&digits).unwrap_or('\u{fffd}')
        }
        '\r' => {
            // line continuation
            if lexer.peek == Some('\n') {
                bump(lexer);
            }
            return Some(());
        }
        '\n' => return Some(()),
        other => other,
    };
    out.push(escaped);
    Some(())
}

fn char_from_hex(digits: &str) -> Option<char> {
    u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
}

fn tokenize_number(lexer: &mut Lexer) -> Result<Token, ThemeError> {
    let (line, column) = (lexer.line, lexer.column);
    let mut num = String::new();

    let radix = match (lexer.peek, peek_second(lexer)) {
        (Some('0'), Some('x' | 'X')) => 16,
        (Some('0'), Some('o' | 'O')) => 8,
        (Some('0'), Some('b' | 'B')) => 2,
        _ => 10,
    };

    if radix != 10 {
        bump(lexer);
        bump(lexer);
        while let Some(ch) = lexer.peek {
            if ch.is_ascii_hexdigit() || ch == '_' {
                if ch != '_' {
                    num.push(ch);
                }
                bump(lexer);
            } else {
                break;
            }
        }
        if lexer.peek == Some('n') {
            bump(lexer); // BigInt suffix
        }
        return u64::from_str_radix(&num, radix)
            .map(|n| Token::Number(n as f64))
            .map_err(|_| invalid_number(&num, line, column));
    }

    let mut seen_exponent = false;
    while let Some(ch) = lexer.peek {
        match ch {
            '0'..='9' | '.' => num.push(ch),
            '_' => {}
            'e' | 'E' if !seen_exponent => {
                seen_exponent = true;
                num.push(ch);
                bump(lexer);
                if let Some(sign @ ('+' | '-')) = lexer.peek {
                    num.push(sign);
                    bump(lexer);
                }
                continue;
            }
            _ => break,
        }
        bump(lexer);
    }
    if lexer.peek == Some('n') {
        bump(lexer); // BigInt suffix
    }

    num.parse::<f64>()
        .map(Token::Number)
        .map_err(|_| invalid_number(&num, line, column))
}

fn invalid_number(num: &str, line: usize, column: usize) -> ThemeError {
    ThemeError::Syntax {
        message: format!("Invalid number '{}'", num),
        line,
        column,
        hint: None,
        code: Some(102),
    }
}

fn tokenize_identifier_or_keyword(lexer: &mut Lexer) -> Result<Token, ThemeError> {
    let mut ident = String::new();
    if lexer.peek == Some('#') {
        ident.push('#');
        bump(lexer);
    }

    while let Some(ch) = lexer.peek {
        if is_ident_continue(ch) {
            ident.push(ch);
            bump(lexer);
        } else {
            break;
        }
    }

    let token = match ident.as_str() {
        "true" => Token::Bool(true),
        "false" => Token::Bool(false),
        "null" => Token::Null,
        _ => Token::Ident(ident),
    };

    Ok(token)
}

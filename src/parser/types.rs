// Author: Dustin Pilgrim
// License: MIT

//! TypeScript type syntax. Types never reach the tree: they are skipped.

use super::*;

/// Skips a type expression: unions, intersections, function types,
/// conditional types, object and tuple types, generics, array suffixes.
pub(super) fn skip_type(parser: &mut Parser) -> Result<(), ThemeError> {
    parser.enter()?;
    let result = skip_union(parser);
    parser.leave();
    result?;

    // conditional type: A extends B ? C : D
    if parser.peek().is_ident("extends") && !parser.newline_before() {
        parser.bump();
        skip_type(parser)?;
        parser.expect(Token::Question)?;
        skip_type(parser)?;
        parser.expect(Token::Colon)?;
        skip_type(parser)?;
    }
    Ok(())
}

fn skip_union(parser: &mut Parser) -> Result<(), ThemeError> {
    // leading `|` or `&` is allowed
    if parser.peek().is_operator("|") || parser.peek().is_operator("&") {
        parser.bump();
    }
    skip_type_operand(parser)?;
    while parser.peek().is_operator("|") || parser.peek().is_operator("&") {
        parser.bump();
        skip_type_operand(parser)?;
    }
    Ok(())
}

fn skip_type_operand(parser: &mut Parser) -> Result<(), ThemeError> {
    match parser.peek().clone() {
        Token::Ident(word) if matches!(word.as_str(), "keyof" | "readonly" | "unique" | "infer" | "asserts") => {
            parser.bump();
            skip_type_operand(parser)?;
        }
        Token::Ident(word) if word == "typeof" => {
            parser.bump();
            skip_qualified_name(parser)?;
        }
        Token::Ident(word) if word == "new" || word == "abstract" => {
            parser.bump();
            parser.eat_ident("new");
            skip_function_type(parser)?;
        }
        Token::Ident(_) => {
            skip_qualified_name(parser)?;
            if parser.peek().is_ident("is") && !parser.newline_before() {
                // type predicate: `x is T`
                parser.bump();
                skip_type(parser)?;
            }
        }
        Token::LParen => {
            // function type or parenthesized type
            let Some(close) = parser.matching_close(parser.pos) else {
                return Err(parser.error("Unbalanced '(' in type", 202));
            };
            if matches!(parser.peek_at(close - parser.pos + 1), Token::Arrow) {
                skip_function_type(parser)?;
            } else {
                parser.bump();
                skip_type(parser)?;
                parser.expect(Token::RParen)?;
            }
        }
        Token::Operator(op) if op == "<" => {
            // generic function type: <T>(x: T) => T
            skip_type_arguments(parser)?;
            skip_function_type(parser)?;
        }
        Token::LBrace | Token::LBracket => skip_balanced(parser)?,
        Token::String(_) | Token::Number(_) | Token::Bool(_) | Token::Null | Token::Template(_) => {
            parser.bump();
        }
        Token::TemplateHead(_) => skip_balanced(parser)?,
        Token::Operator(op) if op == "-" => {
            // negative numeric literal type
            parser.bump();
            parser.bump();
        }
        _ => {
            let message = format!("Expected a type, got {:?}", parser.peek());
            return Err(parser.error(&message, 212));
        }
    }

    // array and indexed-access suffixes: T[] and T["key"]
    while *parser.peek() == Token::LBracket && !parser.newline_before() {
        skip_balanced(parser)?;
    }
    Ok(())
}

fn skip_qualified_name(parser: &mut Parser) -> Result<(), ThemeError> {
    parser.expect_ident()?;
    while *parser.peek() == Token::Dot {
        parser.bump();
        parser.expect_ident()?;
    }
    if parser.peek().is_operator("<") {
        skip_type_arguments(parser)?;
    }
    Ok(())
}

fn skip_function_type(parser: &mut Parser) -> Result<(), ThemeError> {
    if *parser.peek() != Token::LParen {
        return Err(parser.error("Expected '(' in function type", 202));
    }
    skip_balanced(parser)?;
    parser.expect(Token::Arrow)?;
    skip_type(parser)
}

/// Skips `<...>`, counting `>>` and `>>>` as several closers.
pub(super) fn skip_type_arguments(parser: &mut Parser) -> Result<(), ThemeError> {
    if !parser.peek().is_operator("<") {
        return Err(parser.error("Expected '<'", 202));
    }

    let mut depth: isize = 0;
    loop {
        match parser.peek() {
            Token::Operator(op) if op == "<" => depth += 1,
            Token::Operator(op) if op == ">" => depth -= 1,
            Token::Operator(op) if op == ">>" => depth -= 2,
            Token::Operator(op) if op == ">>>" => depth -= 3,
            Token::LBrace | Token::LParen | Token::LBracket | Token::TemplateHead(_) => {
                skip_balanced(parser)?;
                continue;
            }
            Token::Semicolon | Token::RBrace | Token::RParen | Token::RBracket | Token::Eof => {
                return Err(parser.error("Unclosed type argument list", 202));
            }
            _ => {}
        }
        parser.bump();
        if depth <= 0 {
            return Ok(());
        }
    }
}

/// Skips a bracketed group, the current token being its opener.
pub(super) fn skip_balanced(parser: &mut Parser) -> Result<(), ThemeError> {
    let Some(close) = parser.matching_close(parser.pos) else {
        return Err(parser.error("Unbalanced brackets", 202));
    };
    parser.pos = close + 1;
    Ok(())
}

/// `: Type` annotation, when present.
pub(super) fn skip_annotation(parser: &mut Parser) -> Result<(), ThemeError> {
    if parser.eat(&Token::Colon) {
        skip_type(parser)?;
    }
    Ok(())
}

/// `<T, U extends X = Y>` type parameters, when present.
pub(super) fn skip_type_parameters(parser: &mut Parser) -> Result<(), ThemeError> {
    if parser.peek().is_operator("<") {
        skip_type_arguments(parser)?;
    }
    Ok(())
}

/// Speculatively skips type arguments of a call or tagged template
/// (`fn<T>(x)`, ``styled.div<Props>`...` ``). Rewinds and returns `false`
/// when the `<` turns out to be a comparison.
pub(super) fn try_skip_call_type_arguments(parser: &mut Parser) -> bool {
    let checkpoint = parser.checkpoint();
    if skip_type_arguments(parser).is_ok()
        && matches!(
            parser.peek(),
            Token::LParen | Token::Template(_) | Token::TemplateHead(_)
        )
    {
        return true;
    }
    parser.rewind(checkpoint);
    false
}

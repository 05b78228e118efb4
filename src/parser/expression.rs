// Author: Dustin Pilgrim
// License: MIT

use super::*;
use super::pattern::{parse_binding, parse_block, parse_function_rest, parse_params};
use super::types::{skip_annotation, skip_balanced, skip_type, try_skip_call_type_arguments};
use crate::syntax::{MemberProp, PropKey, WrapKind};

/// Binary operator precedence. `as`/`satisfies` bind at the relational level.
fn precedence(op: &str) -> Option<u8> {
    let prec = match op {
        "??" => 1,
        "||" => 2,
        "&&" => 3,
        "|" => 4,
        "^" => 5,
        "&" => 6,
        "==" | "!=" | "===" | "!==" => 7,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 8,
        "<<" | ">>" | ">>>" => 9,
        "+" | "-" => 10,
        "*" | "/" | "%" => 11,
        "**" => 12,
        _ => return None,
    };
    Some(prec)
}

const RELATIONAL: u8 = 8;

fn is_assignment_op(op: &str) -> bool {
    matches!(
        op,
        "+=" | "-=" | "*=" | "/=" | "%=" | "**=" | "<<=" | ">>=" | ">>>=" | "&=" | "|=" | "^="
            | "&&=" | "||=" | "??="
    )
}

/// Comma-separated sequence.
pub(super) fn parse_expression(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let first = parse_assignment(parser)?;
    if *parser.peek() != Token::Comma {
        return Ok(first);
    }

    let mut exprs = vec![first];
    while parser.eat(&Token::Comma) {
        exprs.push(parse_assignment(parser)?);
    }
    Ok(parser.finish_node(NodeKind::Sequence { exprs }, start))
}

pub(super) fn parse_assignment(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    parser.enter()?;
    let result = parse_assignment_inner(parser);
    parser.leave();
    result
}

fn parse_assignment_inner(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    if let Some(arrow) = try_parse_arrow(parser)? {
        return Ok(arrow);
    }

    let start = parser.start();
    let test = parse_binary(parser, 0)?;

    if parser.eat(&Token::Question) {
        let cons = parse_assignment(parser)?;
        parser.expect(Token::Colon)?;
        let alt = parse_assignment(parser)?;
        return Ok(parser.finish_node(NodeKind::Conditional { test, cons, alt }, start));
    }

    let op = match parser.peek() {
        Token::Equals => Some("=".to_string()),
        Token::Operator(op) if is_assignment_op(op) => Some(op.clone()),
        _ => None,
    };
    if let Some(op) = op {
        parser.bump();
        let right = parse_assignment(parser)?;
        return Ok(parser.finish_node(NodeKind::Binary { op, left: test, right }, start));
    }

    Ok(test)
}

/// Arrow functions: `x => ...`, `(a, b) => ...`, `async (x): T => ...`.
/// Returns `None` without consuming anything when the input is not an arrow.
fn try_parse_arrow(parser: &mut Parser) -> Result<Option<NodeId>, ThemeError> {
    let start = parser.start();
    let is_async = parser.peek().is_ident("async")
        && !parser.tokens.get(parser.pos + 1).is_some_and(|t| t.newline_before)
        && matches!(parser.peek_at(1), Token::Ident(_) | Token::LParen)
        && !parser.peek_at(1).is_ident("function");
    let offset = usize::from(is_async);

    match parser.peek_at(offset) {
        Token::Ident(_) if matches!(parser.peek_at(offset + 1), Token::Arrow) => {
            if is_async {
                parser.bump();
            }
            let params = vec![parse_binding(parser)?];
            parser.expect(Token::Arrow)?;
            let body = parse_arrow_body(parser)?;
            Ok(Some(parser.finish_node(NodeKind::Arrow { params, body, is_async }, start)))
        }
        Token::LParen => {
            let Some(close) = parser.matching_close(parser.pos + offset) else {
                return Ok(None);
            };
            let after = parser.peek_at(close - parser.pos + 1).clone();
            match after {
                Token::Arrow => {
                    if is_async {
                        parser.bump();
                    }
                    let params = parse_params(parser)?;
                    parser.expect(Token::Arrow)?;
                    let body = parse_arrow_body(parser)?;
                    Ok(Some(parser.finish_node(NodeKind::Arrow { params, body, is_async }, start)))
                }
                // `(x): T => ...` or a conditional's `(x) : alt`
                Token::Colon => {
                    let checkpoint = parser.checkpoint();
                    let saved_depth = parser.depth;
                    match parse_typed_arrow(parser, is_async, start) {
                        Ok(node) => Ok(Some(node)),
                        Err(_) => {
                            parser.rewind(checkpoint);
                            parser.depth = saved_depth;
                            Ok(None)
                        }
                    }
                }
                _ => Ok(None),
            }
        }
        Token::Operator(op) if op == "<" && !is_async => {
            // generic arrow: <T,>(x: T) => x
            let checkpoint = parser.checkpoint();
            let saved_depth = parser.depth;
            let attempt = super::types::skip_type_arguments(parser).and_then(|_| {
                let params = parse_params(parser)?;
                skip_annotation(parser)?;
                parser.expect(Token::Arrow)?;
                let body = parse_arrow_body(parser)?;
                Ok(parser.finish_node(NodeKind::Arrow { params, body, is_async: false }, start))
            });
            match attempt {
                Ok(node) => Ok(Some(node)),
                Err(_) => {
                    parser.rewind(checkpoint);
                    parser.depth = saved_depth;
                    Ok(None)
                }
            }
        }
        _ => Ok(None),
    }
}

fn parse_typed_arrow(parser: &mut Parser, is_async: bool, start: usize) -> Result<NodeId, ThemeError> {
    if is_async {
        parser.bump();
    }
    let params = parse_params(parser)?;
    skip_annotation(parser)?;
    parser.expect(Token::Arrow)?;
    let body = parse_arrow_body(parser)?;
    Ok(parser.finish_node(NodeKind::Arrow { params, body, is_async }, start))
}

fn parse_arrow_body(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    if *parser.peek() == Token::LBrace {
        parse_block(parser)
    } else {
        parse_assignment(parser)
    }
}

/// Precedence climbing over binary operators.
fn parse_binary(parser: &mut Parser, min_prec: u8) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let mut left = parse_unary(parser)?;

    loop {
        // TypeScript `x as T` / `x satisfies T`
        let wrap = match parser.peek() {
            Token::Ident(word) if word == "as" => Some(WrapKind::As),
            Token::Ident(word) if word == "satisfies" => Some(WrapKind::Satisfies),
            _ => None,
        };
        if let Some(kind) = wrap {
            if min_prec >= RELATIONAL || parser.newline_before() {
                break;
            }
            parser.bump();
            skip_type(parser)?;
            left = parser.finish_node(NodeKind::TsWrap { kind, expr: left }, start);
            continue;
        }

        let op = match parser.peek() {
            Token::Operator(op) => op.clone(),
            Token::Ident(word) if word == "instanceof" || word == "in" => word.clone(),
            _ => break,
        };
        let Some(prec) = precedence(&op) else { break };
        if prec <= min_prec {
            break;
        }

        parser.bump();
        // `**` is right associative
        let next_min = if op == "**" { prec - 1 } else { prec };
        let right = parse_binary(parser, next_min)?;
        left = parser.finish_node(NodeKind::Binary { op, left, right }, start);
    }

    Ok(left)
}

fn parse_unary(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let op = match parser.peek() {
        Token::Operator(op) if matches!(op.as_str(), "!" | "~" | "+" | "-" | "++" | "--") => {
            Some(op.clone())
        }
        Token::Ident(word)
            if matches!(word.as_str(), "typeof" | "void" | "delete" | "await")
                && starts_expression(parser.peek_at(1)) =>
        {
            Some(word.clone())
        }
        _ => None,
    };

    if let Some(op) = op {
        parser.bump();
        parser.enter()?;
        let arg = parse_unary(parser);
        parser.leave();
        let arg = arg?;
        return Ok(parser.finish_node(NodeKind::Unary { op, arg, prefix: true }, start));
    }

    let expr = parse_postfix(parser)?;
    let postfix = match parser.peek() {
        Token::Operator(op) if (op == "++" || op == "--") && !parser.newline_before() => {
            Some(op.clone())
        }
        _ => None,
    };
    if let Some(op) = postfix {
        parser.bump();
        return Ok(parser.finish_node(NodeKind::Unary { op, arg: expr, prefix: false }, start));
    }
    Ok(expr)
}

/// Whether a token can begin an operand, so `await` and friends used as
/// plain identifiers are not mistaken for operators.
fn starts_expression(token: &Token) -> bool {
    !matches!(
        token,
        Token::RParen
            | Token::RBracket
            | Token::RBrace
            | Token::Comma
            | Token::Semicolon
            | Token::Colon
            | Token::Dot
            | Token::QuestionDot
            | Token::Arrow
            | Token::Equals
            | Token::Question
            | Token::Eof
    ) && !matches!(token, Token::Operator(op) if !matches!(op.as_str(), "!" | "~" | "+" | "-" | "++" | "--" | "<"))
}

/// Member access, calls, tagged templates and non-null assertions.
fn parse_postfix(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let mut expr = if parser.peek().is_ident("new") && *parser.peek_at(1) != Token::Dot {
        parse_new(parser)?
    } else {
        parse_primary(parser)?
    };
    loop {
        expr = match parse_member_suffix(parser, expr, start, true)? {
            Some(next) => next,
            None => return Ok(expr),
        };
    }
}

/// Applies one postfix operation to `object`, or returns `None` when the
/// next token does not continue the chain.
fn parse_member_suffix(
    parser: &mut Parser,
    object: NodeId,
    start: usize,
    allow_call: bool,
) -> Result<Option<NodeId>, ThemeError> {
    let node = match parser.peek().clone() {
        Token::Dot => {
            parser.bump();
            let property = parse_member_name(parser);
            NodeKind::Member { object, property, optional: false }
        }
        Token::QuestionDot => {
            parser.bump();
            match parser.peek() {
                Token::LParen if allow_call => {
                    let args = parse_arguments(parser)?;
                    NodeKind::Call { callee: object, args, optional: true }
                }
                Token::LBracket => {
                    parser.bump();
                    let index = parse_expression(parser)?;
                    parser.expect(Token::RBracket)?;
                    NodeKind::Member { object, property: MemberProp::Computed(index), optional: true }
                }
                _ => {
                    let property = parse_member_name(parser);
                    NodeKind::Member { object, property, optional: true }
                }
            }
        }
        Token::LBracket => {
            parser.bump();
            let index = parse_expression(parser)?;
            parser.expect(Token::RBracket)?;
            NodeKind::Member { object, property: MemberProp::Computed(index), optional: false }
        }
        Token::LParen if allow_call => {
            let args = parse_arguments(parser)?;
            NodeKind::Call { callee: object, args, optional: false }
        }
        Token::Template(_) | Token::TemplateHead(_) if allow_call => {
            let quasi = parse_template(parser)?;
            NodeKind::TaggedTemplate { tag: object, quasi }
        }
        Token::Operator(op) if op == "!" && !parser.newline_before() => {
            parser.bump();
            NodeKind::TsWrap { kind: WrapKind::NonNull, expr: object }
        }
        Token::Operator(op) if op == "<" && allow_call => {
            if !try_skip_call_type_arguments(parser) {
                return Ok(None);
            }
            // the call or template that follows the type arguments
            return Ok(Some(object));
        }
        _ => return Ok(None),
    };
    Ok(Some(parser.finish_node(node, start)))
}

/// Property name after `.`; keywords are valid names. A dot followed by
/// anything else is an access still being typed.
fn parse_member_name(parser: &mut Parser) -> MemberProp {
    let name = match parser.peek() {
        Token::Ident(name) => name.clone(),
        Token::Bool(value) => value.to_string(),
        Token::Null => "null".to_string(),
        _ => return MemberProp::Missing,
    };
    parser.bump();
    MemberProp::Name(name)
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<NodeId>, ThemeError> {
    parser.expect(Token::LParen)?;
    let mut args = Vec::new();
    while *parser.peek() != Token::RParen {
        args.push(parse_element(parser)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RParen)?;
    Ok(args)
}

/// An argument or array element, possibly spread.
fn parse_element(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    if parser.eat(&Token::Ellipsis) {
        let arg = parse_assignment(parser)?;
        return Ok(parser.finish_node(NodeKind::Spread { arg }, start));
    }
    parse_assignment(parser)
}

fn parse_new(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    parser.bump(); // 'new'

    let mut callee = if parser.peek().is_ident("new") {
        parse_new(parser)?
    } else {
        parse_primary(parser)?
    };
    while let Some(next) = parse_member_suffix(parser, callee, start, false)? {
        callee = next;
    }
    if parser.peek().is_operator("<") {
        try_skip_call_type_arguments(parser);
    }

    let args = if *parser.peek() == Token::LParen {
        parse_arguments(parser)?
    } else {
        Vec::new()
    };
    Ok(parser.finish_node(NodeKind::New { callee, args }, start))
}

fn parse_primary(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let kind = match parser.peek().clone() {
        Token::Ident(name) => match name.as_str() {
            "function" => return parse_function_expression(parser, start),
            "async" if parser.peek_at(1).is_ident("function") => {
                parser.bump();
                return parse_function_expression(parser, start);
            }
            "class" => return parse_class_expression(parser, start),
            "this" => {
                parser.bump();
                NodeKind::This
            }
            "new" if *parser.peek_at(1) == Token::Dot => {
                // new.target
                parser.bump();
                NodeKind::Identifier { name: "new".into() }
            }
            _ => {
                parser.bump();
                NodeKind::Identifier { name }
            }
        },
        Token::String(value) => {
            parser.bump();
            NodeKind::StringLit { value }
        }
        Token::Number(value) => {
            parser.bump();
            NodeKind::NumberLit { value }
        }
        Token::Bool(value) => {
            parser.bump();
            NodeKind::BoolLit { value }
        }
        Token::Null => {
            parser.bump();
            NodeKind::NullLit
        }
        Token::Regex(pattern) => {
            parser.bump();
            NodeKind::RegexLit { pattern }
        }
        Token::Template(_) | Token::TemplateHead(_) => return parse_template(parser),
        Token::LParen => {
            parser.bump();
            let expr = parse_expression(parser)?;
            parser.expect(Token::RParen)?;
            NodeKind::Paren { expr }
        }
        Token::LBracket => return parse_array(parser),
        Token::LBrace => return parse_object(parser),
        Token::Operator(op) if op == "<" => {
            // `<T>expr` type assertion
            super::types::skip_type_arguments(parser)?;
            let expr = parse_unary(parser)?;
            NodeKind::TsWrap { kind: WrapKind::TypeAssertion, expr }
        }
        other => {
            let message = format!("Unexpected token {:?} in expression", other);
            return Err(parser.error(&message, 210));
        }
    };
    Ok(parser.finish_node(kind, start))
}

fn parse_function_expression(parser: &mut Parser, start: usize) -> Result<NodeId, ThemeError> {
    parser.bump(); // 'function'
    parser.eat(&Token::Operator("*".into()));
    let (name, params, body) = parse_function_rest(parser)?;
    Ok(parser.finish_node(NodeKind::Function { name, params, body }, start))
}

/// Class expressions are kept opaque.
fn parse_class_expression(parser: &mut Parser, start: usize) -> Result<NodeId, ThemeError> {
    parser.bump(); // 'class'
    while *parser.peek() != Token::LBrace {
        if *parser.peek() == Token::Eof {
            return Err(parser.error("Expected class body", 202));
        }
        if matches!(parser.peek(), Token::LParen | Token::LBracket) {
            skip_balanced(parser)?;
        } else {
            parser.bump();
        }
    }
    skip_balanced(parser)?;
    Ok(parser.finish_node(NodeKind::Opaque, start))
}

/// Template literal, with or without substitutions.
pub(super) fn parse_template(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let mut quasis = Vec::new();
    let mut exprs = Vec::new();

    match parser.bump() {
        Token::Template(text) => quasis.push(text),
        Token::TemplateHead(text) => {
            quasis.push(text);
            loop {
                exprs.push(parse_expression(parser)?);
                match parser.bump() {
                    Token::TemplateMiddle(text) => quasis.push(text),
                    Token::TemplateTail(text) => {
                        quasis.push(text);
                        break;
                    }
                    other => {
                        let message = format!("Expected '}}' closing substitution, got {:?}", other);
                        return Err(parser.error(&message, 202));
                    }
                }
            }
        }
        other => {
            let message = format!("Expected template literal, got {:?}", other);
            return Err(parser.error(&message, 202));
        }
    }

    Ok(parser.finish_node(NodeKind::Template { quasis, exprs }, start))
}

fn parse_array(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    parser.expect(Token::LBracket)?;
    let mut elements = Vec::new();

    while *parser.peek() != Token::RBracket {
        if parser.eat(&Token::Comma) {
            elements.push(None);
            continue;
        }
        elements.push(Some(parse_element(parser)?));
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RBracket)?;
    Ok(parser.finish_node(NodeKind::Array { elements }, start))
}

fn parse_object(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    parser.expect(Token::LBrace)?;
    let mut props = Vec::new();

    while *parser.peek() != Token::RBrace {
        props.push(parse_property(parser)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RBrace)?;
    Ok(parser.finish_node(NodeKind::Object { props }, start))
}

fn parse_property(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();

    if parser.eat(&Token::Ellipsis) {
        let arg = parse_assignment(parser)?;
        return Ok(parser.finish_node(NodeKind::Spread { arg }, start));
    }

    // get/set/async/generator methods
    let mut is_method = false;
    if let Token::Ident(word) = parser.peek() {
        if matches!(word.as_str(), "get" | "set" | "async") && is_property_key(parser.peek_at(1)) {
            parser.bump();
            is_method = true;
        }
    }
    if parser.eat(&Token::Operator("*".into())) {
        is_method = true;
    }

    let key_start = parser.start();
    let key = parse_property_key(parser)?;

    if is_method || *parser.peek() == Token::LParen || parser.peek().is_operator("<") {
        let value_start = parser.start();
        super::types::skip_type_parameters(parser)?;
        let params = parse_params(parser)?;
        skip_annotation(parser)?;
        let body = parse_block(parser)?;
        let value = parser.finish_node(NodeKind::Function { name: None, params, body }, value_start);
        return Ok(parser.finish_node(
            NodeKind::Property { key, value, shorthand: false, method: true },
            start,
        ));
    }

    if parser.eat(&Token::Colon) {
        let value = parse_assignment(parser)?;
        return Ok(parser.finish_node(
            NodeKind::Property { key, value, shorthand: false, method: false },
            start,
        ));
    }

    // shorthand `{ a }`, or `{ a = 1 }` when the literal is really a pattern
    let PropKey::Ident(name) = &key else {
        let message = format!("Expected ':' after property key, got {:?}", parser.peek());
        return Err(parser.error(&message, 202));
    };
    let value = parser
        .builder
        .push(NodeKind::Identifier { name: name.clone() }, Span::new(key_start, parser.last_end()));
    if parser.eat(&Token::Equals) {
        parse_assignment(parser)?;
    }
    Ok(parser.finish_node(NodeKind::Property { key, value, shorthand: true, method: false }, start))
}

fn is_property_key(token: &Token) -> bool {
    matches!(
        token,
        Token::Ident(_)
            | Token::String(_)
            | Token::Number(_)
            | Token::Bool(_)
            | Token::Null
            | Token::LBracket
    ) || token.is_operator("*")
}

fn parse_property_key(parser: &mut Parser) -> Result<PropKey, ThemeError> {
    let key = match parser.bump() {
        Token::Ident(name) => PropKey::Ident(name),
        Token::String(value) => PropKey::Str(value),
        Token::Number(value) => PropKey::Num(value),
        Token::Bool(value) => PropKey::Ident(value.to_string()),
        Token::Null => PropKey::Ident("null".into()),
        Token::LBracket => {
            let expr = parse_assignment(parser)?;
            parser.expect(Token::RBracket)?;
            PropKey::Computed(expr)
        }
        other => {
            let message = format!("Unexpected {:?} as property key", other);
            return Err(parser.error(&message, 210));
        }
    };
    Ok(key)
}
